// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! keep secrets vault server.
//!
//! This crate provides the HTTP server for the keep vault: a central
//! service that authenticates users, stores per-item secrets under
//! envelope encryption, and exposes a JSON API under `/api/v1`.

pub mod api;
pub mod api_response;
pub mod auth_middleware;
pub mod auth_service;
pub mod routes;
pub mod validation;
pub mod version;

pub use api::{create_app_state, create_router, AppState};
pub use auth_service::{AuthService, AuthServiceError};
pub use keep_server_config::ServerConfig;
