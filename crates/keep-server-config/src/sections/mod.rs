// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections, one module per concern.

pub mod auth;
pub mod database;
pub mod http;
pub mod logging;
pub mod tls;
pub mod vault;

pub use auth::{AuthConfig, AuthConfigLayer};
pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use tls::{TlsConfig, TlsConfigLayer};
pub use vault::{VaultConfig, VaultConfigLayer, MASTER_KEY_LEN};
