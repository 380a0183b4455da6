// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health and version HTTP handlers.

use axum::{response::IntoResponse, Json};
use serde::Serialize;

use crate::version;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct VersionResponse {
	pub version: &'static str,
	pub build: &'static str,
}

/// GET /health - liveness probe.
pub async fn health_check() -> impl IntoResponse {
	Json(HealthResponse { status: "ok" })
}

/// GET /version - build information.
pub async fn version() -> impl IntoResponse {
	Json(VersionResponse {
		version: version::VERSION,
		build: version::build(),
	})
}
