// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Registration and login HTTP handlers.

use axum::{
	body::Bytes,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use http::HeaderMap;
use serde::{Deserialize, Serialize};

use keep_server_auth::types::UserId;

use crate::api::AppState;
use crate::api_response::{bad_request, conflict, internal_error, unauthorized};
use crate::auth_service::AuthServiceError;
use crate::routes::decode_json;
use crate::validation::require_non_empty;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
	#[serde(default)]
	pub username: String,
	#[serde(default)]
	pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
	pub token: String,
	pub user_id: UserId,
}

fn validate_credentials(req: &CredentialsRequest) -> Result<(), Response> {
	require_non_empty("username", &req.username)
		.and_then(|()| require_non_empty("password", &req.password))
		.map_err(|e| bad_request(e.error, e.message).into_response())
}

/// POST /register - create an account and issue a token.
pub async fn register(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
	let req: CredentialsRequest = match decode_json(&headers, &body) {
		Ok(req) => req,
		Err(rejection) => return rejection.into_response(),
	};
	if let Err(rejection) = validate_credentials(&req) {
		return rejection;
	}

	match state.auth_service.register(&req.username, &req.password).await {
		Ok((user, token)) => (
			StatusCode::CREATED,
			Json(AuthResponse {
				token,
				user_id: user.id,
			}),
		)
			.into_response(),
		Err(AuthServiceError::Conflict) => {
			conflict("conflict", "username already exists").into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to register user");
			internal_error().into_response()
		}
	}
}

/// POST /login - authenticate and issue a token.
///
/// Unknown usernames and wrong passwords produce byte-identical 401
/// responses.
pub async fn login(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
	let req: CredentialsRequest = match decode_json(&headers, &body) {
		Ok(req) => req,
		Err(rejection) => return rejection.into_response(),
	};
	if let Err(rejection) = validate_credentials(&req) {
		return rejection;
	}

	match state.auth_service.login(&req.username, &req.password).await {
		Ok((user, token)) => (
			StatusCode::OK,
			Json(AuthResponse {
				token,
				user_id: user.id,
			}),
		)
			.into_response(),
		Err(AuthServiceError::InvalidCredentials) => {
			unauthorized("invalid_credentials", "invalid username or password").into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to login user");
			internal_error().into_response()
		}
	}
}
