// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication middleware.
//!
//! Every protected route runs behind [`require_auth`], which validates the
//! bearer token and attaches the subject to the request. Handlers receive
//! it through the [`AuthUser`] extractor, which fails closed: no validated
//! user id on the request means 401, regardless of how the handler was
//! reached.

use axum::{
	extract::{FromRequestParts, Request, State},
	http::request::Parts,
	middleware::Next,
	response::{IntoResponse, Response},
};
use keep_server_auth::middleware::extract_bearer_token;
use keep_server_auth::types::UserId;

use crate::api::AppState;
use crate::api_response::unauthorized;

/// The authenticated user id, attached by [`require_auth`].
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub UserId);

/// Middleware: validate the bearer token and attach the subject user id.
///
/// Responds 401 on a missing or malformed `Authorization` header and on
/// any token validation failure; the handler chain is never reached.
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
	let Some(token) = extract_bearer_token(req.headers()) else {
		return unauthorized("unauthorized", "missing bearer token").into_response();
	};

	match state.token_authority.validate(&token) {
		Ok(user_id) => {
			req.extensions_mut().insert(AuthUser(user_id));
			next.run(req).await
		}
		Err(e) => {
			tracing::debug!(error = %e, "rejected bearer token");
			unauthorized("unauthorized", "invalid token").into_response()
		}
	}
}

impl<S> FromRequestParts<S> for AuthUser
where
	S: Send + Sync,
{
	type Rejection = Response;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		parts.extensions.get::<AuthUser>().copied().ok_or_else(|| {
			unauthorized("unauthorized", "authentication required").into_response()
		})
	}
}
