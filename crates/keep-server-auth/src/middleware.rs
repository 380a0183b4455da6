// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Header extraction helpers for the authentication middleware.
//!
//! # Security Notes
//!
//! - Bearer tokens are extracted from the `Authorization` header
//! - Token values are never logged

use http::header::AUTHORIZATION;
use http::HeaderMap;

/// Extract a bearer token from the `Authorization` header.
///
/// Expects `Authorization: Bearer <token>`. The scheme match is
/// case-insensitive (`bearer`, `BEARER`, ... are all accepted); the token
/// itself is returned verbatim. Returns `None` for a missing header, a
/// different scheme, or an empty token.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let auth = headers.get(AUTHORIZATION)?.to_str().ok()?;
	let (scheme, token) = auth.split_once(' ')?;
	if !scheme.eq_ignore_ascii_case("Bearer") {
		return None;
	}
	let token = token.trim();
	if token.is_empty() {
		return None;
	}
	Some(token.to_string())
}
