// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stateless bearer-token authority.
//!
//! Tokens are HS256-signed JWTs carrying the user id in `sub` plus the
//! standard `iat`/`nbf`/`exp` claims. There is no server-side revocation
//! list; the compromise window equals the configured lifetime.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::UserId;

/// Errors from issuing or validating a token.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
	#[error("failed to sign token: {0}")]
	Sign(String),

	#[error("invalid token: {0}")]
	Invalid(String),

	#[error("token subject is not a valid user id")]
	InvalidSubject,
}

/// Registered claims carried by every issued token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
	/// Subject: the user id as a UUID string.
	sub: String,
	/// Issued-at (seconds since epoch).
	iat: i64,
	/// Not-before (seconds since epoch).
	nbf: i64,
	/// Expiry (seconds since epoch).
	exp: i64,
}

/// Issues and validates bearer tokens for authenticated users.
///
/// Pure function over its configuration; safe to share across requests.
pub struct TokenAuthority {
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	lifetime: Duration,
	validation: Validation,
}

impl TokenAuthority {
	/// Create an authority signing with `secret` and issuing tokens valid
	/// for `lifetime`.
	pub fn new(secret: &str, lifetime: Duration) -> Self {
		let mut validation = Validation::new(Algorithm::HS256);
		validation.leeway = 0;
		validation.validate_nbf = true;
		validation.set_required_spec_claims(&["sub", "exp", "nbf"]);

		Self {
			encoding_key: EncodingKey::from_secret(secret.as_bytes()),
			decoding_key: DecodingKey::from_secret(secret.as_bytes()),
			lifetime,
			validation,
		}
	}

	/// Issue a signed token for `user_id`, valid from now until
	/// now + lifetime.
	pub fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
		let now = Utc::now();
		let claims = Claims {
			sub: user_id.to_string(),
			iat: now.timestamp(),
			nbf: now.timestamp(),
			exp: (now + self.lifetime).timestamp(),
		};

		encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
			.map_err(|e| TokenError::Sign(e.to_string()))
	}

	/// Validate a token and return its subject.
	///
	/// Rejects non-HS256 algorithms, bad signatures, expired or
	/// not-yet-valid tokens, and subjects that do not parse as a UUID.
	pub fn validate(&self, token: &str) -> Result<UserId, TokenError> {
		let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
			.map_err(|e| TokenError::Invalid(e.to_string()))?;

		Uuid::parse_str(&data.claims.sub)
			.map(UserId::new)
			.map_err(|_| TokenError::InvalidSubject)
	}
}
