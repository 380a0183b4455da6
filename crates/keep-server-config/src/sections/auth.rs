// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Token-signing configuration.

use serde::Deserialize;
use std::fmt;

/// Default bearer-token lifetime: 24 hours.
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 24 * 60 * 60;

/// Auth configuration (runtime, fully resolved).
///
/// `token_secret` is required and validated at load time.
#[derive(Clone)]
pub struct AuthConfig {
	pub token_secret: String,
	pub token_lifetime_secs: u64,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			token_secret: String::new(),
			token_lifetime_secs: DEFAULT_TOKEN_LIFETIME_SECS,
		}
	}
}

impl fmt::Debug for AuthConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AuthConfig")
			.field("token_secret", &"<redacted>")
			.field("token_lifetime_secs", &self.token_lifetime_secs)
			.finish()
	}
}

/// Auth configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub token_secret: Option<String>,
	#[serde(default)]
	pub token_lifetime_secs: Option<u64>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.token_secret.is_some() {
			self.token_secret = other.token_secret;
		}
		if other.token_lifetime_secs.is_some() {
			self.token_lifetime_secs = other.token_lifetime_secs;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			token_secret: self.token_secret.unwrap_or_default(),
			token_lifetime_secs: self
				.token_lifetime_secs
				.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lifetime_defaults_to_24_hours() {
		let config = AuthConfigLayer::default().finalize();
		assert_eq!(config.token_lifetime_secs, 86400);
	}

	#[test]
	fn debug_redacts_the_secret() {
		let config = AuthConfig {
			token_secret: "very-secret".to_string(),
			token_lifetime_secs: 60,
		};
		let debug = format!("{config:?}");
		assert!(!debug.contains("very-secret"));
		assert!(debug.contains("<redacted>"));
	}
}
