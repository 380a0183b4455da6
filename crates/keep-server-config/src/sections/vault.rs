// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Master-key configuration.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use std::fmt;
use zeroize::Zeroizing;

use crate::error::ConfigError;

/// Required decoded length of the master key (AES-256).
pub const MASTER_KEY_LEN: usize = 32;

/// Vault configuration (runtime, fully resolved).
///
/// Holds the master key in its base64 form; [`VaultConfig::decoded_master_key`]
/// validates and decodes it. Required at load time.
#[derive(Clone, Default)]
pub struct VaultConfig {
	pub master_key: String,
}

impl fmt::Debug for VaultConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("VaultConfig")
			.field("master_key", &"<redacted>")
			.finish()
	}
}

impl VaultConfig {
	/// Decode the configured master key.
	///
	/// The decoded value must be exactly [`MASTER_KEY_LEN`] bytes.
	pub fn decoded_master_key(&self) -> Result<Zeroizing<Vec<u8>>, ConfigError> {
		let decoded = BASE64
			.decode(&self.master_key)
			.map_err(|e| ConfigError::Invalid(format!("master key is not valid base64: {e}")))?;

		if decoded.len() != MASTER_KEY_LEN {
			return Err(ConfigError::Invalid(format!(
				"master key must decode to {MASTER_KEY_LEN} bytes, got {}",
				decoded.len()
			)));
		}

		Ok(Zeroizing::new(decoded))
	}
}

/// Vault configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VaultConfigLayer {
	#[serde(default)]
	pub master_key: Option<String>,
}

impl VaultConfigLayer {
	pub fn merge(&mut self, other: VaultConfigLayer) {
		if other.master_key.is_some() {
			self.master_key = other.master_key;
		}
	}

	pub fn finalize(self) -> VaultConfig {
		VaultConfig {
			master_key: self.master_key.unwrap_or_default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn b64_key(len: usize) -> String {
		BASE64.encode(vec![0u8; len])
	}

	#[test]
	fn valid_32_byte_key_decodes() {
		let config = VaultConfig {
			master_key: b64_key(32),
		};
		assert_eq!(config.decoded_master_key().unwrap().len(), 32);
	}

	#[test]
	fn wrong_length_is_rejected() {
		for len in [0, 16, 31, 33, 64] {
			let config = VaultConfig {
				master_key: b64_key(len),
			};
			assert!(config.decoded_master_key().is_err(), "len {len} accepted");
		}
	}

	#[test]
	fn non_base64_is_rejected() {
		let config = VaultConfig {
			master_key: "!!not base64!!".to_string(),
		};
		assert!(config.decoded_master_key().is_err());
	}

	#[test]
	fn debug_redacts_the_key() {
		let config = VaultConfig {
			master_key: b64_key(32),
		};
		assert!(!format!("{config:?}").contains(&b64_key(32)));
	}
}
