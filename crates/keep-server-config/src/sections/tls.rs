// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! TLS configuration.
//!
//! Certificate and key must be supplied together: both present means
//! HTTPS, both absent means HTTP, exactly one is a startup failure.

use serde::Deserialize;
use std::path::PathBuf;

use crate::error::ConfigError;

/// TLS configuration (runtime; present only when HTTPS is enabled).
#[derive(Debug, Clone)]
pub struct TlsConfig {
	pub cert_file: PathBuf,
	pub key_file: PathBuf,
}

/// TLS configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfigLayer {
	#[serde(default)]
	pub cert_file: Option<PathBuf>,
	#[serde(default)]
	pub key_file: Option<PathBuf>,
}

impl TlsConfigLayer {
	pub fn merge(&mut self, other: TlsConfigLayer) {
		if other.cert_file.is_some() {
			self.cert_file = other.cert_file;
		}
		if other.key_file.is_some() {
			self.key_file = other.key_file;
		}
	}

	pub fn finalize(self) -> Result<Option<TlsConfig>, ConfigError> {
		match (self.cert_file, self.key_file) {
			(Some(cert_file), Some(key_file)) => Ok(Some(TlsConfig {
				cert_file,
				key_file,
			})),
			(None, None) => Ok(None),
			_ => Err(ConfigError::Invalid(
				"both TLS certificate and key files must be specified or none of them".to_string(),
			)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn absent_pair_means_plain_http() {
		assert!(TlsConfigLayer::default().finalize().unwrap().is_none());
	}

	#[test]
	fn full_pair_enables_https() {
		let layer = TlsConfigLayer {
			cert_file: Some(PathBuf::from("/etc/keep/cert.pem")),
			key_file: Some(PathBuf::from("/etc/keep/key.pem")),
		};
		let config = layer.finalize().unwrap().unwrap();
		assert_eq!(config.cert_file, PathBuf::from("/etc/keep/cert.pem"));
	}

	#[test]
	fn half_a_pair_is_a_startup_failure() {
		let cert_only = TlsConfigLayer {
			cert_file: Some(PathBuf::from("/etc/keep/cert.pem")),
			key_file: None,
		};
		assert!(cert_only.finalize().is_err());

		let key_only = TlsConfigLayer {
			cert_file: None,
			key_file: Some(PathBuf::from("/etc/keep/key.pem")),
		};
		assert!(key_only.finalize().is_err());
	}
}
