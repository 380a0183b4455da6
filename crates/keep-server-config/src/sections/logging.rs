// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Logging configuration.

use serde::Deserialize;

use crate::error::ConfigError;

const VALID_LEVELS: &[&str] = &["debug", "info", "warn", "error"];

/// Logging configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct LoggingConfig {
	pub level: String,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
		}
	}
}

impl LoggingConfig {
	/// Ensure the level is one of debug, info, warn, error.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if VALID_LEVELS.contains(&self.level.as_str()) {
			Ok(())
		} else {
			Err(ConfigError::Invalid(format!(
				"unknown log level {:?}; expected one of {}",
				self.level,
				VALID_LEVELS.join(", ")
			)))
		}
	}
}

/// Logging configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfigLayer {
	#[serde(default)]
	pub level: Option<String>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: LoggingConfigLayer) {
		if other.level.is_some() {
			self.level = other.level;
		}
	}

	pub fn finalize(self) -> LoggingConfig {
		LoggingConfig {
			level: self.level.unwrap_or_else(|| "info".to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_to_info() {
		let config = LoggingConfigLayer::default().finalize();
		assert_eq!(config.level, "info");
		assert!(config.validate().is_ok());
	}

	#[test]
	fn rejects_unknown_levels() {
		let config = LoggingConfig {
			level: "verbose".to_string(),
		};
		assert!(config.validate().is_err());
	}

	#[test]
	fn accepts_all_documented_levels() {
		for level in ["debug", "info", "warn", "error"] {
			let config = LoggingConfig {
				level: level.to_string(),
			};
			assert!(config.validate().is_ok(), "level {level} rejected");
		}
	}
}
