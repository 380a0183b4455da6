// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("missing required configuration: {0}")]
	Missing(&'static str),

	#[error("invalid configuration: {0}")]
	Invalid(String),

	#[error("failed to read config file {path}: {source}")]
	Io {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse config file {path}: {source}")]
	Toml {
		path: String,
		#[source]
		source: toml::de::Error,
	},
}
