// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the keep server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file,
//!   environment)
//! - Type-safe sections with validation
//! - Consistent environment variable naming (`KEEP_SERVER_*`)
//!
//! Precedence (highest to lowest):
//! 1. Environment variables
//! 2. TOML file named by `KEEP_SERVER_CONFIG` (if set)
//! 3. Built-in defaults

pub mod error;
pub mod sections;

pub use error::ConfigError;
pub use sections::*;

use serde::Deserialize;
use std::env;
use tracing::debug;

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub auth: AuthConfig,
	pub vault: VaultConfig,
	pub tls: Option<TlsConfig>,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// One partial configuration layer, as read from a single source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub auth: Option<AuthConfigLayer>,
	#[serde(default)]
	pub vault: Option<VaultConfigLayer>,
	#[serde(default)]
	pub tls: Option<TlsConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl ServerConfigLayer {
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_section(&mut self.http, other.http, HttpConfigLayer::merge);
		merge_section(&mut self.database, other.database, DatabaseConfigLayer::merge);
		merge_section(&mut self.auth, other.auth, AuthConfigLayer::merge);
		merge_section(&mut self.vault, other.vault, VaultConfigLayer::merge);
		merge_section(&mut self.tls, other.tls, TlsConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	match (base.as_mut(), other) {
		(Some(base), Some(other)) => merge(base, other),
		(None, Some(other)) => *base = Some(other),
		_ => {}
	}
}

/// Load configuration from all sources with standard precedence.
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	let mut merged = ServerConfigLayer::default();

	if let Ok(path) = env::var("KEEP_SERVER_CONFIG") {
		debug!(path = %path, "loading configuration file");
		merged.merge(toml_layer(&path)?);
	}

	merged.merge(env_layer());

	finalize(merged)
}

/// Load configuration from environment only (for testing or simple
/// deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	finalize(env_layer())
}

fn toml_layer(path: &str) -> Result<ServerConfigLayer, ConfigError> {
	let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
		path: path.to_string(),
		source,
	})?;
	toml::from_str(&contents).map_err(|source| ConfigError::Toml {
		path: path.to_string(),
		source,
	})
}

fn env_layer() -> ServerConfigLayer {
	fn var(name: &str) -> Option<String> {
		env::var(name).ok().filter(|v| !v.is_empty())
	}
	fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
		var(name).and_then(|v| v.parse().ok())
	}

	ServerConfigLayer {
		http: Some(HttpConfigLayer {
			host: var("KEEP_SERVER_HOST"),
			port: parse_var("KEEP_SERVER_PORT"),
		}),
		database: Some(DatabaseConfigLayer {
			url: var("KEEP_SERVER_DATABASE_URL"),
			max_connections: parse_var("KEEP_SERVER_DB_MAX_CONNECTIONS"),
			min_connections: parse_var("KEEP_SERVER_DB_MIN_CONNECTIONS"),
			max_lifetime_secs: parse_var("KEEP_SERVER_DB_MAX_LIFETIME_SECS"),
			idle_timeout_secs: parse_var("KEEP_SERVER_DB_IDLE_TIMEOUT_SECS"),
			acquire_timeout_secs: parse_var("KEEP_SERVER_DB_ACQUIRE_TIMEOUT_SECS"),
		}),
		auth: Some(AuthConfigLayer {
			token_secret: var("KEEP_SERVER_TOKEN_SECRET"),
			token_lifetime_secs: parse_var("KEEP_SERVER_TOKEN_LIFETIME_SECS"),
		}),
		vault: Some(VaultConfigLayer {
			master_key: var("KEEP_SERVER_MASTER_KEY"),
		}),
		tls: Some(TlsConfigLayer {
			cert_file: var("KEEP_SERVER_TLS_CERT_FILE").map(Into::into),
			key_file: var("KEEP_SERVER_TLS_KEY_FILE").map(Into::into),
		}),
		logging: Some(LoggingConfigLayer {
			level: var("KEEP_SERVER_LOG_LEVEL"),
		}),
	}
}

/// Finalize a merged layer into resolved config, validating required
/// options.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let auth = layer.auth.unwrap_or_default().finalize();
	let vault = layer.vault.unwrap_or_default().finalize();
	let tls = layer.tls.unwrap_or_default().finalize()?;
	let logging = layer.logging.unwrap_or_default().finalize();

	logging.validate()?;

	if database.url.is_empty() {
		return Err(ConfigError::Missing("database URL"));
	}
	if auth.token_secret.is_empty() {
		return Err(ConfigError::Missing("token secret"));
	}
	if vault.master_key.is_empty() {
		return Err(ConfigError::Missing("master key"));
	}
	// Fail at startup, not on the first payload write.
	vault.decoded_master_key()?;

	Ok(ServerConfig {
		http,
		database,
		auth,
		vault,
		tls,
		logging,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	fn full_layer() -> ServerConfigLayer {
		use base64::Engine as _;
		ServerConfigLayer {
			http: None,
			database: Some(DatabaseConfigLayer {
				url: Some("sqlite::memory:".to_string()),
				..Default::default()
			}),
			auth: Some(AuthConfigLayer {
				token_secret: Some("secret".to_string()),
				token_lifetime_secs: None,
			}),
			vault: Some(VaultConfigLayer {
				master_key: Some(
					base64::engine::general_purpose::STANDARD.encode([0u8; 32]),
				),
			}),
			tls: None,
			logging: None,
		}
	}

	#[test]
	fn minimal_layer_finalizes_with_defaults() {
		let config = finalize(full_layer()).unwrap();
		assert_eq!(config.socket_addr(), "127.0.0.1:8080");
		assert_eq!(config.logging.level, "info");
		assert_eq!(config.auth.token_lifetime_secs, 86400);
		assert!(config.tls.is_none());
	}

	#[test]
	fn missing_database_url_fails() {
		let mut layer = full_layer();
		layer.database = None;
		assert!(matches!(
			finalize(layer).unwrap_err(),
			ConfigError::Missing("database URL")
		));
	}

	#[test]
	fn missing_token_secret_fails() {
		let mut layer = full_layer();
		layer.auth = None;
		assert!(matches!(
			finalize(layer).unwrap_err(),
			ConfigError::Missing("token secret")
		));
	}

	#[test]
	fn missing_master_key_fails() {
		let mut layer = full_layer();
		layer.vault = None;
		assert!(matches!(
			finalize(layer).unwrap_err(),
			ConfigError::Missing("master key")
		));
	}

	#[test]
	fn short_master_key_fails_at_startup() {
		use base64::Engine as _;
		let mut layer = full_layer();
		layer.vault = Some(VaultConfigLayer {
			master_key: Some(base64::engine::general_purpose::STANDARD.encode([0u8; 16])),
		});
		assert!(matches!(
			finalize(layer).unwrap_err(),
			ConfigError::Invalid(_)
		));
	}

	#[test]
	fn toml_file_parses_into_a_layer() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
			[http]
			host = "0.0.0.0"
			port = 9090

			[logging]
			level = "debug"
			"#
		)
		.unwrap();

		let layer = toml_layer(file.path().to_str().unwrap()).unwrap();
		let http = layer.http.unwrap().finalize();
		assert_eq!(http.host, "0.0.0.0");
		assert_eq!(http.port, 9090);
		assert_eq!(layer.logging.unwrap().finalize().level, "debug");
	}

	#[test]
	fn later_layers_win_on_merge() {
		let mut base = full_layer();
		base.merge(ServerConfigLayer {
			http: Some(HttpConfigLayer {
				host: Some("10.0.0.1".to_string()),
				port: None,
			}),
			..Default::default()
		});
		let config = finalize(base).unwrap();
		assert_eq!(config.http.host, "10.0.0.1");
		assert_eq!(config.http.port, 8080);
	}
}
