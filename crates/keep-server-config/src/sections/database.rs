// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database configuration.

use serde::Deserialize;

/// Database configuration (runtime, fully resolved).
///
/// `url` has no default; the DSN is required and validated at load time.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
	pub url: String,
	pub max_connections: u32,
	pub min_connections: u32,
	pub max_lifetime_secs: u64,
	pub idle_timeout_secs: u64,
	pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			url: String::new(),
			max_connections: 50,
			min_connections: 2,
			max_lifetime_secs: 60 * 60,
			idle_timeout_secs: 30 * 60,
			acquire_timeout_secs: 10,
		}
	}
}

/// Database configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfigLayer {
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub max_connections: Option<u32>,
	#[serde(default)]
	pub min_connections: Option<u32>,
	#[serde(default)]
	pub max_lifetime_secs: Option<u64>,
	#[serde(default)]
	pub idle_timeout_secs: Option<u64>,
	#[serde(default)]
	pub acquire_timeout_secs: Option<u64>,
}

impl DatabaseConfigLayer {
	pub fn merge(&mut self, other: DatabaseConfigLayer) {
		if other.url.is_some() {
			self.url = other.url;
		}
		if other.max_connections.is_some() {
			self.max_connections = other.max_connections;
		}
		if other.min_connections.is_some() {
			self.min_connections = other.min_connections;
		}
		if other.max_lifetime_secs.is_some() {
			self.max_lifetime_secs = other.max_lifetime_secs;
		}
		if other.idle_timeout_secs.is_some() {
			self.idle_timeout_secs = other.idle_timeout_secs;
		}
		if other.acquire_timeout_secs.is_some() {
			self.acquire_timeout_secs = other.acquire_timeout_secs;
		}
	}

	pub fn finalize(self) -> DatabaseConfig {
		let defaults = DatabaseConfig::default();
		DatabaseConfig {
			url: self.url.unwrap_or(defaults.url),
			max_connections: self.max_connections.unwrap_or(defaults.max_connections),
			min_connections: self.min_connections.unwrap_or(defaults.min_connections),
			max_lifetime_secs: self.max_lifetime_secs.unwrap_or(defaults.max_lifetime_secs),
			idle_timeout_secs: self.idle_timeout_secs.unwrap_or(defaults.idle_timeout_secs),
			acquire_timeout_secs: self
				.acquire_timeout_secs
				.unwrap_or(defaults.acquire_timeout_secs),
		}
	}
}
