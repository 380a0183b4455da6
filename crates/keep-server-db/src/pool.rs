// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::{
	SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::time::Duration;

use crate::error::DbError;

/// Connection pool bounds.
///
/// Acquisition beyond `max_connections` blocks up to `acquire_timeout`;
/// the caller's request then observes a transient failure.
#[derive(Debug, Clone)]
pub struct PoolSettings {
	pub max_connections: u32,
	pub min_connections: u32,
	pub max_lifetime: Duration,
	pub idle_timeout: Duration,
	pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
	fn default() -> Self {
		Self {
			max_connections: 50,
			min_connections: 2,
			max_lifetime: Duration::from_secs(60 * 60),
			idle_timeout: Duration::from_secs(30 * 60),
			acquire_timeout: Duration::from_secs(10),
		}
	}
}

/// Create a SqlitePool with WAL mode, enforced foreign keys, and the given
/// bounds.
///
/// # Arguments
/// * `database_url` - SQLite connection string (e.g., "sqlite:./keep.db")
///
/// # Errors
/// Returns `DbError::Internal` if the URL is invalid; connection failures
/// surface as `DbError::Sqlx`.
#[tracing::instrument(skip(database_url, settings))]
pub async fn create_pool(database_url: &str, settings: &PoolSettings) -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str(database_url)
		.map_err(|e| DbError::Internal(format!("Invalid database URL: {e}")))?
		.journal_mode(SqliteJournalMode::Wal)
		.synchronous(SqliteSynchronous::Normal)
		.foreign_keys(true)
		.create_if_missing(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(settings.max_connections)
		.min_connections(settings.min_connections)
		.max_lifetime(settings.max_lifetime)
		.idle_timeout(settings.idle_timeout)
		.acquire_timeout(settings.acquire_timeout)
		.connect_with(options)
		.await?;

	tracing::debug!("database pool created");
	Ok(pool)
}
