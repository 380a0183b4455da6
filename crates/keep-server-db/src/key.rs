// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-user encryption key repository.
//!
//! Stores each user's data-encryption key sealed under the master key.
//! The row is created lazily on the user's first payload write.

use async_trait::async_trait;
use keep_server_auth::types::UserId;
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;

#[async_trait]
pub trait KeyStore: Send + Sync {
	/// Insert the wrapped key for `user_id` if no row exists yet.
	///
	/// A concurrent writer that loses the race leaves the existing row
	/// untouched; callers must re-read after this call and use whatever
	/// ciphertext is durable.
	async fn insert_if_absent(&self, user_id: &UserId, key_encrypted: &[u8]) -> Result<(), DbError>;

	/// Load the wrapped key for `user_id`. Absence is not an error.
	async fn load(&self, user_id: &UserId) -> Result<Option<Vec<u8>>, DbError>;
}

/// Repository for per-user encryption keys.
#[derive(Clone)]
pub struct KeyRepository {
	pool: SqlitePool,
}

impl KeyRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}
}

#[async_trait]
impl KeyStore for KeyRepository {
	async fn insert_if_absent(&self, user_id: &UserId, key_encrypted: &[u8]) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO encryption_keys (user_id, key_encrypted)
			VALUES (?, ?)
			ON CONFLICT (user_id) DO NOTHING
			"#,
		)
		.bind(user_id.to_string())
		.bind(key_encrypted)
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	async fn load(&self, user_id: &UserId) -> Result<Option<Vec<u8>>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT key_encrypted
			FROM encryption_keys
			WHERE user_id = ?
			"#,
		)
		.bind(user_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		Ok(row.map(|row| row.get("key_encrypted")))
	}
}
