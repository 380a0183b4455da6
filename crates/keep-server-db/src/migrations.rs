// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Schema migration.
//!
//! The schema is applied idempotently at startup. Cascades rely on
//! foreign-key enforcement being enabled on every connection (see
//! [`crate::pool::create_pool`]).

use sqlx::SqlitePool;

use crate::error::DbError;

const SCHEMA: &[&str] = &[
	r#"
	CREATE TABLE IF NOT EXISTS users (
		id TEXT PRIMARY KEY,
		username TEXT NOT NULL UNIQUE,
		password_hash TEXT NOT NULL,
		created_at TEXT NOT NULL,
		updated_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS encryption_keys (
		user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
		key_encrypted BLOB NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS items (
		id TEXT PRIMARY KEY,
		user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
		type TEXT NOT NULL,
		title TEXT NOT NULL,
		metadata TEXT NOT NULL,
		created_at TEXT NOT NULL,
		updated_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE INDEX IF NOT EXISTS idx_items_user_id ON items(user_id)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS encrypted_data (
		id TEXT PRIMARY KEY,
		item_id TEXT NOT NULL UNIQUE REFERENCES items(id) ON DELETE CASCADE,
		data_encrypted BLOB NOT NULL,
		data_key_encrypted BLOB NOT NULL
	)
	"#,
];

/// Apply the schema to the database.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	for statement in SCHEMA {
		sqlx::query(statement).execute(pool).await?;
	}
	tracing::debug!("schema migrations applied");
	Ok(())
}
