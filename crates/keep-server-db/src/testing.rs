// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Test helpers: in-memory pools with the real schema applied.

use chrono::Utc;
use keep_server_auth::types::UserId;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Create an in-memory pool with foreign keys enforced and the schema
/// applied.
pub async fn create_test_pool() -> SqlitePool {
	let options = SqliteConnectOptions::from_str("sqlite::memory:")
		.unwrap()
		.foreign_keys(true);

	// A single connection keeps every statement on the same in-memory
	// database.
	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.connect_with(options)
		.await
		.unwrap();

	crate::migrations::run_migrations(&pool).await.unwrap();
	pool
}

/// Insert a user row directly and return its id.
pub async fn insert_test_user(pool: &SqlitePool, username: &str) -> UserId {
	let user_id = UserId::generate();
	let now = Utc::now().to_rfc3339();

	sqlx::query(
		r#"
		INSERT INTO users (id, username, password_hash, created_at, updated_at)
		VALUES (?, ?, ?, ?, ?)
		"#,
	)
	.bind(user_id.to_string())
	.bind(username)
	.bind("test-password-hash")
	.bind(&now)
	.bind(&now)
	.execute(pool)
	.await
	.unwrap();

	user_id
}
