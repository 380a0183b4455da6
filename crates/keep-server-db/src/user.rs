// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User repository.

use async_trait::async_trait;
use chrono::Utc;
use keep_server_auth::types::UserId;
use keep_server_auth::user::User;
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::error::DbError;

#[async_trait]
pub trait UserStore: Send + Sync {
	/// Insert a new user. A duplicate username yields `DbError::Conflict`.
	async fn create_user(&self, user: &User) -> Result<(), DbError>;

	/// Fetch a user by id. Absence yields `DbError::NotFound`.
	async fn get_user_by_id(&self, id: &UserId) -> Result<User, DbError>;

	/// Fetch a user by exact, case-sensitive username. Absence yields
	/// `DbError::NotFound`.
	async fn get_user_by_username(&self, username: &str) -> Result<User, DbError>;
}

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	fn row_to_user(&self, row: &sqlx::sqlite::SqliteRow) -> Result<User, DbError> {
		let id_str: String = row.get("id");
		let created_at: String = row.get("created_at");
		let updated_at: String = row.get("updated_at");

		let id = Uuid::parse_str(&id_str)
			.map_err(|e| DbError::Internal(format!("Invalid user ID: {e}")))?;

		Ok(User {
			id: UserId::new(id),
			username: row.get("username"),
			password_hash: row.get("password_hash"),
			created_at: chrono::DateTime::parse_from_rfc3339(&created_at)
				.map_err(|e| DbError::Internal(format!("Invalid created_at: {e}")))?
				.with_timezone(&Utc),
			updated_at: chrono::DateTime::parse_from_rfc3339(&updated_at)
				.map_err(|e| DbError::Internal(format!("Invalid updated_at: {e}")))?
				.with_timezone(&Utc),
		})
	}
}

#[async_trait]
impl UserStore for UserRepository {
	async fn create_user(&self, user: &User) -> Result<(), DbError> {
		let result = sqlx::query(
			r#"
			INSERT INTO users (id, username, password_hash, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(user.id.to_string())
		.bind(&user.username)
		.bind(&user.password_hash)
		.bind(user.created_at.to_rfc3339())
		.bind(user.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await;

		match result {
			Ok(_) => Ok(()),
			Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
				DbError::Conflict(format!("username {} already exists", user.username)),
			),
			Err(e) => Err(e.into()),
		}
	}

	async fn get_user_by_id(&self, id: &UserId) -> Result<User, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, username, password_hash, created_at, updated_at
			FROM users
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		match row {
			Some(row) => self.row_to_user(&row),
			None => Err(DbError::NotFound(format!("user {id}"))),
		}
	}

	async fn get_user_by_username(&self, username: &str) -> Result<User, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, username, password_hash, created_at, updated_at
			FROM users
			WHERE username = ?
			"#,
		)
		.bind(username)
		.fetch_optional(&self.pool)
		.await?;

		match row {
			Some(row) => self.row_to_user(&row),
			None => Err(DbError::NotFound(format!("user {username}"))),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;

	#[tokio::test]
	async fn create_and_fetch_by_id_and_username() {
		let pool = create_test_pool().await;
		let repo = UserRepository::new(pool);

		let user = User::new("alice", "hash-a");
		repo.create_user(&user).await.unwrap();

		let by_id = repo.get_user_by_id(&user.id).await.unwrap();
		assert_eq!(by_id.username, "alice");
		assert_eq!(by_id.password_hash, "hash-a");

		let by_name = repo.get_user_by_username("alice").await.unwrap();
		assert_eq!(by_name.id, user.id);
	}

	#[tokio::test]
	async fn duplicate_username_is_a_conflict() {
		let pool = create_test_pool().await;
		let repo = UserRepository::new(pool);

		repo.create_user(&User::new("alice", "h1")).await.unwrap();
		let err = repo.create_user(&User::new("alice", "h2")).await.unwrap_err();
		assert!(matches!(err, DbError::Conflict(_)), "got: {err:?}");
	}

	#[tokio::test]
	async fn username_lookup_is_case_sensitive() {
		let pool = create_test_pool().await;
		let repo = UserRepository::new(pool);

		repo.create_user(&User::new("alice", "h1")).await.unwrap();
		let err = repo.get_user_by_username("Alice").await.unwrap_err();
		assert!(matches!(err, DbError::NotFound(_)));
	}

	#[tokio::test]
	async fn missing_user_is_not_found() {
		let pool = create_test_pool().await;
		let repo = UserRepository::new(pool);

		let err = repo.get_user_by_id(&UserId::generate()).await.unwrap_err();
		assert!(matches!(err, DbError::NotFound(_)));
	}
}
