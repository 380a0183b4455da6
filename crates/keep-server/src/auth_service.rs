// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Registration and login.
//!
//! Login deliberately collapses "unknown username" and "wrong password"
//! into one [`AuthServiceError::InvalidCredentials`] outcome so callers
//! cannot enumerate users.

use std::sync::Arc;

use keep_server_auth::password::{hash_password, verify_password};
use keep_server_auth::token::TokenAuthority;
use keep_server_auth::user::User;
use keep_server_db::{DbError, UserStore};

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
	#[error("username already exists")]
	Conflict,

	#[error("invalid credentials")]
	InvalidCredentials,

	#[error("internal: {0}")]
	Internal(String),
}

/// Handles user registration and login over the user store and token
/// authority.
pub struct AuthService<U> {
	users: U,
	tokens: Arc<TokenAuthority>,
}

impl<U: UserStore> AuthService<U> {
	pub fn new(users: U, tokens: Arc<TokenAuthority>) -> Self {
		Self { users, tokens }
	}

	/// Create a new user account and issue a bearer token for it.
	pub async fn register(
		&self,
		username: &str,
		password: &str,
	) -> Result<(User, String), AuthServiceError> {
		let password_hash =
			hash_password(password).map_err(|e| AuthServiceError::Internal(e.to_string()))?;

		let user = User::new(username, password_hash);

		match self.users.create_user(&user).await {
			Ok(()) => {}
			Err(DbError::Conflict(_)) => return Err(AuthServiceError::Conflict),
			Err(e) => return Err(AuthServiceError::Internal(e.to_string())),
		}

		let token = self
			.tokens
			.issue(user.id)
			.map_err(|e| AuthServiceError::Internal(e.to_string()))?;

		Ok((user, token))
	}

	/// Authenticate a user by username and password and issue a bearer
	/// token.
	pub async fn login(
		&self,
		username: &str,
		password: &str,
	) -> Result<(User, String), AuthServiceError> {
		let user = match self.users.get_user_by_username(username).await {
			Ok(user) => user,
			Err(DbError::NotFound(_)) => return Err(AuthServiceError::InvalidCredentials),
			Err(e) => return Err(AuthServiceError::Internal(e.to_string())),
		};

		match verify_password(&user.password_hash, password) {
			Ok(true) => {}
			Ok(false) => return Err(AuthServiceError::InvalidCredentials),
			Err(e) => return Err(AuthServiceError::Internal(e.to_string())),
		}

		let token = self
			.tokens
			.issue(user.id)
			.map_err(|e| AuthServiceError::Internal(e.to_string()))?;

		Ok((user, token))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use chrono::Duration;
	use keep_server_auth::types::UserId;
	use std::collections::HashMap;
	use std::sync::Mutex;

	/// In-memory user store double.
	#[derive(Default)]
	struct MemUserStore {
		users: Mutex<HashMap<String, User>>,
	}

	#[async_trait]
	impl UserStore for MemUserStore {
		async fn create_user(&self, user: &User) -> Result<(), DbError> {
			let mut users = self.users.lock().unwrap();
			if users.contains_key(&user.username) {
				return Err(DbError::Conflict(format!(
					"username {} already exists",
					user.username
				)));
			}
			users.insert(user.username.clone(), user.clone());
			Ok(())
		}

		async fn get_user_by_id(&self, id: &UserId) -> Result<User, DbError> {
			self.users
				.lock()
				.unwrap()
				.values()
				.find(|u| u.id == *id)
				.cloned()
				.ok_or_else(|| DbError::NotFound(format!("user {id}")))
		}

		async fn get_user_by_username(&self, username: &str) -> Result<User, DbError> {
			self.users
				.lock()
				.unwrap()
				.get(username)
				.cloned()
				.ok_or_else(|| DbError::NotFound(format!("user {username}")))
		}
	}

	fn service() -> AuthService<MemUserStore> {
		AuthService::new(
			MemUserStore::default(),
			Arc::new(TokenAuthority::new("test-secret", Duration::hours(1))),
		)
	}

	#[tokio::test]
	async fn register_returns_user_and_valid_token() {
		let service = service();
		let (user, token) = service.register("alice", "s3cret!").await.unwrap();

		assert_eq!(user.username, "alice");
		assert!(!user.password_hash.is_empty());
		assert_ne!(user.password_hash, "s3cret!");

		let authority = TokenAuthority::new("test-secret", Duration::hours(1));
		assert_eq!(authority.validate(&token).unwrap(), user.id);
	}

	#[tokio::test]
	async fn duplicate_registration_is_a_conflict() {
		let service = service();
		service.register("alice", "x").await.unwrap();

		let err = service.register("alice", "y").await.unwrap_err();
		assert!(matches!(err, AuthServiceError::Conflict));
	}

	#[tokio::test]
	async fn login_roundtrips() {
		let service = service();
		let (registered, _) = service.register("alice", "s3cret!").await.unwrap();

		let (user, token) = service.login("alice", "s3cret!").await.unwrap();
		assert_eq!(user.id, registered.id);
		assert!(!token.is_empty());
	}

	#[tokio::test]
	async fn wrong_password_and_unknown_user_are_indistinguishable() {
		let service = service();
		service.register("alice", "s3cret!").await.unwrap();

		let wrong_password = service.login("alice", "wrong").await.unwrap_err();
		let unknown_user = service.login("mallory", "anything").await.unwrap_err();

		assert!(matches!(wrong_password, AuthServiceError::InvalidCredentials));
		assert!(matches!(unknown_user, AuthServiceError::InvalidCredentials));
	}
}
