// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The user entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// A registered user.
///
/// User rows are created only through registration and never updated by the
/// vault core. Deleting a user cascades to their encryption key, items, and
/// ciphertexts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
	/// Unique identifier, generated at registration.
	pub id: UserId,

	/// Globally unique username. Stored and compared case-sensitively.
	pub username: String,

	/// Argon2 password hash (PHC string). Never serialized.
	#[serde(skip)]
	pub password_hash: String,

	/// When the user was created.
	pub created_at: DateTime<Utc>,

	/// When the user was last updated.
	pub updated_at: DateTime<Utc>,
}

impl User {
	/// Build a new user with a freshly generated ID and the current time for
	/// both timestamps.
	pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: UserId::generate(),
			username: username.into(),
			password_hash: password_hash.into(),
			created_at: now,
			updated_at: now,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn new_generates_unique_ids() {
		let a = User::new("alice", "hash");
		let b = User::new("alice", "hash");
		assert_ne!(a.id, b.id);
	}

	#[test]
	fn password_hash_is_never_serialized() {
		let user = User::new("alice", "$argon2id$v=19$secret");
		let json = serde_json::to_string(&user).unwrap();
		assert!(!json.contains("password_hash"));
		assert!(!json.contains("argon2id"));
		assert!(json.contains("\"username\":\"alice\""));
	}

	#[test]
	fn deserializes_without_password_hash() {
		let json = format!(
			r#"{{"id":"{}","username":"bob","created_at":"2025-01-01T00:00:00Z","updated_at":"2025-01-01T00:00:00Z"}}"#,
			UserId::generate()
		);
		let user: User = serde_json::from_str(&json).unwrap();
		assert_eq!(user.username, "bob");
		assert!(user.password_hash.is_empty());
	}
}
