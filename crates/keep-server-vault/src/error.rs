// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use keep_server_db::DbError;

#[derive(Debug, thiserror::Error)]
pub enum VaultError {
	/// Payload was not valid base64.
	#[error("invalid payload encoding: {0}")]
	InvalidPayload(String),

	#[error("encryption failed: {0}")]
	Encryption(String),

	/// Deliberately opaque: a wrong-sized key, truncated input, and a
	/// failed authentication tag are indistinguishable to callers.
	#[error("decryption failed")]
	Decryption,

	/// Item absent or not owned by the caller.
	#[error("item not found")]
	NotFound,

	#[error("store error: {0}")]
	Store(DbError),
}

impl From<DbError> for VaultError {
	fn from(err: DbError) -> Self {
		match err {
			DbError::NotFound(_) => VaultError::NotFound,
			other => VaultError::Store(other),
		}
	}
}

pub type Result<T> = std::result::Result<T, VaultError>;
