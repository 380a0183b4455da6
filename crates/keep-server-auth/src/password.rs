// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password hashing with argon2id.
//!
//! Uses production-strength parameters in release builds and fast, reduced
//! cost parameters in tests. The cost factor is fixed in code; there is no
//! runtime knob.
//!
//! Verification goes through [`argon2::PasswordVerifier`], which compares in
//! constant time regardless of where the mismatch occurs.

use argon2::{
	password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
	Argon2,
};
#[cfg(test)]
use argon2::{Algorithm, Params, Version};

/// Errors from hashing or verifying a password.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
	#[error("failed to hash password: {0}")]
	Hash(String),

	#[error("stored password hash is malformed: {0}")]
	MalformedHash(String),
}

/// Returns an Argon2 instance configured appropriately for the build context.
///
/// In production, `Argon2::default()` (argon2id, ~19 MiB memory, 2
/// iterations). In tests, minimal parameters for fast execution; these MUST
/// NOT be used in production.
#[inline]
fn argon2_instance() -> Argon2<'static> {
	#[cfg(test)]
	{
		let params = Params::new(
			1024, // memory_kib: 1 MiB
			1,    // iterations
			1,    // parallelism
			None, // output length = default
		)
		.expect("valid Argon2 params for tests");
		Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
	}

	#[cfg(not(test))]
	{
		Argon2::default()
	}
}

/// Hash a password with a freshly generated salt.
///
/// Returns the PHC-format hash string suitable for storage.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
	let salt = SaltString::generate(&mut OsRng);
	argon2_instance()
		.hash_password(password.as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Verify a password against a stored PHC hash string.
///
/// Returns `Ok(false)` on mismatch; an error only when the stored hash
/// itself cannot be parsed.
pub fn verify_password(hash: &str, password: &str) -> Result<bool, PasswordError> {
	let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
	match argon2_instance().verify_password(password.as_bytes(), &parsed) {
		Ok(()) => Ok(true),
		Err(argon2::password_hash::Error::Password) => Ok(false),
		Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
	}
}
