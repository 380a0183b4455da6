// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authenticated symmetric encryption.
//!
//! Uses AES-256-GCM for every layer of the envelope (master key wrapping
//! the user key, user key wrapping data keys, data keys sealing payloads).
//! The wire format is `nonce ‖ ciphertext+tag` with a fresh 96-bit random
//! nonce per call.

use aes_gcm::{
	aead::{Aead, KeyInit, OsRng},
	Aes256Gcm, Nonce,
};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::VaultError;

/// Size of encryption keys in bytes (256 bits for AES-256).
pub const KEY_SIZE: usize = 32;

/// Size of the AES-GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Generate a random encryption key.
pub fn generate_key() -> Zeroizing<[u8; KEY_SIZE]> {
	let mut key = Zeroizing::new([0u8; KEY_SIZE]);
	OsRng.fill_bytes(key.as_mut());
	key
}

/// Generate a random nonce.
///
/// Random 96-bit nonces are safe for the write volumes expected per key;
/// the same (key, nonce) pair must never be reused. AES-GCM reaches a
/// 2^-32 collision probability only after about 2^32 encryptions under one
/// key, far beyond a single user's or item's write count.
fn generate_nonce() -> [u8; NONCE_SIZE] {
	let mut nonce = [0u8; NONCE_SIZE];
	OsRng.fill_bytes(&mut nonce);
	nonce
}

/// Encrypt `plaintext` under `key`, returning `nonce ‖ ciphertext`.
///
/// Empty plaintext is legal. `key` must be exactly [`KEY_SIZE`] bytes.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, VaultError> {
	let cipher = Aes256Gcm::new_from_slice(key)
		.map_err(|_| VaultError::Encryption("invalid key size".to_string()))?;

	let nonce_bytes = generate_nonce();
	let nonce = Nonce::from_slice(&nonce_bytes);

	let ciphertext = cipher
		.encrypt(nonce, plaintext)
		.map_err(|e| VaultError::Encryption(e.to_string()))?;

	let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
	out.extend_from_slice(&nonce_bytes);
	out.extend_from_slice(&ciphertext);
	Ok(out)
}

/// Decrypt `bytes` (as produced by [`encrypt`]) under `key`.
///
/// Every failure mode collapses into the single opaque
/// [`VaultError::Decryption`]: wrong key size, input shorter than the
/// nonce, and authentication failure are indistinguishable.
pub fn decrypt(key: &[u8], bytes: &[u8]) -> Result<Zeroizing<Vec<u8>>, VaultError> {
	let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| VaultError::Decryption)?;

	if bytes.len() < NONCE_SIZE {
		return Err(VaultError::Decryption);
	}
	let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_SIZE);

	cipher
		.decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
		.map(Zeroizing::new)
		.map_err(|_| VaultError::Decryption)
}
