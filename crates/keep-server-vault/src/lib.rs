// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Envelope encryption and the vault item service.
//!
//! The key hierarchy is master key → per-user key → per-item data key →
//! payload. The master key lives only in process memory; the user key is
//! persisted wrapped under the master key; each payload write generates a
//! fresh data key, persisted wrapped under the user key alongside the
//! ciphertext it protects.

pub mod encryption;
pub mod error;
pub mod service;

pub use error::VaultError;
pub use service::{CreateItemInput, UpdateItemInput, VaultService};
