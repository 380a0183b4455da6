// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite persistence layer for the keep server.
//!
//! This crate provides:
//! - Pool construction with configured bounds ([`pool::create_pool`])
//! - Schema migration ([`migrations::run_migrations`])
//! - Repositories for users, per-user encryption keys, and vault items
//!
//! Every repository is exposed both as a capability trait (for test
//! doubles) and a concrete SQLite implementation. UUIDs are stored as
//! TEXT, timestamps as RFC3339 TEXT parsed back through chrono.

pub mod error;
pub mod item;
pub mod key;
pub mod migrations;
pub mod pool;
pub mod testing;
pub mod types;
pub mod user;

pub use error::DbError;
pub use item::{ItemRepository, ItemStore};
pub use key::{KeyRepository, KeyStore};
pub use migrations::run_migrations;
pub use pool::{create_pool, PoolSettings};
pub use types::{EncryptedData, Item, ItemChanges, ItemType};
pub use user::{UserRepository, UserStore};
