// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity and authentication building blocks for the keep server.
//!
//! This crate provides:
//! - ID newtypes ([`types::UserId`], [`types::ItemId`]) preventing accidental
//!   mixing of entity identifiers
//! - The [`user::User`] entity (password hash never serialized)
//! - Password hashing with argon2id ([`password`])
//! - A stateless HS256 bearer-token authority ([`token::TokenAuthority`])
//! - Header extraction helpers for the request pipeline ([`middleware`])

pub mod middleware;
pub mod password;
pub mod token;
pub mod types;
pub mod user;

pub use password::{hash_password, verify_password, PasswordError};
pub use token::{TokenAuthority, TokenError};
pub use types::{EncryptedDataId, ItemId, UserId};
pub use user::User;
