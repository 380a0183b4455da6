// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared validation utilities for API handlers.

use keep_server_auth::types::ItemId;
use uuid::Uuid;

/// Error type for request validation failures, shaped like the wire error
/// body.
#[derive(Debug, Clone)]
pub struct ValidationError {
	pub error: String,
	pub message: String,
}

impl ValidationError {
	pub fn invalid_id(message: impl Into<String>) -> Self {
		Self {
			error: "invalid_id".to_string(),
			message: message.into(),
		}
	}

	pub fn missing_field(field: &str) -> Self {
		Self {
			error: "missing_field".to_string(),
			message: format!("{field} cannot be empty"),
		}
	}

	pub fn no_fields_to_update() -> Self {
		Self {
			error: "empty_update".to_string(),
			message: "at least one field must be provided".to_string(),
		}
	}
}

/// Parse a path segment as an item id.
pub fn parse_item_id(id_str: &str) -> Result<ItemId, ValidationError> {
	Uuid::parse_str(id_str)
		.map(ItemId::new)
		.map_err(|_| ValidationError::invalid_id("item id must be a valid UUID"))
}

/// Require a non-empty request field.
pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
	if value.is_empty() {
		Err(ValidationError::missing_field(field))
	} else {
		Ok(())
	}
}
