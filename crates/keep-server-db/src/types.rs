// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Domain row types for the vault store.

use chrono::{DateTime, Utc};
use keep_server_auth::types::{EncryptedDataId, ItemId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of item types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
	/// Username/password credentials.
	Credential,
	/// Arbitrary text data.
	Text,
	/// Binary data (files).
	Binary,
	/// Payment card information.
	Card,
}

impl ItemType {
	/// Returns all supported item types.
	pub fn all() -> &'static [ItemType] {
		&[
			ItemType::Credential,
			ItemType::Text,
			ItemType::Binary,
			ItemType::Card,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			ItemType::Credential => "credential",
			ItemType::Text => "text",
			ItemType::Binary => "binary",
			ItemType::Card => "card",
		}
	}

	/// Parse a stored type string. Unknown values are a data-integrity
	/// problem and surface as `None`.
	pub fn parse(s: &str) -> Option<Self> {
		match s {
			"credential" => Some(ItemType::Credential),
			"text" => Some(ItemType::Text),
			"binary" => Some(ItemType::Binary),
			"card" => Some(ItemType::Card),
			_ => None,
		}
	}
}

impl fmt::Display for ItemType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// A vault item. Metadata only; the payload lives in [`EncryptedData`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
	/// Unique identifier, generated at creation.
	pub id: ItemId,

	/// Owner. Every lookup filters on `(id, user_id)`.
	pub user_id: UserId,

	/// Item type from the closed set.
	#[serde(rename = "type")]
	pub item_type: ItemType,

	/// User-facing name. May be empty.
	pub title: String,

	/// Opaque client metadata, stored verbatim.
	pub metadata: String,

	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Item {
	/// Build a new item for `user_id` with a fresh id and current
	/// timestamps.
	pub fn new(
		user_id: UserId,
		item_type: ItemType,
		title: impl Into<String>,
		metadata: impl Into<String>,
	) -> Self {
		let now = Utc::now();
		Self {
			id: ItemId::generate(),
			user_id,
			item_type,
			title: title.into(),
			metadata: metadata.into(),
			created_at: now,
			updated_at: now,
		}
	}
}

/// The encrypted payload paired 1:1 with an item.
///
/// `data_encrypted` is the payload sealed under a per-item data key;
/// `data_key_encrypted` is that data key sealed under the owner's user
/// key. Never serialized to the wire.
#[derive(Debug, Clone)]
pub struct EncryptedData {
	pub id: EncryptedDataId,
	pub item_id: ItemId,
	pub data_encrypted: Vec<u8>,
	pub data_key_encrypted: Vec<u8>,
}

impl EncryptedData {
	/// Build a new record for `item_id` with a fresh id.
	pub fn new(item_id: ItemId, data_encrypted: Vec<u8>, data_key_encrypted: Vec<u8>) -> Self {
		Self {
			id: EncryptedDataId::generate(),
			item_id,
			data_encrypted,
			data_key_encrypted,
		}
	}
}

/// A partial update to an item's metadata columns.
///
/// `None` means "retain the stored value"; `Some("")` means "set to
/// empty". The distinction is load-bearing for the wire contract.
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
	pub item_type: Option<ItemType>,
	pub title: Option<String>,
	pub metadata: Option<String>,
}

impl ItemChanges {
	/// Returns true when no column would change.
	pub fn is_empty(&self) -> bool {
		self.item_type.is_none() && self.title.is_none() && self.metadata.is_none()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn item_type_roundtrips_through_strings() {
		for ty in ItemType::all() {
			assert_eq!(ItemType::parse(ty.as_str()), Some(*ty));
		}
		assert_eq!(ItemType::parse("passport"), None);
		assert_eq!(ItemType::parse(""), None);
	}

	#[test]
	fn item_type_serializes_lowercase() {
		assert_eq!(
			serde_json::to_string(&ItemType::Credential).unwrap(),
			"\"credential\""
		);
		let parsed: ItemType = serde_json::from_str("\"card\"").unwrap();
		assert_eq!(parsed, ItemType::Card);
	}

	#[test]
	fn unknown_item_type_fails_deserialization() {
		assert!(serde_json::from_str::<ItemType>("\"passport\"").is_err());
		assert!(serde_json::from_str::<ItemType>("\"\"").is_err());
	}

	#[test]
	fn item_serializes_type_under_wire_name() {
		let item = Item::new(UserId::generate(), ItemType::Text, "note", "");
		let json = serde_json::to_string(&item).unwrap();
		assert!(json.contains("\"type\":\"text\""), "got: {json}");
		assert!(json.contains("\"title\":\"note\""));
	}

	#[test]
	fn item_changes_emptiness() {
		assert!(ItemChanges::default().is_empty());
		let changes = ItemChanges {
			title: Some(String::new()),
			..Default::default()
		};
		assert!(!changes.is_empty());
	}
}
