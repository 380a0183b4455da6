// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core ID newtypes used throughout the server.
//!
//! All ID types implement transparent serde serialization (as UUID strings)
//! and provide conversion to/from [`uuid::Uuid`].

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(ItemId, "Unique identifier for a vault item.");
define_id_type!(
	EncryptedDataId,
	"Unique identifier for an encrypted payload record."
);

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn user_id_roundtrips() {
		let uuid = Uuid::new_v4();
		let user_id = UserId::new(uuid);
		assert_eq!(user_id.into_inner(), uuid);
	}

	#[test]
	fn user_id_generates_unique() {
		let id1 = UserId::generate();
		let id2 = UserId::generate();
		assert_ne!(id1, id2);
	}

	#[test]
	fn user_id_serializes_as_uuid() {
		let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
		let user_id = UserId::new(uuid);
		let json = serde_json::to_string(&user_id).unwrap();
		assert_eq!(json, "\"550e8400-e29b-41d4-a716-446655440000\"");
	}

	#[test]
	fn item_id_deserializes_from_uuid() {
		let json = "\"550e8400-e29b-41d4-a716-446655440000\"";
		let item_id: ItemId = serde_json::from_str(json).unwrap();
		assert_eq!(
			item_id.into_inner(),
			Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap()
		);
	}

	proptest! {
		#[test]
		fn user_id_roundtrip_any_uuid(a: u128) {
			let uuid = Uuid::from_u128(a);
			let user_id = UserId::new(uuid);
			prop_assert_eq!(user_id.into_inner(), uuid);
			prop_assert_eq!(Uuid::from(user_id), uuid);
		}

		#[test]
		fn item_id_display_matches_uuid(a: u128) {
			let uuid = Uuid::from_u128(a);
			let item_id = ItemId::new(uuid);
			prop_assert_eq!(item_id.to_string(), uuid.to_string());
		}

		#[test]
		fn user_id_serde_roundtrip(a: u128) {
			let uuid = Uuid::from_u128(a);
			let user_id = UserId::new(uuid);
			let json = serde_json::to_string(&user_id).unwrap();
			let deserialized: UserId = serde_json::from_str(&json).unwrap();
			prop_assert_eq!(user_id, deserialized);
		}
	}
}
