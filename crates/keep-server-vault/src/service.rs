// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The vault item service.
//!
//! Orchestrates envelope encryption over the key and item stores. Every
//! operation takes the authenticated owner id; ownership filtering happens
//! in the store layer, so an item that exists but belongs to someone else
//! surfaces as [`VaultError::NotFound`].

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use keep_server_auth::types::{ItemId, UserId};
use keep_server_db::{EncryptedData, Item, ItemChanges, ItemStore, ItemType, KeyStore};
use zeroize::Zeroizing;

use crate::encryption;
use crate::error::VaultError;

/// Input for creating an item.
#[derive(Debug, Clone)]
pub struct CreateItemInput {
	pub item_type: ItemType,
	pub title: String,
	pub metadata: String,
	/// Base64-encoded payload. Absent or empty means a metadata-only item.
	pub data_base64: Option<String>,
}

/// Input for a partial item update.
///
/// `None` fields are retained; `Some("")` sets a field to empty. A new
/// payload, when present and non-empty, replaces the stored one under a
/// fresh data key.
#[derive(Debug, Clone, Default)]
pub struct UpdateItemInput {
	pub item_type: Option<ItemType>,
	pub title: Option<String>,
	pub metadata: Option<String>,
	pub data_base64: Option<String>,
}

/// Orchestrates envelope encryption over the key and item stores.
///
/// Holds the master key for the process lifetime; it is never persisted
/// or logged.
pub struct VaultService<K, I> {
	keys: K,
	items: I,
	master_key: Zeroizing<Vec<u8>>,
}

impl<K: KeyStore, I: ItemStore> VaultService<K, I> {
	pub fn new(keys: K, items: I, master_key: Zeroizing<Vec<u8>>) -> Self {
		Self {
			keys,
			items,
			master_key,
		}
	}

	/// Create an item, sealing the payload (when present) under a fresh
	/// per-item data key.
	pub async fn create_item(
		&self,
		owner: UserId,
		input: CreateItemInput,
	) -> Result<Item, VaultError> {
		let payload = decode_payload(input.data_base64.as_deref())?;

		let item = Item::new(owner, input.item_type, input.title, input.metadata);

		let enc = match payload {
			Some(payload) => Some(self.seal_payload(&owner, item.id, &payload).await?),
			None => None,
		};

		self.items.create(&item, enc.as_ref()).await?;
		Ok(item)
	}

	/// Apply a partial update; a new non-empty payload is re-sealed under
	/// a fresh data key and replaces the stored ciphertext in place.
	pub async fn update_item(
		&self,
		owner: UserId,
		item_id: ItemId,
		input: UpdateItemInput,
	) -> Result<Item, VaultError> {
		let enc = match decode_payload(input.data_base64.as_deref())? {
			Some(payload) => Some(self.seal_payload(&owner, item_id, &payload).await?),
			None => None,
		};

		let changes = ItemChanges {
			item_type: input.item_type,
			title: input.title,
			metadata: input.metadata,
		};

		let item = self
			.items
			.update(&owner, &item_id, &changes, enc.as_ref())
			.await?;
		Ok(item)
	}

	/// Fetch an item and decrypt its payload.
	///
	/// A decryption failure is an integrity alarm and surfaces as
	/// [`VaultError::Decryption`], never as not-found.
	pub async fn get_item(
		&self,
		owner: UserId,
		item_id: ItemId,
	) -> Result<(Item, Option<Zeroizing<Vec<u8>>>), VaultError> {
		let (item, enc) = self.items.get_by_id(&owner, &item_id).await?;

		let payload = match enc {
			Some(enc) if !enc.data_encrypted.is_empty() => {
				let user_key = self.load_or_create_user_key(&owner).await?;
				let data_key = encryption::decrypt(&user_key, &enc.data_key_encrypted)?;
				Some(encryption::decrypt(&data_key, &enc.data_encrypted)?)
			}
			_ => None,
		};

		Ok((item, payload))
	}

	/// List the owner's items, newest update first. No decryption.
	pub async fn list_items(&self, owner: UserId) -> Result<Vec<Item>, VaultError> {
		Ok(self.items.list_by_user(&owner).await?)
	}

	/// Delete an owned item; its ciphertext row goes with it.
	pub async fn delete_item(&self, owner: UserId, item_id: ItemId) -> Result<(), VaultError> {
		Ok(self.items.delete_by_id(&owner, &item_id).await?)
	}

	/// Encrypt `payload` for `item_id`: fresh data key, payload under the
	/// data key, data key under the owner's user key.
	async fn seal_payload(
		&self,
		owner: &UserId,
		item_id: ItemId,
		payload: &[u8],
	) -> Result<EncryptedData, VaultError> {
		let user_key = self.load_or_create_user_key(owner).await?;
		let data_key = encryption::generate_key();

		let data_encrypted = encryption::encrypt(data_key.as_ref(), payload)?;
		let data_key_encrypted = encryption::encrypt(&user_key, data_key.as_ref())?;

		Ok(EncryptedData::new(item_id, data_encrypted, data_key_encrypted))
	}

	/// Load the owner's key, creating it on first use.
	///
	/// Creation is a conditional insert followed by a re-read, so two
	/// concurrent first writes converge on the one durable key; the loser
	/// discards its candidate and unwraps the winner's ciphertext.
	async fn load_or_create_user_key(&self, owner: &UserId) -> Result<Zeroizing<Vec<u8>>, VaultError> {
		let wrapped = match self.keys.load(owner).await? {
			Some(wrapped) if !wrapped.is_empty() => wrapped,
			_ => {
				let key = encryption::generate_key();
				let sealed = encryption::encrypt(&self.master_key, key.as_ref())?;
				self.keys.insert_if_absent(owner, &sealed).await?;
				self.keys.load(owner).await?.ok_or_else(|| {
					VaultError::Store(keep_server_db::DbError::Internal(
						"user key missing after insert".to_string(),
					))
				})?
			}
		};

		// Failure here means master-key mismatch or tampering.
		encryption::decrypt(&self.master_key, &wrapped)
	}
}

/// Decode an optional base64 payload. Absent or empty input means no
/// payload; anything non-empty must decode.
fn decode_payload(data_base64: Option<&str>) -> Result<Option<Vec<u8>>, VaultError> {
	match data_base64 {
		None | Some("") => Ok(None),
		Some(data) => {
			let payload = BASE64
				.decode(data)
				.map_err(|e| VaultError::InvalidPayload(e.to_string()))?;
			Ok(if payload.is_empty() { None } else { Some(payload) })
		}
	}
}
