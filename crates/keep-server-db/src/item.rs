// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Item repository.
//!
//! Items and their encrypted payloads live in separate tables with a 1:1
//! relation on `encrypted_data.item_id`. Every multi-row write runs in a
//! single transaction; a failure before commit rolls the whole write back,
//! so no orphan ciphertext row can exist without its item.
//!
//! Every query filters on `(id, user_id)`. A row that exists but belongs
//! to another user is indistinguishable from a row that does not exist.

use async_trait::async_trait;
use chrono::Utc;
use keep_server_auth::types::{EncryptedDataId, ItemId, UserId};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::error::DbError;
use crate::types::{EncryptedData, Item, ItemChanges, ItemType};

#[async_trait]
pub trait ItemStore: Send + Sync {
	/// Insert a new item, with its encrypted payload when present, in one
	/// transaction.
	async fn create(&self, item: &Item, enc: Option<&EncryptedData>) -> Result<(), DbError>;

	/// Apply a partial update to an owned item and optionally replace its
	/// encrypted payload, in one transaction.
	///
	/// Fields absent from `changes` retain their stored values;
	/// `updated_at` is always set to now. Returns the updated item, or
	/// `DbError::NotFound` when the item is absent or owned by someone
	/// else.
	async fn update(
		&self,
		user_id: &UserId,
		item_id: &ItemId,
		changes: &ItemChanges,
		enc: Option<&EncryptedData>,
	) -> Result<Item, DbError>;

	/// Fetch an owned item and its encrypted payload, if any.
	async fn get_by_id(
		&self,
		user_id: &UserId,
		item_id: &ItemId,
	) -> Result<(Item, Option<EncryptedData>), DbError>;

	/// Delete an owned item. The encrypted payload row is removed by
	/// cascade.
	async fn delete_by_id(&self, user_id: &UserId, item_id: &ItemId) -> Result<(), DbError>;

	/// List all items owned by `user_id`, newest update first. Metadata
	/// only.
	async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Item>, DbError>;
}

/// Repository for item and encrypted-data database operations.
#[derive(Clone)]
pub struct ItemRepository {
	pool: SqlitePool,
}

impl ItemRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	fn row_to_item(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Item, DbError> {
		let id_str: String = row.get("id");
		let user_id_str: String = row.get("user_id");
		let type_str: String = row.get("type");
		let created_at: String = row.get("created_at");
		let updated_at: String = row.get("updated_at");

		let id = Uuid::parse_str(&id_str)
			.map_err(|e| DbError::Internal(format!("Invalid item ID: {e}")))?;
		let user_id = Uuid::parse_str(&user_id_str)
			.map_err(|e| DbError::Internal(format!("Invalid user_id: {e}")))?;
		let item_type = ItemType::parse(&type_str)
			.ok_or_else(|| DbError::Internal(format!("Unknown item type: {type_str}")))?;

		Ok(Item {
			id: ItemId::new(id),
			user_id: UserId::new(user_id),
			item_type,
			title: row.get("title"),
			metadata: row.get("metadata"),
			created_at: chrono::DateTime::parse_from_rfc3339(&created_at)
				.map_err(|e| DbError::Internal(format!("Invalid created_at: {e}")))?
				.with_timezone(&Utc),
			updated_at: chrono::DateTime::parse_from_rfc3339(&updated_at)
				.map_err(|e| DbError::Internal(format!("Invalid updated_at: {e}")))?
				.with_timezone(&Utc),
		})
	}

	fn row_to_encrypted_data(&self, row: &sqlx::sqlite::SqliteRow) -> Result<EncryptedData, DbError> {
		let id_str: String = row.get("id");
		let item_id_str: String = row.get("item_id");

		let id = Uuid::parse_str(&id_str)
			.map_err(|e| DbError::Internal(format!("Invalid encrypted-data ID: {e}")))?;
		let item_id = Uuid::parse_str(&item_id_str)
			.map_err(|e| DbError::Internal(format!("Invalid item_id: {e}")))?;

		Ok(EncryptedData {
			id: EncryptedDataId::new(id),
			item_id: ItemId::new(item_id),
			data_encrypted: row.get("data_encrypted"),
			data_key_encrypted: row.get("data_key_encrypted"),
		})
	}
}

#[async_trait]
impl ItemStore for ItemRepository {
	async fn create(&self, item: &Item, enc: Option<&EncryptedData>) -> Result<(), DbError> {
		let mut tx = self.pool.begin().await?;

		sqlx::query(
			r#"
			INSERT INTO items (id, user_id, type, title, metadata, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(item.id.to_string())
		.bind(item.user_id.to_string())
		.bind(item.item_type.as_str())
		.bind(&item.title)
		.bind(&item.metadata)
		.bind(item.created_at.to_rfc3339())
		.bind(item.updated_at.to_rfc3339())
		.execute(&mut *tx)
		.await?;

		if let Some(enc) = enc {
			sqlx::query(
				r#"
				INSERT INTO encrypted_data (id, item_id, data_encrypted, data_key_encrypted)
				VALUES (?, ?, ?, ?)
				"#,
			)
			.bind(enc.id.to_string())
			.bind(item.id.to_string())
			.bind(&enc.data_encrypted)
			.bind(&enc.data_key_encrypted)
			.execute(&mut *tx)
			.await?;
		}

		tx.commit().await?;
		Ok(())
	}

	async fn update(
		&self,
		user_id: &UserId,
		item_id: &ItemId,
		changes: &ItemChanges,
		enc: Option<&EncryptedData>,
	) -> Result<Item, DbError> {
		let mut tx = self.pool.begin().await?;

		let row = sqlx::query(
			r#"
			UPDATE items
			SET
				type = COALESCE(?, type),
				title = COALESCE(?, title),
				metadata = COALESCE(?, metadata),
				updated_at = ?
			WHERE id = ? AND user_id = ?
			RETURNING id, user_id, type, title, metadata, created_at, updated_at
			"#,
		)
		.bind(changes.item_type.map(|t| t.as_str()))
		.bind(changes.title.as_deref())
		.bind(changes.metadata.as_deref())
		.bind(Utc::now().to_rfc3339())
		.bind(item_id.to_string())
		.bind(user_id.to_string())
		.fetch_optional(&mut *tx)
		.await?;

		let Some(row) = row else {
			// Absent or not owned by the caller; the transaction rolls back
			// on drop.
			return Err(DbError::NotFound(format!("item {item_id}")));
		};
		let item = self.row_to_item(&row)?;

		if let Some(enc) = enc {
			// Ciphertext and wrapped data key are rewritten together.
			sqlx::query(
				r#"
				INSERT INTO encrypted_data (id, item_id, data_encrypted, data_key_encrypted)
				VALUES (?, ?, ?, ?)
				ON CONFLICT (item_id) DO UPDATE SET
					data_encrypted = excluded.data_encrypted,
					data_key_encrypted = excluded.data_key_encrypted
				"#,
			)
			.bind(enc.id.to_string())
			.bind(item_id.to_string())
			.bind(&enc.data_encrypted)
			.bind(&enc.data_key_encrypted)
			.execute(&mut *tx)
			.await?;
		}

		tx.commit().await?;
		Ok(item)
	}

	async fn get_by_id(
		&self,
		user_id: &UserId,
		item_id: &ItemId,
	) -> Result<(Item, Option<EncryptedData>), DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, user_id, type, title, metadata, created_at, updated_at
			FROM items
			WHERE id = ? AND user_id = ?
			"#,
		)
		.bind(item_id.to_string())
		.bind(user_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		let Some(row) = row else {
			return Err(DbError::NotFound(format!("item {item_id}")));
		};
		let item = self.row_to_item(&row)?;

		let enc_row = sqlx::query(
			r#"
			SELECT id, item_id, data_encrypted, data_key_encrypted
			FROM encrypted_data
			WHERE item_id = ?
			"#,
		)
		.bind(item_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		let enc = match enc_row {
			Some(row) => Some(self.row_to_encrypted_data(&row)?),
			None => None,
		};

		Ok((item, enc))
	}

	async fn delete_by_id(&self, user_id: &UserId, item_id: &ItemId) -> Result<(), DbError> {
		let result = sqlx::query("DELETE FROM items WHERE id = ? AND user_id = ?")
			.bind(item_id.to_string())
			.bind(user_id.to_string())
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("item {item_id}")));
		}
		Ok(())
	}

	async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Item>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, user_id, type, title, metadata, created_at, updated_at
			FROM items
			WHERE user_id = ?
			ORDER BY updated_at DESC
			"#,
		)
		.bind(user_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(|row| self.row_to_item(row)).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{create_test_pool, insert_test_user};

	async fn setup() -> (SqlitePool, ItemRepository, UserId) {
		let pool = create_test_pool().await;
		let user_id = insert_test_user(&pool, "alice").await;
		let repo = ItemRepository::new(pool.clone());
		(pool, repo, user_id)
	}

	fn payload_for(item: &Item) -> EncryptedData {
		EncryptedData::new(item.id, b"ciphertext".to_vec(), b"wrapped-key".to_vec())
	}

	#[tokio::test]
	async fn create_without_payload_then_get() {
		let (_pool, repo, user_id) = setup().await;

		let item = Item::new(user_id, ItemType::Text, "note", "meta");
		repo.create(&item, None).await.unwrap();

		let (fetched, enc) = repo.get_by_id(&user_id, &item.id).await.unwrap();
		assert_eq!(fetched.title, "note");
		assert_eq!(fetched.metadata, "meta");
		assert_eq!(fetched.item_type, ItemType::Text);
		assert!(enc.is_none());
	}

	#[tokio::test]
	async fn create_with_payload_stores_both_rows() {
		let (_pool, repo, user_id) = setup().await;

		let item = Item::new(user_id, ItemType::Binary, "file", "");
		let enc = payload_for(&item);
		repo.create(&item, Some(&enc)).await.unwrap();

		let (_, stored) = repo.get_by_id(&user_id, &item.id).await.unwrap();
		let stored = stored.unwrap();
		assert_eq!(stored.item_id, item.id);
		assert_eq!(stored.data_encrypted, b"ciphertext");
		assert_eq!(stored.data_key_encrypted, b"wrapped-key");
	}

	#[tokio::test]
	async fn partial_update_preserves_absent_fields() {
		let (_pool, repo, user_id) = setup().await;

		let item = Item::new(user_id, ItemType::Text, "orig", "M");
		repo.create(&item, None).await.unwrap();

		let changes = ItemChanges {
			title: Some("new".to_string()),
			..Default::default()
		};
		let updated = repo.update(&user_id, &item.id, &changes, None).await.unwrap();

		assert_eq!(updated.title, "new");
		assert_eq!(updated.metadata, "M");
		assert_eq!(updated.item_type, ItemType::Text);
		assert!(updated.updated_at > item.updated_at);
	}

	#[tokio::test]
	async fn empty_string_update_sets_empty_not_retained() {
		let (_pool, repo, user_id) = setup().await;

		let item = Item::new(user_id, ItemType::Text, "orig", "M");
		repo.create(&item, None).await.unwrap();

		let changes = ItemChanges {
			metadata: Some(String::new()),
			..Default::default()
		};
		let updated = repo.update(&user_id, &item.id, &changes, None).await.unwrap();

		assert_eq!(updated.metadata, "");
		assert_eq!(updated.title, "orig");
	}

	#[tokio::test]
	async fn update_replaces_payload_in_place() {
		let (pool, repo, user_id) = setup().await;

		let item = Item::new(user_id, ItemType::Text, "t", "");
		let enc = payload_for(&item);
		repo.create(&item, Some(&enc)).await.unwrap();

		let replacement =
			EncryptedData::new(item.id, b"ciphertext-2".to_vec(), b"wrapped-key-2".to_vec());
		repo.update(&user_id, &item.id, &ItemChanges::default(), Some(&replacement))
			.await
			.unwrap();

		let (_, stored) = repo.get_by_id(&user_id, &item.id).await.unwrap();
		assert_eq!(stored.unwrap().data_encrypted, b"ciphertext-2");

		// Still exactly one row for the item.
		let count: i64 = sqlx::query_scalar(
			"SELECT COUNT(*) FROM encrypted_data WHERE item_id = ?",
		)
		.bind(item.id.to_string())
		.fetch_one(&pool)
		.await
		.unwrap();
		assert_eq!(count, 1);
	}

	#[tokio::test]
	async fn update_inserts_payload_when_item_had_none() {
		let (_pool, repo, user_id) = setup().await;

		let item = Item::new(user_id, ItemType::Text, "t", "");
		repo.create(&item, None).await.unwrap();

		let enc = payload_for(&item);
		repo.update(&user_id, &item.id, &ItemChanges::default(), Some(&enc))
			.await
			.unwrap();

		let (_, stored) = repo.get_by_id(&user_id, &item.id).await.unwrap();
		assert!(stored.is_some());
	}

	#[tokio::test]
	async fn update_of_missing_item_is_not_found() {
		let (_pool, repo, user_id) = setup().await;

		let err = repo
			.update(&user_id, &ItemId::generate(), &ItemChanges::default(), None)
			.await
			.unwrap_err();
		assert!(matches!(err, DbError::NotFound(_)));
	}

	#[tokio::test]
	async fn other_users_item_is_not_found() {
		let (pool, repo, user_id) = setup().await;
		let other = insert_test_user(&pool, "bob").await;

		let item = Item::new(user_id, ItemType::Card, "visa", "");
		repo.create(&item, None).await.unwrap();

		assert!(matches!(
			repo.get_by_id(&other, &item.id).await.unwrap_err(),
			DbError::NotFound(_)
		));
		assert!(matches!(
			repo.delete_by_id(&other, &item.id).await.unwrap_err(),
			DbError::NotFound(_)
		));
		assert!(matches!(
			repo
				.update(&other, &item.id, &ItemChanges::default(), None)
				.await
				.unwrap_err(),
			DbError::NotFound(_)
		));
	}

	#[tokio::test]
	async fn delete_removes_item_and_cascades_to_payload() {
		let (pool, repo, user_id) = setup().await;

		let item = Item::new(user_id, ItemType::Text, "t", "");
		let enc = payload_for(&item);
		repo.create(&item, Some(&enc)).await.unwrap();

		repo.delete_by_id(&user_id, &item.id).await.unwrap();

		assert!(matches!(
			repo.get_by_id(&user_id, &item.id).await.unwrap_err(),
			DbError::NotFound(_)
		));

		let count: i64 = sqlx::query_scalar(
			"SELECT COUNT(*) FROM encrypted_data WHERE item_id = ?",
		)
		.bind(item.id.to_string())
		.fetch_one(&pool)
		.await
		.unwrap();
		assert_eq!(count, 0, "cascade should remove the encrypted-data row");
	}

	#[tokio::test]
	async fn delete_of_missing_item_is_not_found() {
		let (_pool, repo, user_id) = setup().await;

		let err = repo
			.delete_by_id(&user_id, &ItemId::generate())
			.await
			.unwrap_err();
		assert!(matches!(err, DbError::NotFound(_)));
	}

	#[tokio::test]
	async fn list_orders_by_updated_at_descending() {
		let (_pool, repo, user_id) = setup().await;

		let first = Item::new(user_id, ItemType::Text, "first", "");
		repo.create(&first, None).await.unwrap();
		let second = Item::new(user_id, ItemType::Text, "second", "");
		repo.create(&second, None).await.unwrap();
		let third = Item::new(user_id, ItemType::Text, "third", "");
		repo.create(&third, None).await.unwrap();

		// Touch the first item so it becomes the most recently updated.
		repo.update(
			&user_id,
			&first.id,
			&ItemChanges {
				title: Some("first-touched".to_string()),
				..Default::default()
			},
			None,
		)
		.await
		.unwrap();

		let items = repo.list_by_user(&user_id).await.unwrap();
		let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
		assert_eq!(titles, vec!["first-touched", "third", "second"]);
	}

	#[tokio::test]
	async fn list_is_scoped_to_the_owner() {
		let (pool, repo, user_id) = setup().await;
		let other = insert_test_user(&pool, "bob").await;

		repo.create(&Item::new(user_id, ItemType::Text, "mine", ""), None)
			.await
			.unwrap();

		assert!(repo.list_by_user(&other).await.unwrap().is_empty());
	}
}
