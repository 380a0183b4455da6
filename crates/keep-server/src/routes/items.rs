// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Item HTTP handlers.
//!
//! All handlers run behind the auth middleware and receive the caller
//! through the [`AuthUser`] extractor. Responses carry item metadata and,
//! on single-item reads, the decrypted payload re-encoded as base64;
//! ciphertext and keys never appear on the wire.

use axum::{
	body::Bytes,
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use http::HeaderMap;
use serde::{Deserialize, Serialize};

use keep_server_db::{Item, ItemType};
use keep_server_vault::{CreateItemInput, UpdateItemInput, VaultError};

use crate::api::AppState;
use crate::api_response::{bad_request, internal_error, not_found};
use crate::auth_middleware::AuthUser;
use crate::routes::decode_json;
use crate::validation::{parse_item_id, require_non_empty, ValidationError};

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
	#[serde(rename = "type")]
	pub item_type: ItemType,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub metadata: String,
	#[serde(default)]
	pub data_base64: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
	#[serde(rename = "type", default)]
	pub item_type: Option<ItemType>,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub metadata: Option<String>,
	#[serde(default)]
	pub data_base64: Option<String>,
}

impl UpdateItemRequest {
	fn is_empty(&self) -> bool {
		self.item_type.is_none()
			&& self.title.is_none()
			&& self.metadata.is_none()
			&& self.data_base64.is_none()
	}
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
	pub item: Item,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data_base64: Option<String>,
}

fn vault_error_response(operation: &'static str, err: VaultError) -> Response {
	match err {
		VaultError::NotFound => not_found("item not found").into_response(),
		VaultError::InvalidPayload(message) => {
			bad_request("invalid_payload", message).into_response()
		}
		e => {
			tracing::error!(error = %e, operation, "vault operation failed");
			internal_error().into_response()
		}
	}
}

/// POST /items - create an item, optionally with an encrypted payload.
pub async fn create_item(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	headers: HeaderMap,
	body: Bytes,
) -> Response {
	let req: CreateItemRequest = match decode_json(&headers, &body) {
		Ok(req) => req,
		Err(rejection) => return rejection.into_response(),
	};
	if let Err(e) = require_non_empty("title", &req.title) {
		return bad_request(e.error, e.message).into_response();
	}

	let input = CreateItemInput {
		item_type: req.item_type,
		title: req.title,
		metadata: req.metadata,
		data_base64: req.data_base64,
	};

	match state.vault.create_item(user_id, input).await {
		Ok(item) => (
			StatusCode::CREATED,
			Json(ItemResponse {
				item,
				data_base64: None,
			}),
		)
			.into_response(),
		Err(e) => vault_error_response("create", e),
	}
}

/// GET /items - list the caller's items, metadata only.
pub async fn list_items(State(state): State<AppState>, AuthUser(user_id): AuthUser) -> Response {
	match state.vault.list_items(user_id).await {
		Ok(items) => Json(items).into_response(),
		Err(e) => vault_error_response("list", e),
	}
}

/// GET /items/{id} - fetch an item with its decrypted payload.
pub async fn get_item(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Path(id): Path<String>,
) -> Response {
	let item_id = match parse_item_id(&id) {
		Ok(id) => id,
		Err(e) => return bad_request(e.error, e.message).into_response(),
	};

	match state.vault.get_item(user_id, item_id).await {
		Ok((item, payload)) => Json(ItemResponse {
			item,
			data_base64: payload.map(|data| BASE64.encode(data.as_slice())),
		})
		.into_response(),
		Err(e) => vault_error_response("get", e),
	}
}

/// PUT /items/{id} - partial update; absent fields are retained.
pub async fn update_item(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Path(id): Path<String>,
	headers: HeaderMap,
	body: Bytes,
) -> Response {
	let item_id = match parse_item_id(&id) {
		Ok(id) => id,
		Err(e) => return bad_request(e.error, e.message).into_response(),
	};
	let req: UpdateItemRequest = match decode_json(&headers, &body) {
		Ok(req) => req,
		Err(rejection) => return rejection.into_response(),
	};
	if req.is_empty() {
		let e = ValidationError::no_fields_to_update();
		return bad_request(e.error, e.message).into_response();
	}

	let input = UpdateItemInput {
		item_type: req.item_type,
		title: req.title,
		metadata: req.metadata,
		data_base64: req.data_base64,
	};

	match state.vault.update_item(user_id, item_id, input).await {
		Ok(item) => Json(ItemResponse {
			item,
			data_base64: None,
		})
		.into_response(),
		Err(e) => vault_error_response("update", e),
	}
}

/// DELETE /items/{id} - delete an item and its ciphertext.
pub async fn delete_item(
	State(state): State<AppState>,
	AuthUser(user_id): AuthUser,
	Path(id): Path<String>,
) -> Response {
	let item_id = match parse_item_id(&id) {
		Ok(id) => id,
		Err(e) => return bad_request(e.error, e.message).into_response(),
	};

	match state.vault.delete_item(user_id, item_id).await {
		Ok(()) => StatusCode::NO_CONTENT.into_response(),
		Err(e) => vault_error_response("delete", e),
	}
}
