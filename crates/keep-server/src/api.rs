// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and route wiring.

use std::sync::Arc;

use axum::{
	middleware,
	routing::{get, post},
	Router,
};
use chrono::Duration;
use sqlx::SqlitePool;

use keep_server_auth::token::TokenAuthority;
use keep_server_config::{ConfigError, ServerConfig};
use keep_server_db::{ItemRepository, KeyRepository, UserRepository};
use keep_server_vault::VaultService;

use crate::auth_middleware;
use crate::auth_service::AuthService;
use crate::routes;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub auth_service: Arc<AuthService<UserRepository>>,
	pub vault: Arc<VaultService<KeyRepository, ItemRepository>>,
	pub token_authority: Arc<TokenAuthority>,
	pub pool: SqlitePool,
}

/// Create the application state.
///
/// Decodes the master key from configuration; an invalid key is a startup
/// failure, not a request-time one.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> Result<AppState, ConfigError> {
	let master_key = config.vault.decoded_master_key()?;

	let token_authority = Arc::new(TokenAuthority::new(
		&config.auth.token_secret,
		Duration::seconds(config.auth.token_lifetime_secs as i64),
	));

	let auth_service = Arc::new(AuthService::new(
		UserRepository::new(pool.clone()),
		Arc::clone(&token_authority),
	));

	let vault = Arc::new(VaultService::new(
		KeyRepository::new(pool.clone()),
		ItemRepository::new(pool.clone()),
		master_key,
	));

	Ok(AppState {
		auth_service,
		vault,
		token_authority,
		pool,
	})
}

/// Build the router: public auth/info endpoints plus bearer-protected item
/// endpoints, all under `/api/v1`.
pub fn create_router(state: AppState) -> Router {
	let public = Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/version", get(routes::health::version))
		.route("/register", post(routes::auth::register))
		.route("/login", post(routes::auth::login));

	let protected = Router::new()
		.route(
			"/items",
			post(routes::items::create_item).get(routes::items::list_items),
		)
		.route(
			"/items/{id}",
			get(routes::items::get_item)
				.put(routes::items::update_item)
				.delete(routes::items::delete_item),
		)
		.route_layer(middleware::from_fn_with_state(
			state.clone(),
			auth_middleware::require_auth,
		));

	Router::new()
		.nest("/api/v1", public.merge(protected))
		.with_state(state)
}
