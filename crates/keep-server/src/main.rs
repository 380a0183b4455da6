// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! keep secrets vault server binary.

use clap::{Parser, Subcommand};
use keep_server::{create_app_state, create_router};
use keep_server_db::PoolSettings;
use std::net::ToSocketAddrs;
use std::time::Duration;
use tower_http::{
	cors::{Any, CorsLayer},
	timeout::TimeoutLayer,
	trace::TraceLayer,
};

mod version;

/// How long in-flight requests may drain after a shutdown signal.
const SHUTDOWN_DRAIN: Duration = Duration::from_secs(10);

/// Per-request processing bound; a request that exceeds it gets 408.
const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// keep server - HTTP(S) server for the keep secrets vault.
#[derive(Parser, Debug)]
#[command(name = "keep-server", about = "keep secrets vault server", version)]
struct Args {
	/// Subcommands for keep-server (e.g., `version`)
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Parse CLI arguments
	let args = Args::parse();

	// Handle subcommands that should not start the server
	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	// Load configuration
	let config = keep_server_config::load_config()?;

	// Setup tracing
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
		)
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		tls = config.tls.is_some(),
		"starting keep-server"
	);

	// Create database pool and run migrations
	let pool_settings = PoolSettings {
		max_connections: config.database.max_connections,
		min_connections: config.database.min_connections,
		max_lifetime: Duration::from_secs(config.database.max_lifetime_secs),
		idle_timeout: Duration::from_secs(config.database.idle_timeout_secs),
		acquire_timeout: Duration::from_secs(config.database.acquire_timeout_secs),
	};
	let pool = keep_server_db::create_pool(&config.database.url, &pool_settings).await?;
	keep_server_db::run_migrations(&pool).await?;
	tracing::info!("database initialized and migrations applied");

	let state = create_app_state(pool.clone(), &config)?;

	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(TimeoutLayer::new(HTTP_REQUEST_TIMEOUT))
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config
		.socket_addr()
		.to_socket_addrs()?
		.next()
		.ok_or_else(|| format!("cannot resolve bind address {}", config.socket_addr()))?;

	// On SIGINT/SIGTERM: stop accepting, drain in-flight requests for a
	// bounded interval, then fall through and close the pool.
	let handle = axum_server::Handle::new();
	tokio::spawn(graceful_shutdown(handle.clone()));

	match &config.tls {
		Some(tls) => {
			let rustls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
				&tls.cert_file,
				&tls.key_file,
			)
			.await?;
			tracing::info!("listening on https://{addr}");
			axum_server::bind_rustls(addr, rustls_config)
				.handle(handle)
				.serve(app.into_make_service())
				.await?;
		}
		None => {
			tracing::info!("listening on http://{addr}");
			axum_server::bind(addr)
				.handle(handle)
				.serve(app.into_make_service())
				.await?;
		}
	}

	tracing::info!("closing database pool");
	pool.close().await;

	tracing::info!("server shutdown complete");
	Ok(())
}

/// Wait for a shutdown signal, then begin a bounded graceful drain.
async fn graceful_shutdown(handle: axum_server::Handle) {
	tokio::select! {
		_ = tokio::signal::ctrl_c() => {},
		_ = terminate_signal() => {},
	}

	tracing::info!(drain_secs = SHUTDOWN_DRAIN.as_secs(), "received shutdown signal");
	handle.graceful_shutdown(Some(SHUTDOWN_DRAIN));
}

#[cfg(unix)]
async fn terminate_signal() {
	use tokio::signal::unix::{signal, SignalKind};

	match signal(SignalKind::terminate()) {
		Ok(mut sigterm) => {
			sigterm.recv().await;
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to install SIGTERM handler");
			std::future::pending::<()>().await;
		}
	}
}

#[cfg(not(unix))]
async fn terminate_signal() {
	std::future::pending::<()>().await;
}
