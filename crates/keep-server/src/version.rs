// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Build information.

/// Crate version from Cargo.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build identifier, stamped at compile time via `KEEP_BUILD_DATE`.
pub fn build() -> &'static str {
	option_env!("KEEP_BUILD_DATE").unwrap_or("unknown")
}

/// One-line version string for the `version` subcommand.
pub fn format_version_info() -> String {
	format!("keep-server {VERSION} (build {})", build())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn version_string_contains_crate_version() {
		let info = format_version_info();
		assert!(info.contains(VERSION));
		assert!(info.starts_with("keep-server "));
	}
}
