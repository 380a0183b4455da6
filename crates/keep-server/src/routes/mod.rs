// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP request handlers.

pub mod auth;
pub mod health;
pub mod items;

use axum::{http::StatusCode, Json};
use http::header::CONTENT_TYPE;
use http::HeaderMap;
use serde::de::DeserializeOwned;

use crate::api_response::{bad_request, ErrorResponse};

/// Decode a JSON request body.
///
/// Write endpoints require `Content-Type: application/json` (substring
/// match); the body is not parsed otherwise. Malformed JSON is a 400.
pub(crate) fn decode_json<T: DeserializeOwned>(
	headers: &HeaderMap,
	body: &[u8],
) -> Result<T, (StatusCode, Json<ErrorResponse>)> {
	let is_json = headers
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.is_some_and(|value| value.contains("application/json"));

	if !is_json {
		return Err(bad_request(
			"unsupported_content_type",
			"Content-Type must be application/json",
		));
	}

	serde_json::from_slice(body)
		.map_err(|_| bad_request("invalid_body", "request body could not be decoded"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use http::header::HeaderValue;
	use serde::Deserialize;

	#[derive(Debug, Deserialize)]
	struct Probe {
		value: i32,
	}

	fn json_headers() -> HeaderMap {
		let mut headers = HeaderMap::new();
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		headers
	}

	#[test]
	fn decodes_json_bodies() {
		let probe: Probe = decode_json(&json_headers(), br#"{"value": 7}"#).unwrap();
		assert_eq!(probe.value, 7);
	}

	#[test]
	fn content_type_match_is_substring() {
		let mut headers = HeaderMap::new();
		headers.insert(
			CONTENT_TYPE,
			HeaderValue::from_static("application/json; charset=utf-8"),
		);
		assert!(decode_json::<Probe>(&headers, br#"{"value": 1}"#).is_ok());
	}

	#[test]
	fn missing_content_type_is_rejected_before_parsing() {
		// Body is valid JSON, but must not be parsed.
		let err = decode_json::<Probe>(&HeaderMap::new(), br#"{"value": 7}"#).unwrap_err();
		assert_eq!(err.0, StatusCode::BAD_REQUEST);
	}

	#[test]
	fn malformed_json_is_a_bad_request() {
		let err = decode_json::<Probe>(&json_headers(), b"{not json").unwrap_err();
		assert_eq!(err.0, StatusCode::BAD_REQUEST);
	}
}
