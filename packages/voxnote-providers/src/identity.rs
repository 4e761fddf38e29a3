//! Bearer-token verification against the hosted identity provider.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use uuid::Uuid;

use voxnote_config::IdentityProviderConfig;

use crate::{Error, Result};

/// The verified identity behind a bearer credential.
#[derive(Clone, Debug)]
pub struct Identity {
	pub user_id: Uuid,
	pub role: String,
}

/// Presents the caller's bearer token to the identity provider and returns the identity it
/// vouches for. The service api key rides along as `X-Api-Key`.
pub async fn verify(cfg: &IdentityProviderConfig, token: &str) -> Result<Identity> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let mut headers = crate::auth_headers(token, &cfg.default_headers)?;

	headers.insert("X-Api-Key", cfg.api_key.parse()?);

	let res = client.get(&url).headers(headers).send().await?;

	if matches!(res.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
		return Err(Error::Unauthorized);
	}

	let json: Value = res.error_for_status()?.json().await?;

	parse_identity_response(json)
}

fn parse_identity_response(json: Value) -> Result<Identity> {
	let raw_id = json
		.get("user_id")
		.or_else(|| json.get("id"))
		.and_then(|v| v.as_str())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Identity response is missing user_id.".to_string(),
		})?;
	let user_id = Uuid::parse_str(raw_id).map_err(|_| Error::InvalidResponse {
		message: "Identity response user_id is not a UUID.".to_string(),
	})?;
	let role = json.get("role").and_then(|v| v.as_str()).unwrap_or("user").to_string();

	Ok(Identity { user_id, role })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_identity_with_role() {
		let json = serde_json::json!({
			"user_id": "7f1a6b7e-dc1b-4f2b-9c58-0a1fdd41f2aa",
			"role": "admin"
		});
		let identity = parse_identity_response(json).expect("parse failed");

		assert_eq!(identity.role, "admin");
	}

	#[test]
	fn defaults_role_to_user() {
		let json = serde_json::json!({ "id": "7f1a6b7e-dc1b-4f2b-9c58-0a1fdd41f2aa" });
		let identity = parse_identity_response(json).expect("parse failed");

		assert_eq!(identity.role, "user");
	}

	#[test]
	fn rejects_non_uuid_subject() {
		let json = serde_json::json!({ "user_id": "not-a-uuid" });

		assert!(parse_identity_response(json).is_err());
	}
}
