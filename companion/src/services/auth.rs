//! # Sign-in
//!
//! Email/password authentication against the Identity Toolkit REST API.

use crate::core::{AuthService, AuthUser};
use async_trait::async_trait;
use lib_core::{AppError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Base URL of the Identity Toolkit API.
pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: String,
    id_token: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// HTTP client for `accounts:signInWithPassword`.
pub struct IdentityToolkitClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl IdentityToolkitClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl AuthService for IdentityToolkitClient {
    #[tracing::instrument(skip(self, password), fields(email = %email))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        tracing::info!("Attempting sign-in");
        let start = std::time::Instant::now();

        let response = self
            .client
            .post(format!("{}/v1/accounts:signInWithPassword", self.base_url))
            .query(&[("key", self.api_key.as_str())])
            .json(&SignInRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Sign-in network error");
                AppError::Rpc(format!("Network error: {}", e))
            })?;

        let status = response.status();
        if status.is_success() {
            let body = response
                .json::<SignInResponse>()
                .await
                .map_err(|e| AppError::Decoding(format!("Failed to parse response: {}", e)))?;
            tracing::info!(duration_ms = start.elapsed().as_millis(), "Sign-in successful");
            return Ok(AuthUser {
                uid: body.local_id,
                email: body.email,
                id_token: body.id_token,
            });
        }

        let reason = response
            .json::<ErrorResponse>()
            .await
            .map(|e| e.error.message)
            .unwrap_or_else(|_| status.to_string());
        tracing::warn!(status = status.as_u16(), reason = %reason, "Sign-in failed");

        if status.is_client_error() {
            Err(AppError::InvalidInput(reason))
        } else {
            Err(AppError::Rpc(reason))
        }
    }
}

/// Validate credentials before they reach the provider.
pub fn validate_credentials(email: &str, password: &str) -> std::result::Result<(), String> {
    lib_utils::validate_email(email)?;
    lib_utils::validate_not_empty(password, "Password")
}
