//! OAuth authorization-code flow.
//!
//! The client secret lives on a companion server; this side fetches the
//! public client id, builds the authorize redirect, and trades the returned
//! code for an access token through that server.

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::json;
use tracing::{info, warn};

use crate::services::crypto_service::CryptoServiceTrait;
use crate::types::errors::{AuthError, ConfigError, CryptoError};
use crate::types::github::{ClientConfig, TokenExchangeResponse};
use crate::types::settings::{AuthSettings, GitHubSettings};

/// Length of the anti-CSRF `state` parameter.
pub const STATE_LENGTH: usize = 32;

/// Client for the auth server's `/api/config` and `/api/oauth/token` endpoints.
#[derive(Clone)]
pub struct OAuthClient {
    server_url: String,
    authorize_url: String,
    redirect_uri: String,
    scope: String,
    http: Client,
}

impl OAuthClient {
    pub fn new(
        auth: &AuthSettings,
        github: &GitHubSettings,
        timeout: Duration,
    ) -> Result<Self, AuthError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;
        Ok(Self {
            server_url: auth.server_url.trim_end_matches('/').to_string(),
            authorize_url: github.authorize_url.clone(),
            redirect_uri: auth.redirect_uri.clone(),
            scope: auth.scope.clone(),
            http,
        })
    }

    /// Fetches the OAuth client id. Any failure means sign-in is not possible.
    pub async fn fetch_client_id(&self) -> Result<String, ConfigError> {
        let url = format!("{}/api/config", self.server_url);
        let response = self.http.get(&url).send().await.map_err(|e| {
            warn!(error = %e, "failed to load application configuration");
            ConfigError::MissingClientId
        })?;
        let config: ClientConfig = response.json().await.map_err(|e| {
            warn!(error = %e, "malformed application configuration");
            ConfigError::MissingClientId
        })?;
        config
            .client_id
            .filter(|id| !id.is_empty())
            .ok_or(ConfigError::MissingClientId)
    }

    /// Authorization redirect for `client_id` carrying `state`.
    pub fn authorize_url(&self, client_id: &str, state: &str) -> Result<String, ConfigError> {
        let url = Url::parse_with_params(
            &self.authorize_url,
            &[
                ("client_id", client_id),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", self.scope.as_str()),
                ("state", state),
                ("allow_signup", "true"),
            ],
        )
        .map_err(|_| ConfigError::MissingClientId)?;
        Ok(url.to_string())
    }

    /// Trades an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, AuthError> {
        let url = format!("{}/api/oauth/token", self.server_url);
        let response = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .json(&json!({ "code": code }))
            .send()
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body: TokenExchangeResponse = response.json().await.map_err(|e| {
            AuthError::TokenExchange(format!("HTTP {}: {}", status.as_u16(), e))
        })?;

        match (body.access_token, body.error) {
            (Some(token), _) if !token.is_empty() => {
                info!("access token obtained");
                Ok(token)
            }
            (_, Some(error)) => Err(AuthError::TokenExchange(error)),
            _ => Err(AuthError::TokenExchange(
                "Failed to get access token".to_string(),
            )),
        }
    }
}

/// Fresh random value for the OAuth `state` parameter.
pub fn generate_state<C: CryptoServiceTrait + ?Sized>(crypto: &C) -> Result<String, CryptoError> {
    crypto.random_alphanumeric(STATE_LENGTH)
}
