use std::time::Duration;

use diskview_config::OAuthSettings;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::disk::DiskError;

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("OAuth is not configured")]
    NotConfigured,
    #[error("Authorization error: {error} - {description}")]
    Provider { error: String, description: String },
    #[error("Failed to obtain access token")]
    MissingToken,
    #[error(transparent)]
    Upstream(#[from] DiskError),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct TokenErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

/// Authorization-code flow against Yandex OAuth.
pub struct OAuthService {
    client: Client,
    authorize_endpoint: String,
    token_endpoint: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl OAuthService {
    pub fn new(settings: &OAuthSettings, timeout: Duration) -> Result<Self, OAuthError> {
        let (client_id, client_secret, redirect_uri) =
            settings.credentials().ok_or(OAuthError::NotConfigured)?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DiskError::UpstreamUnavailable(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            authorize_endpoint: settings.authorize_url.clone(),
            token_endpoint: settings.token_url.clone(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
        })
    }

    pub fn authorize_url(&self) -> String {
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}",
            self.authorize_endpoint,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri)
        )
    }

    /// Exchanges an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let resp = self
            .client
            .post(&self.token_endpoint)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(DiskError::from)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.json::<TokenErrorResponse>().await.unwrap_or_default();
            return Err(match body.error {
                Some(error) => OAuthError::Provider {
                    error,
                    description: body.error_description.unwrap_or_default(),
                },
                None => DiskError::UpstreamRejected {
                    status: status.as_u16(),
                    message: "Token exchange failed".to_string(),
                }
                .into(),
            });
        }

        let token: TokenResponse = resp.json().await.map_err(DiskError::from)?;
        let access_token = token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(OAuthError::MissingToken)?;

        info!(expires_in = ?token.expires_in, "Obtained OAuth access token");
        Ok(access_token)
    }
}
