//! Translation through the Microsoft Translator (Bing) V2 HTTP API.

use crate::config::{ProviderKind, BING_AUTH_URL, BING_URL};
use crate::error::{Result, TranslateError};
use crate::translate::Provider;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// OAuth grant used to obtain bearer tokens.
const GRANT_TYPE: &str = "client_credentials";

/// OAuth scope of the translator API.
const SCOPE_URL: &str = "http://api.microsofttranslator.com";

#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Provider for the Microsoft Translator API.
///
/// A fresh bearer token is requested before every translation call.
pub struct BingProvider {
    client: Client,
    client_id: String,
    client_secret: String,
    base_url: String,
    auth_url: String,
}

impl BingProvider {
    /// Create a provider with the given Azure Marketplace credentials.
    pub fn new(client: Client, client_id: String, client_secret: String) -> Self {
        Self {
            client,
            client_id,
            client_secret,
            base_url: BING_URL.to_string(),
            auth_url: BING_AUTH_URL.to_string(),
        }
    }

    /// Point the provider at different translate and OAuth endpoints.
    pub fn with_endpoints(mut self, base_url: String, auth_url: String) -> Self {
        self.base_url = base_url;
        self.auth_url = auth_url;
        self
    }

    /// Obtain a bearer token from the OAuth endpoint.
    pub async fn fetch_token(&self) -> Result<String> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(TranslateError::Config(
                "Cannot start the Bing service: client id or secret missing".to_string(),
            ));
        }

        let form = [
            ("grant_type", GRANT_TYPE),
            ("scope", SCOPE_URL),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];

        debug!("Requesting Bing access token");

        let response = self
            .client
            .post(&self.auth_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| TranslateError::transport("Token request failed", &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TranslateError::transport("Failed to read token response", &e))?;

        let token: TokenResponse = match serde_json::from_str(&body) {
            Ok(token) => token,
            Err(_) if !status.is_success() => {
                return Err(TranslateError::Network(format!(
                    "Token endpoint returned {}: {}",
                    status, body
                )))
            }
            Err(e) => {
                return Err(TranslateError::Auth(format!(
                    "Unreadable token response: {}",
                    e
                )))
            }
        };

        if let Some(error) = token.error {
            return Err(TranslateError::Auth(token.error_description.unwrap_or(error)));
        }

        token.access_token.ok_or_else(|| {
            TranslateError::Auth("Token response did not contain an access_token".to_string())
        })
    }

    fn translate_url(&self) -> String {
        format!("{}/Translate", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Provider for BingProvider {
    async fn translate(&self, text: &str, source: Option<&str>, target: &str) -> Result<String> {
        let token = self.fetch_token().await?;

        let mut params = vec![("text", text), ("to", target)];
        if let Some(from) = source.filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("auto")) {
            params.push(("from", from));
        }

        debug!("Bing translate: {} chars to {}", text.len(), target);

        let response = self
            .client
            .get(self.translate_url())
            .query(&params)
            .bearer_auth(&token)
            .header(CONTENT_TYPE, "text/xml")
            .send()
            .await
            .map_err(|e| TranslateError::transport("Could not translate the text", &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TranslateError::transport("Failed to read Bing response", &e))?;

        if !status.is_success() {
            return Err(TranslateError::Network(format!(
                "Bing returned {}: {}",
                status, body
            )));
        }

        Ok(body)
    }

    fn name(&self) -> &'static str {
        "Microsoft Translator"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Bing
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
