//! Translation through the legacy free Google Translate endpoint.

use crate::config::ProviderKind;
use crate::error::{Result, TranslateError};
use crate::translate::cookie::refresh_cookie;
use crate::translate::Provider;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Fixed flags the endpoint expects alongside the text and languages.
const FIXED_PARAMS: [(&str, &str); 9] = [
    ("ie", "UTF-8"),
    ("oe", "UTF-8"),
    ("multires", "1"),
    ("otf", "1"),
    ("pc", "1"),
    ("trs", "1"),
    ("ssel", "3"),
    ("tsel", "6"),
    ("sc", "1"),
];

/// Provider for `translate.google.com/translate_a/t`.
pub struct GoogleProvider {
    client: Client,
    base_url: String,
    refresh_cookie: bool,
}

impl GoogleProvider {
    /// Create a provider that sends requests with `client` to `base_url`.
    pub fn new(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url,
            refresh_cookie: false,
        }
    }

    /// Re-fetch the session cookie before every request.
    ///
    /// The client must carry the adapter's cookie store for this to matter.
    pub fn with_cookie_refresh(mut self, enabled: bool) -> Self {
        self.refresh_cookie = enabled;
        self
    }

    /// Query parameters for one segment. An unset source language is sent empty.
    fn build_params<'a>(
        text: &'a str,
        source: Option<&'a str>,
        target: &'a str,
    ) -> Vec<(&'a str, &'a str)> {
        let mut params = vec![
            ("client", "t"),
            ("text", text),
            ("hl", target),
            ("sl", source.unwrap_or("")),
            ("tl", target),
        ];
        params.extend_from_slice(&FIXED_PARAMS);
        params
    }
}

#[async_trait]
impl Provider for GoogleProvider {
    async fn translate(&self, text: &str, source: Option<&str>, target: &str) -> Result<String> {
        if self.refresh_cookie {
            refresh_cookie(&self.client, &self.base_url).await?;
        }

        debug!("Google translate: {} chars to {}", text.len(), target);

        let params = Self::build_params(text, source, target);
        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| TranslateError::transport("Could not translate the text", &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TranslateError::transport("Failed to read Google response", &e))?;

        if !status.is_success() {
            return Err(TranslateError::Network(format!(
                "Google returned {}: {}",
                status, body
            )));
        }

        extract_translation(&body)
    }

    fn name(&self) -> &'static str {
        "Google Translate"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Pull the translated segment out of a response body.
///
/// The endpoint answers with a nested array whose first string is the
/// translation. Bodies that are not valid JSON fall back to the second
/// `"`-delimited field. Either way the result is then URL-decoded.
pub fn extract_translation(body: &str) -> Result<String> {
    let field = match serde_json::from_str::<Value>(body) {
        Ok(value) => first_string(&value).map(str::to_string),
        Err(_) => None,
    }
    .or_else(|| body.split('"').nth(1).map(str::to_string))
    .ok_or_else(|| {
        TranslateError::UnexpectedResponse(format!(
            "No translation found in Google response: {}",
            body.chars().take(200).collect::<String>()
        ))
    })?;

    Ok(url_decode(&field))
}

/// Depth-first search for the first string token.
fn first_string(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s),
        Value::Array(items) => items.iter().find_map(first_string),
        _ => None,
    }
}

/// Form-style decoding: `+` becomes a space, then `%XX` escapes are resolved.
fn url_decode(field: &str) -> String {
    let spaced = field.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => {
            String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
        }
    }
}
