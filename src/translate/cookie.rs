//! Session cookies for the legacy Google endpoint.

use crate::error::{Result, TranslateError};
use reqwest::cookie::{CookieStore as _, Jar};
use reqwest::{Client, Url};
use std::sync::Arc;
use tracing::debug;

/// In-memory cookie jar owned by a single adapter.
///
/// Cookies live only as long as the adapter that owns the store; nothing is
/// written to disk.
#[derive(Clone, Default)]
pub struct CookieStore {
    jar: Arc<Jar>,
}

impl std::fmt::Debug for CookieStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieStore").finish_non_exhaustive()
    }
}

impl CookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }

    /// The `Cookie` header value that would be sent to `url`, if any.
    pub fn cookie_header(&self, url: &str) -> Option<String> {
        let url = Url::parse(url).ok()?;
        self.jar
            .cookies(&url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }
}

/// Fetch `url` so that the service can set its session cookies.
///
/// `client` must have been built with this adapter's [`CookieStore`].
pub async fn refresh_cookie(client: &Client, url: &str) -> Result<()> {
    debug!("Refreshing session cookie from {}", url);

    client
        .get(url)
        .send()
        .await
        .map_err(|e| TranslateError::transport("Could not initialise the cookie", &e))?;

    Ok(())
}
