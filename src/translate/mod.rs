pub mod bing;
pub mod cookie;
pub mod google;

use crate::config::{Config, Endpoints, ProviderKind};
use crate::error::{Result, TranslateError};
use async_trait::async_trait;
use reqwest::Client;

pub use bing::BingProvider;
pub use cookie::CookieStore;
pub use google::GoogleProvider;

/// A translation backend.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Translate one piece of text. `source` of `None` means auto-detect.
    async fn translate(&self, text: &str, source: Option<&str>, target: &str) -> Result<String>;
    fn name(&self) -> &'static str;
    fn kind(&self) -> ProviderKind;
    fn base_url(&self) -> &str;
}

/// Build the HTTP client shared by every provider call.
pub fn build_client(config: &Config, cookies: Option<&CookieStore>) -> Result<Client> {
    let mut builder = Client::builder().timeout(config.timeout());

    if let Some((host, port)) = config.proxy() {
        let proxy = reqwest::Proxy::all(proxy_url(host, port)).map_err(|e| {
            TranslateError::Config(format!("Invalid proxy {}:{}: {}", host, port, e))
        })?;
        builder = builder.proxy(proxy);
    }

    if let Some(store) = cookies {
        builder = builder.cookie_provider(store.jar());
    }

    builder
        .build()
        .map_err(|e| TranslateError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Proxy URL for `host:port`; IPv6 literals are bracketed.
fn proxy_url(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("http://[{}]:{}", host, port)
    } else {
        format!("http://{}:{}", host, port)
    }
}

/// Create the provider selected by the configuration.
pub fn create_provider(
    config: &Config,
    client: Client,
    endpoints: &Endpoints,
) -> Result<Box<dyn Provider>> {
    match config.provider {
        ProviderKind::Google => {
            let provider = GoogleProvider::new(client, endpoints.google_url.clone())
                .with_cookie_refresh(config.use_cookie);
            Ok(Box::new(provider))
        }
        ProviderKind::Bing => {
            let (client_id, client_secret) = config.bing_credentials().ok_or_else(|| {
                TranslateError::Config(
                    "Cannot use Bing: client id and client secret are required".to_string(),
                )
            })?;
            let provider = BingProvider::new(
                client,
                client_id.to_string(),
                client_secret.to_string(),
            )
            .with_endpoints(endpoints.bing_url.clone(), endpoints.bing_auth_url.clone());
            Ok(Box::new(provider))
        }
    }
}
