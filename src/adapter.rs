use crate::chunk::{exceeds_bing_limit, join_segments, split_segments};
use crate::config::{Config, Endpoints, ProviderKind};
use crate::error::{Result, TranslateError};
use crate::translate::cookie::refresh_cookie;
use crate::translate::{build_client, create_provider, CookieStore, Provider};
use tokio::sync::watch;
use tracing::{debug, info};

/// Progress of the most recent translation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslationStatus {
    #[default]
    Idle,
    Busy,
    Success,
    Error,
}

impl std::fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslationStatus::Idle => write!(f, "idle"),
            TranslationStatus::Busy => write!(f, "busy"),
            TranslationStatus::Success => write!(f, "success"),
            TranslationStatus::Error => write!(f, "error"),
        }
    }
}

/// Client for the configured translation service.
///
/// One call at a time per instance: `translate` takes `&mut self`. Share an
/// adapter between tasks only behind a lock.
pub struct TranslationAdapter {
    config: Config,
    endpoints: Endpoints,
    cookies: CookieStore,
    provider: Box<dyn Provider>,
    status: watch::Sender<TranslationStatus>,
    last_source_text: Option<String>,
}

impl TranslationAdapter {
    /// Create an adapter talking to the public service endpoints.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_endpoints(config, Endpoints::default())
    }

    /// Create an adapter from named options (see [`Config::from_options`]).
    pub fn configure<I, K, V>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self::new(Config::from_options(options)?)
    }

    /// Create an adapter talking to the given endpoints.
    pub fn with_endpoints(config: Config, endpoints: Endpoints) -> Result<Self> {
        config.validate()?;

        let cookies = CookieStore::new();
        let provider = build_provider(&config, &endpoints, &cookies)?;
        let (status, _) = watch::channel(TranslationStatus::Idle);

        info!(
            "Using {} at {} ({} -> {})",
            provider.name(),
            provider.base_url(),
            config.source_language.as_deref().unwrap_or("auto"),
            config.target_language
        );

        Ok(Self {
            config,
            endpoints,
            cookies,
            provider,
            status,
            last_source_text: None,
        })
    }

    /// Validate `config`, build a provider for it, and swap both in.
    fn apply(&mut self, config: Config) -> Result<()> {
        config.validate()?;
        self.provider = build_provider(&config, &self.endpoints, &self.cookies)?;
        self.config = config;
        Ok(())
    }

    /// Switch to another provider by name.
    ///
    /// Switching to Google forgets any stored Bing credentials, so switching
    /// back to Bing requires supplying them again.
    pub fn set_provider(&mut self, name: &str) -> Result<()> {
        let kind: ProviderKind = name.parse().map_err(TranslateError::Config)?;

        let mut next = self.config.clone();
        next.provider = kind;
        if kind == ProviderKind::Google {
            next.bing_client_id = None;
            next.bing_client_secret = None;
        }
        self.apply(next)?;

        info!("Switched provider to {}", kind);
        Ok(())
    }

    /// Set source and target languages. An empty or missing source means auto-detect.
    pub fn set_languages(&mut self, source: Option<&str>, target: &str) -> Result<()> {
        if target.trim().is_empty() {
            return Err(TranslateError::Config(
                "A target language is required".to_string(),
            ));
        }

        self.config.source_language = source
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string);
        self.config.target_language = target.to_string();
        Ok(())
    }

    /// Route every subsequent request through an HTTP proxy.
    pub fn set_proxy(&mut self, host: &str, port: u16) -> Result<()> {
        if host.trim().is_empty() || port == 0 {
            return Err(TranslateError::Config(
                "Cannot set the proxy: host and port are required".to_string(),
            ));
        }

        let mut next = self.config.clone();
        next.proxy_host = Some(host.to_string());
        next.proxy_port = Some(port);
        self.apply(next)?;

        debug!("Proxy set to {}:{}", host, port);
        Ok(())
    }

    pub fn use_proxy(&self) -> bool {
        self.config.proxy().is_some()
    }

    /// Enable or disable forwarding of the session cookie store.
    ///
    /// While enabled, Google requests refresh the session cookie before each segment.
    pub fn set_cookie_policy(&mut self, enabled: bool) -> Result<()> {
        let mut next = self.config.clone();
        next.use_cookie = enabled;
        self.apply(next)
    }

    /// Fetch a session cookie from the active provider and enable the cookie policy.
    pub async fn set_cookie(&mut self) -> Result<()> {
        let mut next = self.config.clone();
        next.use_cookie = true;

        let client = build_client(&next, Some(&self.cookies))?;
        refresh_cookie(&client, self.provider.base_url()).await?;

        self.apply(next)
    }

    /// Store Bing credentials. They take effect immediately when Bing is active.
    pub fn set_bing_credentials(&mut self, client_id: &str, client_secret: &str) -> Result<()> {
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(TranslateError::Config(
                "Bing client id and client secret must not be empty".to_string(),
            ));
        }

        let mut next = self.config.clone();
        next.bing_client_id = Some(client_id.to_string());
        next.bing_client_secret = Some(client_secret.to_string());
        self.apply(next)
    }

    /// Translate `text` with the active provider.
    ///
    /// Google input is always translated sentence by sentence; Bing input only
    /// when it is longer than 1000 characters. A failure in any segment fails
    /// the whole call. Dropping the future mid-call leaves the status at `Error`.
    pub async fn translate(&mut self, text: &str) -> Result<String> {
        let result = {
            let _busy = BusyGuard::enter(&self.status);
            let result = self.run(text).await;
            let status = match result {
                Ok(_) => TranslationStatus::Success,
                Err(_) => TranslationStatus::Error,
            };
            self.status.send_replace(status);
            result
        };

        if result.is_ok() {
            self.last_source_text = Some(text.to_string());
        }
        result
    }

    async fn run(&self, text: &str) -> Result<String> {
        let source = self.config.source_language.as_deref();
        let target = self.config.target_language.as_str();

        let chunked = match self.provider.kind() {
            ProviderKind::Google => true,
            ProviderKind::Bing => exceeds_bing_limit(text),
        };

        if !chunked {
            let translation = self.provider.translate(text, source, target).await?;
            return Ok(translation.trim_end().to_string());
        }

        let segments = split_segments(text);
        debug!(
            "Translating {} segment(s) with {}",
            segments.len(),
            self.provider.name()
        );

        let mut translated = Vec::with_capacity(segments.len());
        for segment in segments {
            translated.push(self.provider.translate(segment, source, target).await?);
        }

        Ok(join_segments(&translated))
    }

    /// Source text of the last successful translation.
    pub fn last_source_text(&self) -> Option<&str> {
        self.last_source_text.as_deref()
    }

    pub fn status(&self) -> TranslationStatus {
        *self.status.borrow()
    }

    /// Watch status changes, including `Busy` while a call is in flight.
    pub fn status_receiver(&self) -> watch::Receiver<TranslationStatus> {
        self.status.subscribe()
    }

    pub fn provider(&self) -> ProviderKind {
        self.config.provider
    }

    /// Base URL of the active provider.
    pub fn base_url(&self) -> &str {
        self.provider.base_url()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cookie_store(&self) -> &CookieStore {
        &self.cookies
    }
}

/// Marks the adapter busy; a call abandoned while still busy ends as `Error`.
struct BusyGuard<'a> {
    status: &'a watch::Sender<TranslationStatus>,
}

impl<'a> BusyGuard<'a> {
    fn enter(status: &'a watch::Sender<TranslationStatus>) -> Self {
        status.send_replace(TranslationStatus::Busy);
        Self { status }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.status.send_if_modified(|status| {
            if *status == TranslationStatus::Busy {
                *status = TranslationStatus::Error;
                true
            } else {
                false
            }
        });
    }
}

fn build_provider(
    config: &Config,
    endpoints: &Endpoints,
    cookies: &CookieStore,
) -> Result<Box<dyn Provider>> {
    let client = build_client(config, config.use_cookie.then_some(cookies))?;
    create_provider(config, client, endpoints)
}
