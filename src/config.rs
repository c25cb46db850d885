use crate::error::{Result, TranslateError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Legacy free Google Translate endpoint.
pub const GOOGLE_URL: &str = "http://translate.google.com/translate_a/t";

/// Microsoft Translator V2 HTTP endpoint.
pub const BING_URL: &str = "http://api.microsofttranslator.com/V2/Http.svc";

/// Azure DataMarket OAuth endpoint used to obtain Bing bearer tokens.
pub const BING_AUTH_URL: &str = "https://datamarket.accesscontrol.windows.net/v2/OAuth2-13/";

/// Language translated to when nothing else is configured.
pub const DEFAULT_TARGET_LANGUAGE: &str = "es";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Google,
    Bing,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Google => write!(f, "google"),
            ProviderKind::Bing => write!(f, "bing"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(ProviderKind::Google),
            "bing" => Ok(ProviderKind::Bing),
            _ => Err(format!("Unknown provider: {}. Use 'google' or 'bing'", s)),
        }
    }
}

/// Service URLs. Only tests and self-hosted proxies need anything but the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub google_url: String,
    pub bing_url: String,
    pub bing_auth_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            google_url: GOOGLE_URL.to_string(),
            bing_url: BING_URL.to_string(),
            bing_auth_url: BING_AUTH_URL.to_string(),
        }
    }
}

/// Adapter configuration.
///
/// Only the options listed here are recognized; unknown keys are rejected both
/// in TOML files and in [`Config::from_options`].
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub provider: ProviderKind,
    /// ISO 639-1 code, `"auto"`, or `None` for auto-detection.
    pub source_language: Option<String>,
    pub target_language: String,
    pub proxy_host: Option<String>,
    pub proxy_port: Option<u16>,
    pub use_cookie: bool,
    pub bing_client_id: Option<String>,
    pub bing_client_secret: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            source_language: None,
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            proxy_host: None,
            proxy_port: None,
            use_cookie: false,
            bing_client_id: None,
            bing_client_secret: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("source_language", &self.source_language)
            .field("target_language", &self.target_language)
            .field("proxy_host", &self.proxy_host)
            .field("proxy_port", &self.proxy_port)
            .field("use_cookie", &self.use_cookie)
            .field("bing_client_id", &self.bing_client_id)
            .field(
                "bing_client_secret",
                &self.bing_client_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    /// Build a configuration from named options.
    ///
    /// Recognized keys: `provider`, `sourceLanguage`, `targetLanguage`,
    /// `proxyHost`, `proxyPort`, `useCookie`, `bingClientId`, `bingClientSecret`.
    /// Any other key is a configuration error.
    pub fn from_options<I, K, V>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for (key, value) in options {
            config.apply_option(key.as_ref(), value.into())?;
        }
        Ok(config)
    }

    fn apply_option(&mut self, key: &str, value: String) -> Result<()> {
        match key {
            "provider" => self.provider = value.parse().map_err(TranslateError::Config)?,
            "sourceLanguage" => self.source_language = non_empty(value),
            "targetLanguage" => self.target_language = value,
            "proxyHost" => self.proxy_host = non_empty(value),
            "proxyPort" => self.proxy_port = Some(parse_port(&value)?),
            "useCookie" => self.use_cookie = parse_flag(key, &value)?,
            "bingClientId" => self.bing_client_id = non_empty(value),
            "bingClientSecret" => self.bing_client_secret = non_empty(value),
            other => {
                return Err(TranslateError::Config(format!(
                    "Unknown option: {}",
                    other
                )))
            }
        }
        Ok(())
    }

    /// Load defaults, then the user config file, then environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                match Self::load_from(&config_path) {
                    Ok(file_config) => config = file_config,
                    Err(e) => warn!("Ignoring {}: {}", config_path.display(), e),
                }
            }
        }

        config.apply_env(|name| std::env::var(name).ok());

        Ok(config)
    }

    /// Load a configuration from a TOML file, without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str::<Config>(&contents)?)
    }

    /// Apply environment overrides. Unparseable values are ignored.
    pub(crate) fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = var("TRANSLATE_PROVIDER") {
            if let Ok(p) = provider.parse() {
                self.provider = p;
            }
        }
        if let Some(lang) = var("TRANSLATE_SOURCE_LANG") {
            self.source_language = non_empty(lang);
        }
        if let Some(lang) = var("TRANSLATE_TARGET_LANG") {
            self.target_language = lang;
        }
        if let Some(host) = var("TRANSLATE_PROXY_HOST") {
            self.proxy_host = non_empty(host);
        }
        if let Some(port) = var("TRANSLATE_PROXY_PORT") {
            if let Ok(p) = parse_port(&port) {
                self.proxy_port = Some(p);
            }
        }
        if let Some(flag) = var("TRANSLATE_USE_COOKIE") {
            if let Ok(f) = parse_flag("TRANSLATE_USE_COOKIE", &flag) {
                self.use_cookie = f;
            }
        }
        if let Some(id) = var("BING_CLIENT_ID") {
            self.bing_client_id = non_empty(id);
        }
        if let Some(secret) = var("BING_CLIENT_SECRET") {
            self.bing_client_secret = non_empty(secret);
        }
        if let Some(timeout) = var("TRANSLATE_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.timeout_secs = t;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_language.trim().is_empty() {
            return Err(TranslateError::Config(
                "Target language must not be empty".to_string(),
            ));
        }

        match (&self.proxy_host, self.proxy_port) {
            (Some(_), Some(_)) | (None, None) => {}
            _ => {
                return Err(TranslateError::Config(
                    "Proxy needs both a host and a port".to_string(),
                ))
            }
        }

        if self.provider == ProviderKind::Bing && self.bing_credentials().is_none() {
            return Err(TranslateError::Config(
                "Bing provider requires bing_client_id and bing_client_secret".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(TranslateError::Config(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Client id and secret, when both are set.
    pub fn bing_credentials(&self) -> Option<(&str, &str)> {
        match (&self.bing_client_id, &self.bing_client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some((id.as_str(), secret.as_str()))
            }
            _ => None,
        }
    }

    pub fn proxy(&self) -> Option<(&str, u16)> {
        match (&self.proxy_host, self.proxy_port) {
            (Some(host), Some(port)) => Some((host.as_str(), port)),
            _ => None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("translate-adapter").join("config.toml"))
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_port(value: &str) -> Result<u16> {
    match value.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(TranslateError::Config(format!(
            "Invalid proxy port: {}",
            value
        ))),
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(TranslateError::Config(format!(
            "Invalid value for {}: {}",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_provider_parsing() {
        assert_eq!("google".parse::<ProviderKind>().unwrap(), ProviderKind::Google);
        assert_eq!("bing".parse::<ProviderKind>().unwrap(), ProviderKind::Bing);
        assert_eq!("BING".parse::<ProviderKind>().unwrap(), ProviderKind::Bing);
        assert!("deepl".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider, ProviderKind::Google);
        assert_eq!(config.target_language, "es");
        assert!(config.source_language.is_none());
        assert!(!config.use_cookie);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_options() {
        let options = HashMap::from([
            ("provider", "bing"),
            ("sourceLanguage", "en"),
            ("targetLanguage", "fr"),
            ("proxyHost", "10.0.0.1"),
            ("proxyPort", "3128"),
            ("useCookie", "true"),
            ("bingClientId", "client"),
            ("bingClientSecret", "secret"),
        ]);

        let config = Config::from_options(options).unwrap();
        assert_eq!(config.provider, ProviderKind::Bing);
        assert_eq!(config.source_language.as_deref(), Some("en"));
        assert_eq!(config.target_language, "fr");
        assert_eq!(config.proxy(), Some(("10.0.0.1", 3128)));
        assert!(config.use_cookie);
        assert_eq!(config.bing_credentials(), Some(("client", "secret")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_options_rejects_unknown_key() {
        let result = Config::from_options([("translationService", "google")]);
        assert!(matches!(result, Err(TranslateError::Config(_))));
    }

    #[test]
    fn test_from_options_rejects_bad_values() {
        assert!(Config::from_options([("provider", "yandex")]).is_err());
        assert!(Config::from_options([("proxyPort", "http")]).is_err());
        assert!(Config::from_options([("proxyPort", "0")]).is_err());
        assert!(Config::from_options([("useCookie", "maybe")]).is_err());
    }

    #[test]
    fn test_validate_empty_target_language() {
        let mut config = Config::default();
        config.target_language = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_half_configured_proxy() {
        let mut config = Config::default();
        config.proxy_host = Some("proxy.local".to_string());
        assert!(config.validate().is_err());

        config.proxy_port = Some(8080);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bing_requires_credentials() {
        let mut config = Config::default();
        config.provider = ProviderKind::Bing;
        assert!(config.validate().is_err());

        config.bing_client_id = Some("id".to_string());
        assert!(config.validate().is_err());

        config.bing_client_secret = Some("secret".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let vars = HashMap::from([
            ("TRANSLATE_PROVIDER", "bing"),
            ("TRANSLATE_TARGET_LANG", "de"),
            ("TRANSLATE_PROXY_PORT", "not-a-port"),
            ("BING_CLIENT_ID", "env-id"),
            ("BING_CLIENT_SECRET", "env-secret"),
            ("TRANSLATE_TIMEOUT_SECS", "5"),
        ]);

        let mut config = Config::default();
        config.apply_env(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.provider, ProviderKind::Bing);
        assert_eq!(config.target_language, "de");
        assert_eq!(config.proxy_port, None);
        assert_eq!(config.bing_credentials(), Some(("env-id", "env-secret")));
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let mut config = Config::default();
        config.bing_client_secret = Some("hunter2".to_string());
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_default_endpoints() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.google_url, GOOGLE_URL);
        assert_eq!(endpoints.bing_url, BING_URL);
        assert_eq!(endpoints.bing_auth_url, BING_AUTH_URL);
    }
}
