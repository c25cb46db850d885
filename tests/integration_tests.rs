//! Integration tests for translate-adapter
//!
//! These tests exercise configuration loading and adapter wiring without
//! touching the network.

use std::io::Write;
use tempfile::NamedTempFile;
use translate_adapter::chunk::{join_segments, split_segments};
use translate_adapter::config::{BING_URL, GOOGLE_URL};
use translate_adapter::{Config, ProviderKind, TranslateError, TranslationAdapter, TranslationStatus};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

// ============================================================================
// Config File Tests
// ============================================================================

mod config_file_tests {
    use super::*;

    #[test]
    fn test_load_full_config_file() {
        let file = write_config(
            r#"
provider = "bing"
source_language = "en"
target_language = "pt"
proxy_host = "proxy.internal"
proxy_port = 3128
use_cookie = false
bing_client_id = "file-id"
bing_client_secret = "file-secret"
timeout_secs = 12
"#,
        );

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.provider, ProviderKind::Bing);
        assert_eq!(config.source_language.as_deref(), Some("en"));
        assert_eq!(config.target_language, "pt");
        assert_eq!(config.proxy(), Some(("proxy.internal", 3128)));
        assert_eq!(config.bing_credentials(), Some(("file-id", "file-secret")));
        assert_eq!(config.timeout_secs, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let file = write_config("target_language = \"it\"\n");

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.provider, ProviderKind::Google);
        assert_eq!(config.target_language, "it");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_unknown_key_in_config_file() {
        let file = write_config("translationService = \"google\"\n");

        let result = Config::load_from(file.path());
        assert!(matches!(result, Err(TranslateError::TomlParse(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(TranslateError::Io(_))));
    }
}

// ============================================================================
// Adapter Construction Tests
// ============================================================================

mod adapter_construction_tests {
    use super::*;

    #[test]
    fn test_adapter_from_config_file() {
        let file = write_config(
            r#"
provider = "bing"
target_language = "fr"
bing_client_id = "id"
bing_client_secret = "secret"
"#,
        );

        let config = Config::load_from(file.path()).unwrap();
        let adapter = TranslationAdapter::new(config).unwrap();
        assert_eq!(adapter.provider(), ProviderKind::Bing);
        assert_eq!(adapter.base_url(), BING_URL);
        assert_eq!(adapter.status(), TranslationStatus::Idle);
    }

    #[test]
    fn test_bing_without_credentials_is_rejected() {
        let result = TranslationAdapter::configure([("provider", "bing")]);
        assert!(matches!(result, Err(TranslateError::Config(_))));
    }

    #[test]
    fn test_empty_target_language_is_rejected() {
        let result = TranslationAdapter::configure([("targetLanguage", "")]);
        assert!(matches!(result, Err(TranslateError::Config(_))));
    }

    #[test]
    fn test_half_proxy_option_is_rejected() {
        let result = TranslationAdapter::configure([("proxyHost", "proxy.internal")]);
        assert!(matches!(result, Err(TranslateError::Config(_))));
    }

    #[test]
    fn test_provider_round_trip_clears_secrets() {
        let mut adapter = TranslationAdapter::configure([
            ("provider", "bing"),
            ("bingClientId", "id"),
            ("bingClientSecret", "secret"),
        ])
        .unwrap();

        adapter.set_provider("google").unwrap();
        assert_eq!(adapter.base_url(), GOOGLE_URL);
        assert!(adapter.config().bing_client_secret.is_none());

        assert!(matches!(
            adapter.set_provider("bing"),
            Err(TranslateError::Config(_))
        ));
    }
}

// ============================================================================
// Chunking Contract Tests
// ============================================================================

mod chunking_tests {
    use super::*;

    #[test]
    fn test_split_and_join_normalise_spacing() {
        let segments = split_segments("First.Second. Third");
        assert_eq!(segments, vec!["First", "Second", " Third"]);
        // Rejoining identity translations adds a space after each period
        assert_eq!(join_segments(&segments), "First. Second.  Third");
    }

    #[test]
    fn test_decimal_numbers_are_split() {
        assert_eq!(split_segments("It costs 4.99 today").len(), 2);
    }
}
