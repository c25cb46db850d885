//! Client for the legacy Google Translate and Microsoft Translator HTTP services.
//!
//! ```no_run
//! # async fn demo() -> translate_adapter::Result<()> {
//! use translate_adapter::TranslationAdapter;
//!
//! let mut adapter = TranslationAdapter::configure([
//!     ("provider", "google"),
//!     ("sourceLanguage", "en"),
//!     ("targetLanguage", "fr"),
//! ])?;
//! let french = adapter.translate("Good morning. How are you?").await?;
//! println!("{}", french);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod chunk;
pub mod config;
pub mod error;
pub mod logging;
pub mod translate;

pub use adapter::{TranslationAdapter, TranslationStatus};
pub use config::{Config, Endpoints, ProviderKind};
pub use error::{Result, TranslateError};
pub use logging::init_logging;
