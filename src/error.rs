use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl TranslateError {
    /// Network error carrying `context`, the error itself and every underlying cause.
    pub(crate) fn transport(context: &str, err: &(dyn std::error::Error + 'static)) -> Self {
        let mut message = format!("{}: {}", context, err);
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        TranslateError::Network(message)
    }
}

pub type Result<T> = std::result::Result<T, TranslateError>;
