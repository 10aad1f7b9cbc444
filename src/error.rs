use thiserror::Error;

/// Failure of a symbol lookup. The search palette never shows these; they are
/// logged and collapse to an empty result set.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Lookup backend not configured: {0}")]
    NotConfigured(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned status {0}")]
    Status(u16),

    #[error("Lookup timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Malformed response: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Self::Invalid(msg.into())
    }
}
