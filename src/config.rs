use reqwest::Url;
use std::env;
use thiserror::Error;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.aurelio.ai";
/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "AURELIO_API_KEY";
/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "AURELIO_BASE_URL";

/// Errors encountered while assembling a client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No credential was supplied and the environment does not provide one.
    #[error("API key must be provided explicitly or through the AURELIO_API_KEY environment variable")]
    MissingApiKey,
    /// The credential contains characters that cannot appear in an HTTP header.
    #[error("API key cannot be used as an Authorization header")]
    InvalidApiKey,
    /// Base URL failed to parse.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
    /// The underlying HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Connection settings shared by every request a client issues.
#[derive(Clone)]
pub struct ClientConfig {
    /// Bearer credential attached to every request.
    pub api_key: String,
    /// API root, e.g. `https://api.aurelio.ai`.
    pub base_url: String,
    /// Install a debug-level tracing subscriber when the client is built.
    pub debug: bool,
}

impl ClientConfig {
    /// Configuration with an explicit credential and the default base URL.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            debug: false,
        }
    }

    /// Override the API base URL. An empty value keeps the default.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Toggle debug logging.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Load configuration from the environment, reading a `.env` file first when present.
    ///
    /// This is the only place the crate reads the environment; clients built from the
    /// returned value never consult it again.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let api_key = load_env_optional(API_KEY_ENV).ok_or(ConfigError::MissingApiKey)?;
        let mut config = Self::new(api_key);
        if let Some(base_url) = load_env_optional(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        tracing::debug!(base_url = %config.base_url, "Loaded configuration from environment");
        Ok(config)
    }

    /// Validate the credential and normalize the base URL.
    pub(crate) fn validated(&self) -> Result<(String, String), ConfigError> {
        let api_key = self.api_key.trim();
        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        let base_url = if self.base_url.trim().is_empty() {
            DEFAULT_BASE_URL
        } else {
            self.base_url.trim()
        };
        let base_url = normalize_base_url(base_url).map_err(ConfigError::InvalidBaseUrl)?;
        Ok((api_key.to_string(), base_url))
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("debug", &self.debug)
            .finish()
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let parsed = Url::parse(url).map_err(|err| err.to_string())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", parsed.scheme()));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
