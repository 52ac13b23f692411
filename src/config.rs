use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "config.json5";

/// Base URL used when the configuration does not name one
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:3000/api";

/// Quiescence window for search typing, in milliseconds
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// Lifetime of an alert before it disappears on its own, in seconds
pub const DEFAULT_ALERT_TTL_SECS: u64 = 5;

/// Per-request timeout applied by the HTTP client, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Queries must be strictly longer than this to trigger a search while typing
pub const DEFAULT_MIN_SEARCH_LEN: usize = 2;

/// Client configuration
///
/// Every field has a default, so an empty `{}` file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the library API, including the `/api` prefix
    pub api_base: String,
    /// Quiescence window applied to search typing
    pub search_debounce_ms: u64,
    /// How long alerts stay visible unless dismissed
    pub alert_ttl_secs: u64,
    /// Timeout applied to every HTTP request
    pub request_timeout_secs: u64,
    /// Length a typed query must exceed before it is searched
    pub min_search_len: usize,
    /// User selected at start-up for loans, returns and recommendations
    pub default_user: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            alert_ttl_secs: DEFAULT_ALERT_TTL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            min_search_len: DEFAULT_MIN_SEARCH_LEN,
            default_user: None,
        }
    }
}

impl Config {
    /// Load the client configuration.
    ///
    /// With an explicit path the file must exist. Without one, `config.json5` in
    /// the working directory is used when present and the defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read, cannot be parsed,
    /// or fails validation
    pub fn load(path: Option<&Path>) -> crate::error::Result<Self> {
        let config = match path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::from_json5_str(&fs::read_to_string(path)?)?
            }
            None if Path::new(CONFIG_FILE).exists() => {
                tracing::debug!("Loading configuration from {CONFIG_FILE}");
                Self::from_json5_str(&fs::read_to_string(CONFIG_FILE)?)?
            }
            None => {
                tracing::info!("No {CONFIG_FILE} found, using default configuration");
                Self::default()
            }
        };

        config.validate()?;
        tracing::info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse a configuration from JSON5 text, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON5 or has fields of the wrong type
    pub fn from_json5_str(text: &str) -> crate::error::Result<Self> {
        Ok(json5::from_str(text)?)
    }

    /// Checks that the configuration can be used to talk to the API
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute http(s) URL or if the
    /// debounce window is zero
    pub fn validate(&self) -> crate::error::Result<()> {
        let url = Url::parse(&self.api_base)?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(crate::error::BookdeskError::from(format!(
                "Invalid API base URL: {}",
                self.api_base
            )));
        }
        if self.search_debounce_ms == 0 {
            return Err(crate::error::BookdeskError::from(
                "Search debounce window must be positive",
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    #[must_use]
    pub fn alert_ttl(&self) -> Duration {
        Duration::from_secs(self.alert_ttl_secs)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
