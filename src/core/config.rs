use std::time::Duration;

pub const DEFAULT_FEED_URL: &str = "https://script.googleusercontent.com/macros/echo?user_content_key=AehSKLiZ86A1GlqcYt-hoJsQb-VCRTpIqxXRh338ge-bTsdbuMKav1qDTS3CMHvkXuMBhYJIPIvWXUNB4mZlvKwlUORrJM1s9wbDpcIVIDozCOVU6NjLLnwU8Ua1JgkRNDFL6zLwrjhlj4SLKfZUDasCuYF85oP72NlIPWSt_fVfas7rD8k92X3juebbaBxmvziPH9OgVuGatg_nusbagQ8grlEQIleID4PlP-FeUN1d2oDrzTLYKJbXAnNCnmwUUHomGlwk1Ikcmv8MYOn_mbkxOLnLlI_E7Q&lib=MdDVvlA06KFKGs1TT4YmGsf-v0S0TKgyJ";

const FEED_URL_KEY: &str = "SCORPIONS_FEED_URL";
const TIMEOUT_KEY: &str = "SCORPIONS_FEED_TIMEOUT_SECS";
const FORMAT_KEY: &str = "SCORPIONS_FEED_FORMAT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SCORPIONS_FEED_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
    #[error("SCORPIONS_FEED_FORMAT must be `text` or `json`, got {0:?}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub feed_url: String,
    /// Request timeout; `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
    pub format: OutputFormat,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            timeout: None,
            format: OutputFormat::Text,
        }
    }
}

impl FeedConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let feed_url = value(FEED_URL_KEY).unwrap_or_else(|| DEFAULT_FEED_URL.to_string());
        let timeout = match value(TIMEOUT_KEY) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => None,
        };
        let format = match value(FORMAT_KEY).map(|raw| raw.to_lowercase()).as_deref() {
            None | Some("text") => OutputFormat::Text,
            Some("json") => OutputFormat::Json,
            Some(other) => return Err(ConfigError::InvalidFormat(other.to_string())),
        };

        Ok(Self {
            feed_url,
            timeout,
            format,
        })
    }

    pub fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}
