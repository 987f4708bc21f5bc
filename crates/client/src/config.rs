//! Client configuration from environment variables.

use std::path::PathBuf;

use thiserror::Error;

use novashop_core::Money;
use novashop_observability::LogFormat;
use novashop_orders::ShippingPolicy;

pub const ENV_API_URL: &str = "NOVASHOP_API_URL";
pub const ENV_DATA_DIR: &str = "NOVASHOP_DATA_DIR";
pub const ENV_AUTH_TOKEN: &str = "NOVASHOP_AUTH_TOKEN";
pub const ENV_FREE_SHIPPING_THRESHOLD: &str = "NOVASHOP_FREE_SHIPPING_THRESHOLD";
pub const ENV_SHIPPING_FLAT_RATE: &str = "NOVASHOP_SHIPPING_FLAT_RATE";
pub const ENV_LOG_FORMAT: &str = "NOVASHOP_LOG_FORMAT";

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidApiUrl { var: &'static str, value: String },
    #[error("{var} must be a non-negative decimal amount, got {value:?}")]
    InvalidAmount { var: &'static str, value: String },
    #[error("{var} must be `json` or `pretty`, got {value:?}")]
    InvalidLogFormat { var: &'static str, value: String },
}

/// Runtime configuration of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the REST API, without trailing slash.
    pub api_url: String,
    /// Where the local database lives; `None` means the OS app data directory.
    pub data_dir: Option<PathBuf>,
    /// Token to use when no session has been persisted yet.
    pub auth_token: Option<String>,
    pub shipping: ShippingPolicy,
    pub log_format: LogFormat,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: None,
            auth_token: None,
            shipping: ShippingPolicy::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl ClientConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup` (unset and blank values use defaults).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = ClientConfig::default();

        if let Some(url) = get(ENV_API_URL) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidApiUrl {
                    var: ENV_API_URL,
                    value: url,
                });
            }
            config.api_url = url.trim_end_matches('/').to_string();
        }

        config.data_dir = get(ENV_DATA_DIR).map(PathBuf::from);
        config.auth_token = get(ENV_AUTH_TOKEN);

        if let Some(value) = get(ENV_FREE_SHIPPING_THRESHOLD) {
            config.shipping.free_threshold = parse_amount(ENV_FREE_SHIPPING_THRESHOLD, value)?;
        }
        if let Some(value) = get(ENV_SHIPPING_FLAT_RATE) {
            config.shipping.flat_rate = parse_amount(ENV_SHIPPING_FLAT_RATE, value)?;
        }

        if let Some(value) = get(ENV_LOG_FORMAT) {
            config.log_format = LogFormat::parse(&value).ok_or(ConfigError::InvalidLogFormat {
                var: ENV_LOG_FORMAT,
                value,
            })?;
        }

        Ok(config)
    }

    /// Install the process-wide tracing subscriber in the configured format.
    pub fn init_logging(&self) {
        novashop_observability::init_with(self.log_format);
    }
}

fn parse_amount(var: &'static str, value: String) -> Result<Money, ConfigError> {
    match value.parse::<Money>() {
        Ok(amount) if !amount.is_negative() => Ok(amount),
        _ => Err(ConfigError::InvalidAmount { var, value }),
    }
}
