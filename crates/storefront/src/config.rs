//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `VITRINA_API_URL` - Base URL of the storefront REST API
//!
//! ## Optional
//! - `VITRINA_API_TIMEOUT_SECS` - Request timeout (default: 15)
//! - `VITRINA_STATE_PATH` - Client state file (default: `.vitrina/state.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Fraction of error events sent (default: 1.0)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: &str = "15";
const DEFAULT_STATE_PATH: &str = ".vitrina/state.json";
const DEFAULT_SAMPLE_RATE: &str = "1.0";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Top-level client configuration.
#[derive(Debug, Clone)]
pub struct VitrinaConfig {
    /// REST API connection.
    pub api: ApiConfig,
    /// Where the CLI keeps the session id and sign-in between runs.
    pub state_path: PathBuf,
    /// Error tracking.
    pub sentry: SentryConfig,
}

/// REST API connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ApiConfig {
    /// Settings for `base_url` with the default timeout and user agent.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(15),
            user_agent: default_user_agent(),
        }
    }
}

/// Sentry settings.
///
/// Implements Debug manually to redact the DSN.
#[derive(Clone, Default)]
pub struct SentryConfig {
    pub dsn: Option<SecretString>,
    pub environment: Option<String>,
    pub sample_rate: f32,
}

impl std::fmt::Debug for SentryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentryConfig")
            .field("dsn", &self.dsn.as_ref().map(|_| "[REDACTED]"))
            .field("environment", &self.environment)
            .field("sample_rate", &self.sample_rate)
            .finish()
    }
}

impl VitrinaConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let base_url = parse_base_url(&env.required("VITRINA_API_URL")?)?;
        let timeout_secs = env
            .or_default("VITRINA_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("VITRINA_API_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "VITRINA_API_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let state_path = PathBuf::from(env.or_default("VITRINA_STATE_PATH", DEFAULT_STATE_PATH));

        Ok(Self {
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
                user_agent: default_user_agent(),
            },
            state_path,
            sentry: SentryConfig::from_env(&env)?,
        })
    }
}

impl SentryConfig {
    fn from_env<F: Fn(&str) -> Option<String>>(env: &Env<F>) -> Result<Self, ConfigError> {
        let sample_rate = env
            .or_default("SENTRY_SAMPLE_RATE", DEFAULT_SAMPLE_RATE)
            .parse::<f32>()
            .ok()
            .filter(|rate| (0.0..=1.0).contains(rate))
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "SENTRY_SAMPLE_RATE".to_string(),
                    "must be a number between 0 and 1".to_string(),
                )
            })?;

        Ok(Self {
            dsn: env.optional("SENTRY_DSN").map(SecretString::from),
            environment: env.optional("SENTRY_ENVIRONMENT"),
            sample_rate,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn default_user_agent() -> String {
    format!("vitrina/{}", env!("CARGO_PKG_VERSION"))
}

/// Parse and check the API base URL.
fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("VITRINA_API_URL".to_string(), reason);

    let url = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("not a base URL".to_string()));
    }
    Ok(url)
}

/// Variable lookup with the usual required/optional/default helpers.
struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get a required variable. Empty counts as missing.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable. Empty counts as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}
