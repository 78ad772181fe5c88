//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_BASE_URL` - Public URL for the admin panel (default: <http://localhost:3001>).
//!   An `https://` URL turns on secure session cookies.
//! - `BACKEND_API_URL` - REST backend base URL (default: <http://localhost:8000/api/v1>)
//! - `ADMIN_DISPLAY_UTC_OFFSET` - Offset used to display timestamps (default: +09:00)
//! - `ADMIN_CURRENCY_SYMBOL` - Prefix for money amounts (default: ¥)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};

use chrono::{FixedOffset, Offset, Utc};
use rust_decimal::Decimal;
use shopdesk_core::{Timestamp, format_amount};
use thiserror::Error;
use url::Url;

const DEFAULT_BACKEND_API_URL: &str = "http://localhost:8000/api/v1";
const DEFAULT_UTC_OFFSET: &str = "+09:00";
const DEFAULT_CURRENCY_SYMBOL: &str = "¥";

/// Shown in place of an amount that cannot be computed.
pub const AMOUNT_TOO_LARGE: &str = "Amount too large";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin panel
    pub base_url: String,
    /// REST backend base URL, e.g. `http://localhost:8000/api/v1`
    pub backend_url: Url,
    /// How money and timestamps are rendered
    pub display: DisplayConfig,
    /// Emit JSON logs instead of text
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Display settings for money amounts and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    pub utc_offset: FixedOffset,
    pub currency_symbol: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset: parse_utc_offset(DEFAULT_UTC_OFFSET).unwrap_or_else(|| Utc.fix()),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

impl DisplayConfig {
    /// Render an amount with the configured currency symbol.
    #[must_use]
    pub fn money(&self, amount: Decimal) -> String {
        format_amount(amount, &self.currency_symbol)
    }

    /// Render a computed amount, or [`AMOUNT_TOO_LARGE`] when it overflowed.
    #[must_use]
    pub fn checked_money(&self, amount: Option<Decimal>) -> String {
        amount.map_or_else(|| AMOUNT_TOO_LARGE.to_string(), |amount| self.money(amount))
    }

    /// Render a timestamp in the configured offset.
    #[must_use]
    pub fn timestamp(&self, at: &Timestamp) -> String {
        at.format_in(self.utc_offset)
    }

    fn from_env() -> Result<Self, ConfigError> {
        let offset = get_env_or_default("ADMIN_DISPLAY_UTC_OFFSET", DEFAULT_UTC_OFFSET);
        let utc_offset = parse_utc_offset(&offset).ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "ADMIN_DISPLAY_UTC_OFFSET".to_string(),
                format!("expected an offset like +09:00, got {offset:?}"),
            )
        })?;

        Ok(Self {
            utc_offset,
            currency_symbol: get_env_or_default("ADMIN_CURRENCY_SYMBOL", DEFAULT_CURRENCY_SYMBOL),
        })
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("ADMIN_BASE_URL", "http://localhost:3001");
        let backend_url = parse_backend_url(&get_env_or_default(
            "BACKEND_API_URL",
            DEFAULT_BACKEND_API_URL,
        ))?;
        let display = DisplayConfig::from_env()?;
        let json_logs = get_optional_env("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json"));
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            base_url,
            backend_url,
            display,
            json_logs,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Configuration for a given backend with every other value defaulted.
    ///
    /// Used by tests and tooling that build the router directly.
    #[must_use]
    pub fn for_backend(backend_url: Url) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            backend_url,
            display: DisplayConfig::default(),
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the admin is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_backend_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar("BACKEND_API_URL".to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            "BACKEND_API_URL".to_string(),
            "must be an http(s) URL".to_string(),
        ));
    }
    Ok(url)
}

/// Parse `+HH:MM`, `-HH:MM`, or `Z`.
fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, raw.get(1..)?),
        b'-' => (-1, raw.get(1..)?),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
