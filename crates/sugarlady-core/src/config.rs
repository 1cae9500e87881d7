//! Environment-sourced configuration.
//!
//! Credentials and ports come from environment variables only; `from_env`
//! fails fast when a required value is missing so the process never starts
//! half-configured.

use crate::error::SugarladyError;

/// Default listening port.
const DEFAULT_PORT: u16 = 5001;
/// Default bind address.
const DEFAULT_HOST: &str = "0.0.0.0";
/// Default Gemini model.
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Top-level Sugarlady configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub line: LineConfig,
    pub gemini: GeminiConfig,
    pub server: ServerConfig,
}

/// LINE Messaging API credentials.
#[derive(Debug, Clone)]
pub struct LineConfig {
    /// Shared secret used to verify webhook signatures.
    pub channel_secret: String,
    /// Bearer credential for the reply endpoint.
    pub channel_access_token: String,
}

/// Gemini backend settings.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
}

/// Webhook server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, SugarladyError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SugarladyError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                SugarladyError::Config(format!("PORT must be a port number, got '{raw}'"))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            line: LineConfig {
                channel_secret: require(&lookup, "LINE_CHANNEL_SECRET")?,
                channel_access_token: require(&lookup, "LINE_CHANNEL_ACCESS_TOKEN")?,
            },
            gemini: GeminiConfig {
                api_key: require(&lookup, "GOOGLE_API_KEY")?,
                model: lookup("GEMINI_MODEL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            },
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
        })
    }
}

/// Fetch a required variable; empty counts as missing.
fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
) -> Result<String, SugarladyError> {
    lookup(var)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SugarladyError::Config(format!("missing env var {var}")))
}
