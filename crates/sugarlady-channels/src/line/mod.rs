//! LINE Messaging API channel.
//!
//! Events arrive through the platform webhook; replies go out through the
//! one-shot reply endpoint.
//! Docs: <https://developers.line.biz/en/reference/messaging-api/>

pub mod events;
mod send;
pub mod signature;

use sugarlady_core::config::LineConfig;

const LINE_API_BASE: &str = "https://api.line.me";

/// LINE channel speaking the Messaging API reply endpoint.
pub struct LineChannel {
    client: reqwest::Client,
    access_token: String,
    api_base: String,
}

impl LineChannel {
    /// Create a new LINE channel from config.
    pub fn new(config: &LineConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: config.channel_access_token.clone(),
            api_base: LINE_API_BASE.to_string(),
        }
    }
}
