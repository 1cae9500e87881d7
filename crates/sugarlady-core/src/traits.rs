use crate::error::{GenerationError, SugarladyError};
use async_trait::async_trait;

/// Generation backend trait — the brain.
///
/// Takes a fully assembled prompt and returns the raw reply text. Failures
/// are enumerated so callers can match on the kind instead of catching an
/// unbounded error type.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Generate a reply for the given prompt. An `Ok` value may be empty;
    /// normalization is the caller's concern.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Check if the provider is reachable and ready.
    async fn is_available(&self) -> bool;
}

/// Messaging channel trait — the mouth.
///
/// The chat platform hands each inbound event a one-shot reply token; a reply
/// is tied to that token and cannot be reused after it expires.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Deliver a reply for the event identified by `reply_token`.
    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), SugarladyError>;
}
