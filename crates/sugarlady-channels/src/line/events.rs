//! LINE webhook deserialization types.
//!
//! A webhook delivery carries a batch of events. Only text-message events
//! are acted on; everything else deserializes into a catch-all variant so an
//! unknown event type never fails the whole batch.

use serde::Deserialize;

/// Map key used when an event carries no user identity.
pub const ANONYMOUS_SENDER: &str = "anonymous";

/// Top-level webhook request body.
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub events: Vec<Event>,
}

/// One webhook event, discriminated by its `type` field.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    Message {
        #[serde(rename = "replyToken")]
        reply_token: String,
        source: Option<EventSource>,
        message: MessageContent,
    },
    /// Follow, unfollow, join, postback, and whatever LINE adds next.
    #[serde(other)]
    Other,
}

/// Message payload, discriminated by its `type` field.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    Text { text: String },
    /// Stickers, images, audio, location — not replied to.
    #[serde(other)]
    Other,
}

/// Where an event came from: a 1:1 chat, a group, or a room.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
#[allow(dead_code)]
pub enum EventSource {
    User {
        #[serde(rename = "userId")]
        user_id: Option<String>,
    },
    Group {
        #[serde(rename = "groupId")]
        group_id: String,
        #[serde(rename = "userId")]
        user_id: Option<String>,
    },
    Room {
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(rename = "userId")]
        user_id: Option<String>,
    },
    #[serde(other)]
    Other,
}

impl EventSource {
    /// The sending user's id, falling back to the anonymous sentinel when the
    /// source carries none (e.g. a group event without user consent).
    pub fn sender_id(&self) -> &str {
        let user_id = match self {
            EventSource::User { user_id }
            | EventSource::Group { user_id, .. }
            | EventSource::Room { user_id, .. } => user_id.as_deref(),
            EventSource::Other => None,
        };
        user_id.filter(|id| !id.is_empty()).unwrap_or(ANONYMOUS_SENDER)
    }
}

/// Total identity extraction: events may omit the source entirely.
pub fn sender_id(source: Option<&EventSource>) -> String {
    source
        .map(EventSource::sender_id)
        .unwrap_or(ANONYMOUS_SENDER)
        .to_string()
}
