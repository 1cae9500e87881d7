//! # sugarlady-memory
//!
//! Volatile, process-lifetime conversation memory for Sugarlady.

mod store;

pub use store::{ConversationStore, MAX_TURNS};
