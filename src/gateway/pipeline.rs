//! Reply worker: one spawned task per inbound text message.
//!
//! Runs after the webhook has already been acknowledged, so nothing here can
//! affect the HTTP response. The only shared state it touches is the
//! conversation store.

use super::AppState;
use sugarlady_core::message::Role;
use sugarlady_core::prompt::build_prompt;
use sugarlady_core::traits::{Channel, Provider};
use tracing::{error, info};

/// Longest reply forwarded to the user, in characters.
pub const MAX_REPLY_CHARS: usize = 1000;
/// Appended when a reply is cut at `MAX_REPLY_CHARS`.
pub const TRUNCATION_MARKER: &str = "…";
/// Stored in place of an empty user message.
pub const EMPTY_INPUT_PLACEHOLDER: &str = "(empty)";
/// Sent when the backend answers with no text at all.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "(No response)";

/// Handle one text-message event end to end: record the user turn, generate
/// a reply, record the assistant turn, deliver.
pub async fn reply_to_message(
    state: AppState,
    user_id: String,
    text: String,
    reply_token: String,
) {
    let user_text = normalize_input(&text);
    state.store.append(&user_id, Role::User, user_text.clone());

    let history = state.store.snapshot(&user_id);
    let prompt = build_prompt(&state.persona, &history, &user_text);

    let reply = match state.provider.generate(&prompt).await {
        Ok(text) => normalize_reply(&text),
        Err(e) => {
            error!("generation failed for {user_id}: {e}");
            format!("Gemini error: {e}")
        }
    };

    state.store.append(&user_id, Role::Assistant, reply.clone());

    if let Err(e) = state.channel.reply(&reply_token, &reply).await {
        // The token is one-shot and near expiry by now; there is no retry.
        error!("reply delivery failed for {user_id}: {e}");
        return;
    }
    info!(
        "replied to {user_id} via {} ({} chars)",
        state.channel.name(),
        reply.chars().count()
    );
}

/// Trim inbound text, substituting a placeholder for empty input.
fn normalize_input(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        EMPTY_INPUT_PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Trim a generated reply, substitute a placeholder for empty output, and
/// clamp to the character budget.
fn normalize_reply(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return EMPTY_REPLY_PLACEHOLDER.to_string();
    }
    if trimmed.chars().count() > MAX_REPLY_CHARS {
        let mut clamped: String = trimmed.chars().take(MAX_REPLY_CHARS).collect();
        clamped.push_str(TRUNCATION_MARKER);
        clamped
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::test_support::{MockProvider, RecordingChannel};
    use std::sync::Arc;
    use sugarlady_core::prompt::Persona;
    use sugarlady_memory::ConversationStore;
    use tokio::sync::mpsc;

    fn worker_state(
        provider: MockProvider,
    ) -> (
        AppState,
        ConversationStore,
        Arc<MockProvider>,
        Arc<RecordingChannel>,
    ) {
        let (done_tx, _done_rx) = mpsc::unbounded_channel();
        let provider = Arc::new(provider);
        let channel = Arc::new(RecordingChannel::new(done_tx));
        let store = ConversationStore::new();
        let state = AppState::new(
            provider.clone(),
            channel.clone(),
            store.clone(),
            Persona::default(),
            "secret".to_string(),
        );
        (state, store, provider, channel)
    }

    #[test]
    fn test_normalize_input_trims() {
        assert_eq!(normalize_input("  hello  "), "hello");
    }

    #[test]
    fn test_normalize_input_empty_placeholder() {
        assert_eq!(normalize_input(""), EMPTY_INPUT_PLACEHOLDER);
        assert_eq!(normalize_input("   \n"), EMPTY_INPUT_PLACEHOLDER);
    }

    #[test]
    fn test_normalize_reply_passthrough_at_budget() {
        let reply = "a".repeat(MAX_REPLY_CHARS);
        assert_eq!(normalize_reply(&reply), reply);
    }

    #[test]
    fn test_normalize_reply_clamps_over_budget() {
        let reply = "a".repeat(MAX_REPLY_CHARS + 50);
        let clamped = normalize_reply(&reply);
        assert_eq!(clamped.chars().count(), MAX_REPLY_CHARS + 1);
        assert!(clamped.ends_with(TRUNCATION_MARKER));
        assert!(clamped.starts_with(&"a".repeat(MAX_REPLY_CHARS)));
    }

    #[test]
    fn test_normalize_reply_counts_characters_not_bytes() {
        // Each CJK character is 3 bytes in UTF-8 but counts once.
        let reply = "電".repeat(MAX_REPLY_CHARS);
        assert_eq!(normalize_reply(&reply), reply);

        let over = "電".repeat(MAX_REPLY_CHARS + 1);
        let clamped = normalize_reply(&over);
        assert_eq!(clamped.chars().count(), MAX_REPLY_CHARS + 1);
        assert!(clamped.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_normalize_reply_empty_placeholder() {
        assert_eq!(normalize_reply(""), EMPTY_REPLY_PLACEHOLDER);
        assert_eq!(normalize_reply("  \n "), EMPTY_REPLY_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_worker_records_turns_in_order() {
        let (state, store, _provider, channel) = worker_state(MockProvider::replying("很電喔"));
        reply_to_message(state, "u1".into(), "什麼是北資？".into(), "tok".into()).await;

        let turns = store.snapshot("u1");
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].text, "什麼是北資？");
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[1].text, "很電喔");

        let sent = channel.sent.lock().unwrap();
        assert_eq!(sent.as_slice(), &[("tok".to_string(), "很電喔".to_string())]);
    }

    #[tokio::test]
    async fn test_worker_prompt_sees_own_user_turn() {
        let (state, _store, provider, _channel) = worker_state(MockProvider::replying("ok"));
        reply_to_message(state, "u1".into(), "hello".into(), "tok".into()).await;

        // The snapshot is taken after the user turn is appended, so the new
        // message shows up in the rendered history as well.
        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("User: hello"));
        assert!(prompts[0].contains("【User】 hello"));
    }

    #[tokio::test]
    async fn test_worker_prompt_carries_history() {
        let (state, store, provider, _channel) = worker_state(MockProvider::replying("second answer"));
        store.append("u1", Role::User, "first question");
        store.append("u1", Role::Assistant, "first answer");

        reply_to_message(state, "u1".into(), "second question".into(), "tok".into()).await;

        let prompts = provider.prompts.lock().unwrap();
        assert!(prompts[0]
            .contains("User: first question\nAssistant: first answer\nUser: second question"));

        let turns = store.snapshot("u1");
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[3].text, "second answer");
    }

    #[tokio::test]
    async fn test_worker_empty_input_placeholder_recorded() {
        let (state, store, _provider, _channel) = worker_state(MockProvider::replying("ok"));
        reply_to_message(state, "u1".into(), "   ".into(), "tok".into()).await;

        let turns = store.snapshot("u1");
        assert_eq!(turns[0].text, EMPTY_INPUT_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_worker_empty_reply_placeholder() {
        let (state, store, _provider, channel) = worker_state(MockProvider::replying("  "));
        reply_to_message(state, "u1".into(), "hi".into(), "tok".into()).await;

        assert_eq!(store.snapshot("u1")[1].text, EMPTY_REPLY_PLACEHOLDER);
        assert_eq!(channel.sent.lock().unwrap()[0].1, EMPTY_REPLY_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_worker_generation_failure_fallback() {
        let (state, store, _provider, channel) = worker_state(MockProvider::failing());
        reply_to_message(state, "u1".into(), "hi".into(), "tok".into()).await;

        let turns = store.snapshot("u1");
        assert_eq!(turns.len(), 2);
        assert!(turns[1].text.starts_with("Gemini error:"));
        assert!(turns[1].text.contains("boom"));
        assert_eq!(channel.sent.lock().unwrap()[0].1, turns[1].text);
    }

    #[tokio::test]
    async fn test_capacity_rollover_across_exchanges() {
        let (state, store, _provider, _channel) = worker_state(MockProvider::replying("answer"));
        for i in 0..7 {
            reply_to_message(
                state.clone(),
                "u1".into(),
                format!("question {i}"),
                format!("tok-{i}"),
            )
            .await;
        }

        // Seven exchanges, capacity six turns: only the last three survive.
        let turns = store.snapshot("u1");
        assert_eq!(turns.len(), 6);
        assert_eq!(turns[0].text, "question 4");
        assert_eq!(turns[2].text, "question 5");
        assert_eq!(turns[4].text, "question 6");
        assert_eq!(turns[5].text, "answer");
    }
}
