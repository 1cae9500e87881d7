//! Prompt assembly.
//!
//! Pure and deterministic: the same persona, history snapshot, and user text
//! always produce the same prompt string. No clock, no randomness.

use crate::message::Turn;

/// Rendered in place of the history block when a user has no past turns.
pub const NO_HISTORY_MARKER: &str = "（無對話記錄）";

/// Fixed closing instruction constraining reply length.
pub const CLOSING_INSTRUCTION: &str = "請在80字內回答問題。";

/// Static persona: style instructions plus club knowledge.
#[derive(Debug, Clone)]
pub struct Persona {
    pub style: String,
    pub knowledge: String,
}

impl Default for Persona {
    /// The bundled 蘇格拉底雞 persona.
    fn default() -> Self {
        Self {
            style: include_str!("../prompts/STYLE.md").trim().to_string(),
            knowledge: include_str!("../prompts/KNOWLEDGE.md").trim().to_string(),
        }
    }
}

/// Assemble the final prompt from persona, history snapshot, and new input.
///
/// Section order is fixed: style guide, knowledge base, recent conversation,
/// the literal user text, closing instruction.
pub fn build_prompt(persona: &Persona, history: &[Turn], user_text: &str) -> String {
    let rendered: Vec<String> = history
        .iter()
        .map(|turn| format!("{}: {}", turn.role.speaker(), turn.text))
        .collect();
    let past = if rendered.is_empty() {
        NO_HISTORY_MARKER.to_string()
    } else {
        rendered.join("\n")
    };

    format!(
        "【Style Guide】\n{}\n\n【Knowledge Base】\n{}\n\n【Recent Conversation】(最多三輪)\n{}\n\n【User】 {}\n{}",
        persona.style, persona.knowledge, past, user_text, CLOSING_INSTRUCTION
    )
}
