//! Prompt construction for each interview turn.
//!
//! Pure string assembly from the session and the turn just accepted; the
//! tone of the system prompt follows the candidate's detected mood.

use crate::analysis::Sentiment;
use crate::session::{Session, Turn};

const DESC_PREFIX_CHARS: usize = 200;
const HISTORY_WINDOW: usize = 3;
const WORD_BUDGET: usize = 40;

/// The system/user prompt pair sent to the gateway for one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Builds both prompts from the session and the newly accepted turn.
///
/// The enumerated context window covers the last up to three answers before
/// the latest one; the latest answer appears verbatim on its own line.
pub fn compose(session: &Session, turn: &Turn) -> PromptPair {
    let tone = if turn.sentiment == Sentiment::Negative {
        "empathetic and encouraging"
    } else {
        "professional and probing"
    };
    let mut system = format!(
        "You are a human-like, thoughtful, and analytical interviewer. Your tone is {tone}. Always probe deeper."
    );
    if turn.vague {
        system.push_str(" The candidate has been vague: probe for specific examples and details.");
    }

    let prior_len = session.history.len().saturating_sub(1);
    let window_start = prior_len.saturating_sub(HISTORY_WINDOW);
    let history_text = session.history[window_start..prior_len]
        .iter()
        .enumerate()
        .map(|(i, t)| format!("Answer {}: {}", i + 1, t.answer))
        .collect::<Vec<_>>()
        .join("\n");

    let desc_prefix: String = session.job_desc.chars().take(DESC_PREFIX_CHARS).collect();

    let user = format!(
        "You are interviewing a candidate for a {role} role.\n\
         Job description: {desc_prefix}\n\
         \n\
         Previous candidate answers:\n\
         {history_text}\n\
         \n\
         Latest answer: \"{latest}\"\n\
         \n\
         Instructions:\n\
         - First, acknowledge their answer with 1 sentence (adjust tone based on mood).\n\
         - If they were vague, ask for a specific example or detail.\n\
         - If they mentioned a challenge, ask how they felt or what they learned.\n\
         - Then ask ONE thoughtful, open-ended follow-up question that shows you were listening.\n\
         - Do NOT repeat previous topics.\n\
         - Keep total response under {WORD_BUDGET} words.\n\
         - Sound like a real person—use natural pauses and transitions.",
        role = session.job_role,
        latest = turn.answer,
    );

    PromptPair { system, user }
}
