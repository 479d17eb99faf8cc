//! Avatar chat moods, system prompts, and conversation assembly.
//!
//! The avatar speaks Spanish and keeps replies short because the browser
//! reads them aloud with speech synthesis.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Longest user message accepted, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Only the most recent turns are forwarded upstream.
pub const MAX_HISTORY_TURNS: usize = 20;

const BASE_PROMPT: &str = "Eres un avatar conversacional que responde en español. \
Tus respuestas se leen en voz alta, así que usa frases cortas, sin listas, \
sin markdown y sin emojis. Nunca más de tres frases.";

/// Emotional register the avatar answers in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Neutral,
    Happy,
    Sad,
    Angry,
    Excited,
    Calm,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Neutral,
        Mood::Happy,
        Mood::Sad,
        Mood::Angry,
        Mood::Excited,
        Mood::Calm,
    ];

    /// Wire name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Neutral => "neutral",
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Angry => "angry",
            Mood::Excited => "excited",
            Mood::Calm => "calm",
        }
    }

    /// Human-readable label for the mood picker.
    pub fn label(self) -> &'static str {
        match self {
            Mood::Neutral => "Neutral",
            Mood::Happy => "Alegre",
            Mood::Sad => "Triste",
            Mood::Angry => "Enfadado",
            Mood::Excited => "Entusiasmado",
            Mood::Calm => "Sereno",
        }
    }

    fn tone(self) -> &'static str {
        match self {
            Mood::Neutral => "Mantén un tono amable y equilibrado.",
            Mood::Happy => "Estás de muy buen humor: responde con alegría y optimismo.",
            Mood::Sad => "Te sientes melancólico: responde con tono apagado y algo nostálgico, sin dejar de ser educado.",
            Mood::Angry => "Estás irritado: responde de forma seca e impaciente, pero sin insultar ni faltar al respeto.",
            Mood::Excited => "Estás entusiasmado: responde con energía y exclamaciones.",
            Mood::Calm => "Estás muy sereno: responde despacio, con calma y palabras tranquilizadoras.",
        }
    }

    /// Full system prompt for this mood.
    pub fn system_prompt(self) -> String {
        format!("{BASE_PROMPT} {}", self.tone())
    }
}

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Validate and trim the user's message.
pub fn validate_message(message: &str) -> Result<&str, CoreError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("message must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_MESSAGE_CHARS {
        return Err(CoreError::Validation(format!(
            "message must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(trimmed)
}

/// Validate client-supplied history. System turns are reserved for the server
/// and each turn is held to the same length limit as a new message.
pub fn validate_history(history: &[ChatTurn]) -> Result<(), CoreError> {
    for (pos, turn) in history.iter().enumerate() {
        if turn.role == ChatRole::System {
            return Err(CoreError::Validation(format!(
                "history[{pos}]: role must be 'user' or 'assistant'"
            )));
        }
        if turn.content.chars().count() > MAX_MESSAGE_CHARS {
            return Err(CoreError::Validation(format!(
                "history[{pos}]: content must be at most {MAX_MESSAGE_CHARS} characters"
            )));
        }
    }
    Ok(())
}

/// The last [`MAX_HISTORY_TURNS`] turns of `history`.
pub fn recent_history(history: &[ChatTurn]) -> &[ChatTurn] {
    let start = history.len().saturating_sub(MAX_HISTORY_TURNS);
    &history[start..]
}

/// Assemble the upstream conversation: mood prompt, recent history, new message.
pub fn build_conversation(mood: Mood, history: &[ChatTurn], message: &str) -> Vec<ChatTurn> {
    let recent = recent_history(history);
    let mut turns = Vec::with_capacity(recent.len() + 2);
    turns.push(ChatTurn::new(ChatRole::System, mood.system_prompt()));
    turns.extend(recent.iter().cloned());
    turns.push(ChatTurn::new(ChatRole::User, message));
    turns
}
