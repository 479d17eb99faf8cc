//! Handlers for the conversational avatar.
//!
//! The browser does speech recognition and synthesis; the server only
//! turns text into a mood-flavoured reply from the language model.

use axum::extract::State;
use axum::Json;
use inmo_core::avatar::{build_conversation, validate_history, validate_message, ChatTurn, Mood};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /avatar/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub mood: Mood,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// Response payload for `POST /avatar/chat`.
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub mood: Mood,
}

/// One entry of `GET /avatar/moods`.
#[derive(Debug, Serialize)]
pub struct MoodInfo {
    pub mood: Mood,
    pub label: &'static str,
}

/// GET /api/v1/avatar/moods
pub async fn list_moods() -> Json<DataResponse<Vec<MoodInfo>>> {
    Json(DataResponse {
        data: Mood::ALL
            .into_iter()
            .map(|mood| MoodInfo {
                mood,
                label: mood.label(),
            })
            .collect(),
    })
}

/// POST /api/v1/avatar/chat
///
/// Public. Answers 502 when the model fails and 503 when no model is
/// configured.
pub async fn chat(
    State(state): State<AppState>,
    Json(input): Json<ChatRequest>,
) -> AppResult<Json<DataResponse<ChatReply>>> {
    let message = validate_message(&input.message)?;
    validate_history(&input.history)?;

    let turns = build_conversation(input.mood, &input.history, message);
    let reply = state.llm.complete(&turns).await?;

    tracing::debug!(
        mood = input.mood.as_str(),
        history_turns = input.history.len(),
        reply_chars = reply.chars().count(),
        "Avatar replied"
    );

    Ok(Json(DataResponse {
        data: ChatReply {
            reply,
            mood: input.mood,
        },
    }))
}
