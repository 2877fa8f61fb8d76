use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Value, json};

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse},
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    // An unreadable body is answered like a missing message.
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(%rejection, "chat body rejected");
            ChatRequest::default()
        }
    };

    let response = state.orchestrator.respond(&request).await?;
    Ok(Json(response))
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// Nothing is kept per session, so there is nothing to clear.
pub async fn clear_handler() -> Json<Value> {
    Json(json!({ "status": "cleared" }))
}
