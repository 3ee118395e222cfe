use super::types::{AgentRequest, AgentResponse, ErrorResponse};
use crate::llm::{BindingReport, ModelHandle};
use axum::{extract::State, http::StatusCode, response::Json};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn ModelHandle>,
    pub report: Arc<BindingReport>,
}

pub async fn agent(
    State(state): State<AppState>,
    Json(request): Json<AgentRequest>,
) -> Result<Json<AgentResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!(message_len = request.message.len(), "Received agent request");

    match state.model.generate(&request.message).await {
        Ok(reply) => {
            info!(reply_len = reply.len(), "Generation succeeded");
            Ok(Json(AgentResponse { reply }))
        }
        Err(e) => {
            error!("Generation failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    detail: e.to_string(),
                }),
            ))
        }
    }
}

/// Introspection of the startup binding. Reads a pre-built snapshot, so it
/// cannot fail and has no side effects.
pub async fn debug(State(state): State<AppState>) -> Json<BindingReport> {
    Json(state.report.as_ref().clone())
}
