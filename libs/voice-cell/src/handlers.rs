// libs/voice-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, warn};

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::WebhookPayload;
use crate::services::tools;

/// Voice-platform webhook. One delivery batches several tool invocations;
/// every invocation gets its own result entry, in input order, tagged
/// with the caller-supplied id. A failure in one invocation never aborts
/// its siblings.
#[axum::debug_handler]
pub async fn vapi_tool_calls(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    // Shared-secret gate; an unset secret disables the check.
    let secret = &state.config.vapi_webhook_secret;
    if !secret.is_empty() {
        let signature = headers
            .get("x-vapi-signature")
            .and_then(|v| v.to_str().ok());
        if signature != Some(secret.as_str()) {
            warn!("Webhook delivery with missing or invalid signature");
            return Err(AppError::Auth("Invalid signature".to_string()));
        }
    }

    let payload: WebhookPayload = serde_json::from_value(body).unwrap_or_default();

    let message = match payload.message {
        Some(m) if m.kind == "tool-calls" => m,
        // Ignore non tool events
        _ => return Ok(Json(json!({ "results": [] }))),
    };

    let mut results: Vec<Value> = Vec::with_capacity(message.tool_call_list.len());

    for tc in &message.tool_call_list {
        let tool_call_id = tc.id.clone().unwrap_or_default();
        let name = tc.name.trim();

        debug!("Processing tool call {} ({})", tool_call_id, name);

        let result = match tools::dispatch(&state, name, &tc.arguments).await {
            Ok(payload) => payload,
            Err(err) => err.to_result(),
        };

        results.push(json!({
            "toolCallId": tool_call_id,
            "result": result,
        }));
    }

    Ok(Json(json!({ "results": results })))
}

#[axum::debug_handler]
pub async fn healthcheck() -> Json<Value> {
    Json(json!({ "ok": "vapi" }))
}
