// libs/voice-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_database::AppState;

use crate::handlers;

/// The webhook authenticates with a shared secret per delivery, not
/// per-user tokens, so it sits outside the auth middleware.
pub fn vapi_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/tools", post(handlers::vapi_tool_calls))
        .route("/health", get(handlers::healthcheck))
        .with_state(state)
}
