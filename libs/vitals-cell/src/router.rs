// libs/vitals-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn vitals_routes(state: Arc<AppState>) -> Router {
    let protected_routes = Router::new()
        .route("/", post(handlers::create_vital))
        .route("/", get(handlers::list_vitals))
        .route("/summary", get(handlers::get_summary))
        .route("/trends", get(handlers::get_trends))
        .route("/recent", get(handlers::get_recent))
        .route("/{vital_id}", patch(handlers::update_vital))
        .route("/{vital_id}", delete(handlers::delete_vital))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
