// libs/provider-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn availability_routes(state: Arc<AppState>) -> Router {
    let protected_routes = Router::new()
        .route("/", get(handlers::list_availability))
        .route("/", post(handlers::create_availability))
        .route("/mine", get(handlers::my_availability))
        .route("/{availability_id}", patch(handlers::update_availability))
        .route("/{availability_id}", delete(handlers::delete_availability))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
