use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::json;

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use facility_cell::router::facility_routes;
use provider_cell::router::availability_routes;
use shared_database::AppState;
use vitals_cell::router::vitals_routes;
use voice_cell::router::vapi_routes;

const APP_NAME: &str = "HealthCare Patient Dashboard API";

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Health Dashboard API is running!" }))
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .route("/ready", get(|| async { Json(json!({ "ready": true })) }))
        .route(
            "/version",
            get(|| async {
                Json(json!({
                    "name": APP_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                }))
            }),
        )
        // Auth & users
        .nest("/auth", auth_routes(state.clone()))
        // Vitals tracking and rollups
        .nest("/vitals", vitals_routes(state.clone()))
        // Appointments platform
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/availability", availability_routes(state.clone()))
        .nest("/facilities", facility_routes(state.clone()))
        // Voice/agent integration
        .nest("/vapi", vapi_routes(state))
}
