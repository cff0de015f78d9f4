use crate::infra::{AppState, Services};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use powerbi_advisor::workflows::accounts::auth_router;
use powerbi_advisor::workflows::estimation::estimation_router;
use powerbi_advisor::workflows::pitch_deck::pitch_deck_router;
use serde_json::json;

pub(crate) fn with_service_routes(services: &Services) -> axum::Router {
    auth_router(services.auth.clone())
        .merge(estimation_router(
            services.calculator.clone(),
            services.auth.clone(),
        ))
        .merge(pitch_deck_router(
            services.pitch_decks.clone(),
            services.auth.clone(),
        ))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
