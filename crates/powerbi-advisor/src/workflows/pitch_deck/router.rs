use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::PitchResponses;
use super::service::{PitchDeckPayload, PitchDeckService, PitchDeckServiceError};
use crate::workflows::accounts::router::{
    auth_error_response, error_response, session_user, store_error_response,
};
use crate::workflows::accounts::{ActivityPublisher, AuthError, AuthProvider, RecordStore};
use crate::workflows::estimation::router::download_response;
use crate::workflows::export::ReportMetadata;

pub struct PitchDeckState<S, P> {
    pub service: Arc<PitchDeckService<S, P>>,
    pub auth: Arc<dyn AuthProvider>,
}

impl<S, P> Clone for PitchDeckState<S, P> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            auth: Arc::clone(&self.auth),
        }
    }
}

/// Router exposing the questionnaire, deck generation, saved decks, and export.
pub fn pitch_deck_router<S, P>(
    service: Arc<PitchDeckService<S, P>>,
    auth: Arc<dyn AuthProvider>,
) -> Router
where
    S: RecordStore<PitchDeckPayload> + 'static,
    P: ActivityPublisher + 'static,
{
    Router::new()
        .route("/api/v1/pitch-decks/questions", get(questions_handler::<S, P>))
        .route("/api/v1/pitch-decks/generate", post(generate_handler::<S, P>))
        .route("/api/v1/pitch-decks/export", post(export_handler::<S, P>))
        .route(
            "/api/v1/pitch-decks",
            get(history_handler::<S, P>).post(save_handler::<S, P>),
        )
        .with_state(PitchDeckState { service, auth })
}

pub(crate) async fn questions_handler<S, P>(State(state): State<PitchDeckState<S, P>>) -> Response
where
    S: RecordStore<PitchDeckPayload> + 'static,
    P: ActivityPublisher + 'static,
{
    (StatusCode::OK, axum::Json(state.service.questions())).into_response()
}

pub(crate) async fn generate_handler<S, P>(
    State(state): State<PitchDeckState<S, P>>,
    axum::Json(responses): axum::Json<PitchResponses>,
) -> Response
where
    S: RecordStore<PitchDeckPayload> + 'static,
    P: ActivityPublisher + 'static,
{
    match state.service.generate(&responses) {
        Ok(deck) => (StatusCode::OK, axum::Json(deck)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn export_handler<S, P>(
    State(state): State<PitchDeckState<S, P>>,
    headers: HeaderMap,
    axum::Json(responses): axum::Json<PitchResponses>,
) -> Response
where
    S: RecordStore<PitchDeckPayload> + 'static,
    P: ActivityPublisher + 'static,
{
    let user = match session_user(state.auth.as_ref(), &headers) {
        Ok(user) => user,
        Err(error) => return auth_error_response(&error),
    };
    match state
        .service
        .export(user.as_ref(), &responses, &ReportMetadata::now())
    {
        Ok(document) => download_response(document),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn history_handler<S, P>(
    State(state): State<PitchDeckState<S, P>>,
    headers: HeaderMap,
) -> Response
where
    S: RecordStore<PitchDeckPayload> + 'static,
    P: ActivityPublisher + 'static,
{
    let user = match session_user(state.auth.as_ref(), &headers) {
        Ok(user) => user,
        Err(error) => return auth_error_response(&error),
    };
    match state.service.history(user.as_ref()) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn save_handler<S, P>(
    State(state): State<PitchDeckState<S, P>>,
    headers: HeaderMap,
    axum::Json(responses): axum::Json<PitchResponses>,
) -> Response
where
    S: RecordStore<PitchDeckPayload> + 'static,
    P: ActivityPublisher + 'static,
{
    let user = match session_user(state.auth.as_ref(), &headers) {
        Ok(user) => user,
        Err(error) => return auth_error_response(&error),
    };
    match state.service.save(user.as_ref(), responses) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => service_error_response(error),
    }
}

fn service_error_response(error: PitchDeckServiceError) -> Response {
    match error {
        PitchDeckServiceError::NotSignedIn => auth_error_response(&AuthError::NotSignedIn),
        PitchDeckServiceError::Validation(error) => {
            let payload = json!({
                "error": error.to_string(),
                "issues": error.issues,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        PitchDeckServiceError::Store(error) => store_error_response(&error),
        PitchDeckServiceError::Report(error) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &error)
        }
    }
}
