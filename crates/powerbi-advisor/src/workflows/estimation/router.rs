use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;

use super::domain::QuestionnaireAnswers;
use super::service::{CalculationPayload, CalculatorService, CalculatorServiceError};
use crate::workflows::accounts::router::{
    auth_error_response, error_response, session_user, store_error_response,
};
use crate::workflows::accounts::{ActivityPublisher, AuthError, AuthProvider, RecordId, RecordStore};
use crate::workflows::export::{ExportFormat, ExportedDocument, ReportMetadata};

/// Handler state: the calculator plus the provider that resolves bearer sessions.
pub struct EstimationState<S, P> {
    pub service: Arc<CalculatorService<S, P>>,
    pub auth: Arc<dyn AuthProvider>,
}

impl<S, P> Clone for EstimationState<S, P> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            auth: Arc::clone(&self.auth),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExportRequest {
    #[serde(default)]
    format: ExportFormat,
    #[serde(default)]
    answers: QuestionnaireAnswers,
}

/// Router exposing pricing, export, rules, and saved calculations.
pub fn estimation_router<S, P>(
    service: Arc<CalculatorService<S, P>>,
    auth: Arc<dyn AuthProvider>,
) -> Router
where
    S: RecordStore<CalculationPayload> + 'static,
    P: ActivityPublisher + 'static,
{
    Router::new()
        .route("/api/v1/estimates", post(estimate_handler::<S, P>))
        .route("/api/v1/estimates/export", post(export_handler::<S, P>))
        .route("/api/v1/rules", get(rules_handler::<S, P>))
        .route(
            "/api/v1/calculations",
            get(history_handler::<S, P>).post(save_handler::<S, P>),
        )
        .route(
            "/api/v1/calculations/:calculation_id",
            put(update_handler::<S, P>).delete(delete_handler::<S, P>),
        )
        .with_state(EstimationState { service, auth })
}

pub(crate) async fn estimate_handler<S, P>(
    State(state): State<EstimationState<S, P>>,
    axum::Json(answers): axum::Json<QuestionnaireAnswers>,
) -> Response
where
    S: RecordStore<CalculationPayload> + 'static,
    P: ActivityPublisher + 'static,
{
    let estimate = state.service.estimate(&answers);
    (StatusCode::OK, axum::Json(estimate)).into_response()
}

pub(crate) async fn export_handler<S, P>(
    State(state): State<EstimationState<S, P>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<ExportRequest>,
) -> Response
where
    S: RecordStore<CalculationPayload> + 'static,
    P: ActivityPublisher + 'static,
{
    let user = match session_user(state.auth.as_ref(), &headers) {
        Ok(user) => user,
        Err(error) => return auth_error_response(&error),
    };
    match state.service.export(
        user.as_ref(),
        &request.answers,
        request.format,
        &ReportMetadata::now(),
    ) {
        Ok(document) => download_response(document),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn rules_handler<S, P>(State(state): State<EstimationState<S, P>>) -> Response
where
    S: RecordStore<CalculationPayload> + 'static,
    P: ActivityPublisher + 'static,
{
    (StatusCode::OK, axum::Json(state.service.rules())).into_response()
}

pub(crate) async fn history_handler<S, P>(
    State(state): State<EstimationState<S, P>>,
    headers: HeaderMap,
) -> Response
where
    S: RecordStore<CalculationPayload> + 'static,
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
    State(state): State<EstimationState<S, P>>,
    headers: HeaderMap,
    axum::Json(answers): axum::Json<QuestionnaireAnswers>,
) -> Response
where
    S: RecordStore<CalculationPayload> + 'static,
    P: ActivityPublisher + 'static,
{
    let user = match session_user(state.auth.as_ref(), &headers) {
        Ok(user) => user,
        Err(error) => return auth_error_response(&error),
    };
    match state.service.save(user.as_ref(), answers) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn update_handler<S, P>(
    State(state): State<EstimationState<S, P>>,
    headers: HeaderMap,
    Path(calculation_id): Path<String>,
    axum::Json(answers): axum::Json<QuestionnaireAnswers>,
) -> Response
where
    S: RecordStore<CalculationPayload> + 'static,
    P: ActivityPublisher + 'static,
{
    let user = match session_user(state.auth.as_ref(), &headers) {
        Ok(user) => user,
        Err(error) => return auth_error_response(&error),
    };
    let id = RecordId(calculation_id);
    match state.service.update(user.as_ref(), &id, answers) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn delete_handler<S, P>(
    State(state): State<EstimationState<S, P>>,
    headers: HeaderMap,
    Path(calculation_id): Path<String>,
) -> Response
where
    S: RecordStore<CalculationPayload> + 'static,
    P: ActivityPublisher + 'static,
{
    let user = match session_user(state.auth.as_ref(), &headers) {
        Ok(user) => user,
        Err(error) => return auth_error_response(&error),
    };
    let id = RecordId(calculation_id);
    match state.service.delete(user.as_ref(), &id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) fn download_response(document: ExportedDocument) -> Response {
    let disposition = document.content_disposition();
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, document.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.body,
    )
        .into_response()
}

fn service_error_response(error: CalculatorServiceError) -> Response {
    match error {
        CalculatorServiceError::NotSignedIn => auth_error_response(&AuthError::NotSignedIn),
        CalculatorServiceError::Store(error) => store_error_response(&error),
        CalculatorServiceError::Report(error) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &error)
        }
    }
}
