use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::auth::{AuthError, AuthProvider};
use super::domain::{SessionToken, SignUpProfile, UserIdentity};
use super::store::StoreError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignUpRequest {
    email: String,
    password: String,
    #[serde(flatten)]
    profile: SignUpProfile,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CredentialsRequest {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResetPasswordRequest {
    email: String,
}

/// Identity plus the bearer token the client sends on later requests.
#[derive(Debug, Serialize)]
pub(crate) struct SessionResponse {
    token: SessionToken,
    #[serde(flatten)]
    user: UserIdentity,
}

/// Sign-up, sign-in, sign-out, password reset, and current-user endpoints.
pub fn auth_router(auth: Arc<dyn AuthProvider>) -> Router {
    Router::new()
        .route("/api/v1/auth/sign-up", post(sign_up_handler))
        .route("/api/v1/auth/sign-in", post(sign_in_handler))
        .route("/api/v1/auth/sign-out", post(sign_out_handler))
        .route("/api/v1/auth/reset-password", post(reset_password_handler))
        .route("/api/v1/auth/me", get(me_handler))
        .with_state(auth)
}

pub(crate) async fn sign_up_handler(
    State(auth): State<Arc<dyn AuthProvider>>,
    axum::Json(request): axum::Json<SignUpRequest>,
) -> Response {
    let session = auth
        .sign_up(&request.email, &request.password, request.profile)
        .and_then(|user| open_session(auth.as_ref(), user));
    match session {
        Ok(session) => (StatusCode::CREATED, axum::Json(session)).into_response(),
        Err(error) => auth_error_response(&error),
    }
}

pub(crate) async fn sign_in_handler(
    State(auth): State<Arc<dyn AuthProvider>>,
    axum::Json(request): axum::Json<CredentialsRequest>,
) -> Response {
    let session = auth
        .sign_in(&request.email, &request.password)
        .and_then(|user| open_session(auth.as_ref(), user));
    match session {
        Ok(session) => (StatusCode::OK, axum::Json(session)).into_response(),
        Err(error) => auth_error_response(&error),
    }
}

pub(crate) async fn sign_out_handler(
    State(auth): State<Arc<dyn AuthProvider>>,
    headers: HeaderMap,
) -> Response {
    let closed = bearer_token(&headers)
        .and_then(|token| token.ok_or(AuthError::NotSignedIn))
        .and_then(|token| auth.close_session(&token));
    match closed {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => auth_error_response(&error),
    }
}

pub(crate) async fn reset_password_handler(
    State(auth): State<Arc<dyn AuthProvider>>,
    axum::Json(request): axum::Json<ResetPasswordRequest>,
) -> Response {
    match auth.reset_password(&request.email) {
        Ok(()) => {
            let payload = json!({
                "status": "reset email sent",
            });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(error) => auth_error_response(&error),
    }
}

pub(crate) async fn me_handler(
    State(auth): State<Arc<dyn AuthProvider>>,
    headers: HeaderMap,
) -> Response {
    match session_user(auth.as_ref(), &headers) {
        Ok(Some(identity)) => (StatusCode::OK, axum::Json(identity)).into_response(),
        Ok(None) => auth_error_response(&AuthError::NotSignedIn),
        Err(error) => auth_error_response(&error),
    }
}

fn open_session(auth: &dyn AuthProvider, user: UserIdentity) -> Result<SessionResponse, AuthError> {
    let token = auth.open_session(&user)?;
    Ok(SessionResponse { token, user })
}

/// `Authorization: Bearer <token>`; `None` when the header is absent.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<Option<SessionToken>, AuthError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let token = value
        .to_str()
        .ok()
        .and_then(|raw| raw.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidSession)?;
    Ok(Some(SessionToken(token.to_string())))
}

/// Caller of this request: anonymous without a bearer token, an error when
/// the token does not name an open session.
pub(crate) fn session_user(
    auth: &dyn AuthProvider,
    headers: &HeaderMap,
) -> Result<Option<UserIdentity>, AuthError> {
    match bearer_token(headers)? {
        Some(token) => auth.session_user(&token).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn auth_error_response(error: &AuthError) -> Response {
    let status = match error {
        AuthError::EmailInUse(_) => StatusCode::CONFLICT,
        AuthError::InvalidEmail(_) | AuthError::WeakPassword => StatusCode::UNPROCESSABLE_ENTITY,
        AuthError::InvalidCredentials | AuthError::NotSignedIn | AuthError::InvalidSession => {
            StatusCode::UNAUTHORIZED
        }
        AuthError::UnknownAccount(_) => StatusCode::NOT_FOUND,
        AuthError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    error_response(status, error)
}

pub(crate) fn store_error_response(error: &StoreError) -> Response {
    let status = match error {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Forbidden(_) => StatusCode::FORBIDDEN,
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    error_response(status, error)
}

pub(crate) fn error_response(status: StatusCode, error: &dyn std::fmt::Display) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
