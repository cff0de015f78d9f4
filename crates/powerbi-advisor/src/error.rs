use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::accounts::AuthError;
use crate::workflows::estimation::{CalculatorServiceError, RulesError};
use crate::workflows::export::ReportError;
use crate::workflows::pitch_deck::PitchDeckServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Rules(RulesError),
    Report(ReportError),
    Auth(AuthError),
    Estimation(CalculatorServiceError),
    PitchDeck(PitchDeckServiceError),
    Input(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Rules(err) => write!(f, "rules error: {}", err),
            AppError::Report(err) => write!(f, "report error: {}", err),
            AppError::Auth(err) => write!(f, "authentication error: {}", err),
            AppError::Estimation(err) => write!(f, "estimation error: {}", err),
            AppError::PitchDeck(err) => write!(f, "pitch deck error: {}", err),
            AppError::Input(message) => write!(f, "invalid input: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Rules(err) => Some(err),
            AppError::Report(err) => Some(err),
            AppError::Auth(err) => Some(err),
            AppError::Estimation(err) => Some(err),
            AppError::PitchDeck(err) => Some(err),
            AppError::Input(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Input(_) => StatusCode::BAD_REQUEST,
            AppError::PitchDeck(PitchDeckServiceError::Validation(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Auth(AuthError::NotSignedIn | AuthError::InvalidSession)
            | AppError::Estimation(CalculatorServiceError::NotSignedIn)
            | AppError::PitchDeck(PitchDeckServiceError::NotSignedIn) => StatusCode::UNAUTHORIZED,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Rules(_)
            | AppError::Report(_)
            | AppError::Auth(_)
            | AppError::Estimation(_)
            | AppError::PitchDeck(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<RulesError> for AppError {
    fn from(value: RulesError) -> Self {
        Self::Rules(value)
    }
}

impl From<ReportError> for AppError {
    fn from(value: ReportError) -> Self {
        Self::Report(value)
    }
}

impl From<AuthError> for AppError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<CalculatorServiceError> for AppError {
    fn from(value: CalculatorServiceError) -> Self {
        Self::Estimation(value)
    }
}

impl From<PitchDeckServiceError> for AppError {
    fn from(value: PitchDeckServiceError) -> Self {
        Self::PitchDeck(value)
    }
}
