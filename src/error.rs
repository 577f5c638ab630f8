//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Options failed validation before any SQL was built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{0} and {1} are mutually exclusive")]
    Conflict(&'static str, &'static str),
    #[error("exactly one of {0} must be set")]
    ExactlyOneOf(&'static str),
    #[error("at least one of {0} must be set")]
    AtLeastOneOf(&'static str),
    #[error("invalid data type: {0}")]
    InvalidDataType(String),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("validate options: {0}")]
    Validation(#[from] OptionsError),
    #[error("db exec: {0}")]
    Exec(#[source] sqlx::Error),
    #[error("do query: {0}")]
    Query(#[source] sqlx::Error),
    #[error("rows scan: {0}")]
    Scan(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid resource id: {0}")]
    InvalidId(String),
    #[error("resource: {0}")]
    Resource(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ProviderError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ProviderError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            ProviderError::Exec(_) | ProviderError::Query(_) => {
                (StatusCode::BAD_GATEWAY, "database_error")
            }
            ProviderError::Scan(_) => (StatusCode::INTERNAL_SERVER_ERROR, "scan_error"),
            ProviderError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ProviderError::InvalidId(_) => (StatusCode::BAD_REQUEST, "invalid_id"),
            ProviderError::Resource(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ProviderError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
