use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use storage::error::StorageError;
use storage::services::corrected_time::CorrectionError;
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Validation(ValidationErrors),
    Correction(CorrectionError),
    Unauthorized,
    #[allow(dead_code)]
    NotFound,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::Correction(e) => write!(f, "Correction error: {}", e),
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::NotFound => write!(f, "Resource not found"),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status_code, body) = match &self {
            Self::Storage(StorageError::NotFound) | Self::NotFound => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "Resource not found"
                }),
            ),
            Self::Storage(StorageError::ConstraintViolation(msg)) => (
                StatusCode::CONFLICT,
                json!({
                    "error": msg
                }),
            ),
            Self::Storage(StorageError::Correction(e)) | Self::Correction(e) => {
                (StatusCode::UNPROCESSABLE_ENTITY, correction_body(e))
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "An internal error occurred"
                    }),
                )
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": "Validation failed",
                        "details": field_errors
                    }),
                )
            }
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "error": "Unauthorized"
                }),
            ),
        };

        (status_code, Json(body)).into_response()
    }
}

fn correction_body(error: &CorrectionError) -> serde_json::Value {
    let kind = match error {
        CorrectionError::InvalidInput(_) => "invalid_input",
        CorrectionError::Domain(_) => "domain",
    };

    json!({
        "error": error.to_string(),
        "kind": kind
    })
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

impl From<CorrectionError> for WebError {
    fn from(error: CorrectionError) -> Self {
        Self::Correction(error)
    }
}
