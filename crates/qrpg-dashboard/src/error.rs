//! Error types for the dashboard API.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use qrpg_core::GeneratorError;

/// API error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NoEligibleBackend(String),

    #[error("{0}")]
    BackendError(String),

    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    messages: Vec<String>,
}

impl ApiError {
    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "credential_error"),
            ApiError::NoEligibleBackend(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "no_eligible_backend")
            }
            ApiError::BackendError(_) => (StatusCode::BAD_GATEWAY, "backend_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    fn respond(self, messages: Vec<String>) -> Response {
        let (status, error_type) = self.status_and_type();
        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            messages,
        });
        (status, body).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.respond(Vec::new())
    }
}

/// A failed generation run with the status messages it produced before failing.
#[derive(Debug)]
pub struct RunFailure {
    pub error: ApiError,
    pub messages: Vec<String>,
}

impl From<ApiError> for RunFailure {
    fn from(error: ApiError) -> Self {
        Self {
            error,
            messages: Vec::new(),
        }
    }
}

impl IntoResponse for RunFailure {
    fn into_response(self) -> Response {
        self.error.respond(self.messages)
    }
}

impl From<GeneratorError> for ApiError {
    fn from(e: GeneratorError) -> Self {
        let message = e.to_string();
        match e {
            GeneratorError::InvalidLength { .. } | GeneratorError::MissingCredential => {
                ApiError::BadRequest(message)
            }
            GeneratorError::Credential(_) => ApiError::Unauthorized(message),
            GeneratorError::NoEligibleBackend(_) => ApiError::NoEligibleBackend(message),
            GeneratorError::Execution(_) => ApiError::BackendError(message),
            _ => ApiError::Internal(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<qrpg_ir::IrError> for ApiError {
    fn from(e: qrpg_ir::IrError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<qrpg_qasm3::EmitError> for ApiError {
    fn from(e: qrpg_qasm3::EmitError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use qrpg_hal::HalError;

    fn status_of(e: GeneratorError) -> StatusCode {
        ApiError::from(e).into_response().status()
    }

    #[test]
    fn test_generator_error_status_mapping() {
        assert_eq!(
            status_of(GeneratorError::InvalidLength { length: 5 }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(GeneratorError::MissingCredential),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(GeneratorError::Credential("expired".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(GeneratorError::NoEligibleBackend("none".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(GeneratorError::Execution(HalError::Timeout("j".into()))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(GeneratorError::ShotMismatch {
                expected: 8,
                got: 7
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_run_failure_body_carries_messages() {
        let failure = RunFailure {
            error: GeneratorError::Execution(HalError::Timeout("j".into())).into(),
            messages: vec!["Account loaded".into(), "Job j: Queued".into()],
        };
        let response = failure.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "backend_error");
        assert_eq!(body["messages"][0], "Account loaded");
        assert_eq!(body["messages"][1], "Job j: Queued");
    }

    #[tokio::test]
    async fn test_plain_error_omits_messages() {
        let response = ApiError::BadRequest("nope".into()).into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "nope");
        assert!(body.get("messages").is_none());
    }
}
