use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::ErrorCode;

/// Uniform error envelope returned for every non-2xx response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    pub code: u32,
    pub explanation: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<ErrorCause>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorCause {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorEnvelope {
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code: code.code(),
            explanation: code.explanation().to_string(),
            causes: Vec::new(),
        }
    }

    pub fn with_causes(code: ErrorCode, causes: Vec<ErrorCause>) -> Self {
        Self {
            causes,
            ..Self::from_code(code)
        }
    }
}

impl ErrorCause {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    pub fn for_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

/// Serialize `body` as the JSON response body. A serialization failure is
/// logged at warn level and the status goes out with an empty body; there is
/// no retry.
pub fn respond<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            bytes,
        )
            .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "unable to write response body");
            status.into_response()
        }
    }
}

pub fn request_parse_failure(err: &dyn std::fmt::Display) -> Response {
    tracing::warn!(error = %err, "failed to read request entity");
    respond(
        StatusCode::BAD_REQUEST,
        &ErrorEnvelope::from_code(ErrorCode::RequestParse),
    )
}

pub fn database_error() -> Response {
    respond(
        StatusCode::INTERNAL_SERVER_ERROR,
        &ErrorEnvelope::from_code(ErrorCode::Database),
    )
}

pub fn incomplete_input(causes: Vec<ErrorCause>) -> Response {
    respond(
        StatusCode::BAD_REQUEST,
        &ErrorEnvelope::with_causes(ErrorCode::IncompleteInput, causes),
    )
}

pub fn unknown_error(err: &dyn std::fmt::Display) -> Response {
    tracing::error!(error = %err, "error occured with unknown reason");
    respond(
        StatusCode::INTERNAL_SERVER_ERROR,
        &ErrorEnvelope::from_code(ErrorCode::Unknown),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_omits_empty_causes() {
        let envelope = ErrorEnvelope::from_code(ErrorCode::Database);
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["code"], 1_099_003);
        assert_eq!(
            value["explanation"],
            "Error occured during read/write database"
        );
        assert!(value.get("causes").is_none());
    }

    #[test]
    fn cause_omits_missing_field() {
        let envelope = ErrorEnvelope::with_causes(
            ErrorCode::IncompleteInput,
            vec![
                ErrorCause::for_field("must not be blank", "email"),
                ErrorCause::new("payload truncated"),
            ],
        );
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["causes"][0]["field"], "email");
        assert!(value["causes"][1].get("field").is_none());
    }

    #[tokio::test]
    async fn respond_writes_json_with_status() {
        let response = database_error();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["code"], 1_099_003);
    }
}
