//! API error types with HTTP response mapping.

use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use domain::DomainError;
use serde::Serialize;
use validator::ValidationErrors;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed path, query or body.
    BadRequest(String),
    /// Domain logic error.
    Domain(DomainError),
}

/// JSON error body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub status: u16,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

impl ErrorBody {
    fn new(status: StatusCode, code: &'static str, message: String) -> Self {
        Self {
            code,
            message,
            status: status.as_u16(),
            timestamp: Utc::now(),
            errors: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => {
                tracing::debug!(error = %msg, "bad request");
                let status = StatusCode::BAD_REQUEST;
                (status, ErrorBody::new(status, "BAD_REQUEST", msg))
            }
            ApiError::Domain(err) => domain_error_to_response(err),
        };

        metrics::counter!("catalog_http_errors_total", "code" => body.code).increment(1);
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, ErrorBody) {
    match err {
        DomainError::Validation(errors) => {
            tracing::warn!(%errors, "validation failed");
            let status = StatusCode::BAD_REQUEST;
            let mut body = ErrorBody::new(status, "VALIDATION_ERROR", "Validation failed".into());
            body.errors = Some(field_messages(&errors));
            (status, body)
        }
        DomainError::NotFound { .. } => {
            tracing::warn!(error = %err, "resource not found");
            let status = StatusCode::NOT_FOUND;
            (status, ErrorBody::new(status, "RESOURCE_NOT_FOUND", err.to_string()))
        }
        DomainError::AlreadyExists { .. } => {
            tracing::warn!(error = %err, "resource already exists");
            let status = StatusCode::CONFLICT;
            (
                status,
                ErrorBody::new(status, "RESOURCE_ALREADY_EXISTS", err.to_string()),
            )
        }
        DomainError::Store(_) => {
            tracing::error!(error = %err, "store failure");
            internal_error()
        }
    }
}

fn internal_error() -> (StatusCode, ErrorBody) {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    (
        status,
        ErrorBody::new(
            status,
            "INTERNAL_SERVER_ERROR",
            "An unexpected error occurred".into(),
        ),
    )
}

/// Flattens validation errors to one message per field.
fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let message = errs
                .iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .or_else(|| errs.first().map(|e| e.code.to_string()))
                .unwrap_or_default();
            (field.to_string(), message)
        })
        .collect()
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_store::StoreError;
    use domain::Resource;
    use domain::validation::field_error;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let err = ApiError::from(DomainError::not_found(Resource::Product, "id", 5));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["code"], "RESOURCE_NOT_FOUND");
        assert_eq!(json["message"], "Producto not found with id: '5'");
        assert_eq!(json["status"], 404);
        assert!(json["timestamp"].is_string());
        assert!(json.get("errors").is_none());
    }

    #[tokio::test]
    async fn conflict_maps_to_409() {
        let err = ApiError::from(DomainError::already_exists(
            Resource::Category,
            "nombre",
            "Laptops",
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["code"], "RESOURCE_ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn validation_lists_field_messages() {
        let err = ApiError::from(DomainError::Validation(field_error(
            "stock",
            "range",
            "El stock no puede ser negativo",
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["errors"]["stock"], "El stock no puede ser negativo");
    }

    #[tokio::test]
    async fn store_failure_hides_details() {
        let err = ApiError::from(DomainError::Store(StoreError::Database(
            sqlx::Error::PoolTimedOut,
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["code"], "INTERNAL_SERVER_ERROR");
        assert_eq!(json["message"], "An unexpected error occurred");
    }
}
