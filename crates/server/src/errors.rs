use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// Error envelope returned by the band routes.
///
/// With no `error` label the response is the bare status and an empty body,
/// which is how a missing record is reported.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: Option<&'static str>,
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, message: Option<String>) -> Self {
        Self { status, error: Some(error), message }
    }

    pub fn bare(status: StatusCode) -> Self {
        Self { status, error: None, message: None }
    }

    /// Map a service failure onto a route's contract: misses are a bare 404,
    /// bad payloads are 400, and anything else gets the route's `failure` status.
    pub fn from_service(e: ServiceError, failure: StatusCode, label: &'static str) -> Self {
        if e.is_not_found() {
            return Self::bare(StatusCode::NOT_FOUND);
        }
        if e.is_validation() {
            warn!(err = %e, "band payload rejected");
            return Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string()));
        }
        error!(err = %e, status = failure.as_u16(), "{}", label);
        Self::new(failure, label, Some(e.to_string()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        match self.error {
            None => self.status.into_response(),
            Some(error) => {
                (self.status, Json(serde_json::json!({"error": error, "message": self.message}))).into_response()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("store unavailable: {0}")]
    Store(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    #[test]
    fn not_found_is_bare() {
        let e = JsonApiError::from_service(ServiceError::not_found("band"), StatusCode::INTERNAL_SERVER_ERROR, "Get Failed");
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert!(e.error.is_none());
        assert!(e.message.is_none());
    }

    #[test]
    fn validation_wins_over_route_failure_status() {
        let e = JsonApiError::from_service(
            ServiceError::Model(ModelError::Validation("year: bad".into())),
            StatusCode::INTERNAL_SERVER_ERROR,
            "Update Failed",
        );
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.error, Some("Validation Error"));
    }

    #[test]
    fn store_faults_use_route_status_and_keep_detail() {
        let e = JsonApiError::from_service(
            ServiceError::Model(ModelError::InvalidId("cast to id failed".into())),
            StatusCode::INTERNAL_SERVER_ERROR,
            "Get Failed",
        );
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(e.message.unwrap().contains("cast to id failed"));
    }
}
