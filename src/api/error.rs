// ABOUTME: HTTP mapping for deployment manager errors.
// ABOUTME: Turns each error kind into a status code and a JSON error body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::deploy::{DeployError, DeployErrorKind};

/// JSON body returned for failed requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// A manager error on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub DeployError);

impl From<DeployError> for ApiError {
    fn from(err: DeployError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            DeployErrorKind::Validation => StatusCode::BAD_REQUEST,
            DeployErrorKind::NotFound => StatusCode::NOT_FOUND,
            DeployErrorKind::Adapter | DeployErrorKind::PartialFailure => StatusCode::BAD_GATEWAY,
            DeployErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self.0.kind() {
            DeployErrorKind::Validation => "validation_error",
            DeployErrorKind::NotFound => "not_found",
            DeployErrorKind::Adapter => "adapter_error",
            DeployErrorKind::PartialFailure => "partial_failure",
            DeployErrorKind::Persistence => "persistence_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(stage = %self.0.stage(), error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, "Request rejected");
        }

        let body = ErrorBody {
            error: self.error_type().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
