use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;

/// Failure talking to a service this one depends on.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("{service} could not be reached: {source}")]
    Unreachable {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} answered with status {status}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("{service} sent an unreadable body: {source}")]
    Body {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("upstream service unavailable: {0}")]
    UpstreamUnavailable(#[from] UpstreamError),

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl ServiceError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "VALIDATION_ERROR",
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            ServiceError::Database(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ErrorBody {
    pub status: String,
    pub message: String,
    pub error_code: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let message = match &self {
            ServiceError::Database(e) => {
                tracing::error!(error = ?e, "Database operation failed");
                "internal server error".to_string()
            }
            ServiceError::UpstreamUnavailable(e) => {
                tracing::error!(error = ?e, "Upstream dependency failed");
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorBody {
            status: "ERROR".to_string(),
            message,
            error_code: self.error_code().to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
