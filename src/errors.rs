use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Failures of the quotation engine and of request validation.
///
/// Every variant is a deterministic function of the request, nothing here is
/// transient and nothing is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuotationError {
    #[error("{0}")]
    InvalidInput(String),
}

impl QuotationError {
    pub fn invalid(message: impl Into<String>) -> Self {
        QuotationError::InvalidInput(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            QuotationError::InvalidInput(_) => "InvalidInput",
        }
    }
}

/// Wire shape of an error: `{ "kind": "InvalidInput", "message": "..." }`
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl From<&QuotationError> for ErrorBody {
    fn from(e: &QuotationError) -> Self {
        ErrorBody {
            kind: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}

impl IntoResponse for QuotationError {
    fn into_response(self) -> Response {
        let status = match self {
            QuotationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
