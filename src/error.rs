//! Error types for the PDF coordinate server

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::pdf::PdfError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid page number {page} (document has {page_count} pages)")]
    InvalidPage { page: i64, page_count: i64 },

    #[error("PDF error: {0}")]
    Pdf(PdfError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PdfError> for AppError {
    fn from(err: PdfError) -> Self {
        match err {
            PdfError::InvalidPage { page, page_count } => AppError::InvalidPage { page, page_count },
            other => AppError::Pdf(other),
        }
    }
}

/// Request fields that were absent or unusable
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationError {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid: Vec<String>,
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            missing: vec![field.into()],
            invalid: Vec::new(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            missing: Vec::new(),
            invalid: vec![reason.into()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing fields: {}", self.missing.join(", ")));
        }
        if !self.invalid.is_empty() {
            parts.push(format!("invalid fields: {}", self.invalid.join("; ")));
        }
        if parts.is_empty() {
            f.write_str("incomplete data")
        } else {
            f.write_str(&parts.join("; "))
        }
    }
}

impl std::error::Error for ValidationError {}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<ValidationError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) | AppError::InvalidPage { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::Pdf(_) | AppError::Database(_) | AppError::Io(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to end users
    ///
    /// Client mistakes are described precisely; internal failures are not.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) => msg.clone(),
            AppError::Validation(e) => format!("Incomplete data: {}", e),
            AppError::InvalidPage { .. } => "Invalid page number".to_string(),
            AppError::Pdf(PdfError::Parse(_)) => "Failed to process the PDF file".to_string(),
            AppError::Pdf(_) => "Failed to process the PDF page".to_string(),
            AppError::Database(_) | AppError::Io(_) => "Storage error".to_string(),
            AppError::Internal(_) => "An internal error occurred".to_string(),
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Validation(_) => "validation_error",
            AppError::InvalidPage { .. } => "invalid_page",
            AppError::Pdf(PdfError::Parse(_)) => "parse_error",
            AppError::Pdf(_) => "render_error",
            AppError::Database(_) | AppError::Io(_) => "storage_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Log server-side causes that are hidden from the client
    pub fn log(&self) {
        match self {
            AppError::Pdf(e) => tracing::error!("PDF error: {}", e),
            AppError::Database(e) => tracing::error!("Database error: {}", e),
            AppError::Io(e) => tracing::error!("IO error: {}", e),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            other => tracing::debug!("Request rejected: {}", other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let fields = match &self {
            AppError::Validation(e) => Some(e.clone()),
            _ => None,
        };

        let body = Json(ErrorResponse {
            error: self.error_type().to_string(),
            message: self.user_message(),
            fields,
            details: if cfg!(debug_assertions) && status.is_server_error() {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}
