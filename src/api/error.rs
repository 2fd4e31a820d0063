use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::domain::menu_item::MenuItemError;
use crate::domain::order::OrderError;
use crate::domain::outlet::OutletError;
use crate::store::StoreError;

// ============================================================================
// API Errors
// ============================================================================
//
// Every failure leaves the service as `{"message": ...}`:
// - Validation  → 400
// - NotFound    → 404
// - Conflict    → 400 (uniqueness violations)
// - Internal    → 500, detail logged and replaced by a generic message
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Something went wrong")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Internal(detail) = self {
            tracing::error!(error = %detail, "Request failed");
        }

        HttpResponse::build(self.status_code()).json(json!({ "message": self.to_string() }))
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::UniqueViolation(constraint) => {
                ApiError::Conflict(format!("Duplicate value violates {}", constraint))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<OutletError> for ApiError {
    fn from(error: OutletError) -> Self {
        match error {
            OutletError::EmptyName | OutletError::EmptyLocation | OutletError::EmptyTimings => {
                ApiError::Validation(error.to_string())
            }
            OutletError::NotFound(_) => ApiError::NotFound(error.to_string()),
            OutletError::DuplicateName(_) => ApiError::Conflict(error.to_string()),
            OutletError::Store(e) => e.into(),
        }
    }
}

impl From<MenuItemError> for ApiError {
    fn from(error: MenuItemError) -> Self {
        match error {
            MenuItemError::NotFound(_) => ApiError::NotFound(error.to_string()),
            MenuItemError::Duplicate { .. } => ApiError::Conflict(error.to_string()),
            MenuItemError::Store(e) => e.into(),
            _ => ApiError::Validation(error.to_string()),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(error: OrderError) -> Self {
        match error {
            OrderError::NotFound(_) | OrderError::MenuItemNotFound(_) => {
                ApiError::NotFound(error.to_string())
            }
            OrderError::Store(e) => e.into(),
            _ => ApiError::Validation(error.to_string()),
        }
    }
}

/// Fallback for unmatched routes.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "message": "Not found" }))
}
