//! Shared HTTP building blocks: the response envelope, error mapping and
//! the validating JSON extractor.

pub mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::shared::{DomainError, PaginatedResult};

pub use validated_json::ValidatedJson;

/// Standard API response envelope.
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "...", "code": "date_conflict"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable error kind
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            code: None,
        }
    }

    pub fn error_with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::error(message)
        }
    }
}

/// Limit/offset page of items
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Matching items across all pages
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    pub fn from_page<U>(page: PaginatedResult<U>, map: impl FnMut(U) -> T) -> Self {
        let has_more = page.has_more();
        Self {
            items: page.items.into_iter().map(map).collect(),
            total: page.total,
            limit: page.limit,
            offset: page.offset,
            has_more,
        }
    }
}

pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub fn status_for(e: &DomainError) -> StatusCode {
    match e {
        DomainError::InvalidDateRange { .. } | DomainError::InvalidInput(_) => {
            StatusCode::BAD_REQUEST
        }
        DomainError::RoomNotFound(_)
        | DomainError::RoomTypeNotFound(_)
        | DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::RoomUnavailable(_)
        | DomainError::DateConflict { .. }
        | DomainError::InsufficientAvailability { .. }
        | DomainError::InvalidTransition { .. } => StatusCode::CONFLICT,
        DomainError::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a domain error onto a status code and an error envelope.
pub fn domain_error(e: DomainError) -> ApiError {
    let status = status_for(&e);
    if status.is_server_error() {
        error!(error = %e, "Request failed");
    }
    (status, Json(ApiResponse::error_with_code(e.code(), e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_map_to_409() {
        let e = DomainError::DateConflict {
            room_id: 1,
            conflicting: vec![3],
        };
        let (status, Json(body)) = domain_error(e);
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code.as_deref(), Some("date_conflict"));
        assert!(!body.success);
    }

    #[test]
    fn lookups_map_to_404_and_store_errors_to_500() {
        assert_eq!(status_for(&DomainError::NotFound(9)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&DomainError::RoomTypeNotFound("suite".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&DomainError::PersistenceFailure("locked".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_envelope_omits_empty_fields_on_success() {
        let json = serde_json::to_value(ApiResponse::success(5)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 5}));
    }
}
