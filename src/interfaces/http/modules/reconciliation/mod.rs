//! Manual trigger for the reconciliation pass

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::ReconciliationJob;
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse};

#[derive(Clone)]
pub struct ReconciliationState {
    pub job: Arc<ReconciliationJob>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReconciliationRunResponse {
    pub checked_out: u64,
    pub checked_in: u64,
}

#[utoipa::path(
    post,
    path = "/api/v1/reconciliation/run",
    tag = "Reconciliation",
    responses(
        (status = 200, description = "Transitions applied by this pass", body = ApiResponse<ReconciliationRunResponse>),
        (status = 500, description = "Pass failed; nothing was applied")
    )
)]
pub async fn run_reconciliation(
    State(state): State<ReconciliationState>,
) -> Result<Json<ApiResponse<ReconciliationRunResponse>>, ApiError> {
    let report = state.job.run_now().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(ReconciliationRunResponse {
        checked_out: report.checked_out,
        checked_in: report.checked_in,
    })))
}
