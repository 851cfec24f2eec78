//! Room type availability endpoint

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::booking::RoomTypeAvailability;
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse};

use super::bookings::BookingAppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    /// Restrict to one room type
    #[serde(rename = "type")]
    pub room_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomTypeAvailabilityDto {
    pub room_type_id: i32,
    pub room_type: String,
    pub price_per_night: i64,
    pub total_rooms: u32,
    pub booked_rooms: u32,
    pub available_rooms: u32,
}

impl From<RoomTypeAvailability> for RoomTypeAvailabilityDto {
    fn from(a: RoomTypeAvailability) -> Self {
        Self {
            available_rooms: a.available_rooms(),
            room_type_id: a.room_type_id,
            room_type: a.room_type,
            price_per_night: a.price_per_night,
            total_rooms: a.total_rooms,
            booked_rooms: a.booked_rooms,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/availability",
    tag = "Availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Free rooms per room type", body = ApiResponse<Vec<RoomTypeAvailabilityDto>>),
        (status = 400, description = "Invalid date range"),
        (status = 404, description = "Unknown room type")
    )
)]
pub async fn check_availability(
    State(state): State<BookingAppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<Vec<RoomTypeAvailabilityDto>>>, ApiError> {
    let room_type = query.room_type.as_deref().filter(|t| !t.trim().is_empty());
    let rows = state
        .engine
        .check_availability(query.check_in, query.check_out, room_type)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(
        rows.into_iter().map(RoomTypeAvailabilityDto::from).collect(),
    )))
}
