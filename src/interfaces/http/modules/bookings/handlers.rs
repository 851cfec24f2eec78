//! Booking HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::{BookingEngine, CreateDirectBooking, CreateTypeBooking, RoomRef};
use crate::domain::booking::BookingStatus;
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, PaginatedResponse, ValidatedJson,
};
use crate::shared::DomainError;

use super::dto::*;

/// Application state for booking handlers.
#[derive(Clone)]
pub struct BookingAppState {
    pub engine: Arc<BookingEngine>,
}

type Created<T> = (StatusCode, Json<ApiResponse<T>>);

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created as pending", body = ApiResponse<BookingCreatedResponse>),
        (status = 400, description = "Invalid dates or missing room reference"),
        (status = 404, description = "Room not found"),
        (status = 409, description = "Room unavailable or already booked for these dates"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_booking(
    State(state): State<BookingAppState>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<Created<BookingCreatedResponse>, ApiError> {
    let room = match (request.room_id, request.room_number.as_deref()) {
        (Some(id), _) => RoomRef::Id(id),
        (None, Some(number)) => RoomRef::Number(number.trim().to_string()),
        (None, None) => {
            return Err(domain_error(DomainError::InvalidInput(
                "room_id or room_number is required".into(),
            )))
        }
    };

    let receipt = state
        .engine
        .create_direct(CreateDirectBooking {
            room,
            guest: request.guest(),
            check_in: request.check_in,
            check_out: request.check_out,
        })
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(receipt.into())),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/by-type",
    tag = "Bookings",
    request_body = CreateTypeBookingRequest,
    responses(
        (status = 201, description = "One pending booking per allocated room", body = ApiResponse<BookingCreatedResponse>),
        (status = 404, description = "Unknown room type"),
        (status = 409, description = "Not enough free rooms of this type"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_type_booking(
    State(state): State<BookingAppState>,
    ValidatedJson(request): ValidatedJson<CreateTypeBookingRequest>,
) -> Result<Created<BookingCreatedResponse>, ApiError> {
    let receipt = state
        .engine
        .create_for_type(CreateTypeBooking {
            room_type: request.room_type.clone(),
            rooms: request.total_rooms,
            guest: request.guest(),
            check_in: request.check_in,
            check_out: request.check_out,
        })
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(receipt.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    params(ListBookingsQuery),
    responses(
        (status = 200, description = "Bookings, newest first", body = ApiResponse<PaginatedResponse<BookingDto>>),
        (status = 400, description = "Unknown status filter")
    )
)]
pub async fn list_bookings(
    State(state): State<BookingAppState>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<BookingDto>>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<BookingStatus>)
        .transpose()
        .map_err(domain_error)?;

    let page = state
        .engine
        .list(status, query.limit, query.offset)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(PaginatedResponse::from_page(
        page,
        BookingDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking", body = ApiResponse<BookingDto>),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BookingDto>>, ApiError> {
    let booking = state.engine.get(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/confirm",
    tag = "Bookings",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking confirmed", body = ApiResponse<BookingDto>),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Not pending, or the dates are taken")
    )
)]
pub async fn confirm_booking(
    State(state): State<BookingAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BookingDto>>, ApiError> {
    let booking = state.engine.confirm(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/cancel",
    tag = "Bookings",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = ApiResponse<BookingDto>),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking already finished")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BookingDto>>, ApiError> {
    let booking = state.engine.cancel(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/check-in",
    tag = "Bookings",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Guest checked in", body = ApiResponse<BookingDto>),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Not confirmed, or the stay has not started")
    )
)]
pub async fn check_in_booking(
    State(state): State<BookingAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BookingDto>>, ApiError> {
    let booking = state.engine.check_in(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/check-out",
    tag = "Bookings",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Guest checked out", body = ApiResponse<BookingDto>),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Guest is not checked in")
    )
)]
pub async fn check_out_booking(
    State(state): State<BookingAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BookingDto>>, ApiError> {
    let booking = state.engine.check_out(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking.into())))
}
