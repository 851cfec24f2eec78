//! Booking DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::BookingReceipt;
use crate::domain::booking::{Booking, GuestDetails};

/// Book one specific room. Give either `room_id` or `room_number`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    pub room_id: Option<i32>,
    #[validate(length(min = 1, max = 10))]
    pub room_number: Option<String>,
    pub guest_id: Option<i32>,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    /// First night, `YYYY-MM-DD`
    pub check_in: NaiveDate,
    /// Departure day (exclusive), `YYYY-MM-DD`
    pub check_out: NaiveDate,
    #[validate(range(min = 1, max = 20))]
    pub guests: i32,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub notes: String,
}

impl CreateBookingRequest {
    pub fn guest(&self) -> GuestDetails {
        GuestDetails {
            guest_id: self.guest_id,
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.clone(),
            guests: self.guests,
            notes: self.notes.clone(),
        }
    }
}

/// Book several rooms of one type for the same stay.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTypeBookingRequest {
    /// `superior`, `deluxe` or `executive`
    #[validate(length(min = 1, max = 20))]
    pub room_type: String,
    #[validate(range(min = 1, max = 50))]
    pub total_rooms: u32,
    pub guest_id: Option<i32>,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1, max = 20))]
    pub guests: i32,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub notes: String,
}

impl CreateTypeBookingRequest {
    pub fn guest(&self) -> GuestDetails {
        GuestDetails {
            guest_id: self.guest_id,
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.clone(),
            guests: self.guests,
            notes: self.notes.clone(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListBookingsQuery {
    /// pending, confirmed, checked_in, checked_out or cancelled
    pub status: Option<String>,
    /// Page size (default 10, max 100)
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingDto {
    pub id: i32,
    pub room_id: i32,
    pub guest_id: Option<i32>,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
    pub total_nights: i32,
    pub total_price: i64,
    pub status: String,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            room_id: b.room_id,
            guest_id: b.guest_id,
            name: b.name,
            phone: b.phone,
            email: b.email,
            check_in: b.check_in,
            check_out: b.check_out,
            guests: b.guests,
            total_nights: b.total_nights,
            total_price: b.total_price,
            status: b.status.to_string(),
            notes: b.notes,
            created_at: b.created_at.to_rfc3339(),
            updated_at: b.updated_at.to_rfc3339(),
        }
    }
}

/// Created bookings plus the message to forward to the guest
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingCreatedResponse {
    pub bookings: Vec<BookingDto>,
    /// Sum of `total_price` over `bookings`
    pub total_price: i64,
    pub message: String,
    /// `https://wa.me/<number>?text=<message>`
    pub whatsapp_url: String,
}

impl From<BookingReceipt> for BookingCreatedResponse {
    fn from(r: BookingReceipt) -> Self {
        let total_price = r.bookings.iter().map(|b| b.total_price).sum();
        Self {
            bookings: r.bookings.into_iter().map(BookingDto::from).collect(),
            total_price,
            message: r.confirmation.message,
            whatsapp_url: r.confirmation.whatsapp_url,
        }
    }
}
