//! Inputs to the booking engine

use chrono::NaiveDate;

use crate::domain::booking::{Booking, GuestDetails};

use super::confirmation::Confirmation;

/// A room addressed by id or by its number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomRef {
    Id(i32),
    Number(String),
}

#[derive(Debug, Clone)]
pub struct CreateDirectBooking {
    pub room: RoomRef,
    pub guest: GuestDetails,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct CreateTypeBooking {
    /// Room type name, e.g. `deluxe`
    pub room_type: String,
    pub rooms: u32,
    pub guest: GuestDetails,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

/// Bookings created by one request plus the message to send the guest.
#[derive(Debug, Clone)]
pub struct BookingReceipt {
    pub bookings: Vec<Booking>,
    pub confirmation: Confirmation,
}
