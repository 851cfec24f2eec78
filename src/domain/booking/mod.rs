//! Booking aggregate
//!
//! The booking entity, its lifecycle state machine, the stay period value
//! object and the repository interface.

pub mod model;
pub mod repository;
pub mod stay;

pub use model::{
    Booking, BookingFilter, BookingStatus, GuestDetails, NewBooking, RoomTypeAvailability,
};
pub use repository::BookingRepository;
pub use stay::StayPeriod;
