//! Booking use cases
//!
//! The engine, its overlap guard and availability aggregator, the per-room
//! lock registry and the guest confirmation message.

pub mod availability;
pub mod commands;
pub mod confirmation;
pub mod engine;
pub mod locks;
pub mod overlap;

pub use availability::AvailabilityAggregator;
pub use commands::{BookingReceipt, CreateDirectBooking, CreateTypeBooking, RoomRef};
pub use confirmation::{Confirmation, ConfirmationTemplate};
pub use engine::BookingEngine;
pub use locks::{RoomGuard, RoomLocks};
pub use overlap::OverlapGuard;
