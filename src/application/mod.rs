//! Application layer - booking use cases and background jobs

pub mod booking;
pub mod reconciliation;
pub(crate) mod unit_of_work;

pub use booking::{
    AvailabilityAggregator, BookingEngine, BookingReceipt, Confirmation, ConfirmationTemplate,
    CreateDirectBooking, CreateTypeBooking, OverlapGuard, RoomLocks, RoomRef,
};
pub use reconciliation::{ReconciliationJob, ReconciliationReport, DEFAULT_INTERVAL_SECS};
