pub mod booking;
pub mod repositories;
pub mod room;

// Re-export commonly used types
pub use booking::{
    Booking, BookingFilter, BookingRepository, BookingStatus, GuestDetails, NewBooking,
    RoomTypeAvailability, StayPeriod,
};
pub use repositories::{DomainResult, RepositoryProvider, TransactionManager, UnitOfWork};
pub use room::{Room, RoomCategory, RoomRepository, RoomStatus, RoomType, RoomTypeRepository};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;
