//! Booking repository interface

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{Booking, BookingFilter, BookingStatus, NewBooking, RoomTypeAvailability};
use super::stay::StayPeriod;
use crate::shared::{DomainResult, PageRequest, PaginatedResult};

/// Persistence for bookings. Soft-deleted rows are invisible to every method.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a new `pending` booking and return it with its assigned id
    async fn insert(&self, booking: NewBooking) -> DomainResult<Booking>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>>;

    /// Newest first
    async fn list(
        &self,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<Booking>>;

    /// Blocking bookings on `room_id` whose stay overlaps `stay`,
    /// optionally ignoring one booking id
    async fn find_overlapping(
        &self,
        room_id: i32,
        stay: &StayPeriod,
        exclude: Option<i32>,
    ) -> DomainResult<Vec<Booking>>;

    /// Number of blocking bookings held on `room_id` for any dates
    async fn count_blocking_for_room(&self, room_id: i32, exclude: Option<i32>) -> DomainResult<u64>;

    /// Per-room-type free capacity over `stay`, grouped in one query
    async fn availability(
        &self,
        stay: &StayPeriod,
        room_type_id: Option<i32>,
    ) -> DomainResult<Vec<RoomTypeAvailability>>;

    /// Compare-and-set status change. Returns `false` when the booking is
    /// missing or no longer in one of `from`.
    async fn transition(
        &self,
        id: i32,
        from: &[BookingStatus],
        to: BookingStatus,
    ) -> DomainResult<bool>;

    /// `confirmed`/`checked_in` bookings whose check-out date is before `today`
    async fn find_due_for_checkout(&self, today: NaiveDate) -> DomainResult<Vec<Booking>>;

    /// `confirmed` bookings whose check-in date is `today`
    async fn find_due_for_checkin(&self, today: NaiveDate) -> DomainResult<Vec<Booking>>;
}
