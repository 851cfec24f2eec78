//! Overlap guard
//!
//! A room is free for a stay when no blocking booking (`confirmed` or
//! `checked_in`, not soft-deleted) on it shares a night with the stay.

use tracing::debug;

use crate::domain::booking::{Booking, BookingRepository, StayPeriod};
use crate::shared::{DomainError, DomainResult};

pub struct OverlapGuard;

impl OverlapGuard {
    /// Blocking bookings on `room_id` that conflict with `stay`.
    pub async fn conflicts(
        bookings: &dyn BookingRepository,
        room_id: i32,
        stay: &StayPeriod,
        exclude: Option<i32>,
    ) -> DomainResult<Vec<Booking>> {
        let found = bookings.find_overlapping(room_id, stay, exclude).await?;
        // the store query and the in-memory predicate must agree
        Ok(found.into_iter().filter(|b| b.blocks(stay)).collect())
    }

    /// `DateConflict` if any blocking booking overlaps.
    pub async fn ensure_no_conflict(
        bookings: &dyn BookingRepository,
        room_id: i32,
        stay: &StayPeriod,
        exclude: Option<i32>,
    ) -> DomainResult<()> {
        let conflicting = Self::conflicts(bookings, room_id, stay, exclude).await?;
        if conflicting.is_empty() {
            return Ok(());
        }

        let ids: Vec<i32> = conflicting.iter().map(|b| b.id).collect();
        debug!(room_id, %stay, conflicting = ?ids, "Stay overlaps blocking bookings");
        Err(DomainError::DateConflict {
            room_id,
            conflicting: ids,
        })
    }
}
