//! Booking domain entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use super::stay::StayPeriod;
use crate::shared::{DomainError, DomainResult};

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    /// Requested by a guest, not yet holding the room
    Pending,
    /// Accepted by staff; occupies the room for its dates
    Confirmed,
    /// Guest has arrived
    CheckedIn,
    /// Stay finished (terminal)
    CheckedOut,
    /// Withdrawn before arrival (terminal)
    Cancelled,
}

impl BookingStatus {
    /// Statuses that occupy a room for overlap purposes.
    pub const BLOCKING: [BookingStatus; 2] = [BookingStatus::Confirmed, BookingStatus::CheckedIn];

    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::CheckedIn,
        BookingStatus::CheckedOut,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked_in",
            Self::CheckedOut => "checked_out",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Confirmed | Self::CheckedIn)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::CheckedOut | Self::Cancelled)
    }

    /// The complete transition table. Anything not listed is rejected.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Confirmed, CheckedIn)
                | (Confirmed, CheckedOut)
                | (CheckedIn, CheckedOut)
        )
    }

    /// Statuses from which `next` is reachable in one step.
    pub fn sources_of(next: BookingStatus) -> Vec<BookingStatus> {
        Self::ALL
            .into_iter()
            .filter(|s| s.can_transition_to(next))
            .collect()
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "checked_in" => Ok(Self::CheckedIn),
            "checked_out" => Ok(Self::CheckedOut),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(DomainError::InvalidInput(format!(
                "unknown booking status '{}'",
                other
            ))),
        }
    }
}

/// Guest-supplied details shared by every booking created for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestDetails {
    pub guest_id: Option<i32>,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub guests: i32,
    pub notes: String,
}

impl GuestDetails {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidInput("name is required".into()));
        }
        if self.phone.trim().is_empty() {
            return Err(DomainError::InvalidInput("phone is required".into()));
        }
        if self.guests <= 0 {
            return Err(DomainError::InvalidInput(
                "guests must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// A booking about to be inserted; price figures are derived, never supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub room_id: i32,
    pub guest: GuestDetails,
    pub stay: StayPeriod,
    pub total_nights: i32,
    pub total_price: i64,
}

impl NewBooking {
    pub fn new(
        room_id: i32,
        guest: GuestDetails,
        stay: StayPeriod,
        price_per_night: i64,
    ) -> DomainResult<Self> {
        if price_per_night <= 0 {
            return Err(DomainError::InvalidInput(format!(
                "room {} has no positive nightly price",
                room_id
            )));
        }
        let nights = stay.nights();
        let total_nights = i32::try_from(nights)
            .map_err(|_| DomainError::InvalidInput("stay is too long".into()))?;
        let total_price = nights
            .checked_mul(price_per_night)
            .ok_or_else(|| DomainError::InvalidInput("total price overflows".into()))?;

        Ok(Self {
            room_id,
            guest,
            stay,
            total_nights,
            total_price,
        })
    }
}

/// Room reservation for a date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
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
    pub status: BookingStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn stay(&self) -> DomainResult<StayPeriod> {
        StayPeriod::new(self.check_in, self.check_out)
    }

    /// Whether this booking keeps `stay` from being booked on the same room.
    pub fn blocks(&self, stay: &StayPeriod) -> bool {
        self.deleted_at.is_none()
            && self.status.is_blocking()
            && self.check_in < stay.check_out()
            && self.check_out > stay.check_in()
    }

    /// Reject moving to `next` unless the transition table allows it.
    pub fn ensure_transition(&self, next: BookingStatus, action: &'static str) -> DomainResult<()> {
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                booking_id: self.id,
                from: self.status,
                action,
            })
        }
    }
}

/// Filter for booking listings
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub room_id: Option<i32>,
}

/// Free capacity of one room type over a date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomTypeAvailability {
    pub room_type_id: i32,
    pub room_type: String,
    pub price_per_night: i64,
    /// Bookable rooms of this type (not deleted, status `available`)
    pub total_rooms: u32,
    /// Rooms with at least one blocking booking overlapping the range
    pub booked_rooms: u32,
}

impl RoomTypeAvailability {
    pub fn available_rooms(&self) -> u32 {
        self.total_rooms.saturating_sub(self.booked_rooms)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn guest() -> GuestDetails {
        GuestDetails {
            guest_id: None,
            name: "Rina".into(),
            phone: "0812".into(),
            email: None,
            guests: 2,
            notes: String::new(),
        }
    }

    fn sample(status: BookingStatus) -> Booking {
        Booking {
            id: 1,
            room_id: 1,
            guest_id: None,
            name: "Rina".into(),
            phone: "0812".into(),
            email: None,
            check_in: d(10),
            check_out: d(12),
            guests: 2,
            total_nights: 2,
            total_price: 1_000_000,
            status,
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn new_booking_derives_price() {
        let stay = StayPeriod::new(d(10), d(12)).unwrap();
        let b = NewBooking::new(1, guest(), stay, 500_000).unwrap();
        assert_eq!(b.total_nights, 2);
        assert_eq!(b.total_price, 1_000_000);
    }

    #[test]
    fn new_booking_rejects_free_rooms() {
        let stay = StayPeriod::new(d(10), d(12)).unwrap();
        assert!(NewBooking::new(1, guest(), stay, 0).is_err());
    }

    #[test]
    fn guest_validation() {
        assert!(guest().validate().is_ok());
        let mut g = guest();
        g.guests = 0;
        assert_eq!(g.validate().unwrap_err().code(), "invalid_input");
        let mut g = guest();
        g.name = "  ".into();
        assert!(g.validate().is_err());
    }

    #[test]
    fn only_confirmed_and_checked_in_block() {
        let stay = StayPeriod::new(d(11), d(13)).unwrap();
        for status in BookingStatus::ALL {
            assert_eq!(sample(status).blocks(&stay), status.is_blocking());
        }
    }

    #[test]
    fn soft_deleted_never_blocks() {
        let stay = StayPeriod::new(d(11), d(13)).unwrap();
        let mut b = sample(BookingStatus::Confirmed);
        b.deleted_at = Some(Utc::now());
        assert!(!b.blocks(&stay));
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for from in [BookingStatus::CheckedOut, BookingStatus::Cancelled] {
            assert!(from.is_terminal());
            for to in BookingStatus::ALL {
                assert!(!from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn cancel_only_from_pending_or_confirmed() {
        assert_eq!(
            BookingStatus::sources_of(BookingStatus::Cancelled),
            vec![BookingStatus::Pending, BookingStatus::Confirmed]
        );
    }

    #[test]
    fn confirm_only_from_pending() {
        assert_eq!(
            BookingStatus::sources_of(BookingStatus::Confirmed),
            vec![BookingStatus::Pending]
        );
        let err = sample(BookingStatus::Confirmed)
            .ensure_transition(BookingStatus::Confirmed, "confirm")
            .unwrap_err();
        assert_eq!(err.code(), "invalid_transition");
    }

    #[test]
    fn available_rooms_floors_at_zero() {
        let a = RoomTypeAvailability {
            room_type_id: 1,
            room_type: "deluxe".into(),
            price_per_night: 500_000,
            total_rooms: 1,
            booked_rooms: 3,
        };
        assert_eq!(a.available_rooms(), 0);
    }

    #[test]
    fn status_string_roundtrip() {
        for status in BookingStatus::ALL {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), status);
        }
        assert!("archived".parse::<BookingStatus>().is_err());
    }
}
