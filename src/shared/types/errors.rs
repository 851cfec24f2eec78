use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::booking::BookingStatus;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid date range: check_out {check_out} must be after check_in {check_in}")]
    InvalidDateRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("Validation: {0}")]
    InvalidInput(String),

    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("Room type not found: {0}")]
    RoomTypeNotFound(String),

    #[error("Room {0} is not available for booking")]
    RoomUnavailable(String),

    #[error("Room {room_id} is already booked for the requested dates")]
    DateConflict { room_id: i32, conflicting: Vec<i32> },

    #[error("Not enough {room_type} rooms: requested {requested}, available {available}")]
    InsufficientAvailability {
        room_type: String,
        requested: u32,
        available: u32,
    },

    #[error("Cannot {action} booking {booking_id} while it is {from}")]
    InvalidTransition {
        booking_id: i32,
        from: BookingStatus,
        action: &'static str,
    },

    #[error("Not found: Booking with id={0}")]
    NotFound(i32),

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Stable machine-readable code, one per error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "invalid_date_range",
            Self::InvalidInput(_) => "invalid_input",
            Self::RoomNotFound(_) => "room_not_found",
            Self::RoomTypeNotFound(_) => "room_type_not_found",
            Self::RoomUnavailable(_) => "room_unavailable",
            Self::DateConflict { .. } => "date_conflict",
            Self::InsufficientAvailability { .. } => "insufficient_availability",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::NotFound(_) => "not_found",
            Self::PersistenceFailure(_) => "persistence_failure",
        }
    }

    /// Conflicts are detected inside a transaction and roll it back.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DateConflict { .. }
                | Self::InsufficientAvailability { .. }
                | Self::RoomUnavailable(_)
                | Self::InvalidTransition { .. }
        )
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::PersistenceFailure(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Config read error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_distinct_code() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let errors = vec![
            DomainError::InvalidDateRange {
                check_in: date,
                check_out: date,
            },
            DomainError::InvalidInput("guests".into()),
            DomainError::RoomNotFound("1".into()),
            DomainError::RoomTypeNotFound("suite".into()),
            DomainError::RoomUnavailable("101".into()),
            DomainError::DateConflict {
                room_id: 1,
                conflicting: vec![2],
            },
            DomainError::InsufficientAvailability {
                room_type: "deluxe".into(),
                requested: 3,
                available: 2,
            },
            DomainError::InvalidTransition {
                booking_id: 1,
                from: BookingStatus::Cancelled,
                action: "confirm",
            },
            DomainError::NotFound(1),
            DomainError::PersistenceFailure("disk full".into()),
        ];

        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn db_errors_become_persistence_failures() {
        let err: DomainError = sea_orm::DbErr::Custom("boom".into()).into();
        assert_eq!(err.code(), "persistence_failure");
        assert!(!err.is_conflict());
    }

    #[test]
    fn transition_message_names_status() {
        let err = DomainError::InvalidTransition {
            booking_id: 7,
            from: BookingStatus::CheckedOut,
            action: "cancel",
        };
        assert_eq!(err.to_string(), "Cannot cancel booking 7 while it is checked_out");
    }
}
