//! Room and room type as seen by the booking core

use std::fmt;
use std::str::FromStr;

use crate::shared::DomainError;

/// Housekeeping/occupancy status of a physical room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomStatus {
    Available,
    Booked,
    Cleaning,
    Maintenance,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Booked => "booked",
            Self::Cleaning => "cleaning",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "booked" => Ok(Self::Booked),
            "cleaning" => Ok(Self::Cleaning),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(DomainError::InvalidInput(format!(
                "unknown room status '{}'",
                other
            ))),
        }
    }
}

/// Room category. The hotel sells a small fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomCategory {
    Superior,
    Deluxe,
    Executive,
}

impl RoomCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Superior => "superior",
            Self::Deluxe => "deluxe",
            Self::Executive => "executive",
        }
    }

    /// Title-cased name for guest-facing text
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Superior => "Superior",
            Self::Deluxe => "Deluxe",
            Self::Executive => "Executive",
        }
    }
}

impl fmt::Display for RoomCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "superior" => Ok(Self::Superior),
            "deluxe" => Ok(Self::Deluxe),
            "executive" => Ok(Self::Executive),
            other => Err(DomainError::RoomTypeNotFound(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomType {
    pub id: i32,
    pub category: RoomCategory,
    /// Minor currency units
    pub price_per_night: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: i32,
    pub room_type_id: i32,
    pub number: String,
    pub capacity: i32,
    pub status: RoomStatus,
}

impl Room {
    pub fn is_available(&self) -> bool {
        self.status == RoomStatus::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!("Deluxe".parse::<RoomCategory>().unwrap(), RoomCategory::Deluxe);
        assert_eq!(" executive ".parse::<RoomCategory>().unwrap(), RoomCategory::Executive);
    }

    #[test]
    fn unknown_category_is_room_type_not_found() {
        let err = "presidential".parse::<RoomCategory>().unwrap_err();
        assert_eq!(err.code(), "room_type_not_found");
    }

    #[test]
    fn room_status_roundtrip() {
        for status in [
            RoomStatus::Available,
            RoomStatus::Booked,
            RoomStatus::Cleaning,
            RoomStatus::Maintenance,
        ] {
            assert_eq!(status.as_str().parse::<RoomStatus>().unwrap(), status);
        }
    }
}
