//! Availability aggregator

use std::sync::Arc;

use crate::domain::booking::{RoomTypeAvailability, StayPeriod};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::room::{RoomCategory, RoomType};
use crate::shared::{DomainError, DomainResult};

/// Free capacity per room type over a date range.
pub struct AvailabilityAggregator {
    repos: Arc<dyn RepositoryProvider>,
}

impl AvailabilityAggregator {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Resolve a room type by its name (`superior`, `deluxe`, ...).
    pub async fn resolve_type(&self, name: &str) -> DomainResult<RoomType> {
        let category: RoomCategory = name.parse()?;
        self.repos
            .room_types()
            .find_by_type(category)
            .await?
            .ok_or_else(|| DomainError::RoomTypeNotFound(category.to_string()))
    }

    /// All room types, or only `room_type` when given. Ordered by room type id.
    pub async fn check(
        &self,
        stay: &StayPeriod,
        room_type: Option<&str>,
    ) -> DomainResult<Vec<RoomTypeAvailability>> {
        let type_id = match room_type {
            Some(name) => Some(self.resolve_type(name).await?.id),
            None => None,
        };
        self.repos.bookings().availability(stay, type_id).await
    }

    pub async fn for_room_type(
        &self,
        stay: &StayPeriod,
        room_type: &RoomType,
    ) -> DomainResult<RoomTypeAvailability> {
        let rows = self
            .repos
            .bookings()
            .availability(stay, Some(room_type.id))
            .await?;

        Ok(rows.into_iter().next().unwrap_or_else(|| RoomTypeAvailability {
            room_type_id: room_type.id,
            room_type: room_type.category.to_string(),
            price_per_night: room_type.price_per_night,
            total_rooms: 0,
            booked_rooms: 0,
        }))
    }
}
