//! SeaORM implementation of RepositoryProvider

use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::domain::booking::BookingRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::room::{RoomRepository, RoomTypeRepository};

use super::booking_repository::SeaOrmBookingRepository;
use super::room_repository::{SeaOrmRoomRepository, SeaOrmRoomTypeRepository};

/// Unified repository provider backed by SeaORM.
///
/// Generic over the connection so the same repositories run against the
/// pool or inside one open transaction.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let room = repos.rooms().find_by_number("101").await?;
/// let booking = repos.bookings().find_by_id(42).await?;
/// ```
pub struct SeaOrmRepositoryProvider<C = DatabaseConnection> {
    rooms: SeaOrmRoomRepository<C>,
    room_types: SeaOrmRoomTypeRepository<C>,
    bookings: SeaOrmBookingRepository<C>,
}

impl SeaOrmRepositoryProvider<DatabaseConnection> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::from_shared(Arc::new(db))
    }
}

impl<C> SeaOrmRepositoryProvider<C> {
    pub fn from_shared(db: Arc<C>) -> Self {
        Self {
            rooms: SeaOrmRoomRepository::new(db.clone()),
            room_types: SeaOrmRoomTypeRepository::new(db.clone()),
            bookings: SeaOrmBookingRepository::new(db),
        }
    }
}

impl<C> RepositoryProvider for SeaOrmRepositoryProvider<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    fn rooms(&self) -> &dyn RoomRepository {
        &self.rooms
    }

    fn room_types(&self) -> &dyn RoomTypeRepository {
        &self.room_types
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }
}
