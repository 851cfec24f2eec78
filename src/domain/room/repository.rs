//! Room and room type repository interfaces
//!
//! Inventory is owned by the catalog; the booking core only reads rooms and
//! room types and flips a room's status.

use async_trait::async_trait;

use super::model::{Room, RoomCategory, RoomStatus, RoomType};
use crate::shared::DomainResult;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>>;

    /// Same as `find_by_id`, additionally taking a row lock for the rest of
    /// the enclosing transaction where the backend supports it
    async fn find_by_id_for_update(&self, id: i32) -> DomainResult<Option<Room>>;

    async fn find_by_number(&self, number: &str) -> DomainResult<Option<Room>>;

    /// Rooms of a type with status `available`, ascending id
    async fn list_available_by_type(&self, room_type_id: i32) -> DomainResult<Vec<Room>>;

    async fn update_status(&self, id: i32, status: RoomStatus) -> DomainResult<()>;
}

#[async_trait]
pub trait RoomTypeRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<RoomType>>;

    async fn find_by_type(&self, category: RoomCategory) -> DomainResult<Option<RoomType>>;

    async fn list(&self) -> DomainResult<Vec<RoomType>>;
}
