//! Room inventory (read side)

pub mod model;
pub mod repository;

pub use model::{Room, RoomCategory, RoomStatus, RoomType};
pub use repository::{RoomRepository, RoomTypeRepository};
