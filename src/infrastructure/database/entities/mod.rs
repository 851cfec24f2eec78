//! Database entities module

pub mod booking;
pub mod room;
pub mod room_type;

pub use booking::Entity as Booking;
pub use room::Entity as Room;
pub use room_type::Entity as RoomType;
