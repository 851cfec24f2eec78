//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories, the unified RepositoryProvider and
//! transaction-scoped units of work.

pub mod booking_repository;
pub mod repository_provider;
pub mod room_repository;
pub mod unit_of_work;

pub use booking_repository::SeaOrmBookingRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use room_repository::{SeaOrmRoomRepository, SeaOrmRoomTypeRepository};
pub use unit_of_work::{SeaOrmTransactionManager, SeaOrmUnitOfWork};
