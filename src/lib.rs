//! # Hotel Booking Service
//!
//! Reservation core for a small hotel: direct and type-based bookings,
//! double-booking prevention, availability by room type and a date-driven
//! check-in/check-out job.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Bookings, rooms, room types and repository traits
//! - **application**: Booking engine, availability, overlap guard, reconciliation
//! - **infrastructure**: SeaORM entities, migrations and repositories
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Errors, clock, shutdown, pagination helpers

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, run_migrations, DatabaseConfig};

// Re-export API router
pub use interfaces::http::create_api_router;

pub use application::{BookingEngine, ReconciliationJob};
pub use server::{ServerHandle, ServerOptions};
