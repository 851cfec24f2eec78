//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider` — unified access to all per-aggregate repositories
//! - `UnitOfWork` — a provider bound to one open database transaction
//! - `TransactionManager` — opens units of work

use async_trait::async_trait;

use super::booking::BookingRepository;
use super::room::{RoomRepository, RoomTypeRepository};
pub use crate::shared::DomainResult;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let room = repos.rooms().find_by_id(1).await?;
///     let booking = repos.bookings().find_by_id(42).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn rooms(&self) -> &dyn RoomRepository;
    fn room_types(&self) -> &dyn RoomTypeRepository;
    fn bookings(&self) -> &dyn BookingRepository;
}

// ── Transactions ────────────────────────────────────────────────

/// Repositories that all read and write through one transaction.
///
/// Dropping a unit of work without committing rolls it back, so an early
/// `?` return never leaves partial rows behind.
#[async_trait]
pub trait UnitOfWork: RepositoryProvider {
    async fn commit(self: Box<Self>) -> DomainResult<()>;

    async fn rollback(self: Box<Self>) -> DomainResult<()>;
}

#[async_trait]
pub trait TransactionManager: Send + Sync {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>>;
}
