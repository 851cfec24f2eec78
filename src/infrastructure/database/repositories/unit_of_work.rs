//! Transaction-scoped repositories

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::domain::booking::BookingRepository;
use crate::domain::repositories::{RepositoryProvider, TransactionManager, UnitOfWork};
use crate::domain::room::{RoomRepository, RoomTypeRepository};
use crate::shared::{DomainError, DomainResult};

use super::repository_provider::SeaOrmRepositoryProvider;

/// Repositories bound to one open `DatabaseTransaction`.
pub struct SeaOrmUnitOfWork {
    txn: Arc<DatabaseTransaction>,
    repos: SeaOrmRepositoryProvider<DatabaseTransaction>,
}

impl SeaOrmUnitOfWork {
    fn new(txn: DatabaseTransaction) -> Self {
        let txn = Arc::new(txn);
        Self {
            repos: SeaOrmRepositoryProvider::from_shared(txn.clone()),
            txn,
        }
    }

    /// Release the repositories' handles so the transaction can be consumed.
    fn into_transaction(self) -> DomainResult<DatabaseTransaction> {
        let Self { txn, repos } = self;
        drop(repos);
        Arc::try_unwrap(txn).map_err(|_| {
            DomainError::PersistenceFailure("transaction is still referenced".into())
        })
    }
}

impl RepositoryProvider for SeaOrmUnitOfWork {
    fn rooms(&self) -> &dyn RoomRepository {
        self.repos.rooms()
    }

    fn room_types(&self) -> &dyn RoomTypeRepository {
        self.repos.room_types()
    }

    fn bookings(&self) -> &dyn BookingRepository {
        self.repos.bookings()
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let txn = (*self).into_transaction()?;
        txn.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        let txn = (*self).into_transaction()?;
        txn.rollback().await?;
        Ok(())
    }
}

/// Opens units of work on a connection pool.
#[derive(Clone)]
pub struct SeaOrmTransactionManager {
    db: DatabaseConnection,
}

impl SeaOrmTransactionManager {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionManager for SeaOrmTransactionManager {
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let txn = self.db.begin().await?;
        Ok(Box::new(SeaOrmUnitOfWork::new(txn)))
    }
}
