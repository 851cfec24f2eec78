//! SeaORM implementation of RoomRepository and RoomTypeRepository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, UpdateResult,
};

use crate::domain::room::{
    Room, RoomCategory, RoomRepository, RoomStatus, RoomType, RoomTypeRepository,
};
use crate::infrastructure::database::entities::{room, room_type};
use crate::shared::{DomainError, DomainResult};

pub struct SeaOrmRoomRepository<C = DatabaseConnection> {
    db: Arc<C>,
}

impl<C> SeaOrmRoomRepository<C> {
    pub fn new(db: Arc<C>) -> Self {
        Self { db }
    }
}

pub struct SeaOrmRoomTypeRepository<C = DatabaseConnection> {
    db: Arc<C>,
}

impl<C> SeaOrmRoomTypeRepository<C> {
    pub fn new(db: Arc<C>) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn room_to_domain(m: room::Model) -> DomainResult<Room> {
    let status: RoomStatus = m.status.parse().map_err(|_| {
        DomainError::PersistenceFailure(format!("room {} has unknown status '{}'", m.id, m.status))
    })?;
    Ok(Room {
        id: m.id,
        room_type_id: m.room_type_id,
        number: m.number,
        capacity: m.capacity,
        status,
    })
}

fn room_type_to_domain(m: room_type::Model) -> DomainResult<RoomType> {
    let category: RoomCategory = m.kind.parse().map_err(|_| {
        DomainError::PersistenceFailure(format!("room type {} has unknown kind '{}'", m.id, m.kind))
    })?;
    Ok(RoomType {
        id: m.id,
        category,
        price_per_night: m.price_per_night,
        description: m.description,
    })
}

// ── RoomRepository impl ─────────────────────────────────────────

#[async_trait]
impl<C> RoomRepository for SeaOrmRoomRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>> {
        let model = room::Entity::find_by_id(id)
            .filter(room::Column::DeletedAt.is_null())
            .one(&*self.db)
            .await?;
        model.map(room_to_domain).transpose()
    }

    async fn find_by_id_for_update(&self, id: i32) -> DomainResult<Option<Room>> {
        let mut query = room::Entity::find_by_id(id).filter(room::Column::DeletedAt.is_null());
        // SQLite has no row locks; callers serialise through RoomLocks there
        if self.db.get_database_backend() != DatabaseBackend::Sqlite {
            query = query.lock_exclusive();
        }
        let model = query.one(&*self.db).await?;
        model.map(room_to_domain).transpose()
    }

    async fn find_by_number(&self, number: &str) -> DomainResult<Option<Room>> {
        let model = room::Entity::find()
            .filter(room::Column::Number.eq(number))
            .filter(room::Column::DeletedAt.is_null())
            .one(&*self.db)
            .await?;
        model.map(room_to_domain).transpose()
    }

    async fn list_available_by_type(&self, room_type_id: i32) -> DomainResult<Vec<Room>> {
        let models = room::Entity::find()
            .filter(room::Column::RoomTypeId.eq(room_type_id))
            .filter(room::Column::Status.eq(RoomStatus::Available.as_str()))
            .filter(room::Column::DeletedAt.is_null())
            .order_by_asc(room::Column::Id)
            .all(&*self.db)
            .await?;
        models.into_iter().map(room_to_domain).collect()
    }

    async fn update_status(&self, id: i32, status: RoomStatus) -> DomainResult<()> {
        debug!("Setting room {} status to {}", id, status);

        let result: UpdateResult = room::Entity::update_many()
            .col_expr(room::Column::Status, Expr::value(status.as_str()))
            .col_expr(room::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(room::Column::Id.eq(id))
            .filter(room::Column::DeletedAt.is_null())
            .exec(&*self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::RoomNotFound(id.to_string()));
        }
        Ok(())
    }
}

// ── RoomTypeRepository impl ─────────────────────────────────────

#[async_trait]
impl<C> RoomTypeRepository for SeaOrmRoomTypeRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<RoomType>> {
        let model = room_type::Entity::find_by_id(id)
            .filter(room_type::Column::DeletedAt.is_null())
            .one(&*self.db)
            .await?;
        model.map(room_type_to_domain).transpose()
    }

    async fn find_by_type(&self, category: RoomCategory) -> DomainResult<Option<RoomType>> {
        let model = room_type::Entity::find()
            .filter(room_type::Column::Kind.eq(category.as_str()))
            .filter(room_type::Column::DeletedAt.is_null())
            .one(&*self.db)
            .await?;
        model.map(room_type_to_domain).transpose()
    }

    async fn list(&self) -> DomainResult<Vec<RoomType>> {
        let models = room_type::Entity::find()
            .filter(room_type::Column::DeletedAt.is_null())
            .order_by_asc(room_type::Column::Id)
            .all(&*self.db)
            .await?;
        models.into_iter().map(room_type_to_domain).collect()
    }
}
