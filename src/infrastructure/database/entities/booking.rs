//! Booking entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub room_id: i32,

    #[sea_orm(nullable)]
    pub guest_id: Option<i32>,

    pub name: String,
    pub phone: String,

    #[sea_orm(nullable)]
    pub email: Option<String>,

    pub check_in: Date,
    pub check_out: Date,
    pub guests: i32,
    pub total_nights: i32,
    pub total_price: i64,

    /// Booking status: pending, confirmed, checked_in, checked_out, cancelled
    pub status: String,

    #[sea_orm(column_type = "Text")]
    pub notes: String,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::room::Entity",
        from = "Column::RoomId",
        to = "super::room::Column::Id"
    )]
    Room,
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
