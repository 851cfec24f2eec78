#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use hotel_booking::application::{BookingEngine, ReconciliationJob};
use hotel_booking::config::AppConfig;
use hotel_booking::domain::GuestDetails;
use hotel_booking::infrastructure::database::entities::{room, room_type};
use hotel_booking::server::build_services_with_clock;
use hotel_booking::shared::FixedClock;
use hotel_booking::{init_database, run_migrations, DatabaseConfig};

pub const DELUXE_PRICE: i64 = 500_000;
pub const SUPERIOR_PRICE: i64 = 350_000;

pub struct TestHotel {
    pub db: DatabaseConnection,
    pub engine: Arc<BookingEngine>,
    pub reconciliation: Arc<ReconciliationJob>,
    pub clock: Arc<FixedClock>,
    pub deluxe: i32,
    pub superior: i32,
    pub executive: i32,
    /// Keeps a file-backed database alive for the test's duration.
    pub dir: Option<tempfile::TempDir>,
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn jan(day: u32) -> NaiveDate {
    d(2024, 1, day)
}

pub fn guest(name: &str) -> GuestDetails {
    GuestDetails {
        guest_id: None,
        name: name.to_string(),
        phone: "081234567890".to_string(),
        email: None,
        guests: 2,
        notes: String::new(),
    }
}

/// Migrated in-memory hotel with three room types and no rooms.
pub async fn hotel(today: NaiveDate) -> TestHotel {
    open_hotel(&DatabaseConfig::in_memory(), today, None).await
}

/// Same as [`hotel`] on a SQLite file, configured the way the service ships
/// (several pooled connections requested).
pub async fn file_hotel(today: NaiveDate) -> TestHotel {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hotel.db");
    let config = DatabaseConfig::sqlite(&path.to_string_lossy());
    assert!(config.max_connections > 1);
    open_hotel(&config, today, Some(dir)).await
}

async fn open_hotel(
    config: &DatabaseConfig,
    today: NaiveDate,
    dir: Option<tempfile::TempDir>,
) -> TestHotel {
    let db = init_database(config).await.unwrap();
    run_migrations(&db).await.unwrap();

    let deluxe = add_room_type(&db, "deluxe", DELUXE_PRICE).await;
    let superior = add_room_type(&db, "superior", SUPERIOR_PRICE).await;
    let executive = add_room_type(&db, "executive", 900_000).await;

    let clock = Arc::new(FixedClock::new(today));
    let services = build_services_with_clock(&db, &AppConfig::default(), clock.clone());

    TestHotel {
        db,
        engine: services.engine,
        reconciliation: services.reconciliation,
        clock,
        deluxe,
        superior,
        executive,
        dir,
    }
}

pub async fn add_room_type(db: &DatabaseConnection, kind: &str, price: i64) -> i32 {
    let now = Utc::now();
    room_type::ActiveModel {
        kind: Set(kind.to_string()),
        price_per_night: Set(price),
        description: Set(String::new()),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

pub async fn add_room(db: &DatabaseConnection, room_type_id: i32, number: &str) -> i32 {
    add_room_with_status(db, room_type_id, number, "available").await
}

pub async fn add_room_with_status(
    db: &DatabaseConnection,
    room_type_id: i32,
    number: &str,
    status: &str,
) -> i32 {
    let now = Utc::now();
    room::ActiveModel {
        number: Set(number.to_string()),
        room_type_id: Set(room_type_id),
        capacity: Set(2),
        status: Set(status.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

pub async fn soft_delete_room(db: &DatabaseConnection, id: i32) {
    room::ActiveModel {
        id: Set(id),
        deleted_at: Set(Some(Utc::now())),
        ..Default::default()
    }
    .update(db)
    .await
    .unwrap();
}

pub async fn set_room_status(db: &DatabaseConnection, id: i32, status: &str) {
    room::ActiveModel {
        id: Set(id),
        status: Set(status.to_string()),
        ..Default::default()
    }
    .update(db)
    .await
    .unwrap();
}

pub async fn room_status(db: &DatabaseConnection, id: i32) -> String {
    use sea_orm::EntityTrait;
    room::Entity::find_by_id(id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .status
}
