//! SeaORM implementation of BookingRepository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    Statement, UpdateResult, Value,
};

use crate::domain::booking::{
    Booking, BookingFilter, BookingRepository, BookingStatus, NewBooking, RoomTypeAvailability,
    StayPeriod,
};
use crate::domain::RoomStatus;
use crate::infrastructure::database::entities::booking;
use crate::shared::{DomainError, DomainResult, PageRequest, PaginatedResult};

pub struct SeaOrmBookingRepository<C = DatabaseConnection> {
    db: Arc<C>,
}

impl<C> SeaOrmBookingRepository<C> {
    pub fn new(db: Arc<C>) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: booking::Model) -> DomainResult<Booking> {
    let status: BookingStatus = m.status.parse().map_err(|_| {
        DomainError::PersistenceFailure(format!(
            "booking {} has unknown status '{}'",
            m.id, m.status
        ))
    })?;
    Ok(Booking {
        id: m.id,
        room_id: m.room_id,
        guest_id: m.guest_id,
        name: m.name,
        phone: m.phone,
        email: m.email,
        check_in: m.check_in,
        check_out: m.check_out,
        guests: m.guests,
        total_nights: m.total_nights,
        total_price: m.total_price,
        status,
        notes: m.notes,
        created_at: m.created_at,
        updated_at: m.updated_at,
        deleted_at: m.deleted_at,
    })
}

fn status_values(statuses: &[BookingStatus]) -> Vec<&'static str> {
    statuses.iter().map(|s| s.as_str()).collect()
}

fn blocking_on_room(room_id: i32, exclude: Option<i32>) -> Condition {
    let mut cond = Condition::all()
        .add(booking::Column::RoomId.eq(room_id))
        .add(booking::Column::Status.is_in(status_values(&BookingStatus::BLOCKING)))
        .add(booking::Column::DeletedAt.is_null());
    if let Some(id) = exclude {
        cond = cond.add(booking::Column::Id.ne(id));
    }
    cond
}

#[derive(Debug, FromQueryResult)]
struct AvailabilityRow {
    room_type_id: i32,
    kind: String,
    price_per_night: i64,
    total_rooms: i64,
    booked_rooms: i64,
}

impl AvailabilityRow {
    fn into_domain(self) -> RoomTypeAvailability {
        RoomTypeAvailability {
            room_type_id: self.room_type_id,
            room_type: self.kind,
            price_per_night: self.price_per_night,
            total_rooms: u32::try_from(self.total_rooms).unwrap_or(0),
            booked_rooms: u32::try_from(self.booked_rooms).unwrap_or(0),
        }
    }
}

/// Per-type room counts in one grouped query. Room types without eligible
/// rooms still produce a row through the LEFT JOIN.
fn availability_statement(
    backend: DatabaseBackend,
    stay: &StayPeriod,
    room_type_id: Option<i32>,
) -> Statement {
    let mut values: Vec<Value> = Vec::new();
    let mut bind = |value: Value| -> String {
        values.push(value);
        match backend {
            DatabaseBackend::Postgres => format!("${}", values.len()),
            _ => "?".to_string(),
        }
    };

    let room_status = bind(RoomStatus::Available.as_str().into());
    let confirmed = bind(BookingStatus::Confirmed.as_str().into());
    let checked_in = bind(BookingStatus::CheckedIn.as_str().into());
    let stay_end = bind(stay.check_out().into());
    let stay_start = bind(stay.check_in().into());
    let type_filter = match room_type_id {
        Some(id) => format!(" AND rt.id = {}", bind(id.into())),
        None => String::new(),
    };

    let sql = format!(
        r#"SELECT rt.id AS room_type_id,
       rt.kind AS kind,
       rt.price_per_night AS price_per_night,
       COUNT(r.id) AS total_rooms,
       COUNT(DISTINCT CASE WHEN EXISTS (
           SELECT 1 FROM bookings b
           WHERE b.room_id = r.id
             AND b.deleted_at IS NULL
             AND b.status IN ({confirmed}, {checked_in})
             AND b.check_in < {stay_end}
             AND b.check_out > {stay_start}
       ) THEN r.id END) AS booked_rooms
FROM room_types rt
LEFT JOIN rooms r
       ON r.room_type_id = rt.id
      AND r.deleted_at IS NULL
      AND r.status = {room_status}
WHERE rt.deleted_at IS NULL{type_filter}
GROUP BY rt.id, rt.kind, rt.price_per_night
ORDER BY rt.id"#
    );

    Statement::from_sql_and_values(backend, sql, values)
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl<C> BookingRepository for SeaOrmBookingRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, new: NewBooking) -> DomainResult<Booking> {
        debug!("Inserting booking for room {} ({})", new.room_id, new.stay);

        let now = Utc::now();
        let model = booking::ActiveModel {
            room_id: Set(new.room_id),
            guest_id: Set(new.guest.guest_id),
            name: Set(new.guest.name),
            phone: Set(new.guest.phone),
            email: Set(new.guest.email),
            check_in: Set(new.stay.check_in()),
            check_out: Set(new.stay.check_out()),
            guests: Set(new.guest.guests),
            total_nights: Set(new.total_nights),
            total_price: Set(new.total_price),
            status: Set(BookingStatus::Pending.as_str().to_string()),
            notes: Set(new.guest.notes),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        let saved = model.insert(&*self.db).await?;
        model_to_domain(saved)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .filter(booking::Column::DeletedAt.is_null())
            .one(&*self.db)
            .await?;
        model.map(model_to_domain).transpose()
    }

    async fn list(
        &self,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<Booking>> {
        let mut query = booking::Entity::find().filter(booking::Column::DeletedAt.is_null());

        if let Some(status) = filter.status {
            query = query.filter(booking::Column::Status.eq(status.as_str()));
        }
        if let Some(room_id) = filter.room_id {
            query = query.filter(booking::Column::RoomId.eq(room_id));
        }

        let total = query.clone().count(&*self.db).await?;

        let models = query
            .order_by_desc(booking::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&*self.db)
            .await?;

        let items = models
            .into_iter()
            .map(model_to_domain)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(PaginatedResult::new(items, total, page))
    }

    async fn find_overlapping(
        &self,
        room_id: i32,
        stay: &StayPeriod,
        exclude: Option<i32>,
    ) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(blocking_on_room(room_id, exclude))
            .filter(booking::Column::CheckIn.lt(stay.check_out()))
            .filter(booking::Column::CheckOut.gt(stay.check_in()))
            .order_by_asc(booking::Column::Id)
            .all(&*self.db)
            .await?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn count_blocking_for_room(&self, room_id: i32, exclude: Option<i32>) -> DomainResult<u64> {
        let count = booking::Entity::find()
            .filter(blocking_on_room(room_id, exclude))
            .count(&*self.db)
            .await?;
        Ok(count)
    }

    async fn availability(
        &self,
        stay: &StayPeriod,
        room_type_id: Option<i32>,
    ) -> DomainResult<Vec<RoomTypeAvailability>> {
        let stmt = availability_statement(self.db.get_database_backend(), stay, room_type_id);
        let rows = AvailabilityRow::find_by_statement(stmt)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(AvailabilityRow::into_domain).collect())
    }

    async fn transition(
        &self,
        id: i32,
        from: &[BookingStatus],
        to: BookingStatus,
    ) -> DomainResult<bool> {
        debug!("Booking {} transition {:?} -> {}", id, from, to);

        let result: UpdateResult = booking::Entity::update_many()
            .col_expr(booking::Column::Status, Expr::value(to.as_str()))
            .col_expr(booking::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(booking::Column::Id.eq(id))
            .filter(booking::Column::Status.is_in(status_values(from)))
            .filter(booking::Column::DeletedAt.is_null())
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn find_due_for_checkout(&self, today: NaiveDate) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::Status.is_in(status_values(&BookingStatus::BLOCKING)))
            .filter(booking::Column::CheckOut.lt(today))
            .filter(booking::Column::DeletedAt.is_null())
            .order_by_asc(booking::Column::Id)
            .all(&*self.db)
            .await?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_due_for_checkin(&self, today: NaiveDate) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::Status.eq(BookingStatus::Confirmed.as_str()))
            .filter(booking::Column::CheckIn.eq(today))
            .filter(booking::Column::DeletedAt.is_null())
            .order_by_asc(booking::Column::Id)
            .all(&*self.db)
            .await?;
        models.into_iter().map(model_to_domain).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stay() -> StayPeriod {
        StayPeriod::new(
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn availability_sql_uses_backend_placeholders() {
        let pg = availability_statement(DatabaseBackend::Postgres, &stay(), Some(3));
        assert!(pg.sql.contains("$6"));
        assert!(pg.sql.contains("AND rt.id = $6"));
        assert_eq!(pg.values.map(|v| v.0.len()), Some(6));

        let lite = availability_statement(DatabaseBackend::Sqlite, &stay(), None);
        assert!(!lite.sql.contains('$'));
        assert!(!lite.sql.contains("rt.id = ?"));
        assert_eq!(lite.values.map(|v| v.0.len()), Some(5));
    }
}
