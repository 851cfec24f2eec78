//! Booking engine
//!
//! Every operation that reads and then writes takes the room lock(s) first,
//! then opens one transaction, re-reads the room with `find_by_id_for_update`
//! and runs the overlap check inside that transaction. Status changes go
//! through compare-and-set updates on the booking row.

use std::sync::Arc;

use tracing::info;

use crate::application::unit_of_work::finish;
use crate::domain::booking::{
    Booking, BookingFilter, BookingStatus, NewBooking, RoomTypeAvailability, StayPeriod,
};
use crate::domain::repositories::{RepositoryProvider, TransactionManager, UnitOfWork};
use crate::domain::room::{Room, RoomStatus, RoomType};
use crate::shared::{
    validate_pagination, Clock, DomainError, DomainResult, PaginatedResult, DEFAULT_PAGE_SIZE,
};

use super::availability::AvailabilityAggregator;
use super::commands::{BookingReceipt, CreateDirectBooking, CreateTypeBooking, RoomRef};
use super::confirmation::ConfirmationTemplate;
use super::locks::RoomLocks;
use super::overlap::OverlapGuard;

pub struct BookingEngine {
    repos: Arc<dyn RepositoryProvider>,
    transactions: Arc<dyn TransactionManager>,
    locks: Arc<RoomLocks>,
    clock: Arc<dyn Clock>,
    availability: AvailabilityAggregator,
    template: ConfirmationTemplate,
    default_page_size: u64,
}

impl BookingEngine {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        transactions: Arc<dyn TransactionManager>,
        locks: Arc<RoomLocks>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            availability: AvailabilityAggregator::new(repos.clone()),
            repos,
            transactions,
            locks,
            clock,
            template: ConfirmationTemplate::default(),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_template(mut self, template: ConfirmationTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_default_page_size(mut self, page_size: u64) -> Self {
        self.default_page_size = page_size;
        self
    }

    // ── Creation ───────────────────────────────────────────────

    /// Book one specific room as `pending`.
    pub async fn create_direct(&self, cmd: CreateDirectBooking) -> DomainResult<BookingReceipt> {
        let CreateDirectBooking {
            room: room_ref,
            guest,
            check_in,
            check_out,
        } = cmd;
        let stay = StayPeriod::new(check_in, check_out)?;
        guest.validate()?;

        let room_id = match &room_ref {
            RoomRef::Id(id) => *id,
            RoomRef::Number(number) => {
                self.repos
                    .rooms()
                    .find_by_number(number)
                    .await?
                    .ok_or_else(|| DomainError::RoomNotFound(number.clone()))?
                    .id
            }
        };

        let _guard = self.locks.lock(room_id).await;
        let uow = self.transactions.begin().await?;
        let result = async {
            let room = uow
                .rooms()
                .find_by_id_for_update(room_id)
                .await?
                .ok_or_else(|| DomainError::RoomNotFound(room_id.to_string()))?;
            if !room.is_available() {
                return Err(DomainError::RoomUnavailable(room.number));
            }

            OverlapGuard::ensure_no_conflict(uow.bookings(), room.id, &stay, None).await?;

            let room_type = room_type_of(uow.as_ref(), &room).await?;
            let new = NewBooking::new(room.id, guest, stay, room_type.price_per_night)?;
            let booking = uow.bookings().insert(new).await?;
            Ok::<_, DomainError>((booking, room, room_type))
        }
        .await;
        let (booking, room, room_type) = settle(uow, result).await?;

        metrics::counter!("bookings_created_total", "path" => "direct").increment(1);
        info!(
            booking_id = booking.id,
            room_id = room.id,
            %stay,
            total_price = booking.total_price,
            "Booking created"
        );

        Ok(receipt(&self.template, &room_type, vec![(booking, room)]))
    }

    /// Book `cmd.rooms` rooms of one type, all or nothing. Rooms are picked
    /// in ascending id order among those still free for the stay.
    pub async fn create_for_type(&self, cmd: CreateTypeBooking) -> DomainResult<BookingReceipt> {
        let stay = StayPeriod::new(cmd.check_in, cmd.check_out)?;
        cmd.guest.validate()?;
        if cmd.rooms == 0 {
            return Err(DomainError::InvalidInput(
                "total_rooms must be at least 1".into(),
            ));
        }

        let room_type = self.availability.resolve_type(&cmd.room_type).await?;
        let free = self.availability.for_room_type(&stay, &room_type).await?;
        if free.available_rooms() < cmd.rooms {
            let err = DomainError::InsufficientAvailability {
                room_type: room_type.category.to_string(),
                requested: cmd.rooms,
                available: free.available_rooms(),
            };
            record_conflict(&err);
            return Err(err);
        }

        let candidates: Vec<i32> = self
            .repos
            .rooms()
            .list_available_by_type(room_type.id)
            .await?
            .iter()
            .map(|r| r.id)
            .collect();

        let _guard = self.locks.lock_many(&candidates).await;
        let uow = self.transactions.begin().await?;
        let result = async {
            let mut picked: Vec<Room> = Vec::new();
            for &room_id in &candidates {
                if picked.len() as u32 == cmd.rooms {
                    break;
                }
                let Some(room) = uow.rooms().find_by_id_for_update(room_id).await? else {
                    continue;
                };
                if !room.is_available() || room.room_type_id != room_type.id {
                    continue;
                }
                let conflicts = OverlapGuard::conflicts(uow.bookings(), room.id, &stay, None).await?;
                if conflicts.is_empty() {
                    picked.push(room);
                }
            }

            if (picked.len() as u32) < cmd.rooms {
                return Err(DomainError::InsufficientAvailability {
                    room_type: room_type.category.to_string(),
                    requested: cmd.rooms,
                    available: picked.len() as u32,
                });
            }

            let mut booked = Vec::with_capacity(picked.len());
            for room in picked {
                let new = NewBooking::new(
                    room.id,
                    cmd.guest.clone(),
                    stay,
                    room_type.price_per_night,
                )?;
                let booking = uow.bookings().insert(new).await?;
                booked.push((booking, room));
            }
            Ok::<_, DomainError>(booked)
        }
        .await;
        let booked = settle(uow, result).await?;

        metrics::counter!("bookings_created_total", "path" => "by_type")
            .increment(booked.len() as u64);
        info!(
            room_type = %room_type.category,
            rooms = booked.len(),
            %stay,
            "Bookings created for room type"
        );

        Ok(receipt(&self.template, &room_type, booked))
    }

    // ── Transitions ────────────────────────────────────────────

    /// `pending → confirmed`. The room is re-checked for overlaps, excluding
    /// this booking, and flipped to `booked`.
    pub async fn confirm(&self, id: i32) -> DomainResult<Booking> {
        let room_id = self.get(id).await?.room_id;

        let _guard = self.locks.lock(room_id).await;
        let uow = self.transactions.begin().await?;
        let result = async {
            let booking = load(uow.as_ref(), id).await?;
            booking.ensure_transition(BookingStatus::Confirmed, "confirm")?;

            let room = uow
                .rooms()
                .find_by_id_for_update(booking.room_id)
                .await?
                .ok_or_else(|| DomainError::RoomNotFound(booking.room_id.to_string()))?;

            let stay = booking.stay()?;
            OverlapGuard::ensure_no_conflict(uow.bookings(), room.id, &stay, Some(booking.id))
                .await?;

            compare_and_set(uow.as_ref(), &booking, BookingStatus::Confirmed, "confirm").await?;
            if room.status == RoomStatus::Available {
                uow.rooms().update_status(room.id, RoomStatus::Booked).await?;
            }
            load(uow.as_ref(), id).await
        }
        .await;
        let booking = settle(uow, result).await?;

        record_transition(BookingStatus::Confirmed);
        info!(booking_id = id, room_id, "Booking confirmed");
        Ok(booking)
    }

    /// `pending|confirmed → cancelled`. A cancelled confirmed booking frees
    /// its room when nothing else still holds it.
    pub async fn cancel(&self, id: i32) -> DomainResult<Booking> {
        let room_id = self.get(id).await?.room_id;

        let _guard = self.locks.lock(room_id).await;
        let uow = self.transactions.begin().await?;
        let result = async {
            let booking = load(uow.as_ref(), id).await?;
            booking.ensure_transition(BookingStatus::Cancelled, "cancel")?;

            let room = uow.rooms().find_by_id_for_update(booking.room_id).await?;
            compare_and_set(uow.as_ref(), &booking, BookingStatus::Cancelled, "cancel").await?;

            if booking.status == BookingStatus::Confirmed {
                if let Some(room) = room.filter(|r| r.status == RoomStatus::Booked) {
                    let remaining = uow.bookings().count_blocking_for_room(room.id, None).await?;
                    if remaining == 0 {
                        uow.rooms().update_status(room.id, RoomStatus::Available).await?;
                    }
                }
            }
            load(uow.as_ref(), id).await
        }
        .await;
        let booking = settle(uow, result).await?;

        record_transition(BookingStatus::Cancelled);
        info!(booking_id = id, room_id, "Booking cancelled");
        Ok(booking)
    }

    /// Staff check-in: `confirmed → checked_in`, not before the stay starts.
    pub async fn check_in(&self, id: i32) -> DomainResult<Booking> {
        let room_id = self.get(id).await?.room_id;
        let today = self.clock.today();

        let _guard = self.locks.lock(room_id).await;
        let uow = self.transactions.begin().await?;
        let result = async {
            let booking = load(uow.as_ref(), id).await?;
            booking.ensure_transition(BookingStatus::CheckedIn, "check in")?;
            if booking.check_in > today {
                return Err(DomainError::InvalidTransition {
                    booking_id: booking.id,
                    from: booking.status,
                    action: "check in",
                });
            }

            let room = uow.rooms().find_by_id_for_update(booking.room_id).await?;
            compare_and_set(uow.as_ref(), &booking, BookingStatus::CheckedIn, "check in").await?;
            if let Some(room) = room.filter(|r| r.status == RoomStatus::Available) {
                uow.rooms().update_status(room.id, RoomStatus::Booked).await?;
            }
            load(uow.as_ref(), id).await
        }
        .await;
        let booking = settle(uow, result).await?;

        record_transition(BookingStatus::CheckedIn);
        info!(booking_id = id, room_id, "Guest checked in");
        Ok(booking)
    }

    /// Staff check-out: `checked_in → checked_out`; the room becomes `available`.
    pub async fn check_out(&self, id: i32) -> DomainResult<Booking> {
        let room_id = self.get(id).await?.room_id;

        let _guard = self.locks.lock(room_id).await;
        let uow = self.transactions.begin().await?;
        let result = async {
            let booking = load(uow.as_ref(), id).await?;
            // confirmed -> checked_out is reserved for reconciliation
            if booking.status != BookingStatus::CheckedIn {
                return Err(DomainError::InvalidTransition {
                    booking_id: booking.id,
                    from: booking.status,
                    action: "check out",
                });
            }

            let room = uow.rooms().find_by_id_for_update(booking.room_id).await?;
            compare_and_set(uow.as_ref(), &booking, BookingStatus::CheckedOut, "check out")
                .await?;
            if let Some(room) = room {
                uow.rooms().update_status(room.id, RoomStatus::Available).await?;
            }
            load(uow.as_ref(), id).await
        }
        .await;
        let booking = settle(uow, result).await?;

        record_transition(BookingStatus::CheckedOut);
        info!(booking_id = id, room_id, "Guest checked out");
        Ok(booking)
    }

    // ── Queries ────────────────────────────────────────────────

    pub async fn get(&self, id: i32) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound(id))
    }

    /// Newest first. `limit` defaults to the configured page size, max 100.
    pub async fn list(
        &self,
        status: Option<BookingStatus>,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> DomainResult<PaginatedResult<Booking>> {
        let page = validate_pagination(limit, offset, self.default_page_size);
        let filter = BookingFilter {
            status,
            ..Default::default()
        };
        self.repos.bookings().list(&filter, page).await
    }

    pub async fn check_availability(
        &self,
        check_in: chrono::NaiveDate,
        check_out: chrono::NaiveDate,
        room_type: Option<&str>,
    ) -> DomainResult<Vec<RoomTypeAvailability>> {
        let stay = StayPeriod::new(check_in, check_out)?;
        self.availability.check(&stay, room_type).await
    }
}

// ── Helpers ────────────────────────────────────────────────────

async fn settle<T>(uow: Box<dyn UnitOfWork>, result: DomainResult<T>) -> DomainResult<T> {
    let result = finish(uow, result).await;
    if let Err(e) = &result {
        record_conflict(e);
    }
    result
}

async fn load(uow: &dyn UnitOfWork, id: i32) -> DomainResult<Booking> {
    uow.bookings()
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound(id))
}

async fn room_type_of(uow: &dyn UnitOfWork, room: &Room) -> DomainResult<RoomType> {
    uow.room_types()
        .find_by_id(room.room_type_id)
        .await?
        .ok_or_else(|| DomainError::RoomTypeNotFound(room.room_type_id.to_string()))
}

/// Move `booking` to `to` only if its row still holds the status we read.
async fn compare_and_set(
    uow: &dyn UnitOfWork,
    booking: &Booking,
    to: BookingStatus,
    action: &'static str,
) -> DomainResult<()> {
    if uow
        .bookings()
        .transition(booking.id, &[booking.status], to)
        .await?
    {
        return Ok(());
    }

    let current = load(uow, booking.id).await?;
    Err(DomainError::InvalidTransition {
        booking_id: booking.id,
        from: current.status,
        action,
    })
}

fn receipt(
    template: &ConfirmationTemplate,
    room_type: &RoomType,
    booked: Vec<(Booking, Room)>,
) -> BookingReceipt {
    let confirmation = template.render(room_type, &booked);
    BookingReceipt {
        bookings: booked.into_iter().map(|(b, _)| b).collect(),
        confirmation,
    }
}

fn record_transition(to: BookingStatus) {
    metrics::counter!("booking_transitions_total", "to" => to.as_str()).increment(1);
}

fn record_conflict(err: &DomainError) {
    if err.is_conflict() {
        metrics::counter!("booking_conflicts_total", "kind" => err.code()).increment(1);
    }
}
