//! Background task that moves bookings along as the calendar advances.
//!
//! Each tick runs two passes in one transaction: stays that ended before
//! today are checked out (and their rooms released), then confirmed stays
//! starting today are checked in. A failed tick changes nothing and is
//! retried on the next interval.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::application::booking::RoomLocks;
use crate::application::unit_of_work::finish;
use crate::domain::booking::BookingStatus;
use crate::domain::repositories::{RepositoryProvider, TransactionManager, UnitOfWork};
use crate::domain::room::RoomStatus;
use crate::shared::shutdown::ShutdownSignal;
use crate::shared::{Clock, DomainError, DomainResult};

pub const DEFAULT_INTERVAL_SECS: u64 = 3600;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    pub checked_out: u64,
    pub checked_in: u64,
}

impl ReconciliationReport {
    pub fn is_empty(&self) -> bool {
        self.checked_out == 0 && self.checked_in == 0
    }
}

pub struct ReconciliationJob {
    repos: Arc<dyn RepositoryProvider>,
    transactions: Arc<dyn TransactionManager>,
    locks: Arc<RoomLocks>,
    clock: Arc<dyn Clock>,
}

impl ReconciliationJob {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        transactions: Arc<dyn TransactionManager>,
        locks: Arc<RoomLocks>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repos,
            transactions,
            locks,
            clock,
        }
    }

    /// One pass for the clock's current date.
    pub async fn run_now(&self) -> DomainResult<ReconciliationReport> {
        self.run_once(self.clock.today()).await
    }

    /// One pass as of `today`. Running it twice for the same date is a no-op
    /// the second time.
    pub async fn run_once(&self, today: NaiveDate) -> DomainResult<ReconciliationReport> {
        let due_out = self.repos.bookings().find_due_for_checkout(today).await?;
        let due_in = self.repos.bookings().find_due_for_checkin(today).await?;
        if due_out.is_empty() && due_in.is_empty() {
            debug!(%today, "Nothing to reconcile");
            return Ok(ReconciliationReport::default());
        }

        let rooms: Vec<i32> = due_out
            .iter()
            .chain(due_in.iter())
            .map(|b| b.room_id)
            .collect();

        let guard = self.locks.lock_many(&rooms).await;
        let uow = self.transactions.begin().await?;
        let result = apply(uow.as_ref(), today, guard.rooms()).await;
        let report = finish(uow, result).await?;

        metrics::counter!("reconciliation_transitions_total", "kind" => "checked_out")
            .increment(report.checked_out);
        metrics::counter!("reconciliation_transitions_total", "kind" => "checked_in")
            .increment(report.checked_in);
        info!(
            %today,
            checked_out = report.checked_out,
            checked_in = report.checked_in,
            "Reconciliation pass applied"
        );
        Ok(report)
    }

    /// Spawn the recurring task. It stops when `shutdown` fires.
    pub fn start(self: Arc<Self>, interval_secs: u64, shutdown: ShutdownSignal) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(interval_secs, "Reconciliation task started");

            let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = self.run_now().await {
                            warn!(error = %e, "Reconciliation pass failed; retrying next tick");
                        }
                    }
                    _ = shutdown.notified().wait() => {
                        info!("Reconciliation task shutting down");
                        break;
                    }
                }
            }

            info!("Reconciliation task stopped");
        })
    }
}

/// Both passes inside one transaction. Bookings whose room is not in
/// `locked` showed up after the pre-read and are left for the next tick.
async fn apply(
    uow: &dyn UnitOfWork,
    today: NaiveDate,
    locked: &[i32],
) -> DomainResult<ReconciliationReport> {
    let mut report = ReconciliationReport::default();

    for booking in uow.bookings().find_due_for_checkout(today).await? {
        if locked.binary_search(&booking.room_id).is_err() {
            continue;
        }
        let moved = uow
            .bookings()
            .transition(booking.id, &BookingStatus::BLOCKING, BookingStatus::CheckedOut)
            .await?;
        if !moved {
            continue;
        }
        report.checked_out += 1;

        // The room stays booked while another stay still holds it.
        let remaining = uow
            .bookings()
            .count_blocking_for_room(booking.room_id, None)
            .await?;
        if remaining > 0 {
            continue;
        }
        match uow
            .rooms()
            .update_status(booking.room_id, RoomStatus::Available)
            .await
        {
            Ok(()) | Err(DomainError::RoomNotFound(_)) => {}
            Err(e) => return Err(e),
        }
    }

    for booking in uow.bookings().find_due_for_checkin(today).await? {
        if locked.binary_search(&booking.room_id).is_err() {
            continue;
        }
        let moved = uow
            .bookings()
            .transition(booking.id, &[BookingStatus::Confirmed], BookingStatus::CheckedIn)
            .await?;
        if moved {
            report.checked_in += 1;
        }
    }

    Ok(report)
}
