//! In-process room locks
//!
//! SQLite has no row locks, so every read-then-write sequence on a room is
//! serialised here before its transaction opens. Locks are always taken
//! before `begin()`: a task holding a transaction never waits on a room lock.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of one async mutex per room id.
#[derive(Debug, Default)]
pub struct RoomLocks {
    rooms: DashMap<i32, Arc<Mutex<()>>>,
}

/// Held room locks; released on drop.
#[derive(Debug)]
pub struct RoomGuard {
    rooms: Vec<i32>,
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl RoomGuard {
    pub fn rooms(&self) -> &[i32] {
        &self.rooms
    }
}

impl RoomLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, room_id: i32) -> Arc<Mutex<()>> {
        self.rooms.entry(room_id).or_default().value().clone()
    }

    pub async fn lock(&self, room_id: i32) -> RoomGuard {
        self.lock_many(&[room_id]).await
    }

    /// Lock several rooms in ascending id order, so two multi-room callers
    /// can never wait on each other in a cycle.
    pub async fn lock_many(&self, room_ids: &[i32]) -> RoomGuard {
        let mut rooms = room_ids.to_vec();
        rooms.sort_unstable();
        rooms.dedup();

        let mut guards = Vec::with_capacity(rooms.len());
        for &room_id in &rooms {
            let slot = self.slot(room_id);
            guards.push(slot.lock_owned().await);
        }

        RoomGuard {
            rooms,
            _guards: guards,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn lock_many_sorts_and_dedups() {
        let locks = RoomLocks::new();
        let guard = locks.lock_many(&[3, 1, 3, 2]).await;
        assert_eq!(guard.rooms(), &[1, 2, 3]);
    }

    #[tokio::test]
    async fn same_room_is_exclusive() {
        let locks = Arc::new(RoomLocks::new());
        let guard = locks.lock(7).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.lock(7).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .expect("contender should acquire after release")
            .unwrap();
    }

    #[tokio::test]
    async fn different_rooms_do_not_block() {
        let locks = RoomLocks::new();
        let _a = locks.lock(1).await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.lock(2)).await;
        assert!(b.is_ok());
    }
}
