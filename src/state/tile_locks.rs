//! Registry of per-tile async mutexes serializing claim toggles.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Address of one tile across all boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    /// Board the tile belongs to.
    pub board_id: Uuid,
    /// Column of the tile.
    pub x: u32,
    /// Row of the tile.
    pub y: u32,
}

/// Lazily created mutex per tile; tiles never contend with each other.
///
/// An entry only lives while some toggle holds or waits for it, so keys naming boards or
/// tiles that do not exist never accumulate.
#[derive(Default)]
pub struct TileLocks {
    locks: DashMap<TileKey, Arc<Mutex<()>>>,
}

/// Exclusive access to one tile; releasing it drops the registry entry once unused.
pub struct TileGuard<'a> {
    locks: &'a TileLocks,
    key: TileKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for TileGuard<'_> {
    fn drop(&mut self) {
        // Release the mutex first so our own reference no longer counts.
        drop(self.guard.take());
        self.locks
            .locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

impl TileLocks {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`; the guard releases it on drop.
    pub async fn lock(&self, key: TileKey) -> TileGuard<'_> {
        let mutex = self.locks.entry(key).or_default().clone();
        let guard = mutex.lock_owned().await;
        TileGuard {
            locks: self,
            key,
            guard: Some(guard),
        }
    }

    /// Number of tiles currently locked or awaited.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no tile is locked or awaited.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    fn key(board_id: Uuid, x: u32, y: u32) -> TileKey {
        TileKey { board_id, x, y }
    }

    #[tokio::test]
    async fn same_tile_waits_for_the_holder() {
        let locks = Arc::new(TileLocks::new());
        let board = Uuid::new_v4();
        let guard = locks.lock(key(board, 1, 1)).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock(key(board, 1, 1)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        timeout(Duration::from_secs(1), contender)
            .await
            .expect("contender acquires after release")
            .unwrap();
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn different_tiles_do_not_contend() {
        let locks = TileLocks::new();
        let board = Uuid::new_v4();
        let _first = locks.lock(key(board, 0, 0)).await;
        let second = timeout(Duration::from_millis(100), locks.lock(key(board, 0, 1))).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn released_tiles_leave_the_registry() {
        let locks = TileLocks::new();
        for x in 0..100 {
            drop(locks.lock(key(Uuid::new_v4(), x, u32::MAX)).await);
        }
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn entry_survives_while_a_waiter_holds_it() {
        let locks = Arc::new(TileLocks::new());
        let board = Uuid::new_v4();
        let guard = locks.lock(key(board, 0, 0)).await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock(key(board, 0, 0)).await;
                tokio::time::sleep(Duration::from_millis(20)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(guard);
        assert_eq!(locks.len(), 1);

        waiter.await.unwrap();
        assert!(locks.is_empty());
    }
}
