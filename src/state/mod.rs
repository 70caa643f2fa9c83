mod tile_locks;

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{config::AppConfig, dao::board_store::BoardStore, error::ServiceError};

pub use self::tile_locks::{TileGuard, TileKey, TileLocks};

/// Handle to the application state shared by handlers and background tasks.
pub type SharedState = Arc<AppState>;

/// Central application state holding the board store handle and the toggle guards.
pub struct AppState {
    board_store: RwLock<Option<Arc<dyn BoardStore>>>,
    degraded: watch::Sender<bool>,
    tile_locks: TileLocks,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            board_store: RwLock::new(None),
            degraded: degraded_tx,
            tile_locks: TileLocks::new(),
            config,
        })
    }

    /// Build a state with `store` already installed.
    pub fn with_store(config: AppConfig, store: Arc<dyn BoardStore>) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(false);
        Arc::new(Self {
            board_store: RwLock::new(Some(store)),
            degraded: degraded_tx,
            tile_locks: TileLocks::new(),
            config,
        })
    }

    /// Obtain a handle to the current board store, if one is installed.
    pub async fn board_store(&self) -> Option<Arc<dyn BoardStore>> {
        let guard = self.board_store.read().await;
        guard.as_ref().cloned()
    }

    /// Current board store, or [`ServiceError::Degraded`] when none is installed
    /// or the installed one failed its last health check.
    pub async fn require_board_store(&self) -> Result<Arc<dyn BoardStore>, ServiceError> {
        if self.is_degraded() {
            return Err(ServiceError::Degraded);
        }
        self.board_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new board store implementation and leave degraded mode.
    pub async fn install_board_store(&self, store: Arc<dyn BoardStore>) {
        {
            let mut guard = self.board_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current board store and enter degraded mode.
    pub async fn clear_board_store(&self) {
        {
            let mut guard = self.board_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Per-tile locks used by [`ToggleGuard::PerTile`](crate::config::ToggleGuard::PerTile).
    pub fn tile_locks(&self) -> &TileLocks {
        &self.tile_locks
    }

    /// Configuration loaded at startup.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Broadcast the degraded flag when the value changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::board_store::MemoryBoardStore;

    #[tokio::test]
    async fn starts_degraded_without_store() {
        let state = AppState::new(AppConfig::default());
        assert!(state.is_degraded());
        assert!(matches!(
            state.require_board_store().await,
            Err(ServiceError::Degraded)
        ));
    }

    #[tokio::test]
    async fn installing_and_clearing_store_broadcasts_degraded_flag() {
        let state = AppState::new(AppConfig::default());
        let mut watcher = state.degraded_watcher();
        assert!(*watcher.borrow_and_update());

        state
            .install_board_store(Arc::new(MemoryBoardStore::new()))
            .await;
        assert!(watcher.has_changed().unwrap());
        assert!(!*watcher.borrow_and_update());
        assert!(!state.is_degraded());

        state.update_degraded(true);
        assert!(*watcher.borrow_and_update());
        assert!(matches!(
            state.require_board_store().await,
            Err(ServiceError::Degraded)
        ));
        state.update_degraded(false);
        watcher.borrow_and_update();

        state.clear_board_store().await;
        assert!(*watcher.borrow_and_update());
        assert!(state.is_degraded());
    }
}
