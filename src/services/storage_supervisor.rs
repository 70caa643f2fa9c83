use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    dao::{board_store::BoardStore, storage::StorageError},
    state::SharedState,
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);
const MAX_RECONNECT_ATTEMPTS: u32 = 3;

/// Connect the board store and keep the shared state in degraded mode while it is unavailable.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn BoardStore>, StorageError>> + Send,
{
    let mut delay = INITIAL_DELAY;

    loop {
        match connect().await {
            Ok(store) => {
                state.install_board_store(store.clone()).await;
                info!("storage connection established; leaving degraded mode");
                delay = INITIAL_DELAY;

                watch_health(&state, store.as_ref()).await;
                state.clear_board_store().await;

                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
            Err(err) => {
                warn!(error = %err, "storage connection attempt failed");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
        }
    }
}

/// Health-check `store` until it cannot be reconnected any more.
async fn watch_health(state: &SharedState, store: &dyn BoardStore) {
    loop {
        if store.health_check().await.is_ok() {
            if state.is_degraded() {
                info!("storage healthy again; leaving degraded mode");
                state.update_degraded(false);
            }
            sleep(HEALTH_POLL_INTERVAL).await;
            continue;
        }

        let mut reconnect_delay = INITIAL_DELAY;
        let mut reconnected = false;

        for attempt in 0..MAX_RECONNECT_ATTEMPTS {
            match store.try_reconnect().await {
                Ok(()) => {
                    info!("storage reconnection succeeded after health check failure");
                    reconnected = true;
                    break;
                }
                Err(err) if attempt == 0 => {
                    warn!(
                        attempt, error = %err,
                        "storage reconnect first attempt failed; entering degraded mode"
                    );
                    state.update_degraded(true);
                }
                Err(err) => warn!(attempt, error = %err, "storage reconnect attempt failed"),
            }
            sleep(reconnect_delay).await;
            reconnect_delay = (reconnect_delay * 2).min(MAX_DELAY);
        }

        if !reconnected {
            warn!("exhausted storage reconnect attempts; staying in degraded mode");
            return;
        }

        state.update_degraded(false);
        sleep(HEALTH_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::{config::AppConfig, dao::board_store::MemoryBoardStore, state::AppState};

    #[tokio::test(start_paused = true)]
    async fn leaves_degraded_mode_once_connected() {
        let state = AppState::new(AppConfig::default());
        let attempts = Arc::new(AtomicU32::new(0));

        let supervisor = {
            let attempts = attempts.clone();
            tokio::spawn(run(state.clone(), move || {
                let attempts = attempts.clone();
                async move {
                    if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                        return Err(StorageError::unavailable(
                            "first attempt".into(),
                            std::io::Error::other("refused"),
                        ));
                    }
                    Ok(Arc::new(MemoryBoardStore::new()) as Arc<dyn BoardStore>)
                }
            }))
        };

        let mut watcher = state.degraded_watcher();
        tokio::time::timeout(Duration::from_secs(30), watcher.wait_for(|degraded| !degraded))
            .await
            .expect("supervisor connects")
            .unwrap();

        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert!(state.require_board_store().await.is_ok());
        supervisor.abort();
    }
}
