//! Bingo Back binary entrypoint wiring the REST layer to the configured board store.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use bingo_back::{
    config::{AppConfig, StoreBackend},
    dao::{
        board_store::{BoardStore, MemoryBoardStore},
        storage::StorageError,
    },
    routes,
    services::storage_supervisor,
    state::{AppState, SharedState},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let backend = StoreBackend::from_env().context("selecting board store")?;

    let app_state = match backend {
        StoreBackend::Memory => {
            info!("using in-memory board store; boards are lost on restart");
            AppState::with_store(config, Arc::new(MemoryBoardStore::new()))
        }
        remote => {
            let state = AppState::new(config);
            tokio::spawn(storage_supervisor::run(state.clone(), move || {
                connect_store(remote)
            }));
            state
        }
    };

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, backend = ?backend, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Open a connection to the remote board store selected by `backend`.
async fn connect_store(backend: StoreBackend) -> Result<Arc<dyn BoardStore>, StorageError> {
    match backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryBoardStore::new())),
        #[cfg(feature = "couch-store")]
        StoreBackend::Couch => {
            use bingo_back::dao::board_store::couchdb::{CouchBoardStore, CouchConfig};

            let config = CouchConfig::from_env()?;
            Ok(Arc::new(CouchBoardStore::connect(config).await?))
        }
        #[cfg(feature = "mongo-store")]
        StoreBackend::Mongo => {
            use bingo_back::dao::board_store::mongodb::{MongoBoardStore, MongoConfig};

            let config = MongoConfig::from_env().await?;
            Ok(Arc::new(MongoBoardStore::connect(config).await?))
        }
        #[allow(unreachable_patterns)]
        other => Err(StorageError::unavailable(
            format!("board store {other:?} is not compiled in"),
            std::io::Error::from(std::io::ErrorKind::Unsupported),
        )),
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
