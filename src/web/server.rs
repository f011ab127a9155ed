//! HTTP server: shared state, routes and the serve loop.

use super::handlers;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::store::{EntryRepository, ReferenceRepository};
use axum::Router;
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state.
pub struct AppState {
    pub entries: EntryRepository,
    pub references: ReferenceRepository,
    /// Rows per list page.
    pub page_size: u32,
}

impl AppState {
    /// Build the state on top of an already opened pool.
    pub async fn new(pool: Arc<DbPool>, page_size: u32) -> AppResult<Self> {
        Ok(Self {
            entries: EntryRepository::new(Arc::clone(&pool)).await?,
            references: ReferenceRepository::new(pool),
            page_size: page_size.max(1),
        })
    }
}

/// All entry routes on top of the given state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/list", get(handlers::list))
        .route("/create", get(handlers::create))
        .route("/save", post(handlers::save))
        .route("/edit/{id}", get(handlers::edit))
        .route("/update/{id}", post(handlers::update))
        .route("/delete/{id}", post(handlers::delete))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
    state: Arc<AppState>,
}

impl Server {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self {
            addr,
            state: Arc::new(state),
        }
    }

    /// Resolve the listen address from the configuration.
    pub fn addr_from(cfg: &Config) -> AppResult<SocketAddr> {
        cfg.bind_address()
            .parse()
            .map_err(|e| AppError::Config(format!("invalid listen address '{}': {e}", cfg.bind_address())))
    }

    /// Runs the server until Ctrl+C / SIGTERM.
    ///
    /// The database pool is released (and its workers joined) once the last
    /// in-flight request has finished.
    pub async fn run(self) -> AppResult<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!(addr = %self.addr, "Starting entrybook server");
        eprintln!("\n\x1b[32m✓\x1b[0m Server listening on http://{}", self.addr);
        eprintln!("  Press Ctrl+C to stop\n");

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::Server(e.to_string()))?;

        tracing::info!("Server shutdown complete");
        eprintln!("\x1b[32m✓\x1b[0m Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            eprintln!("\n\x1b[33m⚡\x1b[0m Received Ctrl+C, shutting down gracefully...");
        },
        () = terminate => {
            eprintln!("\n\x1b[33m⚡\x1b[0m Received SIGTERM, shutting down gracefully...");
        },
    }
}
