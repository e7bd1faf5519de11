use std::net::SocketAddr;

use sqlx::SqlitePool;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::db::{MeasurementRepository, StationRepository};
use crate::services::ClimateService;

/// Running HTTP server plus the pool it reads from
///
/// The pool is shared by every request and closed once the server has
/// finished draining connections.
pub struct Application {
    pub server_handle: JoinHandle<Result<(), std::io::Error>>,
    local_addr: SocketAddr,
    pool: SqlitePool,
}

impl Application {
    /// Build repositories, services and router, then spawn the server.
    ///
    /// The listener is bound before returning so bind errors surface here.
    pub async fn build(config: Config, pool: SqlitePool) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Initializing application components");

        let measurement_repo = MeasurementRepository::new(pool.clone());
        let station_repo = StationRepository::new(pool.clone());
        let climate_service = ClimateService::new(measurement_repo, station_repo);

        let app_state = AppState { climate_service };
        let app = create_router(app_state).layer(TraceLayer::new_for_http());

        let addr = config.server_addr();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;
        info!("Starting HTTP server on {}", local_addr);

        let server_handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
        });

        info!("Application initialized successfully");

        Ok(Self {
            server_handle,
            local_addr,
            pool,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Run until the server stops, then close the pool
    pub async fn run_until_stopped(self) -> Result<(), Box<dyn std::error::Error>> {
        self.server_handle.await??;
        info!("Server stopped, closing database pool");
        self.pool.close().await;
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
