//! # sitectl: Worker Statistics for Construction Site Management
//!
//! `sitectl` keeps the derived statistics of a construction dashboard's workers up to date and
//! provides the map distance helpers the dashboard displays next to project locations.
//!
//! ## Overview
//!
//! The dashboard's backend stores projects, the workers assigned to them, and complaints filed
//! against workers. Each worker record also carries three derived fields: how many projects they
//! are currently active on, how many they have completed, and a success rate. `sitectl` is the
//! process that recomputes those fields from the raw data and writes them back.
//!
//! ### What It Does
//!
//! A recompute reads every project with its status and assignments plus complaint counts,
//! classifies each project status as active, completed, or neither, counts per worker, and
//! derives a success rate in percent. Each worker's record is then overwritten. A failed write
//! for one worker is reported and does not stop the others; a failed read aborts the run before
//! anything is written.
//!
//! ## Architecture
//!
//! The **statistics layer** ([`stats`]) holds the status classification, the pure computation,
//! and [`stats::StatsAggregator`] which drives a run through the [`stats::ProjectSource`] and
//! [`stats::WorkerStatsSink`] traits.
//!
//! The **database layer** ([`db`]) implements those traits on top of the backend's Postgres
//! tables.
//!
//! The **API layer** ([`api`]) exposes the stored statistics, an on-demand recompute, and the
//! distance calculation over HTTP.
//!
//! **Background services** run alongside the HTTP server: a scheduler recomputes statistics on
//! a fixed interval, on one replica at a time chosen via Postgres advisory lock leader election.
//!
//! The **geo module** ([`geo`]) is independent of everything else: haversine distance and
//! display formatting.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use sitectl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = sitectl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     sitectl::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     }).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.
pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod geo;
mod leader_election;
pub mod stats;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use crate::config::{BackgroundServicesConfig, DatabaseConfig};
use crate::db::handlers::PostgresStatsStore;
use crate::stats::{StatsAggregator, StatsScheduler, WorkerStatsReader};
use axum::{Router, routing::get};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tokio::net::TcpListener;
use tokio_util::sync::{CancellationToken, DropGuard};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, instrument};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .aggregator(aggregator)
///     .stats_reader(Arc::new(store))
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    /// Runs on-demand recomputes; shares its store with the background scheduler
    pub aggregator: StatsAggregator,
    pub stats_reader: Arc<dyn WorkerStatsReader>,
}

/// Connect to the backend database with the configured pool settings.
#[instrument(skip_all, err)]
pub async fn connect_pool(database: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let settings = &database.pool;
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout())
        .idle_timeout(settings.idle_timeout())
        .max_lifetime(settings.max_lifetime())
        .connect(&database.url)
        .await?;

    info!(max_connections = settings.max_connections, "Connected to backend database");
    Ok(pool)
}

/// An aggregator reading from and writing to the backend database.
pub fn stats_aggregator(pool: PgPool, config: &Config) -> StatsAggregator {
    let store = Arc::new(PostgresStatsStore::new(pool));
    StatsAggregator::new(store.clone(), store).with_write_concurrency(config.stats.write_concurrency)
}

/// Build the HTTP router: `/healthz` plus the API under `/api/v1`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api/v1", api::routes())
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Container for background services and their lifecycle management.
///
/// # Graceful Shutdown
///
/// The struct provides a [`shutdown`](BackgroundServices::shutdown) method to gracefully
/// stop all background tasks. When dropped, the `drop_guard` will automatically cancel
/// the shutdown token, signaling all tasks to stop.
pub struct BackgroundServices {
    scheduler: Option<StatsScheduler>,
    background_tasks: Vec<tokio::task::JoinHandle<()>>,
    shutdown_token: CancellationToken,
    // Pub so that we can disarm it if we want to
    pub drop_guard: Option<DropGuard>,
}

impl BackgroundServices {
    /// Gracefully shutdown all background tasks
    pub async fn shutdown(self) {
        // Signal all background tasks to shutdown
        self.shutdown_token.cancel();

        // Leader election releases its lock and stops the scheduler on the way out
        for handle in self.background_tasks {
            let _ = handle.await;
        }

        if let Some(scheduler) = self.scheduler {
            scheduler.stop().await;
        }
    }
}

/// Setup background services (statistics scheduler, leader election)
async fn setup_background_services(
    pool: PgPool,
    aggregator: StatsAggregator,
    config: &BackgroundServicesConfig,
    shutdown_token: CancellationToken,
) -> anyhow::Result<BackgroundServices> {
    let drop_guard = shutdown_token.clone().drop_guard();
    let mut background_tasks = Vec::new();

    if !config.stats_scheduler.enabled {
        info!("Statistics scheduler disabled by configuration");
        return Ok(BackgroundServices {
            scheduler: None,
            background_tasks,
            shutdown_token,
            drop_guard: Some(drop_guard),
        });
    }

    let scheduler = StatsScheduler::new(aggregator, config.stats_scheduler.recompute_interval);

    if !config.leader_election.enabled {
        info!("Launching without leader election: running as leader");
        scheduler.start(shutdown_token.clone()).await;
    } else {
        let is_leader = Arc::new(AtomicBool::new(false));
        let scheduler_gain = scheduler.clone();
        let scheduler_lose = scheduler.clone();
        let session_shutdown = shutdown_token.clone();

        let handle = tokio::spawn(leader_election::leader_election_task(
            pool,
            is_leader,
            leader_election::STATS_LEADER_LOCK_ID,
            leader_election::LEADER_CHECK_INTERVAL,
            shutdown_token.clone(),
            move || {
                // This closure is run when a replica becomes the leader
                let scheduler = scheduler_gain.clone();
                let shutdown = session_shutdown.clone();
                async move {
                    scheduler.start(shutdown).await;
                    Ok::<_, anyhow::Error>(())
                }
            },
            move || {
                // This closure is run when a replica stops being the leader
                let scheduler = scheduler_lose.clone();
                async move {
                    scheduler.stop().await;
                    tracing::info!("Statistics scheduler stopped (lost leadership)");
                    Ok::<_, anyhow::Error>(())
                }
            },
        ));
        background_tasks.push(handle);
    }

    Ok(BackgroundServices {
        scheduler: Some(scheduler),
        background_tasks,
        shutdown_token,
        drop_guard: Some(drop_guard),
    })
}

/// Main application struct that owns all resources and lifecycle.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects to the backend and starts background services
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. **Shutdown**: When the shutdown signal is received, gracefully stops all services
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
    bg_services: BackgroundServices,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let pool = connect_pool(&config.database).await?;
        Self::new_with_pool(config, pool).await
    }

    /// Create an application on an existing pool
    pub async fn new_with_pool(config: Config, pool: PgPool) -> anyhow::Result<Self> {
        info!(
            bind_address = %config.bind_address(),
            write_concurrency = config.stats.write_concurrency,
            scheduler_enabled = config.background_services.stats_scheduler.enabled,
            recompute_interval = ?config.background_services.stats_scheduler.recompute_interval,
            leader_election = config.background_services.leader_election.enabled,
            "Starting sitectl"
        );

        let aggregator = stats_aggregator(pool.clone(), &config);

        // Create a shutdown token for coordinating graceful shutdown of background tasks
        let shutdown_token = CancellationToken::new();
        let bg_services =
            setup_background_services(pool.clone(), aggregator.clone(), &config.background_services, shutdown_token).await?;

        let app_state = AppState::builder()
            .aggregator(aggregator)
            .stats_reader(Arc::new(PostgresStatsStore::new(pool.clone())))
            .build();
        let router = build_router(app_state);

        Ok(Self {
            router,
            config,
            pool,
            bg_services,
        })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> (axum_test::TestServer, BackgroundServices) {
        let server = axum_test::TestServer::new(self.router).expect("Failed to create test server");
        (server, self.bg_services)
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "sitectl listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        // Run the server with graceful shutdown
        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        // Shutdown background services and wait for tasks to complete
        self.bg_services.shutdown().await;

        // Close database connections
        info!("Closing database connections...");
        self.pool.close().await;

        // Shutdown telemetry
        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
