pub mod calendar;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod validation;
#[cfg(test)]
mod test_utils;

use crate::calendar::Calendar;
use crate::config::Config;
use crate::db::{migrations, Database, SharedDatabase};
use crate::identity::{AllowList, IdentityGateway, RemoteProvider};
use log::{info, warn};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// Shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub db: SharedDatabase,
    pub identity: Arc<IdentityGateway>,
    pub calendar: Calendar,
}

/// Startup failures. Any of these aborts the process before it listens.
#[derive(Debug)]
pub enum InitError {
    DatabaseOpen(rusqlite::Error),
    Migration(rusqlite::Error),
    HttpClient(reqwest::Error),
    Bind(std::io::Error),
    Serve(std::io::Error),
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitError::DatabaseOpen(e) => write!(f, "Failed to open database: {e}"),
            InitError::Migration(e) => write!(f, "Failed to run database migrations: {e}"),
            InitError::HttpClient(e) => write!(f, "Failed to build identity provider client: {e}"),
            InitError::Bind(e) => write!(f, "Failed to bind listener: {e}"),
            InitError::Serve(e) => write!(f, "Server error: {e}"),
        }
    }
}

impl std::error::Error for InitError {}

/// Build the storage client and identity gateway, then serve until ctrl-c.
pub async fn run(config: Config) -> Result<(), InitError> {
    let db = Database::open(&config.db_path).map_err(InitError::DatabaseOpen)?;
    migrations::run(db.connection()).map_err(InitError::Migration)?;
    info!("using database {}", config.db_path.display());

    let allow_list = AllowList::new(config.allowed_fb_uids.iter().cloned());
    if allow_list.is_open() {
        warn!("allowed_fb_uids is empty, every identity is admitted");
    }

    let provider = RemoteProvider::new(config.identity_endpoint.clone(), config.identity_timeout)
        .map_err(InitError::HttpClient)?;

    let state = AppState {
        db: Arc::new(Mutex::new(db)),
        identity: Arc::new(IdentityGateway::new(Arc::new(provider), allow_list)),
        calendar: config.calendar,
    };
    let app = handlers::router(state, &config.static_path);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(InitError::Bind)?;
    info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(InitError::Serve)?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("listen for ctrl-c: {e}");
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
                warn!("listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
