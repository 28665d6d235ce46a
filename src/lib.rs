pub mod api;
pub mod config;
pub mod db;
pub mod middleware;
pub mod server;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use db::MovieRepo;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] db::DbError),
    #[error("Server error: {0}")]
    Server(String),
}

pub async fn run(config: config::Config) -> Result<(), ServerError> {
    let db_path = config.get_database_path().to_string();

    info!("Opening database at {}", db_path);
    let db = Arc::new(db::SqliteRepository::open(&db_path).await?);

    // Fails here, before the listener exists, if the table is missing.
    let count = db.count_movies().await?;
    info!("Connected to the SQLite database ({} movies)", count);

    let addr: SocketAddr = config
        .listen_addr()
        .parse()
        .map_err(|e| ServerError::Server(format!("Invalid address: {}", e)))?;

    let state = server::AppState::new(config, db);
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

    info!("Server is running on port {}", addr.port());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;

    Ok(())
}
