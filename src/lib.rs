// Core modules
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod search;
pub mod service;
pub mod store;
pub mod types;

// Re-export key types and functions
pub use api::{AppState, create_router};
pub use config::{AppConfig, load_config};
pub use db::{DatabaseConfig, SurrealStore, create_connection, ensure_schema};
pub use error::{ServiceError, ServiceResult};
pub use search::BookSearchClient;
pub use service::{UserService, WishlistService};
pub use types::{BookId, UserId, WishlistId};

use anyhow::Result;
use tracing::info;

/// Connect to the configured database and make sure the schema exists.
pub async fn open_store(config: &AppConfig) -> Result<SurrealStore> {
    let db = create_connection(config.database.clone()).await?;
    ensure_schema(&db).await?;
    Ok(SurrealStore::new(db))
}

/// Build the fully wired application state from a validated configuration.
pub async fn build_state(config: &AppConfig) -> Result<AppState> {
    config.validate()?;
    info!(
        "JWT secret fingerprint: {}",
        config.auth.secret_fingerprint()
    );

    let store = open_store(config).await?;
    let search = BookSearchClient::new(&config.book_search)?;

    Ok(AppState::new(store, &config.auth, search))
}
