use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;

pub type Db = Surreal<Any>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: env::var("SURREALDB_URL").unwrap_or_else(|_| "memory".to_string()),
            namespace: env::var("SURREALDB_NAMESPACE").unwrap_or_else(|_| "wishlist".to_string()),
            database: env::var("SURREALDB_DATABASE").unwrap_or_else(|_| "wishlist".to_string()),
            username: env::var("SURREALDB_USERNAME").ok(),
            password: env::var("SURREALDB_PASSWORD").ok(),
        }
    }
}

pub async fn create_connection(config: DatabaseConfig) -> Result<Db> {
    let db = surrealdb::engine::any::connect(config.url).await?;

    // Sign in if credentials are provided
    if let (Some(username), Some(password)) = (config.username, config.password) {
        db.signin(Root {
            username: &username,
            password: &password,
        })
        .await?;
    }

    db.use_ns(config.namespace).use_db(config.database).await?;

    Ok(db)
}

pub async fn ensure_schema(db: &Db) -> Result<()> {
    let schema_queries = [
        // Registered users
        "DEFINE TABLE IF NOT EXISTS user SCHEMAFULL;
         DEFINE FIELD IF NOT EXISTS user_id ON TABLE user TYPE int;
         DEFINE FIELD IF NOT EXISTS username ON TABLE user TYPE string ASSERT string::len($value) > 0;
         DEFINE FIELD IF NOT EXISTS password_hash ON TABLE user TYPE string;
         DEFINE FIELD IF NOT EXISTS created_at ON TABLE user VALUE time::now();",

        // Wishlists, owned by exactly one user
        "DEFINE TABLE IF NOT EXISTS wishlist SCHEMAFULL;
         DEFINE FIELD IF NOT EXISTS wishlist_id ON TABLE wishlist TYPE int;
         DEFINE FIELD IF NOT EXISTS user_id ON TABLE wishlist TYPE int;
         DEFINE FIELD IF NOT EXISTS name ON TABLE wishlist TYPE string;
         DEFINE FIELD IF NOT EXISTS created_at ON TABLE wishlist VALUE time::now();",

        // Books, each inside one wishlist
        "DEFINE TABLE IF NOT EXISTS book SCHEMAFULL;
         DEFINE FIELD IF NOT EXISTS book_id ON TABLE book TYPE int;
         DEFINE FIELD IF NOT EXISTS wishlist_id ON TABLE book TYPE int;
         DEFINE FIELD IF NOT EXISTS title ON TABLE book TYPE string;
         DEFINE FIELD IF NOT EXISTS author ON TABLE book TYPE string;
         DEFINE FIELD IF NOT EXISTS created_at ON TABLE book VALUE time::now();",

        // Per-table ID counters
        "DEFINE TABLE IF NOT EXISTS sequence SCHEMAFULL;
         DEFINE FIELD IF NOT EXISTS value ON TABLE sequence TYPE int DEFAULT 0;",

        // Indexes
        "DEFINE INDEX IF NOT EXISTS user_username ON TABLE user COLUMNS username UNIQUE;
         DEFINE INDEX IF NOT EXISTS user_user_id ON TABLE user COLUMNS user_id UNIQUE;
         DEFINE INDEX IF NOT EXISTS wishlist_owner ON TABLE wishlist COLUMNS user_id;
         DEFINE INDEX IF NOT EXISTS wishlist_wishlist_id ON TABLE wishlist COLUMNS wishlist_id UNIQUE;
         DEFINE INDEX IF NOT EXISTS book_wishlist ON TABLE book COLUMNS wishlist_id;
         DEFINE INDEX IF NOT EXISTS book_book_id ON TABLE book COLUMNS book_id UNIQUE;",
    ];

    for query in schema_queries {
        db.query(query).await?.check()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> DatabaseConfig {
        DatabaseConfig {
            url: "memory".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let db = create_connection(memory_config()).await.unwrap();
        ensure_schema(&db).await.unwrap();
        ensure_schema(&db).await.unwrap();
    }
}
