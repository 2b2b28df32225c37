use std::path::PathBuf;

use anyhow::Result;
use book_wishlist::{AppConfig, UserId, UserService, create_router, load_config, open_store};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "book-wishlist")]
#[command(about = "Private book wishlists behind bearer-token auth")]
struct Cli {
    /// Path to a JSON config file
    #[arg(long, global = true, env = "WISHLIST_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Values that override the config file when given.
#[derive(Args, Default)]
struct Overrides {
    #[arg(long, env = "SURREALDB_URL")]
    db_url: Option<String>,
    /// HMAC secret for signing tokens
    #[arg(long, env = "WISHLIST_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,
    #[arg(long)]
    token_ttl_hours: Option<i64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Server {
        /// Bind address, e.g. 0.0.0.0:8080
        #[arg(long)]
        bind: Option<String>,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Initialize the database schema
    Init {
        #[arg(long, env = "SURREALDB_URL")]
        db_url: Option<String>,
    },
    /// List registered users
    ListUsers {
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Mint a token for a user ID (operator testing)
    IssueToken {
        #[arg(long)]
        user_id: i64,
        #[command(flatten)]
        overrides: Overrides,
    },
}

fn apply_overrides(mut config: AppConfig, overrides: Overrides) -> AppConfig {
    if let Some(url) = overrides.db_url {
        config.database.url = url;
    }
    if let Some(secret) = overrides.jwt_secret {
        config.auth.jwt_secret = secret;
    }
    if let Some(hours) = overrides.token_ttl_hours {
        config.auth.token_ttl_hours = hours;
    }
    config
}

const DEFAULT_LOG_DIRECTIVE: &str = "book_wishlist=info";

/// `RUST_LOG` when set and parseable, otherwise the crate at `info`.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|spec| !spec.trim().is_empty())
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Server { bind, overrides } => {
            let mut config = apply_overrides(config, overrides);
            if let Some(bind) = bind {
                config.bind = bind;
            }
            info!("Using database url: {}", config.database.url);

            let state = book_wishlist::build_state(&config).await?;
            let app = create_router(state);

            let listener = tokio::net::TcpListener::bind(&config.bind).await?;
            info!("Server listening on http://{}", config.bind);
            axum::serve(listener, app).await?;
        }
        Commands::Init { db_url } => {
            let mut config = config;
            if let Some(url) = db_url {
                config.database.url = url;
            }
            info!("Initializing database at {}", config.database.url);
            open_store(&config).await?;
            info!("Database initialized successfully");
        }
        Commands::ListUsers { overrides } => {
            let config = apply_overrides(config, overrides);
            let store = open_store(&config).await?;
            let users = UserService::new(store, config.auth.issuer())
                .list_users()
                .await?;

            if users.is_empty() {
                println!("No users found.");
                return Ok(());
            }

            println!("{:<10} {:<30}", "ID", "USERNAME");
            println!("{}", "-".repeat(40));
            for user in users {
                println!("{:<10} {:<30}", user.id.get(), user.username);
            }
        }
        Commands::IssueToken { user_id, overrides } => {
            let config = apply_overrides(config, overrides);
            config.auth.validate()?;
            info!(
                "JWT secret fingerprint: {}",
                config.auth.secret_fingerprint()
            );

            let issued = config.auth.issuer().issue(UserId::new(user_id))?;
            println!("Token:   {}", issued.token);
            println!("Expires: {}", issued.expires_at.format("%Y-%m-%d %H:%M:%S UTC"));
            println!("Use with: -H 'Authorization: Bearer {}'", issued.token);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_defaults_to_crate_info() {
        assert_eq!(log_filter(None).to_string(), DEFAULT_LOG_DIRECTIVE);
        assert_eq!(log_filter(Some("  ")).to_string(), DEFAULT_LOG_DIRECTIVE);
    }

    #[test]
    fn test_log_filter_honours_rust_log() {
        let filter = log_filter(Some("book_wishlist=debug,tower_http=trace")).to_string();
        assert!(filter.contains("book_wishlist=debug"));
        assert!(filter.contains("tower_http=trace"));
    }
}
