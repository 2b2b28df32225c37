use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::auth::AuthConfig;
use crate::db::DatabaseConfig;
use crate::search::BookSearchConfig;

/// Default HTTP bind address.
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Top-level service configuration.
///
/// Every section is optional in the file; missing values fall back to their
/// defaults and may be overridden from the command line.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind: String,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub book_search: BookSearchConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            book_search: BookSearchConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reject configurations the service cannot start with.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.auth.validate()?;
        self.book_search.validate()?;
        Ok(())
    }
}

pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(p) = env::var("WISHLIST_CONFIG") {
        return Some(PathBuf::from(p));
    }

    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let candidate = PathBuf::from(xdg).join("wishlist").join("config.json");
        if candidate.exists() {
            return Some(candidate);
        }
    }

    let candidate = PathBuf::from("wishlist.json");
    if candidate.exists() {
        return Some(candidate);
    }

    None
}

fn expand_vars_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next(); // consume '{'
            let mut name = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '}' {
                    closed = true;
                    break;
                }
                name.push(c);
            }
            match lookup(&name).filter(|_| closed) {
                Some(val) => out.push_str(&val),
                None => {
                    out.push_str("${");
                    out.push_str(&name);
                    if closed {
                        out.push('}');
                    }
                }
            }
        } else {
            out.push(ch);
        }
    }

    out
}

fn expand_env_vars(input: &str) -> String {
    expand_vars_with(input, |name| env::var(name).ok())
}

fn expand_config(cfg: AppConfig) -> AppConfig {
    let mut cfg = cfg;

    cfg.bind = expand_env_vars(&cfg.bind);
    cfg.database.url = expand_env_vars(&cfg.database.url);
    if let Some(user) = cfg.database.username.as_mut() {
        *user = expand_env_vars(user);
    }
    if let Some(pass) = cfg.database.password.as_mut() {
        *pass = expand_env_vars(pass);
    }
    cfg.auth.jwt_secret = expand_env_vars(&cfg.auth.jwt_secret);
    cfg.book_search.base_url = expand_env_vars(&cfg.book_search.base_url);
    if let Some(key) = cfg.book_search.api_key.as_mut() {
        *key = expand_env_vars(key);
    }

    cfg
}

/// Load configuration from `path`, or from the first discovered config file.
///
/// When no path is given and no file is found, defaults are returned.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match resolve_config_path() {
            Some(p) => p,
            None => return Ok(AppConfig::default()),
        },
    };

    let raw = fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    let cfg: AppConfig = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?;

    Ok(expand_config(cfg))
}
