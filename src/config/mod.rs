pub mod catalog;
pub mod sync;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub pagination: PaginationConfig,
    pub session: SessionConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub external_url: Option<String>,
    pub api_rate_limit: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub recommend_page_size: usize,
    pub ingredient_page_size: usize,
    pub favorites_page_size: usize,
    pub max_request_body_size: usize,
    pub max_pages: usize, // Maximum pages to prevent overflow
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Recipe catalog synced into the database when the server starts
    pub path: Option<PathBuf>,
}

/// Read an environment variable and parse it, falling back to `default`
fn env_or<T: std::str::FromStr>(name: &str, default: &str) -> Result<T> {
    std::env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {name} value")))
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./data/pantry.db".to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env_or("PORT", "3000")?;
        let external_url = std::env::var("EXTERNAL_URL").ok();
        let api_rate_limit = env_or("API_RATE_LIMIT", "100")?;

        let max_connections = env_or("DATABASE_MAX_CONNECTIONS", "10")?;
        let min_connections = env_or("DATABASE_MIN_CONNECTIONS", "1")?;
        let connection_timeout_seconds = env_or("DATABASE_CONNECTION_TIMEOUT", "30")?;
        let idle_timeout_seconds = env_or("DATABASE_IDLE_TIMEOUT", "600")?;

        let recommend_page_size = env_or("RECOMMEND_PAGE_SIZE", "15")?;
        let ingredient_page_size = env_or("INGREDIENT_PAGE_SIZE", "15")?;
        let favorites_page_size = env_or("FAVORITES_PAGE_SIZE", "10")?;
        let max_request_body_size = env_or("MAX_REQUEST_BODY_SIZE", "1048576")?;
        let max_pages = env_or("MAX_PAGES", "10000")?;

        let cookie_name =
            std::env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| "pantry_session".to_string());

        let catalog_path = std::env::var("RECIPE_CATALOG_PATH").ok().map(PathBuf::from);

        Ok(Settings {
            database: DatabaseConfig {
                url: database_url,
                max_connections,
                min_connections,
                connection_timeout_seconds,
                idle_timeout_seconds,
            },
            server: ServerConfig {
                host,
                port,
                external_url,
                api_rate_limit,
            },
            pagination: PaginationConfig {
                recommend_page_size,
                ingredient_page_size,
                favorites_page_size,
                max_request_body_size,
                max_pages,
            },
            session: SessionConfig { cookie_name },
            catalog: CatalogConfig { path: catalog_path },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.server.api_rate_limit == 0 {
            return Err(Error::Config("API rate limit must be non-zero".to_string()));
        }

        let sizes = [
            ("RECOMMEND_PAGE_SIZE", self.pagination.recommend_page_size),
            ("INGREDIENT_PAGE_SIZE", self.pagination.ingredient_page_size),
            ("FAVORITES_PAGE_SIZE", self.pagination.favorites_page_size),
        ];
        for (name, size) in sizes {
            if size == 0 {
                return Err(Error::Config(format!("{name} must be non-zero")));
            }
        }

        if self.session.cookie_name.trim().is_empty() {
            return Err(Error::Config("Session cookie name cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Base URL used by CLI commands that talk to a running server
    pub fn server_url(&self) -> String {
        self.server
            .external_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.server.host, self.server.port))
    }
}

#[cfg(test)]
pub(crate) fn test_settings() -> Settings {
    Settings {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 5,
            min_connections: 1,
            connection_timeout_seconds: 30,
            idle_timeout_seconds: 600,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            external_url: None,
            api_rate_limit: 100,
        },
        pagination: PaginationConfig {
            recommend_page_size: 15,
            ingredient_page_size: 15,
            favorites_page_size: 10,
            max_request_body_size: 1048576,
            max_pages: 10000,
        },
        session: SessionConfig {
            cookie_name: "pantry_session".to_string(),
        },
        catalog: CatalogConfig { path: None },
    }
}
