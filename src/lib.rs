pub mod config;
pub mod db;
pub mod error;

// Similarity ranking
pub mod recommend;

// HTTP surface
pub mod api;
pub mod web;

pub mod cli;

// Utilities
pub mod utils;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
