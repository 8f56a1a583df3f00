//! Circulation Permits Server Library
//!
//! This module exports the core types and functions for testing and reuse.

pub mod chart;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod pages;
pub mod routes;
pub mod security;

pub use config::Config;
pub use db::{open_database, InsertOutcome, Store};
pub use error::{AppError, Result};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Config,
    pub cookie_key: Key,
}

impl AppState {
    /// Create a new AppState, deriving the session cookie key from the configuration
    pub fn new(store: Store, config: Config) -> Self {
        let cookie_key = security::session_key(config.server.secret_key.as_deref());
        Self {
            store,
            config,
            cookie_key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
