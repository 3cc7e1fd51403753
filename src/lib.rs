//! Cadenza Music School Management System
//!
//! A Rust implementation of the Cadenza school management server,
//! providing a REST JSON API for managing lessons, students, and the
//! song catalog, with bulk endpoints for batch mutations.

use std::sync::Arc;

pub mod api;
pub mod batch;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
