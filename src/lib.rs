//! SpecEqui construction equipment rental catalog
//!
//! A REST JSON server for browsing, searching and managing rentable
//! construction equipment, with tags, manufacturers, technical details,
//! media uploads and price analytics.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod seed;
pub mod services;
pub mod slug;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
