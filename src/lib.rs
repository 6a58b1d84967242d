//! Studio booking server
//!
//! Tells callers which days and time slots of the studio are free, and books
//! a slot into the external calendar, the booking store and the customer's
//! inbox.

use std::sync::Arc;

pub mod api;
pub mod calendar;
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
