//! Pitstop Vehicle Service Booking
//!
//! A REST JSON API for booking vehicle service appointments: a fixed daily
//! slot catalog, a derived week-availability grid, and an appointment
//! lifecycle with staff status transitions and email confirmations.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod scheduling;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
