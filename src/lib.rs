//! CampusSoft Server
//!
//! Backend for managing software installation requests across university
//! departments, rooms, and software catalogs, with a status workflow,
//! annual re-attestation, and an audit trail.

use std::sync::Arc;

pub mod api;
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
