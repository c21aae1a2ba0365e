//! Sistem Informasi Gereja - Backend Library
//!
//! Re-exports modules for integration testing and the binaries.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
mod error;
pub mod store;
pub mod summary;
pub mod uploads;

pub use config::Config;
pub use error::{AppError, AppResult};
