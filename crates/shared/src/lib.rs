//! Shared types, errors, and configuration for the relocation billing engine.
//!
//! This crate provides common types used across all other crates:
//! - Integer cent amounts for priced service items
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
