//! Neighbors Core Library
//!
//! This crate provides the foundational utilities shared by the neighbors crates:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, Overrides};
pub use error::{AppError, AppResult};
