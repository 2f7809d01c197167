//! Shared library for the AniList client workspace.
//!
//! This crate provides common functionality used by the client library and
//! its command-line front end:
//! - Configuration management
//! - Logging infrastructure

pub mod config;
pub mod logging;

// Re-export commonly used types
pub use config::{AnilistConfig, Config, LoggingConfig};
pub use logging::LogConfig;
