//! soul-recorder library
//!
//! Exposes the CLI and its configuration for integration testing

pub mod cli;
pub mod config;

pub use config::RecorderConfig;
