//! # Core Engine Module
//!
//! Shared configuration types used by every subsystem.

pub mod config;

pub use crate::config::{Config, ConfigError};
pub use config::EngineConfig;
