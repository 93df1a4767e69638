//! # Void Engine
//!
//! Foundation layer for the Void Contingency space game.
//!
//! ## Features
//!
//! - **2D Math**: `Vector2f` value type and degree-based `Transform`
//! - **Configuration**: typed TOML/RON configs plus a flat `key = value` settings store
//! - **Events**: typed event queue with immediate and deferred delivery
//! - **Resources**: path-keyed cache of typed, shared resources
//! - **Lifecycle**: an explicitly constructed `Engine` context driving an `Application`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use void_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, _engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = Engine::initialize(EngineConfig::default())?;
//!     engine.run(&mut MyApp, Some(600))?;
//!     engine.shutdown()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;

pub mod foundation;
pub mod config;
pub mod settings;
pub mod events;
pub mod assets;

mod application;
mod engine;

pub use application::{Application, AppError};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Application, AppError,
        Engine, EngineError,
        foundation::{
            math::{Vector2f, Transform},
            time::{Timer, Stopwatch},
        },
        config::{Config, ConfigError},
        core::config::EngineConfig,
        settings::{Settings, SettingValue},
        events::{Event, EventArg, EventHandler, EventSystem, EventType},
        assets::{Resource, ResourceError, ResourceManager},
    };
}
