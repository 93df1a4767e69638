//! Game-side hooks driven by [`Engine::run`]

use crate::engine::{Engine, EngineError};
use thiserror::Error;

/// A game driven frame by frame by the engine.
///
/// The engine is handed to every hook, so a game reaches settings, events
/// and resources through it instead of through globals.
pub trait Application {
    /// Prepare game state before the first frame, e.g. load blueprints and spawn entities
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Advance the game by `delta_time` seconds of frame time
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Tear down after the last frame. Also runs when `update` failed.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Failures raised from game hooks
#[derive(Error, Debug)]
pub enum AppError {
    /// An engine service failed
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// A resource could not be loaded
    #[error("Resource error: {0}")]
    Resource(String),

    /// Game configuration is unusable
    #[error("Config error: {0}")]
    Config(String),

    /// Simulation rejected an operation
    #[error("Game logic error: {0}")]
    GameLogic(String),
}
