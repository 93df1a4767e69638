//! Core engine implementation

use crate::{
    application::Application,
    assets::ResourceManager,
    core::config::EngineConfig,
    events::{Event, EventSystem, EventType},
    foundation::{
        logging::{self, LoggingError},
        time::Timer,
    },
    settings::{Settings, SettingsError},
};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Longest frame delta handed to the application, in seconds
const MAX_FRAME_DELTA: f32 = 0.25;

/// Main engine struct
///
/// Owns the shared services (settings, events, resources) and drives an
/// [`Application`] frame by frame. It is constructed explicitly and passed by
/// reference; there is no global instance.
pub struct Engine {
    /// Flat key/value settings, loaded on initialize and saved on shutdown
    pub settings: Settings,

    /// Event queue and handler registry
    pub events: EventSystem,

    /// Shared resource cache
    pub resources: ResourceManager,

    /// Frame timing
    timer: Timer,

    /// Engine configuration
    config: EngineConfig,

    /// Whether the engine should continue running
    running: bool,
}

impl Engine {
    /// Create an engine with empty services and no side effects
    pub fn new(config: EngineConfig) -> Self {
        Self {
            settings: Settings::new(),
            events: EventSystem::new(),
            resources: ResourceManager::new(),
            timer: Timer::new().with_max_delta(MAX_FRAME_DELTA),
            config,
            running: true,
        }
    }

    /// Bring up logging, load settings and register the core event handlers
    pub fn initialize(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::InvalidConfig)?;

        // Logging first so every later step can report
        logging::init_with_config(&config.logging)?;
        log::info!("Initializing engine...");

        let mut engine = Self::new(config);

        if let Some(path) = engine.config.settings_path.clone() {
            match engine.settings.load_from_file(&path) {
                Ok(()) => log::info!("Loaded settings from {}", path.display()),
                Err(e) => log::warn!("{e}; continuing with default settings"),
            }
        }

        engine.register_core_handlers();
        Ok(engine)
    }

    fn register_core_handlers(&mut self) {
        self.events.subscribe(EventType::GameStarted, |_: &Event| {
            log::info!("Game started");
            false
        });
        self.events.subscribe(EventType::GameEnded, |_: &Event| {
            log::info!("Game ended");
            false
        });
        self.events.subscribe(EventType::SystemFailure, |event: &Event| {
            log::error!("System failure: {}", event.system_name().unwrap_or("unknown"));
            false
        });
    }

    /// Run the frame loop until the application quits or `max_frames` frames elapsed.
    ///
    /// Frames are paced to `target_fps` when configured. `cleanup` is called
    /// even when an update fails.
    pub fn run<A: Application>(&mut self, app: &mut A, max_frames: Option<u64>) -> Result<(), EngineError> {
        app.initialize(self)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {e}")))?;

        log::info!("Starting main loop...");

        let frame_budget = self
            .config
            .target_fps
            .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)));
        let first_frame = self.timer.frame_count();
        self.timer.resync();

        let mut result = Ok(());
        while self.running && max_frames.map_or(true, |max| self.timer.frame_count() - first_frame < max) {
            let frame_start = Instant::now();
            let delta_time = self.timer.tick();

            if let Err(e) = self.frame(app, delta_time) {
                result = Err(e);
                break;
            }

            if let Some(budget) = frame_budget {
                let spent = frame_start.elapsed();
                if spent < budget {
                    std::thread::sleep(budget - spent);
                }
            }
        }

        app.cleanup(self);
        self.events.dispatch();

        log::info!("Main loop finished after {} frame(s)", self.timer.frame_count() - first_frame);
        result
    }

    /// Run a single frame with an explicit delta, bypassing the wall clock.
    ///
    /// The application must already be initialized.
    pub fn step<A: Application>(&mut self, app: &mut A, delta_time: f32) -> Result<(), EngineError> {
        let delta_time = self.timer.advance(delta_time);
        self.frame(app, delta_time)
    }

    fn frame<A: Application>(&mut self, app: &mut A, delta_time: f32) -> Result<(), EngineError> {
        app.update(self, delta_time)
            .map_err(|e| EngineError::ApplicationError(format!("App update: {e}")))?;

        self.events.update_time(self.timer.total_time());
        self.events.dispatch();
        Ok(())
    }

    /// Request the frame loop to stop after the current frame
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the frame loop keeps running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Save settings, unload resources and drop every event handler
    pub fn shutdown(&mut self) -> Result<(), EngineError> {
        log::info!("Shutting down engine...");
        self.running = false;

        let saved = match &self.config.settings_path {
            Some(path) => self.settings.save_to_file(path),
            None => Ok(()),
        };

        self.resources.unload_all();
        self.events.clear();
        self.events.clear_handlers();

        saved?;
        log::info!("Engine shutdown complete");
        Ok(())
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Seconds elapsed during the last frame
    pub fn delta_time(&self) -> f32 {
        self.timer.delta_time()
    }

    /// Total simulated seconds
    pub fn time(&self) -> f64 {
        self.timer.total_time()
    }

    /// Frames run so far
    pub fn frame_count(&self) -> u64 {
        self.timer.frame_count()
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration did not validate
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Logger could not be installed
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Settings could not be persisted
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Application callback failed
    #[error("Application error: {0}")]
    ApplicationError(String),
}
