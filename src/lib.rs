//! Shift Maze - a tile maze whose walls change color as you move
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, wall collision, color shifts)
//! - `level`: Glyph-grid level documents and the level builder
//! - `session`: Fixed-step scheduler and level progression
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Persisted runtime configuration

pub mod error;
pub mod level;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::ErrorKind;
pub use session::{Session, SessionEvent};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use crate::sim::Color;

    /// Fixed simulation timestep (10 ms, 100 Hz)
    pub const SIM_DT: f32 = 0.010;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default canvas dimensions (pixels)
    pub const CANVAS_WIDTH: f32 = 320.0;
    pub const CANVAS_HEIGHT: f32 = 320.0;
    /// Tiles across the canvas height when a level doesn't say otherwise
    pub const DEFAULT_TILE_COUNT: f32 = 16.0;

    /// Player is slightly smaller than a tile so it fits through 1-tile gaps
    pub const PLAYER_TILE_SCALE: f32 = 0.94;
    /// 3.5 is the fastest speed that doesn't skip over gaps at this size
    pub const PLAYER_SPEED: f32 = 3.5;
    pub const PLAYER_ASSIST_SPEED: f32 = 1.0;

    pub const PLAYER_COLOR: Color = Color::rgba(240.0, 0.0, 0.0, 1.0);
    pub const CHECKPOINT_COLOR: Color = Color::rgba(80.0, 80.0, 255.0, 1.0);
}
