//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (walls in level order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod color;
pub mod rect;
pub mod shift;
pub mod state;
pub mod tick;

pub use collision::{advance, overlaps_any};
pub use color::Color;
pub use rect::{Arena, Rect};
pub use shift::{
    ShiftAxis, ShiftChannel, ShiftMode, apply_mode, apply_shift, shifted_channel_value,
};
pub use state::{
    Background, Checkpoint, EntityRef, GameEvent, GamePhase, GameState, Player, ShiftConfig, Wall,
};
pub use tick::{TickInput, apply_level_shifts, tick};
