//! Game state and entity types
//!
//! A `GameState` is one loaded level. It is built whole by the level
//! builder and replaced whole on level change; nothing is torn down piecemeal.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::color::Color;
use super::rect::{Arena, Rect};
use super::shift::{ShiftChannel, ShiftMode};
use crate::consts::*;

/// Typed handle to an entity in the current level, resolved at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityRef {
    Player,
    Background,
    Checkpoint,
    /// Index into `GameState::walls`
    Wall(usize),
}

/// Per-entity shift configuration. Everything but `mode` is ignored for a
/// static entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftConfig {
    pub mode: ShiftMode,
    /// Whose position drives the shift
    pub subject: EntityRef,
    pub channel: ShiftChannel,
}

impl ShiftConfig {
    pub const STATIC: ShiftConfig = ShiftConfig {
        mode: ShiftMode::Static,
        subject: EntityRef::Player,
        channel: ShiftChannel::All,
    };

    pub fn is_static(&self) -> bool {
        self.mode.is_static()
    }
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self::STATIC
    }
}

/// The player-controlled rectangle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    pub color: Color,
    /// Pixels per tick along each pressed axis
    pub speed: f32,
    /// Pixels per tick of sideways nudge when grazing a wall corner
    pub assist_speed: f32,
    #[serde(default)]
    pub shift: ShiftConfig,
}

impl Player {
    pub fn new(rect: Rect, color: Color) -> Self {
        Self {
            rect,
            color,
            speed: PLAYER_SPEED,
            assist_speed: PLAYER_ASSIST_SPEED,
            shift: ShiftConfig::STATIC,
        }
    }
}

/// A solid tile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub rect: Rect,
    pub color: Color,
    #[serde(default)]
    pub shift: ShiftConfig,
}

impl Wall {
    /// A wall whose color never changes
    pub fn fixed(rect: Rect, color: Color) -> Self {
        Self {
            rect,
            color,
            shift: ShiftConfig::STATIC,
        }
    }
}

/// Full-canvas backdrop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Background {
    pub rect: Rect,
    pub color: Color,
    #[serde(default)]
    pub shift: ShiftConfig,
}

/// Level goal. Drawn as a circle inscribed in `rect`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub rect: Rect,
    pub color: Color,
    /// Cleared once reached so the level transition fires once
    pub active: bool,
}

impl Checkpoint {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            rect: Rect::new(pos.x, pos.y, radius * 2.0, radius * 2.0),
            color: CHECKPOINT_COLOR,
            active: true,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.rect.width / 2.0
    }
}

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Checkpoint reached; the state is frozen until the next level swaps in
    LevelComplete,
}

/// Events emitted by a tick for the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    CheckpointReached { level_index: usize },
}

/// One loaded level (serializable for snapshots)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub arena: Arena,
    /// Tile size in pixels for this level
    pub tile_size: f32,
    /// Position of this level in the session's level list
    pub level_index: usize,
    pub phase: GamePhase,
    pub time_ticks: u64,
    pub background: Background,
    pub player: Player,
    pub checkpoint: Checkpoint,
    /// Collision and draw order
    pub walls: Vec<Wall>,
}

impl GameState {
    /// An empty level: white background, player one tile in from the corner
    pub fn new(arena: Arena, tile_size: f32) -> Self {
        let player_size = tile_size * PLAYER_TILE_SCALE;
        Self {
            arena,
            tile_size,
            level_index: 0,
            phase: GamePhase::Playing,
            time_ticks: 0,
            background: Background {
                rect: Rect::new(0.0, 0.0, arena.width, arena.height),
                color: Color::WHITE,
                shift: ShiftConfig::STATIC,
            },
            player: Player::new(
                Rect::new(tile_size, tile_size, player_size, player_size),
                PLAYER_COLOR,
            ),
            checkpoint: Checkpoint::new(
                Vec2::new(arena.width - tile_size, arena.height - tile_size),
                tile_size / 2.0,
            ),
            walls: Vec::new(),
        }
    }

    /// Top-left position of a referenced entity, if it exists
    pub fn position_of(&self, entity: EntityRef) -> Option<Vec2> {
        match entity {
            EntityRef::Player => Some(self.player.rect.pos()),
            EntityRef::Background => Some(self.background.rect.pos()),
            EntityRef::Checkpoint => Some(self.checkpoint.rect.pos()),
            EntityRef::Wall(i) => self.walls.get(i).map(|w| w.rect.pos()),
        }
    }

    /// Number of walls that recolor every tick
    pub fn dynamic_wall_count(&self) -> usize {
        self.walls.iter().filter(|w| !w.shift.is_static()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(Arena::new(320.0, 320.0), 20.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.rect.x, 20.0);
        assert!((state.player.rect.width - 18.8).abs() < 1e-4);
        assert_eq!(state.player.speed, 3.5);
        assert_eq!(state.player.assist_speed, 1.0);
        assert!(state.checkpoint.active);
        assert_eq!(state.checkpoint.radius(), 10.0);
    }

    #[test]
    fn test_position_of() {
        let mut state = GameState::new(Arena::new(320.0, 320.0), 20.0);
        state
            .walls
            .push(Wall::fixed(Rect::new(40.0, 60.0, 20.0, 20.0), Color::BLACK));

        assert_eq!(state.position_of(EntityRef::Wall(0)), Some(Vec2::new(40.0, 60.0)));
        assert_eq!(state.position_of(EntityRef::Wall(1)), None);
        assert_eq!(state.position_of(EntityRef::Background), Some(Vec2::ZERO));
    }

    #[test]
    fn test_snapshot_roundtrip_keeps_colors() {
        let state = GameState::new(Arena::new(320.0, 320.0), 20.0);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("rgba(240,0,0,1)"));
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.player.color, state.player.color);
    }
}
