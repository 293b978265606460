//! Level documents and the level builder
//!
//! A level is a JSON document of glyph grids: one grid each for the player
//! start, the checkpoint, static (greyscale) walls and dynamic (shifting)
//! walls. `build_level` turns it into a complete `GameState`, resolving all
//! string tags and entity names up front so the tick never sees them.

pub mod glyphs;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_TILE_COUNT, PLAYER_TILE_SCALE};
use crate::error::{ErrorKind, Result};
use crate::settings::Settings;
use crate::sim::{
    Checkpoint, Color, EntityRef, GameState, Rect, ShiftAxis, ShiftChannel,
    ShiftConfig, ShiftMode, Wall, overlaps_any,
};

fn default_true() -> bool {
    true
}

fn default_tile_count() -> f32 {
    DEFAULT_TILE_COUNT
}

fn default_player_scale() -> f32 {
    PLAYER_TILE_SCALE
}

/// Shift settings as written in a level file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftData {
    #[serde(rename = "static", default = "default_true")]
    pub is_static: bool,
    /// Entity whose position drives the shift (`"player"`, `"BG"`, ...)
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub shift_hue: Option<String>,
    #[serde(default)]
    pub shift_axis: Option<String>,
    #[serde(default)]
    pub reversed: bool,
}

impl Default for ShiftData {
    fn default() -> Self {
        Self {
            is_static: true,
            target: None,
            shift_hue: None,
            shift_axis: None,
            reversed: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackgroundData {
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(flatten)]
    pub shift: ShiftData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerData {
    #[serde(default)]
    pub color: Option<Color>,
    /// Size in tiles
    #[serde(default = "default_player_scale")]
    pub width: f32,
    #[serde(default = "default_player_scale")]
    pub height: f32,
    /// Grid containing exactly one `@`
    pub position: Vec<String>,
    #[serde(flatten)]
    pub shift: ShiftData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointData {
    #[serde(default)]
    pub color: Option<Color>,
    /// Grid containing exactly one `#`
    pub position: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticWallData {
    #[serde(default)]
    pub layout: Vec<String>,
}

/// Dynamic walls. Each axis has its own channel; all default to `"all"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DynamicWallData {
    #[serde(rename = "XHue", default)]
    pub x_hue: Option<String>,
    #[serde(rename = "YHue", default)]
    pub y_hue: Option<String>,
    #[serde(rename = "XYHue", default)]
    pub xy_hue: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub layout: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WallData {
    #[serde(rename = "static", default)]
    pub fixed: StaticWallData,
    #[serde(default)]
    pub dynamic: DynamicWallData,
}

/// Top-level level file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDocument {
    #[serde(default)]
    pub name: Option<String>,
    /// Number of tiles across the canvas height
    #[serde(default = "default_tile_count")]
    pub tile_size: f32,
    #[serde(rename = "BG", default)]
    pub background: BackgroundData,
    pub player: PlayerData,
    pub checkpoint: CheckpointData,
    #[serde(default)]
    pub walls: WallData,
}

impl LevelDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Parse and build in one step
pub fn load_level(json: &str, settings: &Settings, level_index: usize) -> Result<GameState> {
    let doc = LevelDocument::from_json(json)?;
    build_level(&doc, settings, level_index)
}

/// Build a complete game state from a level document
pub fn build_level(doc: &LevelDocument, settings: &Settings, level_index: usize) -> Result<GameState> {
    if !(doc.tile_size.is_finite() && doc.tile_size > 0.0) {
        return Err(ErrorKind::level(format!(
            "tileSize must be a positive number, got {}",
            doc.tile_size
        )));
    }

    let arena = settings.arena();
    let ts = arena.height / doc.tile_size;
    let mut state = GameState::new(arena, ts);
    state.level_index = level_index;

    // Background
    if let Some(color) = doc.background.color {
        state.background.color = color;
    }
    state.background.shift = resolve_shift(&doc.background.shift, "BG")?;

    // Player
    let (col, row) = find_unique(&doc.player.position, glyphs::PLAYER, "player.position")?;
    let p = &doc.player;
    state.player.rect = Rect::new(ts * col as f32, ts * row as f32, ts * p.width, ts * p.height);
    if let Some(color) = p.color {
        state.player.color = color;
    }
    state.player.speed = settings.player_speed;
    state.player.assist_speed = settings.assist_speed;
    state.player.shift = resolve_shift(&p.shift, "player")?;

    // Checkpoint
    let (col, row) = find_unique(&doc.checkpoint.position, glyphs::CHECKPOINT, "checkpoint.position")?;
    state.checkpoint = Checkpoint::new(Vec2::new(ts * col as f32, ts * row as f32), ts / 2.0);
    if let Some(color) = doc.checkpoint.color {
        state.checkpoint.color = color;
    }

    // Static walls first, then dynamic; this is the collision order
    state.walls = static_walls(&doc.walls.fixed.layout, ts, arena.width)?;
    state
        .walls
        .extend(dynamic_walls(&doc.walls.dynamic, ts)?);

    if overlaps_any(&state.player.rect, &state.walls) {
        log::warn!("Level {}: player starts inside a wall", level_index);
    }

    log::info!(
        "Built level {}{}: tile {}px, {} walls ({} dynamic)",
        level_index,
        doc.name.as_deref().map(|n| format!(" ({n})")).unwrap_or_default(),
        ts,
        state.walls.len(),
        state.dynamic_wall_count(),
    );

    Ok(state)
}

/// Resolve a named shift target into an entity handle
pub fn resolve_target(name: &str) -> Result<EntityRef> {
    match name {
        "player" => Ok(EntityRef::Player),
        "BG" | "background" => Ok(EntityRef::Background),
        "checkpoint" => Ok(EntityRef::Checkpoint),
        other => Err(ErrorKind::UnknownTarget(other.to_string())),
    }
}

/// Turn level-file shift settings into a typed config. A static entity
/// ignores every other field, valid or not.
fn resolve_shift(data: &ShiftData, owner: &str) -> Result<ShiftConfig> {
    if data.is_static {
        return Ok(ShiftConfig::STATIC);
    }

    let axis: ShiftAxis = data
        .shift_axis
        .as_deref()
        .ok_or_else(|| ErrorKind::level(format!("{owner}: shiftAxis is required when not static")))?
        .parse()?;
    let channel: ShiftChannel = data
        .shift_hue
        .as_deref()
        .ok_or_else(|| ErrorKind::level(format!("{owner}: shiftHue is required when not static")))?
        .parse()?;
    let subject = data
        .target
        .as_deref()
        .map(resolve_target)
        .transpose()?
        .unwrap_or(EntityRef::Player);

    log::debug!(
        "{owner}: shifts {channel} along {axis}{} following {subject:?}",
        if data.reversed { " (reversed)" } else { "" }
    );

    Ok(ShiftConfig {
        mode: ShiftMode::Shift {
            axis,
            reversed: data.reversed,
        },
        subject,
        channel,
    })
}

/// Row lengths must agree within one grid
fn check_rows(grid: &[String], what: &str) -> Result<()> {
    if let Some(first) = grid.first() {
        let width = first.chars().count();
        for (r, row) in grid.iter().enumerate() {
            let len = row.chars().count();
            if len != width {
                return Err(ErrorKind::level(format!(
                    "{what}: row {r} has {len} cells, expected {width}"
                )));
            }
        }
    }
    Ok(())
}

/// Every non-empty cell as (col, row, glyph)
fn cells<'a>(grid: &'a [String]) -> impl Iterator<Item = (usize, usize, char)> + 'a {
    grid.iter().enumerate().flat_map(|(r, row)| {
        row.chars()
            .enumerate()
            .filter(|(_, g)| !glyphs::is_empty(*g))
            .map(move |(c, g)| (c, r, g))
    })
}

/// Find the single cell holding `glyph`
fn find_unique(grid: &[String], glyph: char, what: &str) -> Result<(usize, usize)> {
    check_rows(grid, what)?;

    let mut found = None;
    for (c, r, g) in cells(grid) {
        if g != glyph {
            return Err(ErrorKind::level(format!(
                "{what}: unexpected glyph {g:?} at row {r}, col {c}"
            )));
        }
        if found.is_some() {
            return Err(ErrorKind::level(format!("{what}: more than one {glyph:?}")));
        }
        found = Some((c, r));
    }

    found.ok_or_else(|| ErrorKind::level(format!("{what}: missing {glyph:?}")))
}

fn static_walls(layout: &[String], ts: f32, canvas_width: f32) -> Result<Vec<Wall>> {
    check_rows(layout, "walls.static.layout")?;

    cells(layout)
        .map(|(c, r, g)| {
            let index = glyphs::gradient_index(g).ok_or_else(|| {
                ErrorKind::level(format!(
                    "walls.static.layout: unknown glyph {g:?} at row {r}, col {c}"
                ))
            })?;
            let value = glyphs::gradient_value(index, ts, canvas_width);
            Ok(Wall::fixed(
                Rect::new(ts * c as f32, ts * r as f32, ts, ts),
                Color::grey(value),
            ))
        })
        .collect()
}

fn dynamic_walls(data: &DynamicWallData, ts: f32) -> Result<Vec<Wall>> {
    check_rows(&data.layout, "walls.dynamic.layout")?;

    let hue = |tag: &Option<String>| -> Result<ShiftChannel> {
        tag.as_deref().map_or(Ok(ShiftChannel::All), |s| s.parse())
    };
    let x_hue = hue(&data.x_hue)?;
    let y_hue = hue(&data.y_hue)?;
    let xy_hue = hue(&data.xy_hue)?;
    let subject = data
        .target
        .as_deref()
        .map(resolve_target)
        .transpose()?
        .unwrap_or(EntityRef::Player);

    cells(&data.layout)
        .map(|(c, r, g)| {
            let (axis, reversed) = glyphs::dynamic_glyph(g).ok_or_else(|| {
                ErrorKind::level(format!(
                    "walls.dynamic.layout: unknown glyph {g:?} at row {r}, col {c}"
                ))
            })?;
            let channel = match axis {
                ShiftAxis::X => x_hue,
                ShiftAxis::Y => y_hue,
                ShiftAxis::XY => xy_hue,
            };
            Ok(Wall {
                rect: Rect::new(ts * c as f32, ts * r as f32, ts, ts),
                color: Color::BLACK,
                shift: ShiftConfig {
                    mode: ShiftMode::Shift { axis, reversed },
                    subject,
                    channel,
                },
            })
        })
        .collect()
}
