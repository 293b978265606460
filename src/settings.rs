//! Runtime settings
//!
//! Read from LocalStorage on the web; defaults on native.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Arena;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Canvas ===
    /// Canvas width in pixels (the shift range along x)
    pub canvas_width: f32,
    /// Canvas height in pixels (the shift range along y, and tile sizing)
    pub canvas_height: f32,

    // === Movement ===
    /// Player speed in pixels per tick
    pub player_speed: f32,
    /// Sideways nudge per tick when grazing a wall corner
    pub assist_speed: f32,

    // === Levels ===
    /// Levels are fetched from `{level_url_prefix}{n}.json`
    pub level_url_prefix: String,
    /// Number of levels in the run
    pub level_count: usize,
    /// Level to start on
    pub first_level: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            player_speed: PLAYER_SPEED,
            assist_speed: PLAYER_ASSIST_SPEED,

            level_url_prefix: "levels/level-".to_string(),
            level_count: 2,
            first_level: 0,
        }
    }
}

impl Settings {
    pub fn arena(&self) -> Arena {
        Arena::new(self.canvas_width, self.canvas_height)
    }

    /// URL of a level file
    pub fn level_url(&self, index: usize) -> String {
        format!("{}{}.json", self.level_url_prefix, index)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "shift_maze_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native has no storage; always defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
