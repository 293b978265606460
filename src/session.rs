//! Fixed-step scheduler and level progression
//!
//! The session owns the active level and the held keys. Frames feed it real
//! time; it runs whole 10 ms ticks out of an accumulator. New levels are
//! built off to the side and swapped in whole, so a tick never sees a
//! half-loaded level.

use crate::consts::*;
use crate::error::Result;
use crate::level::{LevelDocument, build_level};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, tick};

/// What the scheduler needs to act on after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Checkpoint reached; `next` should be loaded and installed
    LevelComplete { level_index: usize, next: usize },
    /// Checkpoint of the last level reached
    Finished { level_index: usize },
}

pub struct Session {
    pub settings: Settings,
    /// Keys currently held; copied into every tick
    pub input: TickInput,
    state: Option<GameState>,
    accumulator: f32,
    /// Level waiting to be loaded; cleared only by a successful install
    pending_level: Option<usize>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            input: TickInput::default(),
            state: None,
            accumulator: 0.0,
            pending_level: None,
        }
    }

    /// Active level, if one has been installed
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Index of the level that should be loaded next, if any
    pub fn pending_level(&self) -> Option<usize> {
        self.pending_level
    }

    /// Ask for a level to be loaded. The request stays open until a load of
    /// that level succeeds.
    pub fn request_level(&mut self, index: usize) {
        self.pending_level = Some(index);
    }

    /// Replace the active level
    pub fn install(&mut self, state: GameState) {
        log::info!("Installing level {}", state.level_index);
        if self.pending_level == Some(state.level_index) {
            self.pending_level = None;
        }
        self.state = Some(state);
        self.accumulator = 0.0;
    }

    /// Build a level and install it. On error the current level stays.
    pub fn load_level_json(&mut self, json: &str, level_index: usize) -> Result<()> {
        let built = LevelDocument::from_json(json)
            .and_then(|doc| build_level(&doc, &self.settings, level_index));
        match built {
            Ok(state) => {
                self.install(state);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load level {}: {}", level_index, e);
                Err(e)
            }
        }
    }

    /// Run one tick immediately
    pub fn step(&mut self) -> Vec<SessionEvent> {
        let Some(state) = self.state.as_mut() else {
            return Vec::new();
        };
        let events = tick(state, &self.input);
        events
            .into_iter()
            .map(|ev| self.on_game_event(ev))
            .collect()
    }

    /// Feed a frame's worth of real time (seconds) and run the ticks it covers
    pub fn update(&mut self, dt: f32) -> Vec<SessionEvent> {
        if self.state.is_none() {
            return Vec::new();
        }

        self.accumulator += dt.min(MAX_FRAME_DT);

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            events.extend(self.step());
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        events
    }

    fn on_game_event(&mut self, event: GameEvent) -> SessionEvent {
        match event {
            GameEvent::CheckpointReached { level_index } => {
                let next = level_index + 1;
                if next < self.settings.level_count {
                    log::info!("Level {} complete, next is {}", level_index, next);
                    self.pending_level = Some(next);
                    SessionEvent::LevelComplete { level_index, next }
                } else {
                    log::info!("Final level {} complete", level_index);
                    SessionEvent::Finished { level_index }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::sim::GamePhase;

    // Player one tile left of the checkpoint
    const SHORT_LEVEL: &str = r#"{
        "player": { "position": ["@."] },
        "checkpoint": { "position": [".#"] }
    }"#;

    // Player boxed away from the checkpoint
    const WALLED_LEVEL: &str = r#"{
        "player": { "position": ["@...."] },
        "checkpoint": { "position": ["....#"] },
        "walls": { "static": { "layout": [".0..."] } }
    }"#;

    fn session() -> Session {
        Session::new(Settings {
            level_count: 2,
            ..Settings::default()
        })
    }

    fn hold_right(session: &mut Session) {
        session.input = TickInput {
            right: true,
            ..Default::default()
        };
    }

    #[test]
    fn test_update_without_level_is_noop() {
        let mut s = session();
        assert!(s.update(0.5).is_empty());
        assert!(s.state().is_none());
    }

    #[test]
    fn test_update_runs_whole_ticks() {
        let mut s = session();
        s.load_level_json(WALLED_LEVEL, 0).unwrap();

        s.update(0.055);
        assert_eq!(s.state().unwrap().time_ticks, 5);

        // Leftover 5 ms plus 6 ms is one more tick
        s.update(0.006);
        assert_eq!(s.state().unwrap().time_ticks, 6);
    }

    #[test]
    fn test_update_caps_substeps() {
        let mut s = session();
        s.load_level_json(WALLED_LEVEL, 0).unwrap();
        s.update(10.0);
        assert_eq!(s.state().unwrap().time_ticks, MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_checkpoint_requests_next_level() {
        let mut s = session();
        s.load_level_json(SHORT_LEVEL, 0).unwrap();
        hold_right(&mut s);

        let mut events = Vec::new();
        for _ in 0..20 {
            events.extend(s.step());
        }
        assert_eq!(
            events,
            vec![SessionEvent::LevelComplete {
                level_index: 0,
                next: 1
            }]
        );
        assert_eq!(s.pending_level(), Some(1));

        s.load_level_json(SHORT_LEVEL, 1).unwrap();
        assert_eq!(s.pending_level(), None);
        assert_eq!(s.state().unwrap().level_index, 1);
        assert_eq!(s.state().unwrap().time_ticks, 0);
    }

    #[test]
    fn test_last_level_finishes() {
        let mut s = session();
        s.load_level_json(SHORT_LEVEL, 1).unwrap();
        hold_right(&mut s);

        let events: Vec<_> = (0..20).flat_map(|_| s.step()).collect();
        assert_eq!(events, vec![SessionEvent::Finished { level_index: 1 }]);
        assert_eq!(s.pending_level(), None);
    }

    #[test]
    fn test_failed_load_keeps_current_level() {
        let mut s = session();
        s.load_level_json(WALLED_LEVEL, 0).unwrap();
        s.step();

        let err = s.load_level_json(r#"{ "player": { "position": [] } }"#, 1);
        assert!(matches!(err, Err(ErrorKind::LevelParseError(_))));
        let state = s.state().unwrap();
        assert_eq!(state.level_index, 0);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_failed_next_level_stays_pending() {
        let mut s = session();
        s.load_level_json(SHORT_LEVEL, 0).unwrap();
        hold_right(&mut s);
        for _ in 0..20 {
            s.step();
        }
        assert_eq!(s.pending_level(), Some(1));

        // A failed load leaves the request open so the caller can retry
        assert!(s.load_level_json("{ not json", 1).is_err());
        assert_eq!(s.pending_level(), Some(1));
        assert_eq!(s.state().unwrap().phase, GamePhase::LevelComplete);
        assert!(s.step().is_empty());

        s.load_level_json(SHORT_LEVEL, 1).unwrap();
        assert_eq!(s.pending_level(), None);
        assert_eq!(s.state().unwrap().phase, GamePhase::Playing);
    }

    #[test]
    fn test_requested_first_level() {
        let mut s = session();
        s.request_level(0);
        assert_eq!(s.pending_level(), Some(0));

        // Installing some other level leaves the request open
        s.load_level_json(SHORT_LEVEL, 1).unwrap();
        assert_eq!(s.pending_level(), Some(0));

        s.load_level_json(WALLED_LEVEL, 0).unwrap();
        assert_eq!(s.pending_level(), None);
    }

    #[test]
    fn test_wall_blocks_path() {
        let mut s = session();
        s.load_level_json(WALLED_LEVEL, 0).unwrap();
        hold_right(&mut s);
        for _ in 0..100 {
            assert!(s.step().is_empty());
        }
        let state = s.state().unwrap();
        // Flush against the wall at tile 1
        assert_eq!(state.player.rect.right(), state.tile_size);
    }
}
