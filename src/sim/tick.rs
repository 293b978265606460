//! Fixed timestep simulation tick
//!
//! One call = one 10 ms step: player shift, movement, level shifts, goal test.

use super::collision::advance;
use super::shift::apply_mode;
use super::state::{GameEvent, GamePhase, GameState};

/// Direction keys held during a tick. Written by the input handlers between
/// ticks, read-only inside one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl TickInput {
    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }
}

/// Advance the level by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.phase == GamePhase::LevelComplete {
        return events;
    }

    // The player recolors from its subject before it moves
    let player_shift = state.player.shift;
    if !player_shift.is_static() {
        if let Some(subject) = state.position_of(player_shift.subject) {
            apply_mode(
                subject,
                &mut state.player.color,
                &state.arena,
                player_shift.mode,
                player_shift.channel,
            );
        }
    }

    advance(&mut state.player, &state.walls, input, &state.arena);

    apply_level_shifts(state);

    if state.checkpoint.active && state.player.rect.overlaps(&state.checkpoint.rect) {
        state.checkpoint.active = false;
        state.phase = GamePhase::LevelComplete;
        events.push(GameEvent::CheckpointReached {
            level_index: state.level_index,
        });
    }

    state.time_ticks += 1;
    events
}

/// Recolor the background and every dynamic wall from their subjects
pub fn apply_level_shifts(state: &mut GameState) {
    let bg_shift = state.background.shift;
    if !bg_shift.is_static() {
        if let Some(subject) = state.position_of(bg_shift.subject) {
            apply_mode(
                subject,
                &mut state.background.color,
                &state.arena,
                bg_shift.mode,
                bg_shift.channel,
            );
        }
    }

    for i in 0..state.walls.len() {
        let shift = state.walls[i].shift;
        if shift.is_static() {
            continue;
        }
        // Subjects are read from the live state, so a wall driven by another
        // wall sees that wall's color updates from earlier in this loop
        if let Some(subject) = state.position_of(shift.subject) {
            let arena = state.arena;
            apply_mode(subject, &mut state.walls[i].color, &arena, shift.mode, shift.channel);
        }
    }
}
