//! Glyph alphabet used by level layouts

use crate::sim::ShiftAxis;

pub const EMPTY: char = '.';
pub const PLAYER: char = '@';
pub const CHECKPOINT: char = '#';

/// Brightness steps for static walls, darkest first. 35 symbols; there is
/// no `w`.
pub const GRADIENT: [char; 35] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', //
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', //
    'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', //
    'u', 'v', 'x', 'y', 'z',
];

/// Empty cells. Space is accepted so hand-written layouts can be padded.
#[inline]
pub fn is_empty(glyph: char) -> bool {
    glyph == EMPTY || glyph == ' '
}

/// Index of a static wall glyph in the gradient
pub fn gradient_index(glyph: char) -> Option<usize> {
    GRADIENT.iter().position(|&g| g == glyph)
}

/// Channel value for a gradient step: `(tile / (canvas_width / 255)) * index`
pub fn gradient_value(index: usize, tile_size: f32, canvas_width: f32) -> f32 {
    tile_size * crate::sim::shift::CHANNEL_MAX / canvas_width * index as f32
}

/// Axis and direction for a dynamic wall glyph. Uppercase is reversed.
pub fn dynamic_glyph(glyph: char) -> Option<(ShiftAxis, bool)> {
    match glyph {
        'x' => Some((ShiftAxis::X, false)),
        'X' => Some((ShiftAxis::X, true)),
        'y' => Some((ShiftAxis::Y, false)),
        'Y' => Some((ShiftAxis::Y, true)),
        'z' => Some((ShiftAxis::XY, false)),
        'Z' => Some((ShiftAxis::XY, true)),
        _ => None,
    }
}
