//! Position-driven color shifting
//!
//! A shift maps a subject's position inside the arena onto a 0-255 channel
//! value and writes it into a target color. The mapping is linear along the
//! chosen axis; `reversed` takes the complement (`255 - v`) rather than
//! flipping the formula, so both directions stay numerically symmetric.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::color::Color;
use super::rect::Arena;
use crate::error::ErrorKind;

/// Full brightness of a channel
pub const CHANNEL_MAX: f32 = 255.0;

/// Which positional dimension drives the shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftAxis {
    /// Left to right
    X,
    /// Top to bottom
    Y,
    /// Top-left to bottom-right (average of x and y)
    XY,
}

impl ShiftAxis {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftAxis::X => "x",
            ShiftAxis::Y => "y",
            ShiftAxis::XY => "xy",
        }
    }
}

impl fmt::Display for ShiftAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShiftAxis {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(ShiftAxis::X),
            "y" => Ok(ShiftAxis::Y),
            "xy" => Ok(ShiftAxis::XY),
            other => Err(ErrorKind::InvalidAxis(other.to_string())),
        }
    }
}

/// Which channel(s) of the target receive the value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftChannel {
    R,
    G,
    B,
    A,
    /// r, g and b together; alpha untouched
    All,
}

impl ShiftChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftChannel::R => "r",
            ShiftChannel::G => "g",
            ShiftChannel::B => "b",
            ShiftChannel::A => "a",
            ShiftChannel::All => "all",
        }
    }
}

impl fmt::Display for ShiftChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShiftChannel {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" => Ok(ShiftChannel::R),
            "g" => Ok(ShiftChannel::G),
            "b" => Ok(ShiftChannel::B),
            "a" => Ok(ShiftChannel::A),
            "all" => Ok(ShiftChannel::All),
            other => Err(ErrorKind::InvalidChannel(other.to_string())),
        }
    }
}

/// Whether an entity shifts at all, and how
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShiftMode {
    /// Color is fixed after load
    #[default]
    Static,
    Shift { axis: ShiftAxis, reversed: bool },
}

impl ShiftMode {
    pub fn is_static(&self) -> bool {
        matches!(self, ShiftMode::Static)
    }
}

/// Brightness for a subject position along `axis`, before channel routing.
///
/// Not clamped. A zero-sized arena yields NaN or infinity, which propagates.
pub fn shifted_channel_value(subject: Vec2, arena: &Arena, axis: ShiftAxis, reversed: bool) -> f32 {
    let raw = match axis {
        ShiftAxis::X => CHANNEL_MAX * (subject.x / arena.width),
        ShiftAxis::Y => CHANNEL_MAX * (subject.y / arena.height),
        ShiftAxis::XY => CHANNEL_MAX * ((subject.x + subject.y) / 2.0) / arena.diagonal(),
    };

    if reversed { CHANNEL_MAX - raw } else { raw }
}

/// Write `value` into the selected channel(s) of `target`
#[inline]
pub fn write_channel(target: &mut Color, channel: ShiftChannel, value: f32) {
    match channel {
        ShiftChannel::All => {
            target.r = value;
            target.g = value;
            target.b = value;
        }
        ShiftChannel::R => target.r = value,
        ShiftChannel::G => target.g = value,
        ShiftChannel::B => target.b = value,
        ShiftChannel::A => target.a = value,
    }
}

/// Recolor `target` from the subject's position
pub fn apply_shift(
    subject: Vec2,
    target: &mut Color,
    arena: &Arena,
    axis: ShiftAxis,
    channel: ShiftChannel,
    reversed: bool,
) {
    let value = shifted_channel_value(subject, arena, axis, reversed);
    write_channel(target, channel, value);
}

/// Apply a shift mode; a static mode leaves the color alone
pub fn apply_mode(subject: Vec2, target: &mut Color, arena: &Arena, mode: ShiftMode, channel: ShiftChannel) {
    if let ShiftMode::Shift { axis, reversed } = mode {
        apply_shift(subject, target, arena, axis, channel, reversed);
    }
}
