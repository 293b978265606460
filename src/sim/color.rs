//! Four-channel color and its `rgba(r,g,b,a)` wire format
//!
//! The simulation only ever touches the numeric form. Strings appear when a
//! level is loaded and when a color is handed to something that speaks CSS.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ErrorKind;

/// RGBA color. r/g/b are 0-255, alpha is 0-1 (canvas convention).
///
/// Channels are not clamped: a shift driven by a position outside the arena
/// can push a channel past 255 for a tick. Clamping happens on the way out
/// (`to_css`, `to_normalized`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(255.0, 255.0, 255.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque grey with all three color channels set to `value`
    pub const fn grey(value: f32) -> Self {
        Self::rgba(value, value, value, 1.0)
    }

    /// Channels clamped to their valid ranges
    pub fn clamped(&self) -> Self {
        Self {
            r: clamp_channel(self.r, 255.0),
            g: clamp_channel(self.g, 255.0),
            b: clamp_channel(self.b, 255.0),
            a: clamp_channel(self.a, 1.0),
        }
    }

    /// Normalized `[r, g, b, a]` in 0-1 for the GPU
    pub fn to_normalized(&self) -> [f32; 4] {
        let c = self.clamped();
        [c.r / 255.0, c.g / 255.0, c.b / 255.0, c.a]
    }

    /// Clamped CSS string, safe to hand to a canvas `fillStyle`
    pub fn to_css(&self) -> String {
        self.clamped().to_string()
    }
}

// NaN maps to 0 so a degenerate arena renders black instead of poisoning the GPU
fn clamp_channel(v: f32, max: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, max) }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Unclamped wire form, e.g. `rgba(79.6875,79.6875,79.6875,1)`
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Color {
    type Err = ErrorKind;

    /// Accepts `rgba(r,g,b,a)` and `rgb(r,g,b)`, whitespace tolerated
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ErrorKind::InvalidColor(s.to_string());
        let trimmed = s.trim();

        let (body, expected) = if let Some(rest) = trimmed.strip_prefix("rgba(") {
            (rest, 4)
        } else if let Some(rest) = trimmed.strip_prefix("rgb(") {
            (rest, 3)
        } else {
            return Err(invalid());
        };
        let body = body.strip_suffix(')').ok_or_else(invalid)?;

        let channels = body
            .split(',')
            .map(|part| part.trim().parse::<f32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        if channels.len() != expected {
            return Err(invalid());
        }

        let a = if expected == 4 { channels[3] } else { 1.0 };
        Ok(Color::rgba(channels[0], channels[1], channels[2], a))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rgba() {
        let c: Color = "rgba(240,0,0,1)".parse().unwrap();
        assert_eq!(c, Color::rgba(240.0, 0.0, 0.0, 1.0));

        let c: Color = " rgba( 10, 20.5 ,30, 0.5 ) ".parse().unwrap();
        assert_eq!(c, Color::rgba(10.0, 20.5, 30.0, 0.5));
    }

    #[test]
    fn test_parse_rgb_defaults_alpha() {
        let c: Color = "rgb(1,2,3)".parse().unwrap();
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        // Misspelled prefix
        assert!("rbga(200,200,200,1)".parse::<Color>().is_err());
        assert!("rgba(255,255,255,1".parse::<Color>().is_err());
        assert!("rgba(1,2,3)".parse::<Color>().is_err());
        assert!("rgba(1,2,x,1)".parse::<Color>().is_err());
    }

    #[test]
    fn test_display_is_unclamped() {
        let c = Color::rgba(300.0, -5.0, 79.6875, 1.0);
        assert_eq!(c.to_string(), "rgba(300,-5,79.6875,1)");
    }

    #[test]
    fn test_css_is_clamped() {
        let c = Color::rgba(300.0, -5.0, 12.0, 200.0);
        assert_eq!(c.to_css(), "rgba(255,0,12,1)");
    }

    #[test]
    fn test_normalized_handles_nan() {
        let c = Color::rgba(f32::NAN, 255.0, 0.0, 1.0);
        assert_eq!(c.to_normalized(), [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_serde_uses_wire_string() {
        let c = Color::grey(51.0);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"rgba(51,51,51,1)\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
