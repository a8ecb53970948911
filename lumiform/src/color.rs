//! RGB color values with the `#rrggbb` wire form used by controllers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// An RGB color with channels in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// A neutral grey with all channels set to `value`.
    pub fn gray(value: f32) -> Self {
        Self::new(value, value, value)
    }
}

/// Error parsing a color literal.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("color must be a '#rgb' or '#rrggbb' hex literal, got {0:?}")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ParseColorError(s.into()))?;

        let channel = |pair: &str| -> Result<f32, ParseColorError> {
            let value = u8::from_str_radix(pair, 16).map_err(|_| ParseColorError(s.into()))?;
            Ok(f32::from(value) / 255.0)
        };

        match digits.len() {
            // shorthand '#rgb' doubles each digit
            3 => {
                let mut channels = [0.0; 3];
                for (i, c) in digits.chars().enumerate() {
                    channels[i] = channel(&format!("{c}{c}"))?;
                }
                Ok(Self::new(channels[0], channels[1], channels[2]))
            }
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(ParseColorError(s.into())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        write!(f, "#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let literal = String::deserialize(deserializer)?;
        literal.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_hex() {
        let color: Color = "#ff0000".parse().unwrap();
        assert_eq!(color, Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn parses_shorthand_hex() {
        let color: Color = "#abc".parse().unwrap();
        let full: Color = "#aabbcc".parse().unwrap();
        assert_eq!(color, full);
    }

    #[test]
    fn rejects_malformed_literals() {
        assert!("ff0000".parse::<Color>().is_err());
        assert!("#ff00".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }

    #[test]
    fn display_round_trips() {
        let color: Color = "#1a2b3c".parse().unwrap();
        assert_eq!(color.to_string(), "#1a2b3c");
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Color::WHITE).unwrap();
        assert_eq!(json, "\"#ffffff\"");

        let back: Color = serde_json::from_str("\"#808080\"").unwrap();
        assert!((back.r - 128.0 / 255.0).abs() < 1e-6);
    }
}
