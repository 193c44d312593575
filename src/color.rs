//! RGBA colors for page backgrounds
//!
//! Colors parse from hex notation (`#rgb`, `#rrggbb`, `#rrggbbaa`) or from the
//! names of the background swatches offered by the editor.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    #[error("invalid color '{0}': expected #rgb, #rrggbb, #rrggbbaa or a swatch name")]
    Invalid(String),
}

/// An 8-bit-per-channel color with straight alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Background swatches, in the order the color sheet shows them
const SWATCHES: [(&str, Rgba); 7] = [
    ("white", Rgba::rgb(0xff, 0xff, 0xff)),
    ("red", Rgba::rgb(0xff, 0x00, 0x00)),
    ("yellow", Rgba::rgb(0xff, 0xff, 0x00)),
    ("green", Rgba::rgb(0x00, 0xff, 0x00)),
    ("blue", Rgba::rgb(0x00, 0x00, 0xff)),
    ("magenta", Rgba::rgb(0xff, 0x00, 0xff)),
    ("darkgray", Rgba::rgb(0x44, 0x44, 0x44)),
];

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xff)
    }

    /// The swatch palette as `(name, color)` pairs
    pub fn swatches() -> &'static [(&'static str, Rgba)] {
        &SWATCHES
    }

    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::Invalid(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                Ok(Rgba::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 | 8 => {
                let a = if digits.len() == 8 {
                    channel(&digits[6..8])?
                } else {
                    0xff
                };
                Ok(Rgba::new(
                    channel(&digits[0..2])?,
                    channel(&digits[2..4])?,
                    channel(&digits[4..6])?,
                    a,
                ))
            }
            _ => Err(invalid()),
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Rgba {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with('#') {
            return Rgba::from_hex(trimmed);
        }
        let name = trimmed.to_ascii_lowercase().replace([' ', '-', '_'], "");
        SWATCHES
            .iter()
            .find(|(swatch, _)| *swatch == name)
            .map(|(_, color)| *color)
            .ok_or_else(|| ColorError::Invalid(s.to_string()))
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 0xff {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}
