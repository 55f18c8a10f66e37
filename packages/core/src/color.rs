// ABOUTME: 8-bit RGB color value and its packed / hex codecs
// ABOUTME: Packed form is 0xRRGGBB, hex form is #RRGGBB (uppercase)

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest value a packed 24-bit color can take
pub const MAX_PACKED: u32 = 0xFF_FFFF;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("Invalid color format: {0:?} (expected #RRGGBB)")]
    InvalidFormat(String),
}

fn hex_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("hex color pattern is valid"))
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RGBColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl RGBColor {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Represent as a 24-bit unsigned integer, 0xRRGGBB
    pub fn to_packed(self) -> u32 {
        (u32::from(self.red) << 16) | (u32::from(self.green) << 8) | u32::from(self.blue)
    }

    /// Load from a [`RGBColor::to_packed`] representation. Bits above the
    /// low 24 are ignored.
    pub fn from_packed(data: u32) -> Self {
        Self {
            red: ((data >> 16) & 0xFF) as u8,
            green: ((data >> 8) & 0xFF) as u8,
            blue: (data & 0xFF) as u8,
        }
    }

    /// Hex-formatted color, `#RRGGBB`
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    /// Parse a `#RRGGBB` string. Digits are case-insensitive; nothing else
    /// is accepted.
    pub fn from_hex(value: &str) -> Result<Self, ColorError> {
        if !hex_pattern().is_match(value) {
            return Err(ColorError::InvalidFormat(value.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&value[range], 16)
                .map_err(|_| ColorError::InvalidFormat(value.to_string()))
        };

        Ok(Self {
            red: channel(1..3)?,
            green: channel(3..5)?,
            blue: channel(5..7)?,
        })
    }
}

impl fmt::Display for RGBColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for RGBColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
