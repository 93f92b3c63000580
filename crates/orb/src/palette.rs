use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Accent colour used for the gradient blend, Fresnel glow, and rim light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BrandColor(Vec3);

impl BrandColor {
    pub const DEFAULT_HEX: &'static str = "#D6FF00";

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self(Vec3::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        ))
    }

    /// Parses `#RRGGBB` (leading `#` optional, case-insensitive).
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let trimmed = value.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(ConfigError::InvalidColor(value.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ConfigError::InvalidColor(value.to_string()))
        };
        Ok(Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Linear 0..1 RGB triple.
    pub fn rgb(&self) -> Vec3 {
        self.0
    }

    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.0.to_array().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        format!("#{r:02X}{g:02X}{b:02X}")
    }
}

impl Default for BrandColor {
    fn default() -> Self {
        Self::from_rgb8(0xD6, 0xFF, 0x00)
    }
}

impl FromStr for BrandColor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BrandColor {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BrandColor> for String {
    fn from(value: BrandColor) -> Self {
        value.to_hex()
    }
}

impl fmt::Display for BrandColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
