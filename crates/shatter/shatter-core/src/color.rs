//! Solid fill colour carried by every fragment of a cycle.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ShatterError;

/// 8-bit RGBA colour. Serialized as `#RRGGBB` (or `#RRGGBBAA` when not opaque).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba([0, 0, 0, 0]);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba([r, g, b, 255])
    }

    /// Uniformly random opaque colour, one hex digit at a time like a `#RRGGBB` roll.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut c = [0u8; 3];
        for channel in &mut c {
            let hi: u8 = rng.gen_range(0..16);
            let lo: u8 = rng.gen_range(0..16);
            *channel = (hi << 4) | lo;
        }
        Rgba::rgb(c[0], c[1], c[2])
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional, case-insensitive).
    pub fn from_hex(s: &str) -> Result<Self, ShatterError> {
        let digits = s.trim().trim_start_matches('#');
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(ShatterError::InvalidColor(s.to_string()));
        }
        let mut out = [255u8; 4];
        for (i, slot) in out.iter_mut().take(digits.len() / 2).enumerate() {
            *slot = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
                .map_err(|_| ShatterError::InvalidColor(s.to_string()))?;
        }
        Ok(Rgba(out))
    }

    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.0;
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::rgb(255, 255, 255)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgba {
    type Err = ShatterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgba::from_hex(s)
    }
}

impl TryFrom<String> for Rgba {
    type Error = ShatterError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgba::from_hex(&s)
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.to_hex()
    }
}

impl From<Rgba> for image::Rgba<u8> {
    fn from(c: Rgba) -> Self {
        image::Rgba(c.0)
    }
}
