// Color helpers: hex <-> RGB <-> HSV and the small hue rotation used by torches.
// Visual: a torch tagged #ffaa66 drifts a few degrees toward red/yellow over time
// instead of staying one flat orange.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How far one full unit of hue state rotates the hue (0.02 of a turn, ~7.2 degrees).
pub const HUE_SHIFT_SCALE: f32 = 0.02;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("expected #RRGGBB, got {0} characters")]
    InvalidLength(usize),
    #[error("invalid hex digits in {0:?}")]
    InvalidHex(String),
}

/// 8-bit sRGB triplet. Serialized as `#rrggbb` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSV with every component normalized to [0,1]; `h` wraps, so it stays in [0,1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional, digits are case-insensitive).
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return Err(ColorError::InvalidLength(digits.len()));
        }
        let channel = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| ColorError::InvalidHex(hex.to_string()))
        };
        Ok(Self { r: channel(0)?, g: channel(2)?, b: channel(4)? })
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        self.to_string()
    }

    /// Pack as 0x00RRGGBB (the layout minifb expects).
    #[inline]
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    #[inline]
    pub fn from_u32(px: u32) -> Self {
        Self {
            r: ((px >> 16) & 0xFF) as u8,
            g: ((px >> 8) & 0xFF) as u8,
            b: (px & 0xFF) as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(hex: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&hex)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}

/// `#RRGGBB` -> (r,g,b). Validation belongs to the annotation parser; this
/// still refuses malformed input instead of guessing.
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, ColorError> {
    Rgb::from_hex(hex)
}

/// Standard max/min-channel decomposition. Achromatic input (r=g=b) gets h=0.
pub fn rgb_to_hsv(c: Rgb) -> Hsv {
    let r = c.r as f32 / 255.0;
    let g = c.g as f32 / 255.0;
    let b = c.b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;

    let s = if max == 0.0 { 0.0 } else { d / max };
    let h = if d == 0.0 {
        0.0
    } else if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsv { h: (h / 6.0).rem_euclid(1.0), s, v: max }
}

/// Inverse of [`rgb_to_hsv`], rounding (not truncating) each channel.
pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let Hsv { h, s, v } = hsv;
    let h6 = h.rem_euclid(1.0) * 6.0;
    let i = h6.floor();
    let f = h6 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    // h6 can round up to exactly 6.0 for h just below 1; sector 6 == sector 0
    let (r, g, b) = match (i as i32).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    let to8 = |x: f32| (x * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb { r: to8(r), g: to8(g), b: to8(b) }
}

/// Rotate the hue by `shift * HUE_SHIFT_SCALE` turns, wrapping into [0,1).
/// `shift` is normally a torch's hue state, so the rotation stays subtle.
pub fn hue_shift(color: Rgb, shift: f32) -> Rgb {
    hue_shift_scaled(color, shift, HUE_SHIFT_SCALE)
}

/// Same as [`hue_shift`] with an explicit scale (configurable per map).
pub fn hue_shift_scaled(color: Rgb, shift: f32, scale: f32) -> Rgb {
    let mut hsv = rgb_to_hsv(color);
    hsv.h = (hsv.h + shift * scale).rem_euclid(1.0);
    hsv_to_rgb(hsv)
}

/// String-in/string-out form of [`hue_shift`].
pub fn hue_shift_hex(hex: &str, shift: f32) -> Result<String, ColorError> {
    Ok(hue_shift(Rgb::from_hex(hex)?, shift).to_hex())
}
