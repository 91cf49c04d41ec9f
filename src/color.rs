//! Hex color parsing and linear interpolation for particle tints.

use std::fmt;

/// An RGB color with channels in `0.0..=1.0`.
///
/// Hex strings map straight to `channel / 255` with no color-space
/// conversion, so interpolation happens on the raw picker values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Rgb {
    /// White.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Build a color from float channels.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`. Any other length or a non-hex digit
    /// yields `None`.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::from_bytes(r, g, b))
    }

    /// Build a color from 8-bit channels.
    #[must_use]
    pub fn from_bytes(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
    }

    /// Format as lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_bytes();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Quantize to 8-bit channels, clamping out-of-range values.
    #[must_use]
    pub fn to_bytes(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Linear interpolation toward `other`: `t = 0` returns `self`,
    /// `t = 1` returns `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Channels as an array, for GPU uploads.
    #[must_use]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        let a = Rgb::from_hex("#ff3000").unwrap();
        let b = Rgb::from_hex("FF3000").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.r, 1.0);
        assert!((a.g - 48.0 / 255.0).abs() < 1e-6);
        assert_eq!(a.b, 0.0);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(Rgb::from_hex("#abc").is_none());
        assert!(Rgb::from_hex("zzzzzz").is_none());
        assert!(Rgb::from_hex("#ff300000").is_none());
        assert!(Rgb::from_hex("").is_none());
        assert!(Rgb::from_hex("#ffé000").is_none());
    }

    #[test]
    fn hex_survives_formatting() {
        let c = Rgb::from_hex("#0b3cba").unwrap();
        assert_eq!(c.to_hex(), "#0b3cba");
        assert_eq!(c.to_string(), "#0b3cba");
    }

    #[test]
    fn lerp_endpoints_match_inputs() {
        let inside = Rgb::from_hex("#ff3000").unwrap();
        let outside = Rgb::from_hex("#0b3cba").unwrap();
        assert_eq!(inside.lerp(outside, 0.0), inside);
        let end = inside.lerp(outside, 1.0);
        assert!((end.r - outside.r).abs() < 1e-6);
        assert!((end.g - outside.g).abs() < 1e-6);
        assert!((end.b - outside.b).abs() < 1e-6);
    }

    #[test]
    fn lerp_midpoint() {
        let mid = Rgb::new(0.0, 0.0, 0.0).lerp(Rgb::WHITE, 0.5);
        assert_eq!(mid, Rgb::new(0.5, 0.5, 0.5));
    }
}
