//! Shared data types for the HudSprite overlay.
//!
//! Plain values that cross crate boundaries: colors, normalized screen
//! positions and the persisted plugin settings.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Color
// ─────────────────────────────────────────────────────────────────────────────

/// Straight (non-premultiplied) RGBA color with byte components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with the alpha component replaced
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{},{}", self.r, self.g, self.b, self.a)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// 2D vector. Used both for normalized screen positions ([0,1] with the
/// origin at the top left) and for pixel sizes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Div<f32> for Vec2 {
    type Output = Vec2;

    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Plugin-wide flags persisted as JSON.
///
/// Field names on disk are PascalCase (`Enabled`, `ScanAllText`) so existing
/// settings files keep loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Settings {
    /// Master switch for drawing the overlay
    pub enabled: bool,
    /// Match the configuration tag anywhere in a metadata line, not only at
    /// its start
    pub scan_all_text: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            scan_all_text: false,
        }
    }
}

/// What a display surface is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContentKind {
    /// Blank surface
    #[default]
    None,
    /// Plain text (with optional images) laid out by the host
    TextAndImage,
    /// Programmatic sprites rendered into the surface's own texture
    Script,
}

/// Font family class. Line spacing differs between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontKind {
    Monospace,
    #[default]
    Proportional,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_use_pascal_case_keys() {
        let json = serde_json::to_string(&Settings {
            enabled: false,
            scan_all_text: true,
        })
        .unwrap();
        assert_eq!(json, r#"{"Enabled":false,"ScanAllText":true}"#);
    }

    #[test]
    fn settings_missing_fields_fall_back() {
        let settings: Settings = serde_json::from_str(r#"{"ScanAllText":true}"#).unwrap();
        assert!(settings.enabled);
        assert!(settings.scan_all_text);
    }

    #[test]
    fn vec2_arithmetic() {
        let v = Vec2::new(0.5, 0.25) + Vec2::new(0.25, 0.25) * 2.0;
        assert_eq!(v, Vec2::new(1.0, 0.75));
    }

    #[test]
    fn rgba_display() {
        assert_eq!(Rgba::rgb(1, 2, 3).to_string(), "1,2,3,255");
    }
}
