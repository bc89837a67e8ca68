//! Text and viewport placement
//!
//! Line spacing reproduces the hudlcd overlay so existing layouts keep
//! their look. All positions are normalized screen coordinates, (0,0) top
//! left and (1,1) bottom right.

use hudsprite_types::{FontKind, Vec2};

/// Glyph scale correction applied to the monospace font
pub const MONOSPACE_GLYPH_SCALE: f32 = 1.018;

/// Placement of one text line relative to the surface's top left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLayout {
    pub offset: Vec2,
    /// Glyph scale to draw the line with
    pub scale: f32,
}

/// Offset and glyph scale of line `line` for a surface drawn at `scale`
pub fn line_layout(font: FontKind, line: usize, scale: f32) -> LineLayout {
    let l = line as f32;
    match font {
        FontKind::Monospace => LineLayout {
            offset: Vec2::new(0.0, -0.0045 + 0.02825 * l) * scale,
            scale: scale * MONOSPACE_GLYPH_SCALE,
        },
        FontKind::Proportional => LineLayout {
            offset: Vec2::new(0.0001, -0.005 + 0.0229 * l) * scale,
            scale,
        },
    }
}

/// A line starting at `top_left + offset` is on screen. Lines only move
/// down, so the first invisible line ends the surface.
pub fn is_visible(top_left: Vec2, offset: Vec2) -> bool {
    top_left.x + offset.x < 1.0 && top_left.y + offset.y < 1.0
}

/// Normalized horizontal advance after drawing a segment whose measured
/// width is `measured` pixels
pub fn segment_advance(measured: f32, scale: f32, font_scale: f32, screen_width: u32) -> f32 {
    if screen_width == 0 {
        return 0.0;
    }
    (measured + scale) * font_scale / screen_width as f32
}

/// Destination rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Where a surface texture of `texture_size` lands on a `target_size`
    /// frame buffer
    pub fn for_surface(
        top_left: Vec2,
        scale: f32,
        texture_size: (u32, u32),
        target_size: (u32, u32),
    ) -> Self {
        Self {
            x: top_left.x * target_size.0 as f32,
            y: top_left.y * target_size.1 as f32,
            width: texture_size.0 as f32 * scale,
            height: texture_size.1 as f32 * scale,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}
