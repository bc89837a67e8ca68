//! Frame renderer interface
//!
//! What the compositor needs from the host's renderer on top of texture
//! management: text drawing and measurement, screen metrics and textured
//! blits onto the destination frame buffer.

use hudsprite_core::TextureHost;
use hudsprite_core::surface::BACKING_TEXTURE_PREFIX;
use hudsprite_types::{FontKind, Rgba, Vec2};

use crate::layout::Viewport;

/// Render target of the frame-draw hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderTarget {
    /// Final frame buffer presented to the screen
    Backbuffer,
    /// Any other render texture (shadow maps, offscreen passes, ...)
    Offscreen(String),
}

/// How a surface texture is combined with the frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Source is premultiplied; keeps transparent sprite backgrounds
    AlphaPremultiplied,
    /// Overwrite color, leave destination alpha alone. Host render textures
    /// carry no meaningful alpha.
    ReplaceNoAlpha,
}

impl BlendMode {
    /// Blend mode for blitting the texture called `name`
    pub fn for_texture(name: &str) -> Self {
        if name.starts_with(BACKING_TEXTURE_PREFIX) {
            BlendMode::AlphaPremultiplied
        } else {
            BlendMode::ReplaceNoAlpha
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("texture {0} is not loaded")]
    UnknownTexture(String),
    #[error("could not create {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },
    #[error(transparent)]
    Texture(#[from] hudsprite_core::TextureError),
}

pub trait FrameRenderer: TextureHost {
    /// Pixel size of the destination frame buffer
    fn screen_size(&self) -> (u32, u32);

    /// Host GUI font scale, converts measured glyph widths to screen pixels
    fn font_scale_constant(&self) -> f32;

    /// Width of `text` in font units at `scale`
    fn measure_string(&self, font: FontKind, text: &str, scale: f32) -> f32;

    /// Draw `text` with its top left corner at normalized `position`
    fn draw_string(&mut self, font: FontKind, position: Vec2, color: Rgba, text: &str, scale: f32);

    /// Stretch the whole `texture` over `viewport`
    fn blit(&mut self, texture: &str, viewport: Viewport, blend: BlendMode)
    -> Result<(), RenderError>;
}
