//! CPU render target backed by tiny-skia
//!
//! Implements every renderer seam the overlay uses so a frame can be
//! composited without a game host: the CLI renders previews with it and the
//! tests inspect what it drew. Text is drawn as one filled cell per glyph;
//! there is no font rasterizer.

use std::collections::HashMap;
use std::path::Path;

use hudsprite_core::TextureError;
use hudsprite_core::TextureHost;
use hudsprite_types::{FontKind, Rgba, Vec2};
use tiny_skia::{FillRule, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Transform};

use crate::layout::Viewport;
use crate::renderer::{BlendMode, FrameRenderer, RenderError};
use crate::sprites::{ScissorRect, SpriteSink, TextAlignment};
use crate::utils::{color_from_rgba, rgba_from_pixel};

/// GUI font scale of the emulated host (28.8 / 37)
pub const DEFAULT_FONT_SCALE: f32 = 0.778_378_4;

/// Glyph line height in font units
const LINE_HEIGHT: f32 = 37.0;

fn glyph_advance(font: FontKind) -> f32 {
    match font {
        FontKind::Monospace => 24.0,
        FontKind::Proportional => 18.0,
    }
}

/// A `draw_string` call as received
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnText {
    pub font: FontKind,
    pub position: Vec2,
    pub color: Rgba,
    pub text: String,
    pub scale: f32,
}

/// A `blit` call as received
#[derive(Debug, Clone, PartialEq)]
pub struct Blit {
    pub texture: String,
    pub viewport: Viewport,
    pub blend: BlendMode,
}

/// Sprite work queued for a texture until it is flushed
#[derive(Debug, Clone)]
enum SpriteOp {
    Sprite {
        center: Vec2,
        right: Vec2,
        half_size: Vec2,
        color: Rgba,
    },
    Text {
        position: Vec2,
        color: Rgba,
        text: String,
        scale: f32,
    },
    PushScissor(ScissorRect),
    PopScissor,
}

pub struct SoftwareRenderer {
    frame: Pixmap,
    textures: HashMap<String, Pixmap>,
    sprite_paths: HashMap<String, String>,
    queued: HashMap<String, Vec<SpriteOp>>,
    font_scale: f32,
    drawn: Vec<DrawnText>,
    blits: Vec<Blit>,
}

impl std::fmt::Debug for SoftwareRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareRenderer")
            .field("width", &self.frame.width())
            .field("height", &self.frame.height())
            .field("textures", &self.textures.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SoftwareRenderer {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let frame = Pixmap::new(width, height).ok_or(RenderError::Pixmap { width, height })?;
        Ok(Self {
            frame,
            textures: HashMap::new(),
            sprite_paths: HashMap::new(),
            queued: HashMap::new(),
            font_scale: DEFAULT_FONT_SCALE,
            drawn: Vec::new(),
            blits: Vec::new(),
        })
    }

    /// Fill the frame buffer and forget recorded calls
    pub fn clear(&mut self, color: Rgba) {
        self.frame.fill(color_from_rgba(color));
        self.drawn.clear();
        self.blits.clear();
    }

    /// Make a host render texture available, e.g. a surface's own texture
    pub fn load_texture(
        &mut self,
        name: impl Into<String>,
        width: u32,
        height: u32,
        fill: Rgba,
    ) -> Result<(), RenderError> {
        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Pixmap { width, height })?;
        pixmap.fill(color_from_rgba(fill));
        self.textures.insert(name.into(), pixmap);
        Ok(())
    }

    /// Known texture sprite id
    pub fn register_sprite(&mut self, id: impl Into<String>, path: impl Into<String>) {
        self.sprite_paths.insert(id.into(), path.into());
    }

    pub fn drawn_text(&self) -> &[DrawnText] {
        &self.drawn
    }

    pub fn blits(&self) -> &[Blit] {
        &self.blits
    }

    pub fn frame(&self) -> &Pixmap {
        &self.frame
    }

    pub fn texture(&self, name: &str) -> Option<&Pixmap> {
        self.textures.get(name)
    }

    /// Straight RGBA of a frame buffer pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.frame.pixel(x, y).map(rgba_from_pixel)
    }

    pub fn save_png(&self, path: &Path) -> Result<(), std::io::Error> {
        self.frame
            .save_png(path)
            .map_err(|e| std::io::Error::other(e.to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Painting
    // ─────────────────────────────────────────────────────────────────────────

    fn glyph_cells(
        pixmap: &mut Pixmap,
        origin: (f32, f32),
        advance: f32,
        height: f32,
        text: &str,
        color: Rgba,
        mask: Option<&Mask>,
    ) {
        let mut paint = Paint::default();
        paint.set_color(color_from_rgba(color));
        paint.anti_alias = false;

        for (i, c) in text.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            let x = origin.0 + i as f32 * advance;
            let cell = Rect::from_xywh(
                x + advance * 0.1,
                origin.1 + height * 0.2,
                advance * 0.8,
                height * 0.7,
            );
            if let Some(rect) = cell {
                pixmap.fill_rect(rect, &paint, Transform::identity(), mask);
            }
        }
    }

    fn scissor_mask(width: u32, height: u32, rect: Option<ScissorRect>) -> Option<Mask> {
        let rect = rect?;
        let bounds = Rect::from_xywh(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
        )?;
        let mut mask = Mask::new(width, height)?;
        let path = PathBuilder::from_rect(bounds);
        mask.fill_path(&path, FillRule::Winding, false, Transform::identity());
        Some(mask)
    }

    fn flush_ops(pixmap: &mut Pixmap, ops: &[SpriteOp]) {
        let (width, height) = (pixmap.width(), pixmap.height());
        let mut scissors: Vec<ScissorRect> = Vec::new();
        let mut mask = None;

        for op in ops {
            match op {
                SpriteOp::PushScissor(rect) => {
                    scissors.push(*rect);
                    mask = Self::scissor_mask(width, height, scissors.last().copied());
                }
                SpriteOp::PopScissor => {
                    scissors.pop();
                    mask = Self::scissor_mask(width, height, scissors.last().copied());
                }
                SpriteOp::Sprite {
                    center,
                    right,
                    half_size,
                    color,
                } => {
                    let Some(rect) = Rect::from_xywh(
                        -half_size.x,
                        -half_size.y,
                        half_size.x * 2.0,
                        half_size.y * 2.0,
                    ) else {
                        continue;
                    };
                    let mut paint = Paint::default();
                    paint.set_color(color_from_rgba(*color));
                    let transform = Transform::from_row(
                        right.x, right.y, -right.y, right.x, center.x, center.y,
                    );
                    pixmap.fill_rect(rect, &paint, transform, mask.as_ref());
                }
                SpriteOp::Text {
                    position,
                    color,
                    text,
                    scale,
                } => {
                    let advance = glyph_advance(FontKind::Proportional) * scale;
                    Self::glyph_cells(
                        pixmap,
                        (position.x, position.y),
                        advance,
                        LINE_HEIGHT * scale,
                        text,
                        *color,
                        mask.as_ref(),
                    );
                }
            }
        }
    }
}

impl TextureHost for SoftwareRenderer {
    fn create_generated_texture(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
    ) -> Result<(), TextureError> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| TextureError::Allocation {
            name: name.to_string(),
            width,
            height,
            reason: "empty or oversized pixmap".to_string(),
        })?;
        self.textures.insert(name.to_string(), pixmap);
        Ok(())
    }

    fn destroy_generated_texture(&mut self, name: &str) {
        self.textures.remove(name);
        self.queued.remove(name);
    }

    fn loaded_texture_size(&self, name: &str) -> Option<(u32, u32)> {
        self.textures.get(name).map(|p| (p.width(), p.height()))
    }
}

impl FrameRenderer for SoftwareRenderer {
    fn screen_size(&self) -> (u32, u32) {
        (self.frame.width(), self.frame.height())
    }

    fn font_scale_constant(&self) -> f32 {
        self.font_scale
    }

    fn measure_string(&self, font: FontKind, text: &str, scale: f32) -> f32 {
        text.chars().count() as f32 * glyph_advance(font) * scale
    }

    fn draw_string(&mut self, font: FontKind, position: Vec2, color: Rgba, text: &str, scale: f32) {
        let (w, h) = self.screen_size();
        let origin = (position.x * w as f32, position.y * h as f32);
        let advance = glyph_advance(font) * scale * self.font_scale;
        let height = LINE_HEIGHT * scale * self.font_scale;
        Self::glyph_cells(&mut self.frame, origin, advance, height, text, color, None);

        self.drawn.push(DrawnText {
            font,
            position,
            color,
            text: text.to_string(),
            scale,
        });
    }

    fn blit(
        &mut self,
        texture: &str,
        viewport: Viewport,
        blend: BlendMode,
    ) -> Result<(), RenderError> {
        let source = self
            .textures
            .get(texture)
            .ok_or_else(|| RenderError::UnknownTexture(texture.to_string()))?;

        let paint = PixmapPaint {
            blend_mode: match blend {
                BlendMode::AlphaPremultiplied => tiny_skia::BlendMode::SourceOver,
                BlendMode::ReplaceNoAlpha => tiny_skia::BlendMode::Source,
            },
            quality: tiny_skia::FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        let transform = Transform::from_row(
            viewport.width / source.width() as f32,
            0.0,
            0.0,
            viewport.height / source.height() as f32,
            viewport.x,
            viewport.y,
        );
        self.frame
            .draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);

        self.blits.push(Blit {
            texture: texture.to_string(),
            viewport,
            blend,
        });
        Ok(())
    }
}

impl SpriteSink for SoftwareRenderer {
    fn sprite_path(&self, id: &str) -> Option<String> {
        self.sprite_paths.get(id).cloned()
    }

    fn draw_sprite(
        &mut self,
        target: &str,
        _path: &str,
        center: Vec2,
        right: Vec2,
        half_size: Vec2,
        color: Rgba,
    ) {
        self.queued.entry(target.to_string()).or_default().push(SpriteOp::Sprite {
            center,
            right,
            half_size,
            color,
        });
    }

    fn draw_text(
        &mut self,
        target: &str,
        _font_id: Option<&str>,
        position: Vec2,
        color: Rgba,
        text: &str,
        scale: f32,
        _max_width: i32,
        _alignment: TextAlignment,
    ) {
        self.queued.entry(target.to_string()).or_default().push(SpriteOp::Text {
            position,
            color,
            text: text.to_string(),
            scale,
        });
    }

    fn push_scissor(&mut self, target: &str, rect: ScissorRect) {
        self.queued
            .entry(target.to_string())
            .or_default()
            .push(SpriteOp::PushScissor(rect));
    }

    fn pop_scissor(&mut self, target: &str) {
        self.queued
            .entry(target.to_string())
            .or_default()
            .push(SpriteOp::PopScissor);
    }

    fn render_offscreen(&mut self, target: &str, _aspect_factor: Vec2, background: Rgba) {
        let ops = self.queued.remove(target).unwrap_or_default();
        let Some(pixmap) = self.textures.get_mut(target) else {
            tracing::debug!(texture = target, "Offscreen render into unknown texture");
            return;
        };
        pixmap.fill(color_from_rgba(background));
        Self::flush_ops(pixmap, &ops);
    }
}
