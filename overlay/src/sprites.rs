//! Sprite replay into backing textures
//!
//! When the host renders a script surface's sprite list into the surface's
//! own texture, the same list is replayed into the overlay's backing texture
//! so it can be composited on the HUD with its transparency intact.

use hudsprite_core::OverlayContext;
use hudsprite_types::{Rgba, Vec2};

use crate::renderer::BlendMode;

/// Rotations smaller than this are treated as none
const ROTATION_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Texture,
    Text,
    ClipRect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    Left,
    Right,
    #[default]
    Center,
}

/// One entry of a script surface's sprite list. Positions and sizes are in
/// texture pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    /// Texture id for texture sprites, the string for text sprites
    pub data: String,
    pub position: Option<Vec2>,
    pub size: Option<Vec2>,
    pub color: Option<Rgba>,
    pub font_id: Option<String>,
    pub alignment: TextAlignment,
    /// Rotation in radians for textures, glyph scale for text
    pub rotation_or_scale: f32,
}

impl Sprite {
    pub fn texture(data: impl Into<String>) -> Self {
        Self {
            kind: SpriteKind::Texture,
            data: data.into(),
            position: None,
            size: None,
            color: None,
            font_id: None,
            alignment: TextAlignment::Center,
            rotation_or_scale: 0.0,
        }
    }

    pub fn text(data: impl Into<String>, scale: f32) -> Self {
        Self {
            kind: SpriteKind::Text,
            rotation_or_scale: scale,
            ..Self::texture(data)
        }
    }

    pub fn clip_rect(position: Option<Vec2>, size: Option<Vec2>) -> Self {
        Self {
            kind: SpriteKind::ClipRect,
            position,
            size,
            ..Self::texture(String::new())
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = Some(position);
        self
    }

    pub fn sized(mut self, size: Vec2) -> Self {
        self.size = Some(size);
        self
    }

    pub fn colored(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    pub fn aligned(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// Per-surface parameters of one sprite render pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteFrame {
    pub texture_size: (u32, u32),
    /// Aspect correction computed by the host for the surface
    pub aspect_factor: Vec2,
    /// Offset added to every sprite position
    pub shift: Vec2,
    pub background: Rgba,
    pub background_alpha: u8,
    /// The surface has at least one live render object
    pub has_render_objects: bool,
}

/// Integer scissor rectangle in texture pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScissorRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Host sprite renderer, writing into the texture named `target`
pub trait SpriteSink {
    /// Resolve a texture sprite id to an atlas path
    fn sprite_path(&self, id: &str) -> Option<String>;

    fn draw_sprite(
        &mut self,
        target: &str,
        path: &str,
        center: Vec2,
        right: Vec2,
        half_size: Vec2,
        color: Rgba,
    );

    fn draw_text(
        &mut self,
        target: &str,
        font_id: Option<&str>,
        position: Vec2,
        color: Rgba,
        text: &str,
        scale: f32,
        max_width: i32,
        alignment: TextAlignment,
    );

    fn push_scissor(&mut self, target: &str, rect: ScissorRect);

    fn pop_scissor(&mut self, target: &str);

    /// Flush queued sprites into the texture over `background`
    fn render_offscreen(&mut self, target: &str, aspect_factor: Vec2, background: Rgba);
}

/// Replay `sprites` into `target` if it is one of this overlay's backing
/// textures. Returns whether anything was replayed.
pub fn replay_sprites(
    ctx: &OverlayContext,
    target: &str,
    sprites: &[Sprite],
    frame: &SpriteFrame,
    sink: &mut dyn SpriteSink,
) -> bool {
    if !ctx.is_generated_texture(target) {
        return false;
    }

    let texture_size = Vec2::new(frame.texture_size.0 as f32, frame.texture_size.1 as f32);
    let mut scissor_active = false;

    for sprite in sprites {
        let size = sprite.size.unwrap_or(texture_size);
        let mut position = sprite.position.unwrap_or(texture_size / 2.0) + frame.shift;
        let color = sprite.color.unwrap_or(Rgba::WHITE);

        match sprite.kind {
            SpriteKind::Texture => {
                let Some(path) = sink.sprite_path(&sprite.data) else {
                    tracing::trace!(id = %sprite.data, "Unknown sprite texture");
                    continue;
                };
                match sprite.alignment {
                    TextAlignment::Left => position.x += size.x * 0.5,
                    TextAlignment::Right => position.x -= size.x * 0.5,
                    TextAlignment::Center => {}
                }
                let r = sprite.rotation_or_scale;
                let right = if r.abs() > ROTATION_EPSILON {
                    Vec2::new(r.cos(), r.sin())
                } else {
                    Vec2::new(1.0, 0.0)
                };
                sink.draw_sprite(target, &path, position, right, size / 2.0, color);
            }
            SpriteKind::Text => {
                match sprite.alignment {
                    TextAlignment::Right => position.x -= size.x,
                    TextAlignment::Center => position.x -= size.x * 0.5,
                    TextAlignment::Left => {}
                }
                sink.draw_text(
                    target,
                    sprite.font_id.as_deref(),
                    position,
                    color,
                    &sprite.data,
                    sprite.rotation_or_scale,
                    size.x.round() as i32,
                    sprite.alignment,
                );
            }
            SpriteKind::ClipRect => {
                if sprite.position.is_some() && sprite.size.is_some() {
                    if scissor_active {
                        sink.pop_scissor(target);
                    }
                    scissor_active = true;
                    sink.push_scissor(
                        target,
                        ScissorRect {
                            x: position.x as i32,
                            y: position.y as i32,
                            width: size.x as i32,
                            height: size.y as i32,
                        },
                    );
                } else if scissor_active {
                    sink.pop_scissor(target);
                    scissor_active = false;
                }
            }
        }
    }

    if scissor_active {
        sink.pop_scissor(target);
    }

    if frame.has_render_objects {
        let background = frame.background.with_alpha(frame.background_alpha);
        sink.render_offscreen(target, frame.aspect_factor, background);
    }
    true
}

/// Blend state for the host sprite renderer writing into `target`.
///
/// Backing textures need premultiplied alpha so sprite transparency
/// survives compositing; `None` keeps the host default.
pub fn sprite_blend_for_target(ctx: &OverlayContext, target: &str) -> Option<BlendMode> {
    ctx.is_generated_texture(target)
        .then_some(BlendMode::AlphaPremultiplied)
}
