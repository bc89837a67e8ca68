//! Rendering side of the HudSprite overlay
//!
//! [`FrameCompositor`] draws tracked surfaces onto the host's frame buffer
//! each frame, [`sprites`] replays script sprite lists into backing textures,
//! and [`SoftwareRenderer`] is a tiny-skia render target for running all of
//! it without a game host.

pub mod compositor;
pub mod layout;
pub mod renderer;
pub mod software;
pub mod sprites;
pub mod utils;

pub use compositor::{CompositorOptions, FrameCompositor, FrameStats};
pub use layout::{LineLayout, Viewport};
pub use renderer::{BlendMode, FrameRenderer, RenderError, RenderTarget};
pub use software::SoftwareRenderer;
pub use sprites::{
    Sprite, SpriteFrame, SpriteKind, SpriteSink, TextAlignment, replay_sprites,
    sprite_blend_for_target,
};
