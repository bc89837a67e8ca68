//! Core of the HudSprite overlay: configuration parsing, inline markup,
//! surface tracking and texture lifecycle. Rendering lives in
//! `hudsprite-overlay`.

pub mod colors;
pub mod config;
pub mod context;
pub mod error;
pub mod host;
pub mod markup;
pub mod registry;
pub mod settings;
pub mod surface;

// Re-exports for convenience
pub use config::{ConfigSource, ParseDefaults, SurfaceConfig, CONFIG_TAG};
pub use context::OverlayContext;
pub use error::{SettingsError, TextureError};
pub use host::{Block, Grid, Session, Surface, TextureHost};
pub use hudsprite_types::{ContentKind, FontKind, Rgba, Settings, Vec2};
pub use markup::{MarkupScratch, Segment};
pub use registry::SurfaceRegistry;
pub use surface::{BackingTexture, ContentSnapshot, SurfaceIdentity, SurfacePhase, SurfaceState};
