//! Per-surface overlay state
//!
//! A [`SurfaceState`] is created when discovery finds a tagged surface and
//! lives in the registry until its configuration disappears, its host
//! surface can no longer be resolved, or the registry is cleared. It owns the
//! surface's backing texture, if one has been allocated.

use std::sync::Arc;

use dashmap::DashSet;
use hudsprite_types::{ContentKind, FontKind, Rgba};

use crate::config::{select_config, ConfigSource, ParseDefaults, SurfaceConfig};
use crate::host::{Block, Surface, TextureHost};

/// Prefix of every texture the overlay allocates
pub const BACKING_TEXTURE_PREFIX: &str = "HUDSPRITE_";

/// Backing texture name for a host render texture
pub fn backing_texture_name(native: &str) -> String {
    format!("{BACKING_TEXTURE_PREFIX}{native}")
}

/// Host render texture name for a backing texture, if `name` is one
pub fn native_texture_name(name: &str) -> Option<&str> {
    name.strip_prefix(BACKING_TEXTURE_PREFIX)
}

/// Key of a tracked surface: owning entity plus surface index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceIdentity {
    pub entity_id: i64,
    pub surface_index: usize,
}

impl SurfaceIdentity {
    pub fn new(entity_id: i64, surface_index: usize) -> Self {
        Self {
            entity_id,
            surface_index,
        }
    }
}

impl std::fmt::Display for SurfaceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.entity_id, self.surface_index)
    }
}

/// Names of every backing texture currently allocated
#[derive(Debug, Default)]
pub struct TextureSet {
    names: DashSet<String>,
}

impl TextureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn insert(&self, name: String) {
        self.names.insert(name);
    }

    fn remove(&self, name: &str) {
        self.names.remove(name);
    }
}

/// Owners whose surfaces must not be drawn
#[derive(Debug, Default)]
pub struct DrawOverrides {
    hidden: DashSet<i64>,
}

impl DrawOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, owner_id: i64, should_draw: bool) {
        if should_draw {
            self.hidden.remove(&owner_id);
        } else {
            self.hidden.insert(owner_id);
        }
    }

    pub fn should_draw(&self, owner_id: i64) -> bool {
        !self.hidden.contains(&owner_id)
    }
}

/// Everything a tick needs besides the surface itself
pub struct TickEnv<'a> {
    pub textures: &'a mut dyn TextureHost,
    pub created: &'a TextureSet,
    pub overrides: &'a DrawOverrides,
    pub scan_all_text: bool,
}

/// Lifecycle of a tracked surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfacePhase {
    /// Found by a scan, not parsed yet
    Discovered,
    /// Configuration parsed and current
    Configured,
    /// Host surface was replaced; waiting for the next refresh
    Stale,
    /// Dropped from the registry, texture released
    Retired,
}

/// Copy of the host surface's drawable content, refreshed every tick so the
/// render thread never calls into the host world model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentSnapshot {
    pub kind: ContentKind,
    pub font: FontKind,
    pub text: String,
    /// Owning block is open and in the scene
    pub visible: bool,
    /// Host's own render texture for the surface
    pub native_texture: Option<String>,
}

/// An allocated backing texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackingTexture {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

pub struct SurfaceState {
    identity: SurfaceIdentity,
    block: Arc<dyn Block>,
    surface: Arc<dyn Surface>,
    surface_instance: u64,

    config: SurfaceConfig,
    source: ConfigSource,
    phase: SurfacePhase,
    content: ContentSnapshot,
    should_draw: bool,
    texture: Option<BackingTexture>,

    // change detection
    prev_title: Option<String>,
    prev_metadata: Option<String>,
    prev_font_size: f32,
    prev_font_color: Rgba,
}

impl std::fmt::Debug for SurfaceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceState")
            .field("identity", &self.identity)
            .field("config", &self.config)
            .field("source", &self.source)
            .field("phase", &self.phase)
            .field("should_draw", &self.should_draw)
            .field("texture", &self.texture)
            .finish()
    }
}

impl SurfaceState {
    pub fn new(block: Arc<dyn Block>, surface: Arc<dyn Surface>, surface_index: usize) -> Self {
        let defaults = ParseDefaults {
            font_size: surface.font_size(),
            font_color: surface.font_color(),
        };
        Self {
            identity: SurfaceIdentity::new(block.entity_id(), surface_index),
            surface_instance: surface.instance_id(),
            block,
            surface,
            config: SurfaceConfig::from_defaults(defaults),
            source: ConfigSource::Unknown,
            phase: SurfacePhase::Discovered,
            content: ContentSnapshot::default(),
            should_draw: true,
            texture: None,
            prev_title: None,
            prev_metadata: None,
            prev_font_size: f32::NAN,
            prev_font_color: Rgba::default(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn identity(&self) -> SurfaceIdentity {
        self.identity
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn source(&self) -> ConfigSource {
        self.source
    }

    pub fn phase(&self) -> SurfacePhase {
        self.phase
    }

    pub fn content(&self) -> &ContentSnapshot {
        &self.content
    }

    pub fn should_draw(&self) -> bool {
        self.should_draw
    }

    /// Backing texture, present only once allocation has succeeded
    pub fn texture(&self) -> Option<&BackingTexture> {
        self.texture.as_ref()
    }

    pub fn is_texture_allocated(&self) -> bool {
        self.texture.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Refresh
    // ─────────────────────────────────────────────────────────────────────────

    /// Re-read the configuration if any of its inputs changed.
    ///
    /// Returns `false` when the surface no longer has a directive.
    pub fn update_settings(&mut self, scan_all_text: bool) -> bool {
        let title = if self.identity.surface_index == 0 {
            self.block.public_title()
        } else {
            None
        };
        let metadata = self.block.custom_data();
        let font_size = self.surface.font_size();
        let font_color = self.surface.font_color();

        let source_changed = match self.source {
            ConfigSource::Title => self.prev_title != title,
            ConfigSource::Metadata => self.prev_metadata.as_deref() != Some(metadata.as_str()),
            ConfigSource::Unknown => true,
        };
        // NaN on first run never compares equal
        let font_changed = self.prev_font_size != font_size || self.prev_font_color != font_color;
        if !source_changed && !font_changed {
            self.phase = SurfacePhase::Configured;
            return true;
        }

        let defaults = ParseDefaults {
            font_size,
            font_color,
        };
        let selected = select_config(
            title.as_deref(),
            &metadata,
            self.identity.surface_index,
            defaults,
            scan_all_text,
        );

        self.prev_title = title;
        self.prev_metadata = Some(metadata);
        self.prev_font_size = font_size;
        self.prev_font_color = font_color;

        match selected {
            Some((config, source)) => {
                if self.config != config {
                    tracing::debug!(
                        identity = %self.identity,
                        ?config,
                        ?source,
                        "Surface configuration changed"
                    );
                }
                self.config = config;
                self.source = source;
                self.phase = SurfacePhase::Configured;
                true
            }
            None => {
                self.source = ConfigSource::Unknown;
                false
            }
        }
    }

    /// Per-tick update.
    ///
    /// With `update10` the host surface is re-resolved, settings refreshed and
    /// the texture lifecycle advanced. The content snapshot is refreshed on
    /// every call. Returns `false` when the surface should be retired.
    pub fn update(&mut self, update10: bool, env: &mut TickEnv<'_>) -> bool {
        if update10 {
            if self.block.is_closed() {
                return false;
            }
            let Some(surface) = self.block.surface(self.identity.surface_index) else {
                return false;
            };

            if surface.instance_id() != self.surface_instance {
                // host rebuilt the surface (rotation etc.), old texture is useless
                self.deactivate(env.textures, env.created);
                self.surface = surface;
                self.surface_instance = self.surface.instance_id();
                self.phase = SurfacePhase::Stale;
            }

            if !self.update_settings(env.scan_all_text) {
                return false;
            }

            self.should_draw = env.overrides.should_draw(self.identity.entity_id);

            if self.should_draw
                && self.surface.texture_generated()
                && self.surface.content_kind() == ContentKind::Script
                && self.block.is_working()
            {
                self.activate(env.textures, env.created);
            } else {
                self.deactivate(env.textures, env.created);
            }
        }

        self.refresh_content();
        true
    }

    fn refresh_content(&mut self) {
        let text = self.surface.text();
        self.content.kind = self.surface.content_kind();
        self.content.font = self.surface.font_kind();
        if self.content.text != text {
            self.content.text = text;
        }
        self.content.visible = !self.block.is_closed() && self.block.in_scene();
        let native = self.surface.render_texture_name();
        if self.content.native_texture != native {
            self.content.native_texture = native;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Texture lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Allocate the backing texture. No-op when already allocated or the
    /// host surface has no render texture yet.
    pub fn activate(&mut self, host: &mut dyn TextureHost, created: &TextureSet) {
        if self.texture.is_some() {
            return;
        }
        let Some(native) = self.surface.render_texture_name() else {
            return;
        };

        let name = backing_texture_name(&native);
        let (width, height) = self.surface.texture_size();
        match host.create_generated_texture(&name, width, height) {
            Ok(()) => {
                tracing::debug!(
                    identity = %self.identity,
                    %name,
                    width,
                    height,
                    "Allocated backing texture"
                );
                self.surface.invalidate_render();
                created.insert(name.clone());
                self.texture = Some(BackingTexture {
                    name,
                    width,
                    height,
                });
            }
            Err(e) => {
                tracing::debug!(
                    identity = %self.identity,
                    error = %e,
                    "Backing texture allocation failed"
                );
            }
        }
    }

    /// Release the backing texture. No-op when none is allocated.
    pub fn deactivate(&mut self, host: &mut dyn TextureHost, created: &TextureSet) {
        if let Some(texture) = self.texture.take() {
            tracing::debug!(
                identity = %self.identity,
                name = %texture.name,
                "Released backing texture"
            );
            host.destroy_generated_texture(&texture.name);
            created.remove(&texture.name);
        }
    }

    /// Release everything and mark the surface retired
    pub fn dispose(&mut self, host: &mut dyn TextureHost, created: &TextureSet) {
        self.deactivate(host, created);
        self.phase = SurfacePhase::Retired;
    }
}
