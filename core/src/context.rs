//! Overlay context
//!
//! `OverlayContext` owns all overlay state: the surface registry, the set of
//! allocated backing textures, per-owner draw overrides and the settings.
//! The host creates one at plugin init, drives [`tick`](OverlayContext::tick)
//! from its simulation callback, reads the registry from its draw callback and
//! calls [`dispose`](OverlayContext::dispose) on shutdown.
//!
//! Every method takes `&self` so the tick and render threads can share one
//! context behind an `Arc`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

use hudsprite_types::{ContentKind, Settings};
use parking_lot::RwLock;

use crate::host::{Session, TextureHost};
use crate::registry::SurfaceRegistry;
use crate::settings;
use crate::surface::{DrawOverrides, SurfaceIdentity, TextureSet, TickEnv, BACKING_TEXTURE_PREFIX};

/// Ticks between discovery scans
pub const SCAN_INTERVAL_TICKS: i64 = 100;

/// Every Nth tick refreshes settings and texture state
pub const SETTINGS_REFRESH_INTERVAL: u64 = 10;

#[derive(Debug)]
pub struct OverlayContext {
    registry: SurfaceRegistry,
    textures: TextureSet,
    overrides: DrawOverrides,
    settings: RwLock<Settings>,
    settings_path: Option<PathBuf>,
    /// Frame of the last scan, -1 when the next tick should scan immediately
    last_scan: AtomicI64,
}

impl Default for OverlayContext {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl OverlayContext {
    /// Context with in-memory settings only
    pub fn new(settings: Settings) -> Self {
        Self {
            registry: SurfaceRegistry::new(),
            textures: TextureSet::new(),
            overrides: DrawOverrides::new(),
            settings: RwLock::new(settings),
            settings_path: None,
            last_scan: AtomicI64::new(-1),
        }
    }

    /// Plugin init: load (or create) the settings file at `path`
    pub fn init(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = settings::load_or_create(&path);
        tracing::info!(path = %path.display(), ?settings, "Overlay initialized");
        Self {
            settings_path: Some(path),
            ..Self::new(settings)
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn registry(&self) -> &SurfaceRegistry {
        &self.registry
    }

    /// Backing textures currently allocated
    pub fn created_textures(&self) -> &TextureSet {
        &self.textures
    }

    pub fn settings(&self) -> Settings {
        *self.settings.read()
    }

    pub fn settings_path(&self) -> Option<&Path> {
        self.settings_path.as_deref()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the settings and persist them. Failures to write are logged.
    pub fn save_settings(&self, settings: Settings) {
        *self.settings.write() = settings;
        if let Some(path) = &self.settings_path {
            settings::save_or_log(path, &settings);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Draw overrides
    // ─────────────────────────────────────────────────────────────────────────

    /// Suppress (or restore) drawing for every surface owned by `owner_id`.
    /// Surfaces stay tracked; the change applies on the next refresh tick.
    pub fn set_draw_state(&self, owner_id: i64, should_draw: bool) {
        self.overrides.set(owner_id, should_draw);
    }

    pub fn draw_state(&self, owner_id: i64) -> bool {
        self.overrides.should_draw(owner_id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host callbacks
    // ─────────────────────────────────────────────────────────────────────────

    /// Simulation tick.
    ///
    /// Scans the controlled grid every [`SCAN_INTERVAL_TICKS`] and updates
    /// tracked surfaces. Losing the session or the controlled grid clears
    /// everything.
    pub fn tick(&self, session: &dyn Session, textures: &mut dyn TextureHost) {
        if !session.is_ready() {
            self.clear(textures);
            return;
        }

        let settings = self.settings();
        if !settings.enabled {
            self.clear(textures);
            return;
        }

        let frame = session.frame_counter();
        match session.controlled_grid() {
            Some(grid) => {
                let frame = frame as i64;
                if frame - SCAN_INTERVAL_TICKS > self.last_scan.load(Ordering::Relaxed) {
                    self.registry.scan(grid.as_ref(), settings.scan_all_text);
                    self.last_scan.store(frame, Ordering::Relaxed);
                }
            }
            None => {
                self.clear(textures);
                return;
            }
        }

        if self.registry.is_empty() {
            return;
        }

        let mut env = TickEnv {
            textures,
            created: &self.textures,
            overrides: &self.overrides,
            scan_all_text: settings.scan_all_text,
        };
        self.registry
            .tick(frame % SETTINGS_REFRESH_INTERVAL == 0, &mut env);
    }

    /// Drop all tracked surfaces and force a scan on the next tick
    pub fn clear(&self, textures: &mut dyn TextureHost) {
        self.registry.clear(textures, &self.textures);
        self.last_scan.store(-1, Ordering::Relaxed);
    }

    /// Plugin shutdown
    pub fn dispose(&self, textures: &mut dyn TextureHost) {
        self.clear(textures);
        tracing::info!("Overlay disposed");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host render hooks
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether `name` is a backing texture allocated by this overlay.
    ///
    /// Generic offscreen passes should skip these.
    pub fn is_generated_texture(&self, name: &str) -> bool {
        name.starts_with(BACKING_TEXTURE_PREFIX) && self.textures.contains(name)
    }

    /// Keep a tracked, working script surface rendering while the camera is
    /// out of range so its backing texture stays current.
    pub fn keep_in_range(
        &self,
        identity: &SurfaceIdentity,
        is_working: bool,
        content: ContentKind,
    ) -> bool {
        is_working && content == ContentKind::Script && self.registry.contains(identity)
    }
}
