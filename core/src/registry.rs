//! Tracked surface registry
//!
//! Maps [`SurfaceIdentity`] to [`SurfaceState`]. The tick thread adds,
//! updates and removes entries while the render thread iterates; the map is
//! shard-locked so a reader never sees a half-updated entry.

use std::sync::Arc;

use dashmap::DashMap;

use crate::config::line_has_tag;
use crate::config::CONFIG_TAG;
use crate::host::{Block, Grid, TextureHost};
use crate::surface::{SurfaceIdentity, SurfaceState, TextureSet, TickEnv};

/// Result of trying to start tracking a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyTracked,
    /// Surface index does not resolve, or its configuration was not found
    Unavailable,
}

impl AddOutcome {
    /// The surface is tracked after the call
    pub fn is_tracked(self) -> bool {
        matches!(self, AddOutcome::Added | AddOutcome::AlreadyTracked)
    }
}

#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    surfaces: DashMap<SurfaceIdentity, SurfaceState>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn contains(&self, identity: &SurfaceIdentity) -> bool {
        self.surfaces.contains_key(identity)
    }

    /// Run `f` on a tracked surface
    pub fn with_surface<R>(
        &self,
        identity: &SurfaceIdentity,
        f: impl FnOnce(&SurfaceState) -> R,
    ) -> Option<R> {
        self.surfaces.get(identity).map(|entry| f(entry.value()))
    }

    /// Visit every tracked surface. Used by the render pass.
    pub fn for_each(&self, mut f: impl FnMut(&SurfaceState)) {
        for entry in self.surfaces.iter() {
            f(entry.value());
        }
    }

    /// Identities of all tracked surfaces, sorted
    pub fn identities(&self) -> Vec<SurfaceIdentity> {
        let mut ids: Vec<_> = self.surfaces.iter().map(|e| *e.key()).collect();
        ids.sort();
        ids
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Discovery
    // ─────────────────────────────────────────────────────────────────────────

    /// Look for tagged surfaces on `grid` and start tracking new ones.
    ///
    /// A block whose title carries the tag contributes its first surface and
    /// its metadata is not examined. Otherwise each tagged metadata line maps
    /// to the next surface index, up to the block's surface count.
    pub fn scan(&self, grid: &dyn Grid, scan_all_text: bool) {
        for block in grid.blocks() {
            if block.is_closed() {
                continue;
            }

            let title_tagged = block
                .public_title()
                .is_some_and(|t| t.to_lowercase().starts_with(CONFIG_TAG));
            if title_tagged && self.try_add(&block, 0, scan_all_text).is_tracked() {
                continue;
            }

            let metadata = block.custom_data().to_lowercase();
            let limit = block.surface_count().max(1);
            let mut surface_index = 0;
            for line in metadata.split('\n') {
                if surface_index >= limit {
                    break;
                }
                if !line_has_tag(line, scan_all_text) {
                    continue;
                }
                if self.try_add(&block, surface_index, scan_all_text).is_tracked() {
                    surface_index += 1;
                }
            }
        }
    }

    /// Start tracking one surface of `block`. The surface is only inserted
    /// once its configuration parses.
    pub fn try_add(
        &self,
        block: &Arc<dyn Block>,
        surface_index: usize,
        scan_all_text: bool,
    ) -> AddOutcome {
        let identity = SurfaceIdentity::new(block.entity_id(), surface_index);
        if self.surfaces.contains_key(&identity) {
            return AddOutcome::AlreadyTracked;
        }
        let Some(surface) = block.surface(surface_index) else {
            return AddOutcome::Unavailable;
        };

        let mut state = SurfaceState::new(Arc::clone(block), surface, surface_index);
        if !state.update_settings(scan_all_text) {
            return AddOutcome::Unavailable;
        }

        tracing::info!(%identity, source = ?state.source(), "Tracking surface");
        self.surfaces.insert(identity, state);
        AddOutcome::Added
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Update
    // ─────────────────────────────────────────────────────────────────────────

    /// Update every tracked surface, retiring the ones that fail.
    ///
    /// Returns the identities retired during this call.
    pub fn tick(&self, update10: bool, env: &mut TickEnv<'_>) -> Vec<SurfaceIdentity> {
        let mut retired = Vec::new();
        for mut entry in self.surfaces.iter_mut() {
            if !entry.value_mut().update(update10, env) {
                retired.push(*entry.key());
            }
        }

        for identity in &retired {
            self.remove(identity, env.textures, env.created);
        }
        retired
    }

    /// Stop tracking one surface and release its texture
    pub fn remove(
        &self,
        identity: &SurfaceIdentity,
        textures: &mut dyn TextureHost,
        created: &TextureSet,
    ) -> bool {
        match self.surfaces.remove(identity) {
            Some((_, mut state)) => {
                state.dispose(textures, created);
                tracing::info!(%identity, "Retired surface");
                true
            }
            None => false,
        }
    }

    /// Drop every tracked surface, releasing all textures
    pub fn clear(&self, textures: &mut dyn TextureHost, created: &TextureSet) {
        if self.surfaces.is_empty() {
            return;
        }
        for identity in self.identities() {
            if let Some((_, mut state)) = self.surfaces.remove(&identity) {
                state.dispose(textures, created);
            }
        }
        tracing::info!("Cleared tracked surfaces");
    }
}
