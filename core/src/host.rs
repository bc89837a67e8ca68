//! Host interfaces
//!
//! The overlay does not own the simulation or the GPU. These traits are the
//! seams the host implements: entity/world access for discovery and refresh,
//! and texture management for surfaces rendered into their own texture.

use std::sync::Arc;

use hudsprite_types::{ContentKind, FontKind, Rgba};

use crate::error::TextureError;

/// One display surface of a block (an LCD screen, a cockpit panel, ...).
pub trait Surface: Send + Sync {
    /// Changes whenever the host rebuilds the surface component, for example
    /// after the block is rotated. Used to detect stale textures.
    fn instance_id(&self) -> u64;

    fn font_size(&self) -> f32;
    fn font_color(&self) -> Rgba;
    fn font_kind(&self) -> FontKind;
    fn content_kind(&self) -> ContentKind;

    /// Current surface text, lines separated by `\n`
    fn text(&self) -> String;

    /// Native pixel size of the surface's render texture
    fn texture_size(&self) -> (u32, u32);

    /// Whether the host has generated this surface's own render texture
    fn texture_generated(&self) -> bool;

    /// Name of the host's render texture for this surface, if it has a render
    /// component
    fn render_texture_name(&self) -> Option<String>;

    /// Ask the host to re-render the surface contents on its next pass.
    fn invalidate_render(&self) {}
}

/// A simulated entity that owns display surfaces.
pub trait Block: Send + Sync {
    fn entity_id(&self) -> i64;

    /// Free-form metadata text ("custom data")
    fn custom_data(&self) -> String;

    /// Title shown on the block's first surface, for blocks that have one
    fn public_title(&self) -> Option<String> {
        None
    }

    fn surface_count(&self) -> usize;

    fn surface(&self, index: usize) -> Option<Arc<dyn Surface>>;

    /// Powered and functional
    fn is_working(&self) -> bool;

    /// Removed from the world
    fn is_closed(&self) -> bool {
        false
    }

    /// Currently part of the rendered scene
    fn in_scene(&self) -> bool {
        true
    }
}

/// A structure (ship, station) made of blocks.
pub trait Grid {
    /// Blocks that provide display surfaces
    fn blocks(&self) -> Vec<Arc<dyn Block>>;
}

/// Simulation session state polled once per tick.
pub trait Session {
    /// Session loaded and simulating
    fn is_ready(&self) -> bool;

    /// Monotonic simulation frame counter
    fn frame_counter(&self) -> u64;

    /// Grid of the cockpit the player currently controls, if any
    fn controlled_grid(&self) -> Option<Arc<dyn Grid>>;
}

/// Texture management on the host renderer.
///
/// Calls must be issued from whichever thread the host's render API
/// requires; the overlay only forwards them.
pub trait TextureHost {
    /// Allocate an RGBA render texture the host will draw sprites into
    fn create_generated_texture(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
    ) -> Result<(), TextureError>;

    /// Release a texture created with [`create_generated_texture`](Self::create_generated_texture)
    fn destroy_generated_texture(&mut self, name: &str);

    /// Pixel size of a texture that is loaded and ready to sample
    fn loaded_texture_size(&self, name: &str) -> Option<(u32, u32)>;
}
