//! Per-frame compositing
//!
//! Runs from the host's frame-draw hook. Text surfaces are drawn line by
//! line with inline color markup; script surfaces have their backing
//! texture blitted onto the frame buffer. A failure on one surface is logged
//! and the rest of the frame carries on.

use hudsprite_core::{ContentKind, MarkupScratch, OverlayContext, SurfaceState};

use crate::layout::{self, Viewport};
use crate::renderer::{BlendMode, FrameRenderer, RenderError, RenderTarget};

#[derive(Debug, Clone, Copy, Default)]
pub struct CompositorOptions {
    /// Blit the host's own render texture for script surfaces that have no
    /// backing texture. The host texture has no usable alpha, so it replaces
    /// the frame buffer color under it.
    pub legacy_native_blit: bool,
}

/// Counters for one composited frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub lines: usize,
    pub draw_calls: usize,
    pub blits: usize,
    pub skipped: usize,
}

#[derive(Debug, Default)]
pub struct FrameCompositor {
    scratch: MarkupScratch,
    options: CompositorOptions,
}

impl FrameCompositor {
    pub fn new(options: CompositorOptions) -> Self {
        Self {
            scratch: MarkupScratch::new(),
            options,
        }
    }

    pub fn options(&self) -> CompositorOptions {
        self.options
    }

    /// Draw every tracked surface onto `target`.
    ///
    /// Only the backbuffer is composited; other targets return immediately.
    pub fn draw_frame(
        &mut self,
        ctx: &OverlayContext,
        target: &RenderTarget,
        renderer: &mut dyn FrameRenderer,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        if *target != RenderTarget::Backbuffer || !ctx.settings().enabled {
            return stats;
        }

        ctx.registry().for_each(|surface| {
            if !surface.should_draw() || !surface.content().visible {
                return;
            }
            match surface.content().kind {
                ContentKind::TextAndImage => self.draw_text(surface, renderer, &mut stats),
                ContentKind::Script => match self.blit_script(surface, renderer) {
                    Ok(true) => stats.blits += 1,
                    Ok(false) => {}
                    Err(e) => {
                        tracing::debug!(
                            identity = %surface.identity(),
                            error = %e,
                            "Skipping surface"
                        );
                        stats.skipped += 1;
                    }
                },
                ContentKind::None => {}
            }
        });
        stats
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Text
    // ─────────────────────────────────────────────────────────────────────────

    fn draw_text(
        &mut self,
        surface: &SurfaceState,
        renderer: &mut dyn FrameRenderer,
        stats: &mut FrameStats,
    ) {
        let config = surface.config();
        let content = surface.content();
        let (screen_width, _) = renderer.screen_size();
        let font_scale = renderer.font_scale_constant();

        // an unreset <color> carries into the following lines
        let mut color = config.text_color;
        for (l, line) in content.text.split('\n').enumerate() {
            let placement = layout::line_layout(content.font, l, config.scale);
            if !layout::is_visible(config.top_left, placement.offset) {
                break;
            }
            stats.lines += 1;

            let origin = config.top_left + placement.offset;
            self.scratch.split_from(line, color, config.text_color);
            if !self.scratch.has_markup() {
                if !line.is_empty() {
                    renderer.draw_string(content.font, origin, color, line, placement.scale);
                    stats.draw_calls += 1;
                }
                continue;
            }
            color = self.scratch.end_color();

            let mut x = 0.0;
            for segment in self.scratch.segments() {
                let text = segment.text(line);
                let mut position = origin;
                position.x += x;
                renderer.draw_string(content.font, position, segment.color, text, placement.scale);
                stats.draw_calls += 1;

                let measured = renderer.measure_string(content.font, text, placement.scale);
                x += layout::segment_advance(measured, placement.scale, font_scale, screen_width);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Script
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns `Ok(false)` when there is nothing ready to blit yet.
    fn blit_script(
        &self,
        surface: &SurfaceState,
        renderer: &mut dyn FrameRenderer,
    ) -> Result<bool, RenderError> {
        let name = match (surface.texture(), &surface.content().native_texture) {
            (Some(backing), _) => backing.name.as_str(),
            (None, Some(native)) if self.options.legacy_native_blit => native.as_str(),
            _ => return Ok(false),
        };

        // generated textures are not ready the moment they are created
        let Some(texture_size) = renderer.loaded_texture_size(name) else {
            return Ok(false);
        };

        let config = surface.config();
        let viewport = Viewport::for_surface(
            config.top_left,
            config.scale,
            texture_size,
            renderer.screen_size(),
        );
        if viewport.is_empty() {
            return Ok(false);
        }

        renderer.blit(name, viewport, BlendMode::for_texture(name))?;
        Ok(true)
    }
}
