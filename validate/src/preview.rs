//! Render a single surface the way the overlay would draw it in game.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};
use hudsprite_core::{
    Block, ContentKind, FontKind, Grid, OverlayContext, Rgba, Session, Surface,
};
use hudsprite_overlay::{FrameCompositor, RenderTarget, SoftwareRenderer};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FontArg {
    Monospace,
    Proportional,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Directive line, e.g. "hudlcd:-0.5:0.5:1.2:yellow"
    #[arg(short, long, default_value = "hudlcd")]
    directive: String,
    /// File with the surface text; markup is applied
    #[arg(short, long)]
    text: PathBuf,
    #[arg(long, value_enum, default_value = "proportional")]
    font: FontArg,
    #[arg(long, default_value_t = 1920)]
    width: u32,
    #[arg(long, default_value_t = 1080)]
    height: u32,
    #[arg(short, long, default_value = "preview.png")]
    out: PathBuf,
}

struct PreviewSurface {
    font: FontKind,
    text: String,
}

impl Surface for PreviewSurface {
    fn instance_id(&self) -> u64 {
        0
    }
    fn font_size(&self) -> f32 {
        1.0
    }
    fn font_color(&self) -> Rgba {
        Rgba::WHITE
    }
    fn font_kind(&self) -> FontKind {
        self.font
    }
    fn content_kind(&self) -> ContentKind {
        ContentKind::TextAndImage
    }
    fn text(&self) -> String {
        self.text.clone()
    }
    fn texture_size(&self) -> (u32, u32) {
        (512, 512)
    }
    fn texture_generated(&self) -> bool {
        false
    }
    fn render_texture_name(&self) -> Option<String> {
        None
    }
}

struct PreviewBlock {
    directive: String,
    surface: Arc<PreviewSurface>,
}

impl Block for PreviewBlock {
    fn entity_id(&self) -> i64 {
        1
    }
    fn custom_data(&self) -> String {
        self.directive.clone()
    }
    fn surface_count(&self) -> usize {
        1
    }
    fn surface(&self, index: usize) -> Option<Arc<dyn Surface>> {
        (index == 0).then(|| Arc::clone(&self.surface) as Arc<dyn Surface>)
    }
    fn is_working(&self) -> bool {
        true
    }
}

struct PreviewGrid(Arc<dyn Block>);

impl Grid for PreviewGrid {
    fn blocks(&self) -> Vec<Arc<dyn Block>> {
        vec![Arc::clone(&self.0)]
    }
}

/// A session frozen on a frame that triggers both a scan and a refresh
struct PreviewSession(Arc<dyn Grid>);

impl Session for PreviewSession {
    fn is_ready(&self) -> bool {
        true
    }
    fn frame_counter(&self) -> u64 {
        1000
    }
    fn controlled_grid(&self) -> Option<Arc<dyn Grid>> {
        Some(Arc::clone(&self.0))
    }
}

pub fn run(args: PreviewArgs) -> Result<(), String> {
    let text = std::fs::read_to_string(&args.text)
        .map_err(|e| format!("{}: {e}", args.text.display()))?;
    let font = match args.font {
        FontArg::Monospace => FontKind::Monospace,
        FontArg::Proportional => FontKind::Proportional,
    };

    let block: Arc<dyn Block> = Arc::new(PreviewBlock {
        directive: args.directive.clone(),
        surface: Arc::new(PreviewSurface { font, text }),
    });
    let session = PreviewSession(Arc::new(PreviewGrid(block)));

    let ctx = OverlayContext::default();
    let mut renderer = SoftwareRenderer::new(args.width, args.height).map_err(|e| e.to_string())?;
    ctx.tick(&session, &mut renderer);
    if ctx.registry().is_empty() {
        return Err(format!("{:?} is not a hudlcd directive", args.directive));
    }

    renderer.clear(Rgba::new(24, 28, 36, 255));
    let stats =
        FrameCompositor::default().draw_frame(&ctx, &RenderTarget::Backbuffer, &mut renderer);
    renderer.save_png(&args.out).map_err(|e| e.to_string())?;

    tracing::info!(
        path = %args.out.display(),
        lines = stats.lines,
        draw_calls = stats.draw_calls,
        "Preview written"
    );
    ctx.dispose(&mut renderer);
    Ok(())
}
