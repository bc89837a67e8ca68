use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use hudsprite_core::{
    Block, ConfigSource, ContentKind, FontKind, Grid, OverlayContext, Rgba, Session, Settings,
    Surface, SurfaceIdentity, TextureError, TextureHost,
};

// ─────────────────────────────────────────────────────────────────────────────
// Fake host
// ─────────────────────────────────────────────────────────────────────────────

struct Screen {
    kind: ContentKind,
    native: String,
}

impl Surface for Screen {
    fn instance_id(&self) -> u64 {
        1
    }
    fn font_size(&self) -> f32 {
        1.0
    }
    fn font_color(&self) -> Rgba {
        Rgba::WHITE
    }
    fn font_kind(&self) -> FontKind {
        FontKind::Proportional
    }
    fn content_kind(&self) -> ContentKind {
        self.kind
    }
    fn text(&self) -> String {
        "text".to_string()
    }
    fn texture_size(&self) -> (u32, u32) {
        (256, 256)
    }
    fn texture_generated(&self) -> bool {
        true
    }
    fn render_texture_name(&self) -> Option<String> {
        Some(self.native.clone())
    }
}

struct Panel {
    id: i64,
    title: Option<String>,
    custom_data: Mutex<String>,
    screens: Vec<Arc<Screen>>,
    closed: AtomicBool,
}

impl Panel {
    fn new(id: i64, custom_data: &str, kind: ContentKind, screens: usize) -> Arc<Self> {
        Arc::new(Self {
            id,
            title: None,
            custom_data: Mutex::new(custom_data.to_string()),
            screens: (0..screens)
                .map(|i| {
                    Arc::new(Screen {
                        kind,
                        native: format!("lcd_{id}_{i}"),
                    })
                })
                .collect(),
            closed: AtomicBool::new(false),
        })
    }
}

impl Block for Panel {
    fn entity_id(&self) -> i64 {
        self.id
    }
    fn custom_data(&self) -> String {
        self.custom_data.lock().unwrap().clone()
    }
    fn public_title(&self) -> Option<String> {
        self.title.clone()
    }
    fn surface_count(&self) -> usize {
        self.screens.len()
    }
    fn surface(&self, index: usize) -> Option<Arc<dyn Surface>> {
        self.screens
            .get(index)
            .map(|s| Arc::clone(s) as Arc<dyn Surface>)
    }
    fn is_working(&self) -> bool {
        true
    }
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

struct Ship(Mutex<Vec<Arc<dyn Block>>>);

impl Grid for Ship {
    fn blocks(&self) -> Vec<Arc<dyn Block>> {
        self.0.lock().unwrap().clone()
    }
}

struct Game {
    ready: AtomicBool,
    frame: AtomicU64,
    seated: AtomicBool,
    ship: Arc<Ship>,
}

impl Game {
    fn new(panels: &[&Arc<Panel>]) -> Self {
        let blocks = panels
            .iter()
            .map(|p| Arc::clone(p) as Arc<dyn Block>)
            .collect();
        Self {
            ready: AtomicBool::new(true),
            frame: AtomicU64::new(1000),
            seated: AtomicBool::new(true),
            ship: Arc::new(Ship(Mutex::new(blocks))),
        }
    }

    fn add(&self, panel: &Arc<Panel>) {
        self.ship
            .0
            .lock()
            .unwrap()
            .push(Arc::clone(panel) as Arc<dyn Block>);
    }

    fn set_frame(&self, frame: u64) {
        self.frame.store(frame, Ordering::SeqCst);
    }
}

impl Session for Game {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
    fn frame_counter(&self) -> u64 {
        self.frame.load(Ordering::SeqCst)
    }
    fn controlled_grid(&self) -> Option<Arc<dyn Grid>> {
        self.seated
            .load(Ordering::SeqCst)
            .then(|| Arc::clone(&self.ship) as Arc<dyn Grid>)
    }
}

#[derive(Default)]
struct Gpu {
    live: Vec<String>,
    created: usize,
}

impl TextureHost for Gpu {
    fn create_generated_texture(
        &mut self,
        name: &str,
        _w: u32,
        _h: u32,
    ) -> Result<(), TextureError> {
        self.live.push(name.to_string());
        self.created += 1;
        Ok(())
    }
    fn destroy_generated_texture(&mut self, name: &str) {
        self.live.retain(|n| n != name);
    }
    fn loaded_texture_size(&self, name: &str) -> Option<(u32, u32)> {
        self.live.iter().any(|n| n == name).then_some((256, 256))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_scan_runs_every_hundred_ticks() {
    let a = Panel::new(1, "hudlcd", ContentKind::TextAndImage, 1);
    let game = Game::new(&[&a]);
    let ctx = OverlayContext::default();
    let mut gpu = Gpu::default();

    ctx.tick(&game, &mut gpu);
    assert_eq!(ctx.registry().len(), 1);

    // a new panel is only picked up once the interval has passed
    let b = Panel::new(2, "hudlcd", ContentKind::TextAndImage, 1);
    game.add(&b);
    game.set_frame(1100);
    ctx.tick(&game, &mut gpu);
    assert_eq!(ctx.registry().len(), 1);

    game.set_frame(1101);
    ctx.tick(&game, &mut gpu);
    assert_eq!(ctx.registry().len(), 2);
}

#[test]
fn test_leaving_the_cockpit_clears_everything() {
    let a = Panel::new(1, "hudlcd", ContentKind::Script, 1);
    let game = Game::new(&[&a]);
    let ctx = OverlayContext::default();
    let mut gpu = Gpu::default();

    ctx.tick(&game, &mut gpu);
    assert_eq!(gpu.live, vec!["HUDSPRITE_lcd_1_0".to_string()]);
    assert!(ctx.is_generated_texture("HUDSPRITE_lcd_1_0"));

    game.seated.store(false, Ordering::SeqCst);
    game.set_frame(1001);
    ctx.tick(&game, &mut gpu);
    assert!(ctx.registry().is_empty());
    assert!(gpu.live.is_empty());
    assert!(ctx.created_textures().is_empty());

    // next tick in the seat rescans right away
    game.seated.store(true, Ordering::SeqCst);
    game.set_frame(1010);
    ctx.tick(&game, &mut gpu);
    assert_eq!(ctx.registry().len(), 1);
    assert_eq!(gpu.created, 2);
}

#[test]
fn test_session_not_ready_clears() {
    let a = Panel::new(1, "hudlcd", ContentKind::TextAndImage, 1);
    let game = Game::new(&[&a]);
    let ctx = OverlayContext::default();
    let mut gpu = Gpu::default();
    ctx.tick(&game, &mut gpu);

    game.ready.store(false, Ordering::SeqCst);
    ctx.tick(&game, &mut gpu);
    assert!(ctx.registry().is_empty());
}

#[test]
fn test_disabled_overlay_tracks_nothing() {
    let a = Panel::new(1, "hudlcd", ContentKind::Script, 1);
    let game = Game::new(&[&a]);
    let ctx = OverlayContext::new(Settings {
        enabled: false,
        scan_all_text: false,
    });
    let mut gpu = Gpu::default();

    ctx.tick(&game, &mut gpu);
    assert!(ctx.registry().is_empty());
    assert_eq!(gpu.created, 0);
}

#[test]
fn test_untagged_metadata_retires_surface() {
    let a = Panel::new(1, "hudlcd:0:0", ContentKind::Script, 1);
    let game = Game::new(&[&a]);
    let ctx = OverlayContext::default();
    let mut gpu = Gpu::default();
    ctx.tick(&game, &mut gpu);
    assert_eq!(gpu.live.len(), 1);

    *a.custom_data.lock().unwrap() = "nothing to see".to_string();
    game.set_frame(1005);
    ctx.tick(&game, &mut gpu);
    assert_eq!(ctx.registry().len(), 1);

    game.set_frame(1010);
    ctx.tick(&game, &mut gpu);
    assert!(ctx.registry().is_empty());
    assert!(gpu.live.is_empty());
}

#[test]
fn test_closed_block_is_retired() {
    let a = Panel::new(1, "hudlcd", ContentKind::TextAndImage, 1);
    let game = Game::new(&[&a]);
    let ctx = OverlayContext::default();
    let mut gpu = Gpu::default();
    ctx.tick(&game, &mut gpu);

    a.closed.store(true, Ordering::SeqCst);
    game.set_frame(1010);
    ctx.tick(&game, &mut gpu);
    assert!(ctx.registry().is_empty());
}

#[test]
fn test_hidden_owner_releases_script_texture() {
    let a = Panel::new(9, "hudlcd", ContentKind::Script, 1);
    let game = Game::new(&[&a]);
    let ctx = OverlayContext::default();
    let mut gpu = Gpu::default();
    ctx.tick(&game, &mut gpu);

    ctx.set_draw_state(9, false);
    assert!(!ctx.draw_state(9));
    game.set_frame(1010);
    ctx.tick(&game, &mut gpu);

    assert!(gpu.live.is_empty());
    let identity = SurfaceIdentity::new(9, 0);
    assert_eq!(ctx.registry().with_surface(&identity, |s| s.should_draw()), Some(false));
}

#[test]
fn test_multi_surface_block() {
    let a = Panel::new(5, "hudlcd:-1:1\nnotes\nhudlcd:0:0:2", ContentKind::TextAndImage, 3);
    let game = Game::new(&[&a]);
    let ctx = OverlayContext::default();
    let mut gpu = Gpu::default();
    ctx.tick(&game, &mut gpu);

    assert_eq!(
        ctx.registry().identities(),
        vec![SurfaceIdentity::new(5, 0), SurfaceIdentity::new(5, 1)]
    );
    let scale = ctx
        .registry()
        .with_surface(&SurfaceIdentity::new(5, 1), |s| s.config().scale)
        .unwrap();
    assert!((scale - 2.0 * 0.682).abs() < 1e-6);
}

#[test]
fn test_title_directive() {
    let panel = Arc::new(Panel {
        id: 3,
        title: Some("HudLcd:0:0".to_string()),
        custom_data: Mutex::new(String::new()),
        screens: vec![Arc::new(Screen {
            kind: ContentKind::TextAndImage,
            native: "lcd_3_0".to_string(),
        })],
        closed: AtomicBool::new(false),
    });
    let game = Game::new(&[&panel]);
    let ctx = OverlayContext::default();
    let mut gpu = Gpu::default();
    ctx.tick(&game, &mut gpu);

    let source = ctx
        .registry()
        .with_surface(&SurfaceIdentity::new(3, 0), |s| s.source());
    assert_eq!(source, Some(ConfigSource::Title));
}

#[test]
fn test_keep_in_range() {
    let a = Panel::new(1, "hudlcd", ContentKind::Script, 1);
    let game = Game::new(&[&a]);
    let ctx = OverlayContext::default();
    let mut gpu = Gpu::default();
    ctx.tick(&game, &mut gpu);

    let tracked = SurfaceIdentity::new(1, 0);
    assert!(ctx.keep_in_range(&tracked, true, ContentKind::Script));
    assert!(!ctx.keep_in_range(&tracked, false, ContentKind::Script));
    assert!(!ctx.keep_in_range(&tracked, true, ContentKind::TextAndImage));
    assert!(!ctx.keep_in_range(&SurfaceIdentity::new(2, 0), true, ContentKind::Script));
}

#[test]
fn test_init_persists_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = hudsprite_core::settings::settings_path(dir.path());

    let ctx = OverlayContext::init(&path);
    assert_eq!(ctx.settings(), Settings::default());
    assert!(path.exists());

    let changed = Settings {
        enabled: false,
        scan_all_text: true,
    };
    ctx.save_settings(changed);
    assert_eq!(OverlayContext::init(&path).settings(), changed);
}

#[test]
fn test_dispose_releases_textures() {
    let a = Panel::new(1, "hudlcd", ContentKind::Script, 1);
    let b = Panel::new(2, "hudlcd", ContentKind::Script, 1);
    let game = Game::new(&[&a, &b]);
    let ctx = OverlayContext::default();
    let mut gpu = Gpu::default();
    ctx.tick(&game, &mut gpu);
    assert_eq!(gpu.live.len(), 2);

    ctx.dispose(&mut gpu);
    assert!(gpu.live.is_empty());
    assert!(ctx.registry().is_empty());
}
