//! In-memory game host shared by the overlay integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use hudsprite_core::{
    Block, ContentKind, FontKind, Grid, Rgba, Session, Surface, TextureError, TextureHost,
};

pub struct FakeSurface {
    pub font_size: f32,
    pub font_color: Rgba,
    pub font: FontKind,
    pub kind: Mutex<ContentKind>,
    pub text: Mutex<String>,
    pub texture_size: (u32, u32),
    pub native_name: String,
}

impl Surface for FakeSurface {
    fn instance_id(&self) -> u64 {
        1
    }
    fn font_size(&self) -> f32 {
        self.font_size
    }
    fn font_color(&self) -> Rgba {
        self.font_color
    }
    fn font_kind(&self) -> FontKind {
        self.font
    }
    fn content_kind(&self) -> ContentKind {
        *self.kind.lock().unwrap()
    }
    fn text(&self) -> String {
        self.text.lock().unwrap().clone()
    }
    fn texture_size(&self) -> (u32, u32) {
        self.texture_size
    }
    fn texture_generated(&self) -> bool {
        true
    }
    fn render_texture_name(&self) -> Option<String> {
        Some(self.native_name.clone())
    }
}

pub struct FakeBlock {
    pub id: i64,
    pub custom_data: Mutex<String>,
    pub surfaces: Vec<Arc<FakeSurface>>,
    pub working: bool,
    pub in_scene: AtomicBool,
}

impl Block for FakeBlock {
    fn entity_id(&self) -> i64 {
        self.id
    }
    fn custom_data(&self) -> String {
        self.custom_data.lock().unwrap().clone()
    }
    fn surface_count(&self) -> usize {
        self.surfaces.len()
    }
    fn surface(&self, index: usize) -> Option<Arc<dyn Surface>> {
        self.surfaces
            .get(index)
            .map(|s| Arc::clone(s) as Arc<dyn Surface>)
    }
    fn is_working(&self) -> bool {
        self.working
    }
    fn in_scene(&self) -> bool {
        self.in_scene.load(Ordering::SeqCst)
    }
}

pub struct FakeGrid(pub Vec<Arc<dyn Block>>);

impl Grid for FakeGrid {
    fn blocks(&self) -> Vec<Arc<dyn Block>> {
        self.0.clone()
    }
}

pub struct FakeSession {
    pub frame: AtomicU64,
    pub grid: Arc<FakeGrid>,
}

impl FakeSession {
    pub fn new(blocks: &[&Arc<FakeBlock>]) -> Self {
        let blocks = blocks
            .iter()
            .map(|b| Arc::clone(b) as Arc<dyn Block>)
            .collect();
        Self {
            frame: AtomicU64::new(1000),
            grid: Arc::new(FakeGrid(blocks)),
        }
    }

    pub fn advance(&self, frames: u64) {
        self.frame.fetch_add(frames, Ordering::SeqCst);
    }
}

impl Session for FakeSession {
    fn is_ready(&self) -> bool {
        true
    }
    fn frame_counter(&self) -> u64 {
        self.frame.load(Ordering::SeqCst)
    }
    fn controlled_grid(&self) -> Option<Arc<dyn Grid>> {
        Some(Arc::clone(&self.grid) as Arc<dyn Grid>)
    }
}

/// Texture host that refuses every allocation
pub struct RefusingTextures;

impl TextureHost for RefusingTextures {
    fn create_generated_texture(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
    ) -> Result<(), TextureError> {
        Err(TextureError::Allocation {
            name: name.to_string(),
            width,
            height,
            reason: "refused".to_string(),
        })
    }
    fn destroy_generated_texture(&mut self, _name: &str) {}
    fn loaded_texture_size(&self, _name: &str) -> Option<(u32, u32)> {
        None
    }
}

fn block(id: i64, custom_data: &str, surface: FakeSurface) -> Arc<FakeBlock> {
    Arc::new(FakeBlock {
        id,
        custom_data: Mutex::new(custom_data.to_string()),
        surfaces: vec![Arc::new(surface)],
        working: true,
        in_scene: AtomicBool::new(true),
    })
}

/// Block with one text surface showing `text`
pub fn text_block(id: i64, custom_data: &str, text: &str, font: FontKind) -> Arc<FakeBlock> {
    block(
        id,
        custom_data,
        FakeSurface {
            font_size: 1.0,
            font_color: Rgba::WHITE,
            font,
            kind: Mutex::new(ContentKind::TextAndImage),
            text: Mutex::new(text.to_string()),
            texture_size: (512, 512),
            native_name: format!("lcd_{id}"),
        },
    )
}

/// Block with one script surface rendering into a `size` texture
pub fn script_block(id: i64, custom_data: &str, size: (u32, u32)) -> Arc<FakeBlock> {
    block(
        id,
        custom_data,
        FakeSurface {
            font_size: 1.0,
            font_color: Rgba::WHITE,
            font: FontKind::Proportional,
            kind: Mutex::new(ContentKind::Script),
            text: Mutex::new(String::new()),
            texture_size: size,
            native_name: format!("lcd_{id}"),
        },
    )
}
