//! Surface configuration mini-language
//!
//! A surface opts into the overlay through a directive line in its owning
//! block's metadata (or, for the first surface of a text panel, its title):
//!
//! ```text
//! hudlcd[:x[:y[:scale[:color[:shadow]]]]]
//! ```
//!
//! Parsing is permissive: a field that is empty or does not
//! parse keeps its default, so a typo never disables a surface.

mod parser;
mod select;

pub use parser::{parse_config_line, ParseDefaults};
pub use select::{find_surface_line, line_has_tag, select_config, ConfigSource};

use hudsprite_types::{Rgba, Vec2};

/// Literal that marks a directive line
pub const CONFIG_TAG: &str = "hudlcd";

/// Default legacy position when x/y are omitted (left edge, slightly below centre)
pub const DEFAULT_POSITION: (f64, f64) = (-0.98, -0.2);

/// Scale correction matching the legacy overlay's text size.
///
/// Older releases used 0.68; 0.682 is the current value.
pub const LEGACY_SCALE: f64 = 0.682;

/// Parsed placement and styling for one surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceConfig {
    /// Top-left corner in normalized screen space, origin at the top left
    pub top_left: Vec2,
    /// Text scale (already multiplied by [`LEGACY_SCALE`])
    pub scale: f32,
    /// Base text color, used until markup overrides it
    pub text_color: Rgba,
    /// Text shadow flag. Parsed but not drawn.
    pub shadow: bool,
}

impl SurfaceConfig {
    /// Configuration produced by a bare `hudlcd` line
    pub fn from_defaults(defaults: ParseDefaults) -> Self {
        parse_config_line(CONFIG_TAG, defaults)
    }
}

/// Map a legacy coordinate (x right in [-1,1], y up in [1,-1]) to normalized
/// screen space.
pub fn legacy_to_screen(x: f64, y: f64) -> Vec2 {
    Vec2::new(((x + 1.0) * 0.5) as f32, ((-y + 1.0) * 0.5) as f32)
}
