use hudsprite_types::Rgba;

use super::{legacy_to_screen, SurfaceConfig, DEFAULT_POSITION, LEGACY_SCALE};
use crate::colors;

/// Maximum number of `:`-separated fields, tag included
const MAX_FIELDS: usize = 6;

/// Values a configuration line falls back to, taken from the host surface's
/// own font settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseDefaults {
    pub font_size: f32,
    pub font_color: Rgba,
}

impl Default for ParseDefaults {
    fn default() -> Self {
        Self {
            font_size: 1.0,
            font_color: Rgba::WHITE,
        }
    }
}

/// Parse one directive line into a [`SurfaceConfig`].
///
/// Field 0 is the tag and is not checked here. Never fails: every field that
/// is missing, blank or malformed keeps its default.
pub fn parse_config_line(line: &str, defaults: ParseDefaults) -> SurfaceConfig {
    let (mut x, mut y) = DEFAULT_POSITION;
    let mut scale = defaults.font_size as f64;
    let mut text_color = defaults.font_color;
    let mut shadow = false;

    for (i, field) in line.trim().splitn(MAX_FIELDS, ':').enumerate().skip(1) {
        let field = field.trim();
        if field.is_empty() {
            continue;
        }

        match i {
            1 => x = parse_float(field).unwrap_or(x),
            2 => y = parse_float(field).unwrap_or(y),
            3 => scale = parse_float(field).filter(|s| *s > 0.0).unwrap_or(scale),
            4 => match colors::parse_color(&field.to_ascii_lowercase()) {
                Some(color) => text_color = color,
                None => tracing::trace!(field, "Unknown color in config line, keeping default"),
            },
            5 => shadow = matches!(field.to_ascii_lowercase().as_str(), "1" | "true" | "shadow"),
            _ => {}
        }
    }

    SurfaceConfig {
        top_left: legacy_to_screen(x, y),
        scale: (scale * LEGACY_SCALE) as f32,
        text_color,
        shadow,
    }
}

fn parse_float(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DEFAULTS: ParseDefaults = ParseDefaults {
        font_size: 1.5,
        font_color: Rgba::rgb(10, 20, 30),
    };

    #[test]
    fn test_full_line() {
        let cfg = parse_config_line("hudlcd:0.5:-0.5:2:red", DEFAULTS);
        assert_relative_eq!(cfg.top_left.x, 0.75);
        assert_relative_eq!(cfg.top_left.y, 0.75);
        assert_relative_eq!(cfg.scale, 2.0 * 0.682, epsilon = 1e-6);
        assert_eq!(cfg.text_color, Rgba::rgb(255, 0, 0));
        assert!(!cfg.shadow);
    }

    #[test]
    fn test_bare_tag_uses_defaults() {
        let cfg = parse_config_line("hudlcd", DEFAULTS);
        assert_relative_eq!(cfg.top_left.x, 0.01, epsilon = 1e-6);
        assert_relative_eq!(cfg.top_left.y, 0.6, epsilon = 1e-6);
        assert_relative_eq!(cfg.scale, 1.5 * 0.682, epsilon = 1e-6);
        assert_eq!(cfg.text_color, DEFAULTS.font_color);
    }

    #[test]
    fn test_trailing_fields_omitted() {
        // every prefix of the field list must honour the present fields and
        // default the rest
        let fields = ["hudlcd", "-0.5", "0.25", "3", "blue"];
        for n in 1..=fields.len() {
            let line = fields[..n].join(":");
            let cfg = parse_config_line(&line, DEFAULTS);

            let x = if n > 1 { -0.5 } else { DEFAULT_POSITION.0 };
            let y = if n > 2 { 0.25 } else { DEFAULT_POSITION.1 };
            let scale = if n > 3 { 3.0 } else { DEFAULTS.font_size as f64 };
            let color = if n > 4 { Rgba::rgb(0, 0, 255) } else { DEFAULTS.font_color };

            assert_relative_eq!(cfg.top_left.x, ((x + 1.0) / 2.0) as f32, epsilon = 1e-6);
            assert_relative_eq!(cfg.top_left.y, ((-y + 1.0) / 2.0) as f32, epsilon = 1e-6);
            assert_relative_eq!(cfg.scale, (scale * 0.682) as f32, epsilon = 1e-6);
            assert_eq!(cfg.text_color, color, "line {line}");
        }
    }

    #[test]
    fn test_malformed_fields_fall_back() {
        let cfg = parse_config_line("hudlcd:abc::-2:notacolor", DEFAULTS);
        assert_relative_eq!(cfg.top_left.x, 0.01, epsilon = 1e-6);
        assert_relative_eq!(cfg.top_left.y, 0.6, epsilon = 1e-6);
        assert_relative_eq!(cfg.scale, 1.5 * 0.682, epsilon = 1e-6);
        assert_eq!(cfg.text_color, DEFAULTS.font_color);
    }

    #[test]
    fn test_color_tuple_and_case() {
        let cfg = parse_config_line("HUDLCD:0:0:1:0,255,0,128", DEFAULTS);
        assert_eq!(cfg.text_color, Rgba::new(0, 255, 0, 128));

        let cfg = parse_config_line("hudlcd:0:0:1: Yellow ", DEFAULTS);
        assert_eq!(cfg.text_color, Rgba::rgb(255, 255, 0));
    }

    #[test]
    fn test_shadow_is_parsed() {
        assert!(parse_config_line("hudlcd:0:0:1:white:1", DEFAULTS).shadow);
        assert!(!parse_config_line("hudlcd:0:0:1:white:0", DEFAULTS).shadow);
    }

    #[test]
    fn test_extra_separators_stay_in_last_field() {
        let cfg = parse_config_line("hudlcd:0:0:1:white:1:extra", DEFAULTS);
        assert!(!cfg.shadow);
        assert_eq!(cfg.text_color, Rgba::WHITE);
    }
}
