//! Conversions between overlay types and tiny-skia

use hudsprite_types::Rgba;
use tiny_skia::Color;

/// Convert an [`Rgba`] to a tiny_skia Color
#[inline]
pub fn color_from_rgba(rgba: Rgba) -> Color {
    Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

/// Read back a premultiplied pixel as straight RGBA
#[inline]
pub fn rgba_from_pixel(pixel: tiny_skia::PremultipliedColorU8) -> Rgba {
    let c = pixel.demultiply();
    Rgba::new(c.red(), c.green(), c.blue(), c.alpha())
}
