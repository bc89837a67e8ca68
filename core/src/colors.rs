//! Named color table
//!
//! The set of color names accepted in configuration lines and inline markup.
//! Keys are lower-case; the table is built at compile time.

use hudsprite_types::Rgba;

static COLORS: phf::Map<&'static str, Rgba> = phf::phf_map! {
    "aliceblue" => Rgba::rgb(240, 248, 255),
    "antiquewhite" => Rgba::rgb(250, 235, 215),
    "aqua" => Rgba::rgb(0, 255, 255),
    "aquamarine" => Rgba::rgb(127, 255, 212),
    "azure" => Rgba::rgb(240, 255, 255),
    "beige" => Rgba::rgb(245, 245, 220),
    "bisque" => Rgba::rgb(255, 228, 196),
    "black" => Rgba::rgb(0, 0, 0),
    "blanchedalmond" => Rgba::rgb(255, 235, 205),
    "blue" => Rgba::rgb(0, 0, 255),
    "blueviolet" => Rgba::rgb(138, 43, 226),
    "brown" => Rgba::rgb(165, 42, 42),
    "burlywood" => Rgba::rgb(222, 184, 135),
    "cadetblue" => Rgba::rgb(95, 158, 160),
    "chartreuse" => Rgba::rgb(127, 255, 0),
    "chocolate" => Rgba::rgb(210, 105, 30),
    "coral" => Rgba::rgb(255, 127, 80),
    "cornflowerblue" => Rgba::rgb(100, 149, 237),
    "cornsilk" => Rgba::rgb(255, 248, 220),
    "crimson" => Rgba::rgb(220, 20, 60),
    "cyan" => Rgba::rgb(0, 255, 255),
    "darkblue" => Rgba::rgb(0, 0, 139),
    "darkcyan" => Rgba::rgb(0, 139, 139),
    "darkgoldenrod" => Rgba::rgb(184, 134, 11),
    "darkgray" => Rgba::rgb(169, 169, 169),
    "darkgreen" => Rgba::rgb(0, 100, 0),
    "darkkhaki" => Rgba::rgb(189, 183, 107),
    "darkmagenta" => Rgba::rgb(139, 0, 139),
    "darkolivegreen" => Rgba::rgb(85, 107, 47),
    "darkorange" => Rgba::rgb(255, 140, 0),
    "darkorchid" => Rgba::rgb(153, 50, 204),
    "darkred" => Rgba::rgb(139, 0, 0),
    "darksalmon" => Rgba::rgb(233, 150, 122),
    "darkseagreen" => Rgba::rgb(143, 188, 139),
    "darkslateblue" => Rgba::rgb(72, 61, 139),
    "darkslategray" => Rgba::rgb(47, 79, 79),
    "darkturquoise" => Rgba::rgb(0, 206, 209),
    "darkviolet" => Rgba::rgb(148, 0, 211),
    "deeppink" => Rgba::rgb(255, 20, 147),
    "deepskyblue" => Rgba::rgb(0, 191, 255),
    "dimgray" => Rgba::rgb(105, 105, 105),
    "dodgerblue" => Rgba::rgb(30, 144, 255),
    "firebrick" => Rgba::rgb(178, 34, 34),
    "floralwhite" => Rgba::rgb(255, 250, 240),
    "forestgreen" => Rgba::rgb(34, 139, 34),
    "fuchsia" => Rgba::rgb(255, 0, 255),
    "gainsboro" => Rgba::rgb(220, 220, 220),
    "ghostwhite" => Rgba::rgb(248, 248, 255),
    "gold" => Rgba::rgb(255, 215, 0),
    "goldenrod" => Rgba::rgb(218, 165, 32),
    "gray" => Rgba::rgb(128, 128, 128),
    "green" => Rgba::rgb(0, 128, 0),
    "greenyellow" => Rgba::rgb(173, 255, 47),
    "honeydew" => Rgba::rgb(240, 255, 240),
    "hotpink" => Rgba::rgb(255, 105, 180),
    "indianred" => Rgba::rgb(205, 92, 92),
    "indigo" => Rgba::rgb(75, 0, 130),
    "ivory" => Rgba::rgb(255, 255, 240),
    "khaki" => Rgba::rgb(240, 230, 140),
    "lavender" => Rgba::rgb(230, 230, 250),
    "lavenderblush" => Rgba::rgb(255, 240, 245),
    "lawngreen" => Rgba::rgb(124, 252, 0),
    "lemonchiffon" => Rgba::rgb(255, 250, 205),
    "lightblue" => Rgba::rgb(173, 216, 230),
    "lightcoral" => Rgba::rgb(240, 128, 128),
    "lightcyan" => Rgba::rgb(224, 255, 255),
    "lightgoldenrodyellow" => Rgba::rgb(250, 250, 210),
    "lightgray" => Rgba::rgb(211, 211, 211),
    "lightgreen" => Rgba::rgb(144, 238, 144),
    "lightpink" => Rgba::rgb(255, 182, 193),
    "lightsalmon" => Rgba::rgb(255, 160, 122),
    "lightseagreen" => Rgba::rgb(32, 178, 170),
    "lightskyblue" => Rgba::rgb(135, 206, 250),
    "lightslategray" => Rgba::rgb(119, 136, 153),
    "lightsteelblue" => Rgba::rgb(176, 196, 222),
    "lightyellow" => Rgba::rgb(255, 255, 224),
    "lime" => Rgba::rgb(0, 255, 0),
    "limegreen" => Rgba::rgb(50, 205, 50),
    "linen" => Rgba::rgb(250, 240, 230),
    "magenta" => Rgba::rgb(255, 0, 255),
    "maroon" => Rgba::rgb(128, 0, 0),
    "mediumaquamarine" => Rgba::rgb(102, 205, 170),
    "mediumblue" => Rgba::rgb(0, 0, 205),
    "mediumorchid" => Rgba::rgb(186, 85, 211),
    "mediumpurple" => Rgba::rgb(147, 112, 219),
    "mediumseagreen" => Rgba::rgb(60, 179, 113),
    "mediumslateblue" => Rgba::rgb(123, 104, 238),
    "mediumspringgreen" => Rgba::rgb(0, 250, 154),
    "mediumturquoise" => Rgba::rgb(72, 209, 204),
    "mediumvioletred" => Rgba::rgb(199, 21, 133),
    "midnightblue" => Rgba::rgb(25, 25, 112),
    "mintcream" => Rgba::rgb(245, 255, 250),
    "mistyrose" => Rgba::rgb(255, 228, 225),
    "moccasin" => Rgba::rgb(255, 228, 181),
    "navajowhite" => Rgba::rgb(255, 222, 173),
    "navy" => Rgba::rgb(0, 0, 128),
    "oldlace" => Rgba::rgb(253, 245, 230),
    "olive" => Rgba::rgb(128, 128, 0),
    "olivedrab" => Rgba::rgb(107, 142, 35),
    "orange" => Rgba::rgb(255, 165, 0),
    "orangered" => Rgba::rgb(255, 69, 0),
    "orchid" => Rgba::rgb(218, 112, 214),
    "palegoldenrod" => Rgba::rgb(238, 232, 170),
    "palegreen" => Rgba::rgb(152, 251, 152),
    "paleturquoise" => Rgba::rgb(175, 238, 238),
    "palevioletred" => Rgba::rgb(219, 112, 147),
    "papayawhip" => Rgba::rgb(255, 239, 213),
    "peachpuff" => Rgba::rgb(255, 218, 185),
    "peru" => Rgba::rgb(205, 133, 63),
    "pink" => Rgba::rgb(255, 192, 203),
    "plum" => Rgba::rgb(221, 160, 221),
    "powderblue" => Rgba::rgb(176, 224, 230),
    "purple" => Rgba::rgb(128, 0, 128),
    "red" => Rgba::rgb(255, 0, 0),
    "rosybrown" => Rgba::rgb(188, 143, 143),
    "royalblue" => Rgba::rgb(65, 105, 225),
    "saddlebrown" => Rgba::rgb(139, 69, 19),
    "salmon" => Rgba::rgb(250, 128, 114),
    "sandybrown" => Rgba::rgb(244, 164, 96),
    "seagreen" => Rgba::rgb(46, 139, 87),
    "seashell" => Rgba::rgb(255, 245, 238),
    "sienna" => Rgba::rgb(160, 82, 45),
    "silver" => Rgba::rgb(192, 192, 192),
    "skyblue" => Rgba::rgb(135, 206, 235),
    "slateblue" => Rgba::rgb(106, 90, 205),
    "slategray" => Rgba::rgb(112, 128, 144),
    "snow" => Rgba::rgb(255, 250, 250),
    "springgreen" => Rgba::rgb(0, 255, 127),
    "steelblue" => Rgba::rgb(70, 130, 180),
    "tan" => Rgba::rgb(210, 180, 140),
    "teal" => Rgba::rgb(0, 128, 128),
    "thistle" => Rgba::rgb(216, 191, 216),
    "tomato" => Rgba::rgb(255, 99, 71),
    "transparent" => Rgba::new(0, 0, 0, 0),
    "turquoise" => Rgba::rgb(64, 224, 208),
    "violet" => Rgba::rgb(238, 130, 238),
    "wheat" => Rgba::rgb(245, 222, 179),
    "white" => Rgba::rgb(255, 255, 255),
    "whitesmoke" => Rgba::rgb(245, 245, 245),
    "yellow" => Rgba::rgb(255, 255, 0),
    "yellowgreen" => Rgba::rgb(154, 205, 50),
};

/// Look up a named color.
///
/// With `case_insensitive` the name is lower-cased before lookup; otherwise
/// only exact (lower-case) keys match.
pub fn lookup(name: &str, case_insensitive: bool) -> Option<Rgba> {
    if case_insensitive && name.bytes().any(|b| b.is_ascii_uppercase()) {
        COLORS.get(name.to_ascii_lowercase().as_str()).copied()
    } else {
        COLORS.get(name).copied()
    }
}

/// Parse a color body: a table name (any case) or an `r,g,b` / `r,g,b,a`
/// tuple of byte values. Anything else, including out-of-range components,
/// yields `None`.
pub fn parse_color(body: &str) -> Option<Rgba> {
    if let Some(color) = lookup(body, true) {
        return Some(color);
    }

    let parts: Vec<&str> = body.splitn(4, ',').collect();
    let byte = |s: &str| s.trim().parse::<u8>().ok();
    match parts.as_slice() {
        [r, g, b] => Some(Rgba::rgb(byte(r)?, byte(g)?, byte(b)?)),
        [r, g, b, a] => Some(Rgba::new(byte(r)?, byte(g)?, byte(b)?, byte(a)?)),
        _ => None,
    }
}

/// All known color names, in no particular order
pub fn names() -> impl Iterator<Item = &'static str> {
    COLORS.keys().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known() {
        assert_eq!(lookup("red", false), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(lookup("green", false), Some(Rgba::rgb(0, 128, 0)));
        assert_eq!(lookup("transparent", false), Some(Rgba::new(0, 0, 0, 0)));
    }

    #[test]
    fn test_lookup_case() {
        assert_eq!(lookup("Red", false), None);
        assert_eq!(lookup("Red", true), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(lookup("DarkSlateGray", true), lookup("darkslategray", false));
    }

    #[test]
    fn test_lookup_unknown() {
        assert_eq!(lookup("bogus", true), None);
        assert_eq!(lookup("", true), None);
    }

    #[test]
    fn test_parse_color_tuples() {
        assert_eq!(parse_color("10,20,30"), Some(Rgba::rgb(10, 20, 30)));
        assert_eq!(parse_color("10, 20, 30, 40"), Some(Rgba::new(10, 20, 30, 40)));
        assert_eq!(parse_color("Yellow"), Some(Rgba::rgb(255, 255, 0)));
    }

    #[test]
    fn test_parse_color_rejects() {
        assert_eq!(parse_color("256,0,0"), None);
        assert_eq!(parse_color("-1,0,0"), None);
        assert_eq!(parse_color("1,2"), None);
        assert_eq!(parse_color("1,2,3,4,5"), None);
        assert_eq!(parse_color("a,b,c"), None);
        assert_eq!(parse_color(""), None);
    }

    #[test]
    fn test_names_count() {
        assert_eq!(names().count(), 141);
        assert!(names().all(|n| n.chars().all(|c| c.is_ascii_lowercase())));
    }
}
