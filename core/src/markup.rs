//! Inline color markup
//!
//! Surface text may carry two inline tags:
//!
//! - `<color=NAME_OR_RGB>` switches the color of the text that follows. The
//!   tag closes at the next `>`; the body is a color name or an `r,g,b` /
//!   `r,g,b,a` byte tuple.
//! - `<reset>` switches back to the surface's configured color.
//!
//! Tags that do not resolve are left in the text as written. Tokenizing never
//! fails.

use std::ops::Range;

use hudsprite_types::Rgba;

use crate::colors;

const COLOR_TAG_START: &str = "<color=";
const COLOR_TAG_END: u8 = b'>';
const RESET_TAG: &str = "<reset>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    LineStart,
    ColorStart,
    ColorEnd,
    Reset,
}

/// A tag boundary within a line. Offsets are byte offsets into the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkupToken {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl MarkupToken {
    fn new(kind: TokenKind, start: usize) -> Self {
        let len = match kind {
            TokenKind::LineStart => 0,
            TokenKind::ColorStart => COLOR_TAG_START.len(),
            TokenKind::ColorEnd => 1,
            TokenKind::Reset => RESET_TAG.len(),
        };
        Self {
            kind,
            start,
            end: start + len,
        }
    }
}

/// A run of visible text drawn in one color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub range: Range<usize>,
    pub color: Rgba,
}

impl Segment {
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.range.clone()]
    }
}

/// Scan `line` for tags, replacing the contents of `tokens`.
///
/// The first token is always `LineStart`. A `>` only produces `ColorEnd`
/// directly after a `ColorStart`.
pub fn tokenize(line: &str, tokens: &mut Vec<MarkupToken>) {
    tokens.clear();
    tokens.push(MarkupToken::new(TokenKind::LineStart, 0));

    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let rest = &bytes[i..];
        if rest.starts_with(COLOR_TAG_START.as_bytes()) {
            tokens.push(MarkupToken::new(TokenKind::ColorStart, i));
            i += COLOR_TAG_START.len();
        } else if rest.starts_with(RESET_TAG.as_bytes()) {
            tokens.push(MarkupToken::new(TokenKind::Reset, i));
            i += RESET_TAG.len();
        } else if bytes[i] == COLOR_TAG_END
            && tokens.last().is_some_and(|t| t.kind == TokenKind::ColorStart)
        {
            tokens.push(MarkupToken::new(TokenKind::ColorEnd, i));
            i += 1;
        } else {
            i += 1;
        }
    }
}

/// Whether the token list contains any tag besides the line start
pub fn has_markup(tokens: &[MarkupToken]) -> bool {
    tokens.len() > 1
}

/// Build colored segments from `tokens`, replacing the contents of `segments`.
///
/// Text before the first tag is drawn in `start`; `<reset>` switches to
/// `reset`. Resolved tags are elided from the output; unresolved color tags
/// stay as literal text in the current color. Empty segments are dropped.
///
/// Returns the color in effect at the end of the line.
pub fn build_segments(
    line: &str,
    start: Rgba,
    reset: Rgba,
    tokens: &[MarkupToken],
    segments: &mut Vec<Segment>,
) -> Rgba {
    segments.clear();

    let next_start = |t: usize| tokens.get(t + 1).map_or(line.len(), |n| n.start);
    let mut color = start;
    let mut prev_end = 0;
    let mut t = 0;

    while t < tokens.len() {
        let token = tokens[t];
        let mut seg_start = prev_end;
        let mut seg_end = next_start(t);

        match token.kind {
            TokenKind::ColorStart => {
                if let Some(close) = tokens.get(t + 1).filter(|n| n.kind == TokenKind::ColorEnd) {
                    if let Some(parsed) = colors::parse_color(&line[token.end..close.start]) {
                        color = parsed;
                        seg_start = close.end;
                    }
                    t += 1;
                    seg_end = next_start(t);
                }
            }
            TokenKind::Reset => {
                color = reset;
                seg_start = token.end;
            }
            TokenKind::LineStart | TokenKind::ColorEnd => {}
        }

        if seg_end > seg_start {
            segments.push(Segment {
                range: seg_start..seg_end,
                color,
            });
        }

        prev_end = seg_end;
        t += 1;
    }
    color
}

/// Reusable token and segment buffers.
///
/// The compositor keeps one of these for a whole frame so splitting lines
/// does not allocate once the buffers have grown.
#[derive(Debug, Default)]
pub struct MarkupScratch {
    tokens: Vec<MarkupToken>,
    segments: Vec<Segment>,
    end_color: Rgba,
}

impl MarkupScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize `line` and return its segments
    pub fn split(&mut self, line: &str, base: Rgba) -> &[Segment] {
        self.split_from(line, base, base)
    }

    /// Like [`split`](Self::split), but text before the first tag is drawn in
    /// `start`. Used to carry an unreset color over from the previous line.
    pub fn split_from(&mut self, line: &str, start: Rgba, reset: Rgba) -> &[Segment] {
        tokenize(line, &mut self.tokens);
        self.end_color = build_segments(line, start, reset, &self.tokens, &mut self.segments);
        &self.segments
    }

    /// Color in effect at the end of the last split line
    pub fn end_color(&self) -> Rgba {
        self.end_color
    }

    /// Tokens from the last [`split`](Self::split)
    pub fn tokens(&self) -> &[MarkupToken] {
        &self.tokens
    }

    /// Segments from the last [`split`](Self::split)
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the last split line carried any tag
    pub fn has_markup(&self) -> bool {
        has_markup(&self.tokens)
    }
}

/// Split a line into `(text, color)` pairs
pub fn segments(line: &str, base: Rgba) -> Vec<(&str, Rgba)> {
    let mut scratch = MarkupScratch::new();
    scratch
        .split(line, base)
        .iter()
        .map(|s| (s.text(line), s.color))
        .collect()
}
