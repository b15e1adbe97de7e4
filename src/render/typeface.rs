//! Glyph measurement and rasterization.
//!
//! The renderer only needs advance widths, vertical metrics and coverage
//! bitmaps, so it talks to a [`Typeface`] rather than to fontdue directly.

use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};

use crate::consts::{FONT_CANDIDATES, USER_FONT_NAMES};
use crate::error::{Error, Result};

/// A rasterized glyph, positioned relative to the pen and baseline.
#[derive(Debug, Clone, Default)]
pub struct Glyph {
    /// Offset from the pen position to the bitmap's left edge.
    pub xmin: i32,
    /// Offset from the baseline to the bitmap's bottom edge, positive up.
    pub ymin: i32,
    pub width: usize,
    pub height: usize,
    pub advance: f32,
    /// Row-major coverage, `width * height` bytes.
    pub coverage: Vec<u8>,
}

/// Font metrics the layout relies on.
pub trait Typeface: Send + Sync {
    /// Distance from baseline to the top of the em box (positive).
    fn ascent(&self, px: f32) -> f32;
    /// Distance from baseline to the bottom of the em box (negative).
    fn descent(&self, px: f32) -> f32;
    /// Horizontal kerning between two adjacent characters.
    fn kern(&self, _left: char, _right: char, _px: f32) -> f32 {
        0.0
    }
    fn glyph(&self, ch: char, px: f32) -> Glyph;
    fn advance(&self, ch: char, px: f32) -> f32;

    /// Rendered width of a single line of text.
    fn measure(&self, text: &str, px: f32) -> f32 {
        let mut width = 0.0;
        let mut prev = None;
        for ch in text.chars() {
            if let Some(p) = prev {
                width += self.kern(p, ch, px);
            }
            width += self.advance(ch, px);
            prev = Some(ch);
        }
        width
    }
}

/// A TrueType/OpenType font rasterized by fontdue.
pub struct FontdueTypeface {
    font: Font,
}

impl FontdueTypeface {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| Error::Font(e.to_string()))?;
        Ok(Self { font })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::Font(format!("cannot read {}: {e}", path.display())))?;
        Self::from_bytes(bytes)
    }

    /// Load the configured font, or the first installed fallback.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let path = resolve_font_path(explicit)?;
        tracing::debug!(font = %path.display(), "loading font");
        Self::load(&path)
    }
}

impl Typeface for FontdueTypeface {
    fn ascent(&self, px: f32) -> f32 {
        self.font
            .horizontal_line_metrics(px)
            .map(|m| m.ascent)
            .unwrap_or(px * 0.8)
    }

    fn descent(&self, px: f32) -> f32 {
        self.font
            .horizontal_line_metrics(px)
            .map(|m| m.descent)
            .unwrap_or(px * -0.2)
    }

    fn kern(&self, left: char, right: char, px: f32) -> f32 {
        self.font.horizontal_kern(left, right, px).unwrap_or(0.0)
    }

    fn glyph(&self, ch: char, px: f32) -> Glyph {
        let (metrics, coverage) = self.font.rasterize(ch, px);
        Glyph {
            xmin: metrics.xmin,
            ymin: metrics.ymin,
            width: metrics.width,
            height: metrics.height,
            advance: metrics.advance_width,
            coverage,
        }
    }

    fn advance(&self, ch: char, px: f32) -> f32 {
        self.font.metrics(ch, px).advance_width
    }
}

/// Explicit path first, then well-known system fonts, then the user font dir.
pub fn resolve_font_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(Error::Font(format!("font not found: {}", path.display())));
    }

    let system = FONT_CANDIDATES.iter().map(PathBuf::from);
    let user = dirs::font_dir()
        .into_iter()
        .flat_map(|dir| USER_FONT_NAMES.iter().map(move |name| dir.join(name)));

    system.chain(user).find(|p| p.is_file()).ok_or_else(|| {
        Error::Font("no usable font found; pass --font or set QUOTEGRAM_FONT".to_string())
    })
}

/// A font-free typeface drawing every non-space character as a solid block.
///
/// Each character advances half the pixel size, so layout is predictable
/// without any font file installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockTypeface;

impl BlockTypeface {
    pub const ADVANCE_RATIO: f32 = 0.5;
}

impl Typeface for BlockTypeface {
    fn ascent(&self, px: f32) -> f32 {
        px * 0.8
    }

    fn descent(&self, px: f32) -> f32 {
        px * -0.2
    }

    fn glyph(&self, ch: char, px: f32) -> Glyph {
        let advance = self.advance(ch, px);
        if ch.is_whitespace() {
            return Glyph {
                advance,
                ..Glyph::default()
            };
        }
        let width = (advance - 2.0).max(1.0) as usize;
        let height = (px * 0.7) as usize;
        Glyph {
            xmin: 1,
            ymin: 0,
            width,
            height,
            advance,
            coverage: vec![255; width * height],
        }
    }

    fn advance(&self, _ch: char, px: f32) -> f32 {
        px * Self::ADVANCE_RATIO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_measure_is_linear_in_chars() {
        let face = BlockTypeface;
        assert_eq!(face.measure("", 60.0), 0.0);
        assert_eq!(face.measure("abcd", 60.0), 120.0);
        assert_eq!(face.measure("ab cd", 60.0), 150.0);
    }

    #[test]
    fn block_glyph_is_solid() {
        let glyph = BlockTypeface.glyph('W', 60.0);
        assert_eq!(glyph.coverage.len(), glyph.width * glyph.height);
        assert!(glyph.coverage.iter().all(|&c| c == 255));
    }

    #[test]
    fn block_space_has_no_pixels() {
        let glyph = BlockTypeface.glyph(' ', 60.0);
        assert_eq!(glyph.width, 0);
        assert!(glyph.coverage.is_empty());
        assert_eq!(glyph.advance, 30.0);
    }

    #[test]
    fn explicit_missing_font_is_error() {
        let err = resolve_font_path(Some(Path::new("/nonexistent/font.ttf"))).unwrap_err();
        assert!(matches!(err, Error::Font(_)));
    }

    #[test]
    fn explicit_existing_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.ttf");
        std::fs::write(&path, b"not really a font").unwrap();
        assert_eq!(resolve_font_path(Some(&path)).unwrap(), path);
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let result = FontdueTypeface::from_bytes(b"definitely not a font".to_vec());
        assert!(matches!(result, Err(Error::Font(_))));
    }
}
