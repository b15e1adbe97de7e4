//! Quote image rendering: gradient background, wrapped and centered text
//! with a drop shadow, JPEG output.

pub mod typeface;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use rand::RngExt;
use serde::Serialize;
use tracing::{debug, info};

use crate::consts::{
    CANVAS_SIZE, FONT_SIZE, JPEG_QUALITY, LINE_HEIGHT, SHADOW_ALPHA, SHADOW_OFFSET, TEXT_MARGIN,
};
use crate::error::Result;
use crate::quote::Quote;
use typeface::Typeface;

/// Two endpoint colors of a top-to-bottom linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub top: [u8; 3],
    pub bottom: [u8; 3],
}

impl Gradient {
    /// Sample both endpoints uniformly at random.
    pub fn random() -> Self {
        let mut rng = rand::rng();
        Self {
            top: rng.random(),
            bottom: rng.random(),
        }
    }

    /// Color of row `y` on a canvas `height` pixels tall, sampled at the
    /// pixel center.
    pub fn color_at(&self, y: u32, height: u32) -> [u8; 3] {
        let t = if height == 0 {
            0.0
        } else {
            ((y as f32 + 0.5) / height as f32).clamp(0.0, 1.0)
        };
        let mut out = [0u8; 3];
        for (i, channel) in out.iter_mut().enumerate() {
            let a = self.top[i] as f32;
            let b = self.bottom[i] as f32;
            *channel = (a + (b - a) * t).round() as u8;
        }
        out
    }
}

/// Greedy word wrap.
///
/// Each word is appended to the current line with a single space; when the
/// result is wider than `max_width` the current line is closed and the word
/// starts a new one. A single word wider than `max_width` keeps its own line.
pub fn wrap_text<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    let mut current = first.to_string();
    for word in words {
        let candidate = format!("{current} {word}");
        if measure(&candidate) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    lines.push(current);
    lines
}

/// Vertical centers of `count` lines, centered as a block on the canvas.
pub fn line_centers(count: usize, canvas_height: f32, line_height: f32) -> Vec<f32> {
    let block = count as f32 * line_height;
    let start = (canvas_height - block) / 2.0 + line_height / 2.0;
    (0..count)
        .map(|i| start + i as f32 * line_height)
        .collect()
}

/// A JPEG written to disk, plus the bytes that were written.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub path: PathBuf,
    pub jpeg: Vec<u8>,
}

impl RenderedImage {
    pub fn summary(&self, quote: &Quote) -> RenderSummary {
        RenderSummary {
            path: self.path.clone(),
            quote: quote.to_string(),
            bytes: self.jpeg.len(),
        }
    }
}

/// What `render --json` prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderSummary {
    pub path: PathBuf,
    pub quote: String,
    pub bytes: usize,
}

/// Draws quote cards onto a square canvas.
#[derive(Clone)]
pub struct QuoteRenderer {
    typeface: Arc<dyn Typeface>,
    size: u32,
    font_px: f32,
}

impl QuoteRenderer {
    pub fn new(typeface: Arc<dyn Typeface>) -> Self {
        Self {
            typeface,
            size: CANVAS_SIZE,
            font_px: FONT_SIZE,
        }
    }

    /// Widest a line may be before it wraps.
    pub fn max_line_width(&self) -> f32 {
        self.size as f32 - TEXT_MARGIN
    }

    pub fn wrap(&self, text: &str) -> Vec<String> {
        wrap_text(text, self.max_line_width(), |line| {
            self.typeface.measure(line, self.font_px)
        })
    }

    /// Measured width of `line` at the renderer's font size.
    pub fn measure(&self, line: &str) -> f32 {
        self.typeface.measure(line, self.font_px)
    }

    /// Draw the quote over `gradient` and return the canvas.
    pub fn draw(&self, text: &str, gradient: &Gradient) -> RgbImage {
        let size = self.size;
        let mut canvas = RgbImage::from_fn(size, size, |_, y| Rgb(gradient.color_at(y, size)));

        let lines = self.wrap(text);
        let centers = line_centers(lines.len(), size as f32, LINE_HEIGHT);
        let center_x = size as f32 / 2.0;

        debug!(lines = lines.len(), "laying out quote");

        for (line, &y) in lines.iter().zip(&centers) {
            self.draw_line(
                &mut canvas,
                line,
                center_x + SHADOW_OFFSET,
                y + SHADOW_OFFSET,
                [0, 0, 0],
                SHADOW_ALPHA,
            );
        }
        for (line, &y) in lines.iter().zip(&centers) {
            self.draw_line(&mut canvas, line, center_x, y, [255, 255, 255], 1.0);
        }

        canvas
    }

    /// Draw one line horizontally centered on `cx` and vertically
    /// middle-anchored on `cy`.
    fn draw_line(
        &self,
        canvas: &mut RgbImage,
        line: &str,
        cx: f32,
        cy: f32,
        color: [u8; 3],
        alpha: f32,
    ) {
        let px = self.font_px;
        let face = &self.typeface;
        let baseline = cy + (face.ascent(px) + face.descent(px)) / 2.0;
        let mut pen_x = cx - face.measure(line, px) / 2.0;
        let mut prev = None;

        for ch in line.chars() {
            if let Some(p) = prev {
                pen_x += face.kern(p, ch, px);
            }
            let glyph = face.glyph(ch, px);
            let left = (pen_x + glyph.xmin as f32).round() as i64;
            let top = (baseline - glyph.ymin as f32 - glyph.height as f32).round() as i64;
            blend_glyph(canvas, &glyph, left, top, color, alpha);
            pen_x += glyph.advance;
            prev = Some(ch);
        }
    }

    /// Render `quote` with a fresh random gradient, write the JPEG to
    /// `path` (overwriting) and return it.
    pub fn render_to(&self, quote: &Quote, path: &Path) -> Result<RenderedImage> {
        let gradient = Gradient::random();
        debug!(?gradient, "sampled gradient");

        let canvas = self.draw(quote.as_str(), &gradient);
        let jpeg = encode_jpeg(&canvas)?;
        std::fs::write(path, &jpeg)?;

        info!(path = %path.display(), bytes = jpeg.len(), "image saved");
        Ok(RenderedImage {
            path: path.to_path_buf(),
            jpeg,
        })
    }
}

fn blend_glyph(
    canvas: &mut RgbImage,
    glyph: &typeface::Glyph,
    left: i64,
    top: i64,
    color: [u8; 3],
    alpha: f32,
) {
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);
    for row in 0..glyph.height {
        let y = top + row as i64;
        if y < 0 || y >= h {
            continue;
        }
        for col in 0..glyph.width {
            let x = left + col as i64;
            if x < 0 || x >= w {
                continue;
            }
            let coverage = glyph.coverage[row * glyph.width + col];
            if coverage == 0 {
                continue;
            }
            let a = alpha * coverage as f32 / 255.0;
            let pixel = canvas.get_pixel_mut(x as u32, y as u32);
            for (dst, src) in pixel.0.iter_mut().zip(color) {
                *dst = (*dst as f32 * (1.0 - a) + src as f32 * a).round() as u8;
            }
        }
    }
}

/// Encode at the fixed JPEG quality.
pub fn encode_jpeg(canvas: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY).encode_image(canvas)?;
    Ok(buf)
}
