// src/render/font.rs
use crate::render::bitmap_font;
use log::{debug, warn};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{FontRef, GlyphId, MetadataProvider};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};

pub const BUNDLED_FONT_FILE: &str = "font.ttf";

/// Well-known locations tried after the bundled font, in order.
const SYSTEM_FONT_PATHS: &[&str] = &[
    "font.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/zh_CN/msyh.ttf",
    "C:/Windows/Fonts/msyh.ttc",
    "C:/Windows/Fonts/segoeui.ttf",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
];

/// A font at a fixed pixel size.
#[derive(Debug, Clone)]
pub enum Font {
    Outline(OutlineFont),
    Bitmap(BitmapFont),
}

#[derive(Debug, Clone)]
pub struct OutlineFont {
    data: Arc<Vec<u8>>,
    size: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct BitmapFont {
    size: f32,
}

impl Font {
    pub fn bitmap(size: f32) -> Self {
        Self::Bitmap(BitmapFont { size })
    }

    /// Wraps already loaded font data, or `None` when it does not parse.
    pub fn from_data(data: Arc<Vec<u8>>, size: f32) -> Option<Self> {
        FontRef::from_index(&data, 0).ok()?;
        Some(Self::Outline(OutlineFont { data, size }))
    }

    /// Horizontal advance of `text` in pixels.
    pub fn measure(&self, text: &str) -> f32 {
        match self {
            Self::Outline(f) => f.measure(text),
            Self::Bitmap(f) => bitmap_font::measure(text, f.size),
        }
    }

    /// Draws `text` with its top edge at `y`.
    pub fn draw(&self, pixmap: &mut Pixmap, x: f32, y: f32, text: &str, paint: &Paint) {
        let path = match self {
            Self::Outline(f) => f.build_path(x, y, text),
            Self::Bitmap(f) => f.build_path(x, y, text),
        };
        if let Some(path) = path {
            pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
        }
    }
}

impl OutlineFont {
    fn font_ref(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(&self.data, 0).ok()
    }

    fn measure(&self, text: &str) -> f32 {
        let font = match self.font_ref() {
            Some(font) => font,
            None => return bitmap_font::measure(text, self.size),
        };
        let charmap = font.charmap();
        let metrics = font.glyph_metrics(Size::new(self.size), LocationRef::default());
        text.chars()
            .map(|ch| {
                let gid = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
                metrics.advance_width(gid).unwrap_or(self.size * 0.5)
            })
            .sum()
    }

    fn build_path(&self, x: f32, y: f32, text: &str) -> Option<tiny_skia::Path> {
        let font = self.font_ref()?;
        let size = Size::new(self.size);
        let charmap = font.charmap();
        let metrics = font.glyph_metrics(size, LocationRef::default());
        let outlines = font.outline_glyphs();
        let ascent = font.metrics(size, LocationRef::default()).ascent;

        let mut pen = GlyphPen { builder: PathBuilder::new(), origin_x: x, baseline: y + ascent };
        for ch in text.chars() {
            let gid = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
            if let Some(glyph) = outlines.get(gid) {
                let settings = DrawSettings::unhinted(size, LocationRef::default());
                if let Err(e) = glyph.draw(settings, &mut pen) {
                    debug!("Skipping glyph for {:?}: {:?}", ch, e);
                }
            }
            pen.origin_x += metrics.advance_width(gid).unwrap_or(self.size * 0.5);
        }
        pen.builder.finish()
    }
}

impl BitmapFont {
    fn build_path(&self, x: f32, y: f32, text: &str) -> Option<tiny_skia::Path> {
        let cell = bitmap_font::cell_size(self.size);
        // Centre the seven rows in the em box.
        let top = y + (self.size - cell * bitmap_font::GLYPH_ROWS as f32) / 2.0;
        let mut builder = PathBuilder::new();

        for (i, ch) in text.chars().enumerate() {
            let glyph_x = x + i as f32 * bitmap_font::ADVANCE_CELLS * cell;
            for (row, bits) in bitmap_font::glyph(ch).iter().enumerate() {
                for col in 0..bitmap_font::GLYPH_COLS {
                    if (bits >> (bitmap_font::GLYPH_COLS - 1 - col)) & 1 == 1 {
                        let px = glyph_x + col as f32 * cell;
                        let py = top + row as f32 * cell;
                        if let Some(rect) = Rect::from_xywh(px, py, cell, cell) {
                            builder.push_rect(rect);
                        }
                    }
                }
            }
        }
        builder.finish()
    }
}

/// Feeds skrifa outlines (y up, origin at the pen) into a tiny-skia path.
struct GlyphPen {
    builder: PathBuilder,
    origin_x: f32,
    baseline: f32,
}

impl GlyphPen {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin_x + x, self.baseline - y)
    }
}

impl OutlinePen for GlyphPen {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let (cx0, cy0) = self.map(cx0, cy0);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(cx0, cy0, x, y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let (cx0, cy0) = self.map(cx0, cy0);
        let (cx1, cy1) = self.map(cx1, cy1);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(cx0, cy0, cx1, cy1, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Ordered list of font files to try.
#[derive(Debug, Clone, Default)]
pub struct FontSource {
    candidates: Vec<PathBuf>,
}

impl FontSource {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// `override_path` first, then the bundled font, then system locations.
    pub fn standard(resource_dir: &Path, override_path: Option<PathBuf>) -> Self {
        let mut candidates = Vec::with_capacity(SYSTEM_FONT_PATHS.len() + 2);
        candidates.extend(override_path);
        candidates.push(resource_dir.join(BUNDLED_FONT_FILE));
        candidates.extend(SYSTEM_FONT_PATHS.iter().map(PathBuf::from));
        Self { candidates }
    }

    /// Always renders with the built-in bitmap font.
    pub fn bitmap_only() -> Self {
        Self { candidates: Vec::new() }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Bytes of the first candidate that parses as a font.
    pub fn load_data(&self) -> Option<Arc<Vec<u8>>> {
        for path in &self.candidates {
            let data = match std::fs::read(path) {
                Ok(data) => data,
                Err(_) => continue,
            };
            if FontRef::from_index(&data, 0).is_ok() {
                debug!("Using font {}", path.display());
                return Some(Arc::new(data));
            }
            warn!("Ignoring unparsable font file {}", path.display());
        }
        None
    }

    pub fn load_font(&self, size: f32) -> Font {
        load_font(size, self.load_data())
    }
}

/// Builds a font of `size` from loaded data, or the bitmap font without it.
pub fn load_font(size: f32, data: Option<Arc<Vec<u8>>>) -> Font {
    data.and_then(|data| Font::from_data(data, size))
        .unwrap_or_else(|| Font::bitmap(size))
}
