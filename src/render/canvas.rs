// src/render/canvas.rs
use crate::error::RenderError;
use crate::render::font::Font;
use crate::render::layout::Bounds;
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use std::io::Cursor;
use tiny_skia::{
    Color, ColorU8, FillRule, Mask, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Transform,
};

// Control point distance for a quarter circle drawn with one cubic.
const KAPPA: f32 = 0.552_284_8;

/// Drawing surface for one card.
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// An opaque canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Color) -> Result<Self, RenderError> {
        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })?;
        pixmap.fill(background);
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn fill_rounded_rect(&mut self, bounds: Bounds, radius: f32, color: Color) {
        if let Some(path) = rounded_rect_path(bounds, radius) {
            let paint = solid(color);
            self.pixmap
                .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    pub fn draw_text(&mut self, font: &Font, x: f32, y: f32, text: &str, color: Color) {
        font.draw(&mut self.pixmap, x, y, text, &solid(color));
    }

    /// Pastes an RGBA icon at `bounds`, clipped to rounded corners. The icon
    /// must already be sized to `bounds`.
    pub fn paste_icon(&mut self, icon: &RgbaImage, bounds: Bounds, radius: f32) {
        let mut tile = match Pixmap::new(icon.width(), icon.height()) {
            Some(tile) => tile,
            None => return,
        };
        for (dst, src) in tile.pixels_mut().iter_mut().zip(icon.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }

        let mut mask = match Mask::new(self.width(), self.height()) {
            Some(mask) => mask,
            None => return,
        };
        if let Some(path) = rounded_rect_path(bounds, radius) {
            mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
        }

        self.pixmap.draw_pixmap(
            bounds.x0 as i32,
            bounds.y0 as i32,
            tile.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            Some(&mask),
        );
    }

    /// Drops the alpha channel and encodes the canvas as PNG.
    pub fn encode_png(self) -> Result<Vec<u8>, RenderError> {
        let (width, height) = (self.width(), self.height());
        let mut raw = Vec::with_capacity(width as usize * height as usize * 3);
        for pixel in self.pixmap.pixels() {
            let color = pixel.demultiply();
            raw.extend_from_slice(&[color.red(), color.green(), color.blue()]);
        }

        let image = RgbImage::from_raw(width, height, raw)
            .ok_or_else(|| RenderError::Encode("pixel buffer size mismatch".to_string()))?;
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image)
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        Ok(out.into_inner())
    }
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

pub fn rounded_rect_path(bounds: Bounds, radius: f32) -> Option<Path> {
    let Bounds { x0, y0, x1, y1 } = bounds;
    let r = radius.min((x1 - x0) / 2.0).min((y1 - y0) / 2.0).max(0.0);
    let k = r * KAPPA;

    let mut pb = PathBuilder::new();
    pb.move_to(x0 + r, y0);
    pb.line_to(x1 - r, y0);
    pb.cubic_to(x1 - r + k, y0, x1, y0 + r - k, x1, y0 + r);
    pb.line_to(x1, y1 - r);
    pb.cubic_to(x1, y1 - r + k, x1 - r + k, y1, x1 - r, y1);
    pb.line_to(x0 + r, y1);
    pb.cubic_to(x0 + r - k, y1, x0, y1 - r + k, x0, y1 - r);
    pb.line_to(x0, y0 + r);
    pb.cubic_to(x0, y0 + r - k, x0 + r - k, y0, x0 + r, y0);
    pb.close();
    pb.finish()
}
