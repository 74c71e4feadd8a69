// src/render/mod.rs
pub mod bitmap_font;
pub mod canvas;
pub mod font;
pub mod layout;
pub mod theme;

use crate::error::RenderError;
use crate::models::{RenderRequest, ServerStatus};
use canvas::Canvas;
use font::{load_font, Font, FontSource};
use image::imageops::FilterType;
use image::RgbaImage;
use layout::{truncate_to_width, Bounds, CardLayout};
use log::{debug, warn};
pub use theme::{LatencyTier, Theme};

/// Fonts for one render call. Loaded fresh each time.
struct FontSet {
    title: Font,
    subtitle: Font,
    text: Font,
    small: Font,
}

impl FontSet {
    fn load(source: &FontSource, theme: &Theme) -> Self {
        let data = source.load_data();
        if data.is_none() {
            warn!("No usable font file found, falling back to the built-in bitmap font");
        }
        Self {
            title: load_font(theme.fonts.title, data.clone()),
            subtitle: load_font(theme.fonts.subtitle, data.clone()),
            text: load_font(theme.fonts.text, data.clone()),
            small: load_font(theme.fonts.small, data),
        }
    }
}

/// Draws status cards. Holds configuration only; every call is independent.
#[derive(Debug, Clone)]
pub struct Renderer {
    theme: Theme,
    fonts: FontSource,
}

impl Renderer {
    pub fn new(theme: Theme, fonts: FontSource) -> Self {
        Self { theme, fonts }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn render_request(&self, request: &RenderRequest) -> Result<Vec<u8>, RenderError> {
        self.render(&request.display_name, &request.status)
    }

    /// Renders one card to PNG bytes.
    pub fn render(&self, display_name: &str, status: &ServerStatus) -> Result<Vec<u8>, RenderError> {
        let theme = &self.theme;
        let palette = &theme.palette;
        let fonts = FontSet::load(&self.fonts, theme);
        let icon = decode_icon(status.icon_bytes(), theme.icon_size);
        let layout = CardLayout::compute(theme, status.players().len(), icon.is_some());

        let mut canvas = Canvas::new(layout.width, layout.height, palette.background.opaque())?;
        canvas.fill_rounded_rect(layout.card, theme.card_radius, palette.card.opaque());

        if let (Some(icon), Some(bounds)) = (&icon, layout.icon) {
            canvas.paste_icon(icon, bounds, theme.icon_radius);
        }

        let title = truncate_to_width(display_name, layout.title_budget, |t| fonts.title.measure(t));
        canvas.draw_text(&fonts.title, layout.text_x, layout.title_y, &title, palette.text.opaque());

        // Latency badge first: the version line must stop short of it.
        let latency_text = format!("{}ms", status.latency_ms());
        let latency_width = fonts.subtitle.measure(&latency_text);
        let badge = layout.latency_badge(theme, latency_width);
        canvas.fill_rounded_rect(badge, 8.0, theme.latency_color(status.latency_ms()).with_alpha(50));
        canvas.draw_text(
            &fonts.subtitle,
            badge.x0 + theme.badge_margin,
            layout.version_y,
            &latency_text,
            palette.text.opaque(),
        );

        let version_text = format!("{}{}", theme.labels.version_prefix, status.version_label());
        let version_budget = (badge.x0 - theme.badge_margin - layout.text_x).max(0.0);
        let version_text = truncate_to_width(&version_text, version_budget, |t| fonts.subtitle.measure(t));
        canvas.draw_text(
            &fonts.subtitle,
            layout.text_x,
            layout.version_y,
            &version_text,
            palette.secondary_text.opaque(),
        );

        self.draw_player_count(&mut canvas, &fonts, layout.stat, status);
        self.draw_roster(&mut canvas, &fonts, &layout, status.players());

        debug!(
            "Rendered card '{}' at {}x{} with {} players",
            display_name,
            layout.width,
            layout.height,
            status.players().len()
        );
        canvas.encode_png()
    }

    fn draw_player_count(&self, canvas: &mut Canvas, fonts: &FontSet, stat: Bounds, status: &ServerStatus) {
        let palette = &self.theme.palette;
        canvas.fill_rounded_rect(stat, 10.0, palette.chip.opaque());
        canvas.draw_text(
            &fonts.small,
            stat.x0 + 20.0,
            stat.y0 + 10.0,
            &self.theme.labels.player_count,
            palette.secondary_text.opaque(),
        );
        let count = format!("{}/{}", status.online_players(), status.max_players());
        canvas.draw_text(&fonts.text, stat.x0 + 20.0, stat.y0 + 30.0, &count, palette.text.opaque());
    }

    fn draw_roster(&self, canvas: &mut Canvas, fonts: &FontSet, layout: &CardLayout, players: &[String]) {
        let theme = &self.theme;
        let palette = &theme.palette;

        if players.is_empty() {
            canvas.draw_text(
                &fonts.text,
                layout.text_x + theme.grid_indent,
                layout.roster_y,
                &theme.labels.empty_roster,
                palette.secondary_text.opaque(),
            );
            return;
        }

        canvas.draw_text(
            &fonts.subtitle,
            layout.text_x,
            layout.roster_y,
            &theme.labels.roster_header,
            palette.accent.opaque(),
        );

        for (name, cell) in players.iter().zip(&layout.cells) {
            let shown = fit_name(&fonts.small, name, layout.name_budget);
            let chip = layout.chip(theme, *cell, fonts.small.measure(&shown));
            canvas.fill_rounded_rect(chip, 5.0, palette.chip.opaque());
            canvas.draw_text(&fonts.small, cell.x, cell.y, &shown, palette.text.opaque());
        }
    }
}

/// A roster name as it will be drawn: unchanged if it fits, else truncated.
pub fn fit_name(font: &Font, name: &str, budget: f32) -> String {
    truncate_to_width(name, budget, |t| font.measure(t))
}

/// Decodes and squares the icon; `None` means draw the card without one.
fn decode_icon(bytes: &[u8], size: u32) -> Option<RgbaImage> {
    if bytes.is_empty() {
        return None;
    }
    match image::load_from_memory(bytes) {
        Ok(icon) => Some(icon.resize_exact(size, size, FilterType::Lanczos3).to_rgba8()),
        Err(e) => {
            warn!("Skipping undecodable server icon ({} bytes): {}", bytes.len(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layout::ELLIPSIS;
    use image::GenericImageView;

    fn renderer() -> Renderer {
        Renderer::new(Theme::default(), FontSource::bitmap_only())
    }

    fn status(players: &[&str], icon: Vec<u8>) -> ServerStatus {
        ServerStatus::new(
            players.iter().map(|p| p.to_string()).collect(),
            42,
            20,
            players.len() as u32,
            "Paper 1.20.4".into(),
            icon,
        )
    }

    fn png_icon() -> Vec<u8> {
        let icon = RgbaImage::from_pixel(64, 64, image::Rgba([90, 160, 60, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(icon)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn decode(png: &[u8]) -> image::DynamicImage {
        image::load_from_memory(png).unwrap()
    }

    #[test]
    fn empty_roster_renders_placeholder_height() {
        let png = renderer().render("Lobby", &status(&[], Vec::new())).unwrap();
        let image = decode(&png);
        assert_eq!(image.dimensions(), (700, 315));
        assert_eq!(image.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn height_tracks_roster_rows() {
        let names: Vec<String> = (0..10).map(|i| format!("player{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let png = renderer().render("Survival", &status(&refs, Vec::new())).unwrap();
        // 10 players in 3 columns is 4 rows.
        assert_eq!(decode(&png).height(), 250 + 4 * 35 + 30);
    }

    #[test]
    fn icon_is_drawn_when_decodable() {
        let png = renderer().render("Lobby", &status(&["Steve"], png_icon())).unwrap();
        let image = decode(&png).to_rgb8();
        let centre = image.get_pixel(70, 70).0;
        for (got, want) in centre.iter().zip([90u8, 160, 60]) {
            assert!((*got as i16 - want as i16).abs() <= 2, "icon pixel {:?}", centre);
        }
    }

    #[test]
    fn corrupt_icon_is_skipped() {
        let png = renderer()
            .render("Lobby", &status(&["Steve"], b"not an image".to_vec()))
            .unwrap();
        let image = decode(&png).to_rgb8();
        // Without an icon the top-left area is plain card colour.
        assert_eq!(image.get_pixel(70, 70).0, [32, 34, 37]);
    }

    #[test]
    fn long_names_fit_their_column() {
        let theme = Theme::default();
        let font = Font::bitmap(theme.fonts.small);
        let layout = CardLayout::compute(&theme, 1, true);
        let name = "ThisNameIsWayTooLongForAnyColumn";
        let shown = fit_name(&font, name, layout.name_budget);
        assert!(shown.ends_with(ELLIPSIS));
        assert!(font.measure(&shown) <= layout.name_budget);
        assert!(font.measure(name) > layout.name_budget);
    }

    #[test]
    fn megabyte_labels_render_promptly() {
        let long = "W".repeat(1_000_000);
        let status = ServerStatus::new(vec![long.clone()], 42, 20, 1, long.clone(), Vec::new());
        let started = std::time::Instant::now();
        let png = renderer().render(&long, &status).unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
        assert_eq!(decode(&png).dimensions(), (700, 315));
    }

    #[test]
    fn huge_roster_is_not_capped() {
        let names: Vec<String> = (0..301).map(|i| format!("p{:03}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let png = renderer().render("Big", &status(&refs, Vec::new())).unwrap();
        assert_eq!(decode(&png).height(), 250 + 101 * 35 + 30);
    }
}
