// src/render/theme.rs
use tiny_skia::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn opaque(self) -> Color {
        self.with_alpha(255)
    }

    pub fn with_alpha(self, alpha: u8) -> Color {
        Color::from_rgba8(self.0, self.1, self.2, alpha)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub card: Rgb,
    pub text: Rgb,
    pub secondary_text: Rgb,
    pub accent: Rgb,
    pub chip: Rgb,
    pub good: Rgb,
    pub warning: Rgb,
    pub bad: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb(24, 25, 29),
            card: Rgb(32, 34, 37),
            text: Rgb(255, 255, 255),
            secondary_text: Rgb(185, 187, 190),
            accent: Rgb(88, 101, 242),
            chip: Rgb(44, 47, 51),
            good: Rgb(87, 242, 135),
            warning: Rgb(255, 163, 72),
            bad: Rgb(237, 66, 69),
        }
    }
}

/// Latency bands shown on the badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyTier {
    Good,
    Fair,
    Poor,
}

impl LatencyTier {
    pub fn from_latency(latency_ms: u64) -> Self {
        if latency_ms < 100 {
            Self::Good
        } else if latency_ms < 200 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontSizes {
    pub title: f32,
    pub subtitle: f32,
    pub text: f32,
    pub small: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub version_prefix: String,
    pub player_count: String,
    pub roster_header: String,
    pub empty_roster: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            version_prefix: "Version: ".to_string(),
            player_count: "Online players".to_string(),
            roster_header: "Players online".to_string(),
            empty_roster: "No players online".to_string(),
        }
    }
}

/// Every knob of the card's look. The layout engine reads nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub palette: Palette,
    pub fonts: FontSizes,
    pub labels: Labels,
    pub width: u32,
    pub padding: f32,
    pub columns: usize,
    pub card_radius: f32,
    pub icon_size: u32,
    pub icon_radius: f32,
    pub icon_gap: f32,
    /// Everything above the roster rows, in pixels.
    pub header_height: f32,
    pub row_height: f32,
    pub title_advance: f32,
    pub version_advance: f32,
    pub stat_advance: f32,
    pub roster_header_advance: f32,
    pub badge_height: f32,
    pub badge_margin: f32,
    pub badge_inset: f32,
    pub stat_height: f32,
    pub chip_height: f32,
    pub chip_padding: f32,
    /// Space kept free at the right of every roster column.
    pub column_gutter: f32,
    pub grid_indent: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            fonts: FontSizes { title: 32.0, subtitle: 24.0, text: 20.0, small: 16.0 },
            labels: Labels::default(),
            width: 700,
            padding: 30.0,
            columns: 3,
            card_radius: 15.0,
            icon_size: 80,
            icon_radius: 15.0,
            icon_gap: 20.0,
            header_height: 250.0,
            row_height: 35.0,
            title_advance: 50.0,
            version_advance: 60.0,
            stat_advance: 80.0,
            roster_header_advance: 40.0,
            badge_height: 30.0,
            badge_margin: 10.0,
            badge_inset: 40.0,
            stat_height: 60.0,
            chip_height: 22.0,
            chip_padding: 5.0,
            column_gutter: 20.0,
            grid_indent: 20.0,
        }
    }
}

impl Theme {
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn latency_color(&self, latency_ms: u64) -> Rgb {
        match LatencyTier::from_latency(latency_ms) {
            LatencyTier::Good => self.palette.good,
            LatencyTier::Fair => self.palette.warning,
            LatencyTier::Poor => self.palette.bad,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latency_tiers_are_boundary_exact() {
        assert_eq!(LatencyTier::from_latency(0), LatencyTier::Good);
        assert_eq!(LatencyTier::from_latency(99), LatencyTier::Good);
        assert_eq!(LatencyTier::from_latency(100), LatencyTier::Fair);
        assert_eq!(LatencyTier::from_latency(199), LatencyTier::Fair);
        assert_eq!(LatencyTier::from_latency(200), LatencyTier::Poor);
        assert_eq!(LatencyTier::from_latency(5000), LatencyTier::Poor);
    }

    #[test]
    fn latency_colors_follow_palette() {
        let theme = Theme::default();
        assert_eq!(theme.latency_color(99), theme.palette.good);
        assert_eq!(theme.latency_color(100), theme.palette.warning);
        assert_eq!(theme.latency_color(200), theme.palette.bad);
    }

    #[test]
    fn zero_columns_is_clamped() {
        assert_eq!(Theme::default().with_columns(0).columns, 1);
    }
}
