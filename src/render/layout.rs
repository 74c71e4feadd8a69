// src/render/layout.rs
//! Geometry of the status card, independent of any pixels.
//!
//! The canvas height is derived from the roster length and never capped, so
//! every roster row has room no matter how many players are listed.

use crate::render::theme::Theme;

pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }
}

/// Top-left corner of one roster name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub width: u32,
    pub height: u32,
    pub card: Bounds,
    pub icon: Option<Bounds>,
    pub text_x: f32,
    pub title_y: f32,
    pub version_y: f32,
    pub stat: Bounds,
    /// Roster header, or the empty-roster line when there are no players.
    pub roster_y: f32,
    pub cells: Vec<Cell>,
    pub column_width: f32,
    /// Widest a roster name may render.
    pub name_budget: f32,
    pub title_budget: f32,
}

pub fn row_count(player_count: usize, columns: usize) -> usize {
    let columns = columns.max(1);
    ((player_count + columns - 1) / columns).max(1)
}

pub fn canvas_height(theme: &Theme, player_count: usize) -> u32 {
    let rows = row_count(player_count, theme.columns) as f32;
    (theme.header_height + rows * theme.row_height + theme.padding).ceil() as u32
}

impl CardLayout {
    pub fn compute(theme: &Theme, player_count: usize, has_icon: bool) -> Self {
        let width = theme.width;
        let height = canvas_height(theme, player_count);
        let padding = theme.padding;
        let inset = padding / 2.0;

        let card = Bounds {
            x0: inset,
            y0: inset,
            x1: width as f32 - inset,
            y1: height as f32 - inset,
        };

        let icon_size = if has_icon { theme.icon_size as f32 } else { 0.0 };
        let icon = has_icon.then(|| Bounds {
            x0: padding,
            y0: padding,
            x1: padding + icon_size,
            y1: padding + icon_size,
        });

        let text_x = padding + icon_size + theme.icon_gap;
        let title_y = padding;
        let version_y = title_y + theme.title_advance;
        let stat_y = version_y + theme.version_advance;
        let stat_width = ((width as f32 - padding * 3.0) / 2.0).floor();
        let stat = Bounds {
            x0: text_x,
            y0: stat_y,
            x1: text_x + stat_width,
            y1: stat_y + theme.stat_height,
        };
        let roster_y = stat_y + theme.stat_advance;

        let columns = theme.columns.max(1);
        let column_width = ((width as f32 - text_x - padding * 2.0) / columns as f32).floor();
        let name_budget = (column_width - theme.column_gutter).max(0.0);

        let grid_x = text_x + theme.grid_indent;
        let grid_y = roster_y + theme.roster_header_advance;
        let cells = (0..player_count)
            .map(|i| Cell {
                x: grid_x + (i % columns) as f32 * column_width,
                y: grid_y + (i / columns) as f32 * theme.row_height,
            })
            .collect();

        Self {
            width,
            height,
            card,
            icon,
            text_x,
            title_y,
            version_y,
            stat,
            roster_y,
            cells,
            column_width,
            name_budget,
            title_budget: (card.x1 - padding / 2.0 - text_x).max(0.0),
        }
    }

    /// Background pill of the latency badge, right-aligned on the version row.
    pub fn latency_badge(&self, theme: &Theme, text_width: f32) -> Bounds {
        let text_x = self.width as f32 - theme.padding - text_width - theme.badge_inset;
        Bounds {
            x0: text_x - theme.badge_margin,
            y0: self.version_y,
            x1: text_x + text_width + theme.badge_margin,
            y1: self.version_y + theme.badge_height,
        }
    }

    /// Chip behind a roster name that renders `text_width` wide.
    pub fn chip(&self, theme: &Theme, cell: Cell, text_width: f32) -> Bounds {
        Bounds {
            x0: cell.x - theme.chip_padding,
            y0: cell.y - 2.0,
            x1: cell.x + text_width + theme.chip_padding,
            y1: cell.y - 2.0 + theme.chip_height,
        }
    }
}

/// Shortens `text` so that it plus `...` fits `budget`.
///
/// Text that already fits is returned unchanged. If not even the ellipsis
/// fits, the result is empty. Advances are summed per char in one pass that
/// stops as soon as the budget is exceeded, so the cost is bounded by the
/// budget rather than the length of `text`.
pub fn truncate_to_width<F>(text: &str, budget: f32, measure: F) -> String
where
    F: Fn(&str) -> f32,
{
    let room = budget - measure(ELLIPSIS);
    let mut width = 0.0;
    // Byte offset of the longest prefix that still leaves room for the ellipsis.
    let mut cut = if room >= 0.0 { Some(0) } else { None };
    let mut buf = [0u8; 4];

    for (idx, ch) in text.char_indices() {
        width += measure(ch.encode_utf8(&mut buf));
        if width > budget {
            return match cut {
                Some(end) => format!("{}{}", &text[..end], ELLIPSIS),
                None => String::new(),
            };
        }
        if width <= room {
            cut = Some(idx + ch.len_utf8());
        }
    }
    text.to_string()
}
