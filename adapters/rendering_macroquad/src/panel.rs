//! Player status panel drawing.
//!
//! The panel surface is repainted from scratch every frame from the
//! descriptor entries; a refreshed player list fully replaces the rows of
//! the previous one.

use laser_arena_rendering::{PlayerPanel, SurfaceRegion};
use macroquad::{
    color::{Color, WHITE},
    shapes::draw_rectangle,
    text::draw_text,
};

use crate::parse_fill_color;

const PANEL_BACKGROUND: Color = Color::new(0.1, 0.1, 0.12, 1.0);
const HEART_COLOR: Color = Color::new(0.86, 0.16, 0.16, 1.0);
const ENTRY_HEIGHT: f32 = 52.0;
const PADDING: f32 = 12.0;
const SWATCH_SIZE: f32 = 18.0;
const NAME_FONT_SIZE: f32 = 22.0;
const HEART_FONT_SIZE: f32 = 20.0;

pub(crate) fn draw_player_panel(panel: &PlayerPanel, region: SurfaceRegion) {
    draw_rectangle(
        region.x(),
        region.y(),
        region.width(),
        region.height(),
        PANEL_BACKGROUND,
    );

    for (index, entry) in panel.entries().iter().enumerate() {
        let top = region.y() + PADDING + index as f32 * ENTRY_HEIGHT;
        let left = region.x() + PADDING;

        draw_rectangle(
            left,
            top,
            SWATCH_SIZE,
            SWATCH_SIZE,
            parse_fill_color(entry.swatch()),
        );
        let _ = draw_text(
            entry.name(),
            left + SWATCH_SIZE + 8.0,
            top + SWATCH_SIZE - 3.0,
            NAME_FONT_SIZE,
            WHITE,
        );
        // an empty heart string simply draws nothing
        let _ = draw_text(
            entry.hearts(),
            left,
            top + SWATCH_SIZE + 18.0,
            HEART_FONT_SIZE,
            HEART_COLOR,
        );
    }
}
