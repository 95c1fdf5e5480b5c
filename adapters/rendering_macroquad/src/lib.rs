#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the Laser Arena viewer.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The adapter owns the window and its frame loop; everything it draws comes
//! from the descriptor trees in `laser-arena-rendering`. 3D calls live in the
//! local `scene` module and panel drawing in `panel`, so the rest of the
//! adapter stays agnostic of how each surface is painted.

mod config;
mod panel;
mod scene;

use std::{sync::mpsc, time::Duration};

use anyhow::Result;
use laser_arena_core::Orientation;
use laser_arena_rendering::{
    CancellationHandle, Color, GridView, Presentation, RenderingBackend, SceneStage,
    SurfaceLayout, SurfaceRegion, TileClass, TileVisual, WorldView, TILE_SIZE,
};
use macroquad::{
    color::Color as MacroquadColor,
    input::{is_key_pressed, KeyCode},
};

pub use self::config::ViewerConfig;
use self::panel::draw_player_panel;
use self::scene::{draw_scene_stage, OrbitControls};

const GROUND_BASE: Color = Color::from_rgb_u8(40, 44, 48);
const WALL_FILL: MacroquadColor = MacroquadColor::new(0.55, 0.55, 0.58, 1.0);
const TREE_FILL: MacroquadColor = MacroquadColor::new(0.18, 0.55, 0.25, 1.0);
const BARREL_FILL: MacroquadColor = MacroquadColor::new(0.08, 0.08, 0.08, 1.0);
const LASER_FILL: MacroquadColor = MacroquadColor::new(1.0, 0.27, 0.2, 0.78);

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    window_width: i32,
    window_height: i32,
    cancellation: Option<CancellationHandle>,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            window_width: 1280,
            window_height: 720,
            cancellation: None,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the
    /// platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the
    /// display refresh rate or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per
    /// second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures the initial window dimensions in pixels.
    #[must_use]
    pub fn with_window_size(mut self, width: i32, height: i32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Applies window and presentation options from a viewer config.
    #[must_use]
    pub fn with_config(self, config: &ViewerConfig) -> Self {
        self.with_window_size(config.window_width, config.window_height)
            .with_vsync(config.vsync)
            .with_show_fps(config.show_fps)
    }

    /// Installs a handle that stops the frame loop when cancelled.
    ///
    /// Without a handle the loop only ends when the window closes or a quit
    /// shortcut is pressed.
    #[must_use]
    pub fn with_cancellation(mut self, handle: CancellationHandle) -> Self {
        self.cancellation = Some(handle);
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_view: F) -> Result<()>
    where
        F: FnMut(Duration, &mut WorldView) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            window_width,
            window_height,
            cancellation,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            view,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width,
            window_height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (init_sender, init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut init_sender = Some(init_sender);
            let mut view = view;

            let screen_width = macroquad::window::screen_width();
            let screen_height = macroquad::window::screen_height();
            let layout =
                match SurfaceLayout::new(screen_width, screen_height, view.grid.pixel_width()) {
                    Ok(layout) => layout,
                    Err(error) => {
                        if let Some(sender) = init_sender.take() {
                            let _ = sender.send(Err(error.into()));
                        }
                        return;
                    }
                };
            if let Some(sender) = init_sender.take() {
                let _ = sender.send(Ok(()));
            }

            let stage = SceneStage::from_viewport(layout.scene().width(), layout.scene().height());
            let mut orbit = OrbitControls::for_camera(&stage.camera());
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                if is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q) {
                    break;
                }
                if cancellation
                    .as_ref()
                    .map_or(false, CancellationHandle::is_cancelled)
                {
                    break;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update_view(frame_dt, &mut view);

                orbit.update();
                draw_scene_stage(
                    &stage,
                    &orbit,
                    layout.scene(),
                    macroquad::window::screen_height(),
                );
                macroquad::camera::set_default_camera();

                draw_grid_view(&view.grid, layout.grid());
                draw_player_panel(&view.panel, layout.panel());

                if show_fps {
                    if let Some(fps) = fps_counter.record_frame(frame_dt) {
                        println!("FPS: {fps:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average once per second.
    fn record_frame(&mut self, frame_dt: Duration) -> Option<f32> {
        self.elapsed += frame_dt;
        self.frames += 1;

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let fps = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(fps)
    }
}

fn draw_grid_view(grid: &GridView, region: SurfaceRegion) {
    let scale = grid_fit_scale(grid, region);
    let tile = TILE_SIZE * scale;

    for (x, column) in grid.columns().iter().enumerate() {
        for (y, visual) in column.tiles().iter().enumerate() {
            let left = region.x() + x as f32 * tile;
            let top = region.y() + y as f32 * tile;
            draw_tile(visual, left, top, tile, (x + y) % 2 == 0);
        }
    }

    // overlays are drawn after every tile so beams stack on top
    for overlay in grid.lasers() {
        macroquad::shapes::draw_rectangle(
            region.x() + overlay.left() * scale,
            region.y() + overlay.top() * scale,
            overlay.width() * scale,
            overlay.height() * scale,
            LASER_FILL,
        );
    }
}

/// Scale factor fitting the grid into its region without stretching tiles
/// beyond their native size.
fn grid_fit_scale(grid: &GridView, region: SurfaceRegion) -> f32 {
    let width = grid.pixel_width();
    let height = grid.pixel_height();
    if width <= f32::EPSILON || height <= f32::EPSILON {
        return 1.0;
    }

    (region.width() / width)
        .min(region.height() / height)
        .min(1.0)
}

fn draw_tile(visual: &TileVisual, left: f32, top: f32, size: f32, even: bool) {
    let ground = if even {
        GROUND_BASE
    } else {
        GROUND_BASE.lighten(0.06)
    };
    macroquad::shapes::draw_rectangle(left, top, size, size, to_macroquad_color(ground));

    match visual.class() {
        TileClass::Empty => {}
        TileClass::Tree => {
            macroquad::shapes::draw_circle(
                left + size / 2.0,
                top + size / 2.0,
                size * 0.32,
                TREE_FILL,
            );
        }
        TileClass::Wall => {
            let inset = size * 0.06;
            macroquad::shapes::draw_rectangle(
                left + inset,
                top + inset,
                size - 2.0 * inset,
                size - 2.0 * inset,
                WALL_FILL,
            );
        }
        TileClass::Tank { orientation, fill } => {
            let inset = size * 0.12;
            macroquad::shapes::draw_rectangle(
                left + inset,
                top + inset,
                size - 2.0 * inset,
                size - 2.0 * inset,
                parse_fill_color(fill),
            );

            let center_x = left + size / 2.0;
            let center_y = top + size / 2.0;
            let (tip_x, tip_y) = barrel_tip(*orientation, center_x, center_y, size / 2.0);
            macroquad::shapes::draw_line(
                center_x,
                center_y,
                tip_x,
                tip_y,
                size * 0.08,
                BARREL_FILL,
            );
        }
    }
}

fn barrel_tip(orientation: Orientation, center_x: f32, center_y: f32, half: f32) -> (f32, f32) {
    match orientation {
        Orientation::North => (center_x, center_y - half),
        Orientation::South => (center_x, center_y + half),
        Orientation::East => (center_x + half, center_y),
        Orientation::West => (center_x - half, center_y),
    }
}

pub(crate) fn to_macroquad_color(color: Color) -> MacroquadColor {
    MacroquadColor::new(color.red, color.green, color.blue, color.alpha)
}

/// Best-effort decoding of the untrusted player color strings.
///
/// Accepts `#rgb`/`#rrggbb` hex and a small set of CSS color names; anything
/// else falls back to a neutral gray. Untrusted input never fails a frame.
pub(crate) fn parse_fill_color(value: &str) -> MacroquadColor {
    const FALLBACK: (u8, u8, u8) = (158, 158, 158);

    let trimmed = value.trim();
    let (red, green, blue) = if let Some(hex) = trimmed.strip_prefix('#') {
        parse_hex_channels(hex).unwrap_or(FALLBACK)
    } else {
        named_color(trimmed).unwrap_or(FALLBACK)
    };

    MacroquadColor::from_rgba(red, green, blue, 255)
}

fn parse_hex_channels(hex: &str) -> Option<(u8, u8, u8)> {
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        3 => {
            let red = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let green = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let blue = u8::from_str_radix(&hex[2..3], 16).ok()?;
            Some((red * 17, green * 17, blue * 17))
        }
        6 => {
            let red = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let green = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let blue = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((red, green, blue))
        }
        _ => None,
    }
}

fn named_color(name: &str) -> Option<(u8, u8, u8)> {
    let normalized = name.to_ascii_lowercase();
    let channels = match normalized.as_str() {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "cyan" => (0, 255, 255),
        "magenta" => (255, 0, 255),
        "gray" | "grey" => (128, 128, 128),
        _ => return None,
    };
    Some(channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use laser_arena_core::{GridDimensions, WorldSnapshot};
    use laser_arena_world::World;

    #[test]
    fn parse_fill_color_decodes_short_and_long_hex() {
        let short = parse_fill_color("#f00");
        assert_eq!((short.r, short.g, short.b), (1.0, 0.0, 0.0));

        let long = parse_fill_color("#00ff00");
        assert_eq!((long.r, long.g, long.b), (0.0, 1.0, 0.0));
    }

    #[test]
    fn parse_fill_color_accepts_named_colors_case_insensitively() {
        let named = parse_fill_color("  Blue ");
        assert_eq!((named.r, named.g, named.b), (0.0, 0.0, 1.0));
    }

    #[test]
    fn parse_fill_color_falls_back_on_garbage() {
        let fallback = parse_fill_color("#f0");
        let expected = 158.0 / 255.0;
        assert!((fallback.r - expected).abs() < f32::EPSILON);

        let hostile = parse_fill_color("url(javascript:alert(1))");
        assert!((hostile.r - expected).abs() < f32::EPSILON);

        let unicode = parse_fill_color("#\u{1f600}\u{1f600}");
        assert!((unicode.r - expected).abs() < f32::EPSILON);
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        for _ in 0..59 {
            assert!(counter.record_frame(Duration::from_millis(16)).is_none());
        }

        let fps = counter
            .record_frame(Duration::from_millis(64))
            .expect("a second has elapsed");
        assert!(fps > 0.0);
    }

    #[test]
    fn grid_fit_scale_never_stretches_tiles() {
        let snapshot = WorldSnapshot {
            dimensions: GridDimensions::new(4, 4),
            static_objects: Vec::new(),
            tanks: Vec::new(),
            lasers: Vec::new(),
        };
        let grid = GridView::from_world(&World::parse(&snapshot).expect("snapshot parses"));

        let roomy = SurfaceLayout::new(1280.0, 720.0, grid.pixel_width())
            .expect("window is large enough");
        assert!((grid_fit_scale(&grid, roomy.grid()) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn barrel_tip_points_along_the_orientation() {
        assert_eq!(barrel_tip(Orientation::North, 10.0, 10.0, 5.0), (10.0, 5.0));
        assert_eq!(barrel_tip(Orientation::South, 10.0, 10.0, 5.0), (10.0, 15.0));
        assert_eq!(barrel_tip(Orientation::East, 10.0, 10.0, 5.0), (15.0, 10.0));
        assert_eq!(barrel_tip(Orientation::West, 10.0, 10.0, 5.0), (5.0, 10.0));
    }
}
