#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Laser Arena adapters.
//!
//! Everything in this crate is a plain descriptor: renderers project a parsed
//! world into visual primitive trees ([`GridView`], [`PlayerPanel`]) and a
//! static 3D stage ([`SceneStage`]), and a [`RenderingBackend`] turns those
//! descriptors into pixels. Descriptors never touch the backend's types, so
//! they can be built and inspected in tests without opening a window.

use std::{
    error::Error,
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::Result as AnyResult;
use glam::Vec3;
use laser_arena_core::{GridCoord, Laser, Orientation, Tank};
use laser_arena_world::{CellView, World};

/// Side length of one grid tile in screen pixels.
///
/// Tile sizing and laser overlay geometry must agree on this value to keep
/// overlays aligned with the cells they span.
pub const TILE_SIZE: f32 = 50.0;

/// Glyph repeated to display a player's remaining energy.
pub const HEART_GLYPH: &str = "\u{2764}";

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Style class distinguishing the cell kinds within a tile visual.
#[derive(Clone, Debug, PartialEq)]
pub enum TileClass {
    /// Unoccupied ground.
    Empty,
    /// Tree scenery.
    Tree,
    /// Wall scenery.
    Wall,
    /// Tank occupant with its facing and fill color.
    Tank {
        /// Facing direction of the hull.
        orientation: Orientation,
        /// Fill color exactly as supplied by the player; never validated.
        fill: String,
    },
}

/// Visual descriptor for a single grid cell.
#[derive(Clone, Debug, PartialEq)]
pub struct TileVisual {
    size: f32,
    class: TileClass,
}

impl TileVisual {
    /// Maps one resolved cell to its visual descriptor.
    ///
    /// Pure and repeatable: the same cell always yields the same visual.
    #[must_use]
    pub fn for_cell(cell: CellView<'_>) -> Self {
        let class = match cell {
            CellView::Empty => TileClass::Empty,
            CellView::Tree => TileClass::Tree,
            CellView::Wall => TileClass::Wall,
            CellView::Tank(tank) => TileClass::Tank {
                orientation: tank.orientation,
                fill: tank.color.clone(),
            },
        };

        Self {
            size: TILE_SIZE,
            class,
        }
    }

    /// Edge length of the rendered tile in pixels.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Style class applied to the tile.
    #[must_use]
    pub const fn class(&self) -> &TileClass {
        &self.class
    }
}

/// Single column of tile visuals, ordered by row index.
#[derive(Clone, Debug, PartialEq)]
pub struct TileColumn {
    tiles: Vec<TileVisual>,
}

impl TileColumn {
    /// Tile visuals in `y` order.
    #[must_use]
    pub fn tiles(&self) -> &[TileVisual] {
        &self.tiles
    }
}

/// Rectangle drawn over the grid for one laser beam, in pixels.
///
/// Overlays are positioned absolutely over the tile columns and span every
/// cell between the beam's endpoints inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaserOverlay {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

impl LaserOverlay {
    /// Computes the overlay rectangle covering a beam's span of cells.
    ///
    /// North/south beams span rows; every other direction spans columns.
    /// The geometry is symmetric under swapping the endpoints.
    #[must_use]
    pub fn for_laser(laser: &Laser) -> Self {
        let start_x = laser.start_pos.x();
        let start_y = laser.start_pos.y();
        let end_x = laser.end_pos.x();
        let end_y = laser.end_pos.y();

        if laser.direction.is_vertical() {
            let span = start_y.abs_diff(end_y) + 1;
            Self {
                left: start_x as f32 * TILE_SIZE,
                top: start_y.min(end_y) as f32 * TILE_SIZE,
                width: TILE_SIZE,
                height: span as f32 * TILE_SIZE,
            }
        } else {
            let span = start_x.abs_diff(end_x) + 1;
            Self {
                left: start_x.min(end_x) as f32 * TILE_SIZE,
                top: start_y as f32 * TILE_SIZE,
                width: span as f32 * TILE_SIZE,
                height: TILE_SIZE,
            }
        }
    }

    /// Horizontal offset from the grid origin in pixels.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.left
    }

    /// Vertical offset from the grid origin in pixels.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.top
    }

    /// Width of the overlay in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the overlay in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }
}

/// Complete 2D visual tree for one world: tile columns plus laser overlays.
#[derive(Clone, Debug, PartialEq)]
pub struct GridView {
    columns: Vec<TileColumn>,
    lasers: Vec<LaserOverlay>,
}

impl GridView {
    /// Projects a parsed world into its 2D visual tree.
    ///
    /// Columns are emitted in `x` order with one tile per `y` inside each
    /// column; overlays follow all columns so beams stack on top of tiles
    /// purely by list order. Building from the same world twice yields an
    /// equal tree, and assigning a fresh tree replaces the previous one
    /// wholesale — there is no accumulation across renders.
    #[must_use]
    pub fn from_world(world: &World) -> Self {
        let grid = world.grid();

        let mut columns = Vec::with_capacity(grid.width() as usize);
        for x in 0..grid.width() {
            let mut tiles = Vec::with_capacity(grid.height() as usize);
            for y in 0..grid.height() {
                tiles.push(TileVisual::for_cell(world.cell_view(GridCoord::new(x, y))));
            }
            columns.push(TileColumn { tiles });
        }

        let lasers = world.lasers().iter().map(LaserOverlay::for_laser).collect();

        Self { columns, lasers }
    }

    /// Tile columns in `x` order.
    #[must_use]
    pub fn columns(&self) -> &[TileColumn] {
        &self.columns
    }

    /// Laser overlays in snapshot order, stacked above every tile.
    #[must_use]
    pub fn lasers(&self) -> &[LaserOverlay] {
        &self.lasers
    }

    /// Total width of the tile columns in pixels.
    #[must_use]
    pub fn pixel_width(&self) -> f32 {
        self.columns.len() as f32 * TILE_SIZE
    }

    /// Total height of the tallest tile column in pixels.
    #[must_use]
    pub fn pixel_height(&self) -> f32 {
        self.columns
            .iter()
            .map(|column| column.tiles.len())
            .max()
            .unwrap_or(0) as f32
            * TILE_SIZE
    }
}

/// Status panel entry for one player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerEntry {
    swatch: String,
    name: String,
    hearts: String,
}

impl PlayerEntry {
    /// Builds the entry for one player record.
    #[must_use]
    pub fn for_player(player: &Tank) -> Self {
        Self {
            swatch: player.color.clone(),
            name: player.name.clone(),
            hearts: HEART_GLYPH.repeat(player.energy as usize),
        }
    }

    /// Swatch background exactly as supplied by the player.
    #[must_use]
    pub fn swatch(&self) -> &str {
        &self.swatch
    }

    /// Display name of the player.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Heart glyphs, one per remaining energy point, with no separator.
    ///
    /// Zero energy yields an empty indicator rather than a placeholder.
    #[must_use]
    pub fn hearts(&self) -> &str {
        &self.hearts
    }
}

/// Player status panel listing every player in snapshot order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerPanel {
    entries: Vec<PlayerEntry>,
}

impl PlayerPanel {
    /// Builds the panel from the player list, preserving order.
    ///
    /// No sorting, dedup, or aggregation is applied. Rebuilding replaces
    /// the previous entries entirely, so repeated renders never accumulate
    /// duplicates.
    #[must_use]
    pub fn from_players(players: &[Tank]) -> Self {
        Self {
            entries: players.iter().map(PlayerEntry::for_player).collect(),
        }
    }

    /// Panel entries in player order.
    #[must_use]
    pub fn entries(&self) -> &[PlayerEntry] {
        &self.entries
    }
}

/// Half-extent of the orthographic camera volume in world units.
pub const CAMERA_HALF_EXTENT: f32 = 20.0;

/// Fixed isometric-style camera offset from the scene origin.
pub const CAMERA_OFFSET: Vec3 = Vec3::new(20.0, 20.0, 20.0);

/// Near clip distance of the camera volume.
pub const CAMERA_NEAR: f32 = 1.0;

/// Far clip distance of the camera volume.
pub const CAMERA_FAR: f32 = 1000.0;

/// Edge length of the square ground plane in world units.
pub const GROUND_EXTENT: f32 = 36.0;

/// Length of each axis helper segment in world units.
pub const AXIS_HELPER_LENGTH: f32 = 40.0;

/// Fixed position of the point light above the stage.
pub const POINT_LIGHT_POSITION: Vec3 = Vec3::new(0.0, 50.0, 50.0);

/// Intensity of the point light.
pub const POINT_LIGHT_INTENSITY: f32 = 0.8;

/// Orthographic camera rig framing the 3D stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraRig {
    aspect: f32,
}

impl CameraRig {
    const fn with_aspect(aspect: f32) -> Self {
        Self { aspect }
    }

    /// Viewport aspect ratio the rig was derived from.
    #[must_use]
    pub const fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Camera position in world units.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        CAMERA_OFFSET
    }

    /// Point the camera looks at.
    #[must_use]
    pub const fn target(&self) -> Vec3 {
        Vec3::ZERO
    }

    /// Horizontal half-extent of the view volume, scaled by the aspect.
    #[must_use]
    pub fn half_width(&self) -> f32 {
        CAMERA_HALF_EXTENT * self.aspect
    }

    /// Vertical half-extent of the view volume.
    #[must_use]
    pub const fn half_height(&self) -> f32 {
        CAMERA_HALF_EXTENT
    }

    /// Near and far clip distances of the view volume.
    #[must_use]
    pub const fn clip_range(&self) -> (f32, f32) {
        (CAMERA_NEAR, CAMERA_FAR)
    }
}

/// Uniform light filling the whole stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    color: Color,
    intensity: f32,
}

impl AmbientLight {
    const fn full_white() -> Self {
        Self {
            color: Color::new(1.0, 1.0, 1.0, 1.0),
            intensity: 1.0,
        }
    }

    /// Light color.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Light intensity in the range 0.0..=1.0.
    #[must_use]
    pub const fn intensity(&self) -> f32 {
        self.intensity
    }
}

/// Positional light hovering above the stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    position: Vec3,
    intensity: f32,
}

impl PointLight {
    const fn overhead() -> Self {
        Self {
            position: POINT_LIGHT_POSITION,
            intensity: POINT_LIGHT_INTENSITY,
        }
    }

    /// Light position in world units.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Light intensity in the range 0.0..=1.0.
    #[must_use]
    pub const fn intensity(&self) -> f32 {
        self.intensity
    }
}

/// Flat ground plane centred on the scene origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundPlane {
    extent: f32,
    color: Color,
}

impl GroundPlane {
    const fn default_stage() -> Self {
        Self {
            extent: GROUND_EXTENT,
            color: Color::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    /// Edge length of the square plane in world units.
    #[must_use]
    pub const fn extent(&self) -> f32 {
        self.extent
    }

    /// Fill color of the plane before lighting is applied.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }
}

/// Axis helper segments drawn from the scene origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisHelper {
    length: f32,
}

impl AxisHelper {
    const fn default_stage() -> Self {
        Self {
            length: AXIS_HELPER_LENGTH,
        }
    }

    /// Length of each axis segment in world units.
    #[must_use]
    pub const fn length(&self) -> f32 {
        self.length
    }
}

/// Static 3D stage: camera rig, lighting, ground plane and axis helper.
///
/// The stage is established once per viewer session and never updated per
/// snapshot. World entities are not projected into it; it only provides the
/// scenery the camera orbits around.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneStage {
    camera: CameraRig,
    ambient: AmbientLight,
    point_light: PointLight,
    ground: GroundPlane,
    axis_helper: AxisHelper,
}

impl SceneStage {
    /// Builds the stage for a viewport, deriving the camera aspect ratio
    /// from its current on-screen size.
    ///
    /// A degenerate viewport falls back to a square aspect instead of
    /// producing a collapsed view volume.
    #[must_use]
    pub fn from_viewport(width: f32, height: f32) -> Self {
        let aspect = if height > f32::EPSILON {
            width / height
        } else {
            1.0
        };

        Self {
            camera: CameraRig::with_aspect(aspect),
            ambient: AmbientLight::full_white(),
            point_light: PointLight::overhead(),
            ground: GroundPlane::default_stage(),
            axis_helper: AxisHelper::default_stage(),
        }
    }

    /// Camera rig framing the stage.
    #[must_use]
    pub const fn camera(&self) -> CameraRig {
        self.camera
    }

    /// Uniform stage light.
    #[must_use]
    pub const fn ambient(&self) -> AmbientLight {
        self.ambient
    }

    /// Positional stage light.
    #[must_use]
    pub const fn point_light(&self) -> PointLight {
        self.point_light
    }

    /// Ground plane under the stage.
    #[must_use]
    pub const fn ground(&self) -> GroundPlane {
        self.ground
    }

    /// Axis helper drawn at the origin.
    #[must_use]
    pub const fn axis_helper(&self) -> AxisHelper {
        self.axis_helper
    }
}

/// Identifies one of the three mount regions the viewer renders into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// The 2D tile grid container.
    GridView,
    /// The 3D scene container.
    SceneView,
    /// The player status panel.
    PlayerPanel,
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridView => write!(f, "grid view"),
            Self::SceneView => write!(f, "scene view"),
            Self::PlayerPanel => write!(f, "player panel"),
        }
    }
}

/// Axis-aligned screen-space region in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceRegion {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl SurfaceRegion {
    const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge of the region in pixels.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Top edge of the region in pixels.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Width of the region in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the region in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    fn is_empty(&self) -> bool {
        self.width < 1.0 || self.height < 1.0
    }
}

/// Screen split assigning each renderer its exclusive mount region.
///
/// The three regions stand in for the host page's mount points: each is
/// owned and fully rewritten by exactly one renderer per frame, so there is
/// never a concurrent writer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceLayout {
    grid: SurfaceRegion,
    scene: SurfaceRegion,
    panel: SurfaceRegion,
}

impl SurfaceLayout {
    /// Width in pixels reserved for the player panel.
    pub const PANEL_WIDTH: f32 = 220.0;

    /// Splits a window into the three mount regions.
    ///
    /// The grid view claims the pixels its columns need on the left, the
    /// player panel a fixed strip on the right, and the scene view the
    /// remainder between them. Fails with
    /// [`RenderingError::RenderTargetMissing`] when any region would come
    /// out empty, before any snapshot is processed.
    pub fn new(
        window_width: f32,
        window_height: f32,
        grid_pixel_width: f32,
    ) -> Result<Self, RenderingError> {
        let grid = SurfaceRegion::new(0.0, 0.0, grid_pixel_width, window_height);
        let panel = SurfaceRegion::new(
            window_width - Self::PANEL_WIDTH,
            0.0,
            Self::PANEL_WIDTH,
            window_height,
        );
        let scene = SurfaceRegion::new(
            grid_pixel_width,
            0.0,
            window_width - grid_pixel_width - Self::PANEL_WIDTH,
            window_height,
        );

        let regions = [
            (SurfaceKind::GridView, grid),
            (SurfaceKind::SceneView, scene),
            (SurfaceKind::PlayerPanel, panel),
        ];
        for (surface, region) in regions {
            if region.is_empty() {
                return Err(RenderingError::RenderTargetMissing { surface });
            }
        }

        Ok(Self { grid, scene, panel })
    }

    /// Region owned by the grid view renderer.
    #[must_use]
    pub const fn grid(&self) -> SurfaceRegion {
        self.grid
    }

    /// Region owned by the scene view renderer.
    #[must_use]
    pub const fn scene(&self) -> SurfaceRegion {
        self.scene
    }

    /// Region owned by the player panel renderer.
    #[must_use]
    pub const fn panel(&self) -> SurfaceRegion {
        self.panel
    }
}

/// Mutable pair of 2D view trees the backend redraws every frame.
///
/// Drivers replace both trees whenever a fresh snapshot parses; the previous
/// world's visuals are discarded wholesale, never diffed or appended to.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldView {
    /// Tile grid plus laser overlays.
    pub grid: GridView,
    /// Player status panel.
    pub panel: PlayerPanel,
}

impl WorldView {
    /// Projects a parsed world into both 2D view trees.
    #[must_use]
    pub fn from_world(world: &World) -> Self {
        Self {
            grid: GridView::from_world(world),
            panel: PlayerPanel::from_players(world.players()),
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Initial view rendered until the first refresh.
    pub view: WorldView,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, view: WorldView) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            view,
        }
    }
}

/// Rendering backend capable of presenting arena views.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_view` closure receives the frame delta and may
    /// replace the view trees before they are drawn, allowing drivers to
    /// feed freshly parsed snapshots into the render loop.
    fn run<F>(self, presentation: Presentation, update_view: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut WorldView) + 'static;
}

/// Shared flag that stops a backend's animation loop.
///
/// The loop otherwise re-enters itself once per display refresh until the
/// window closes; embedding drivers and tests use the handle to terminate it
/// deterministically. Cloning yields another handle to the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancellationHandle {
    /// Creates a handle in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the animation loop stop after the current frame.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Reports whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Errors that can occur while preparing rendering surfaces.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// A required mount region is absent from the window.
    RenderTargetMissing {
        /// Surface whose region came out empty.
        surface: SurfaceKind,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RenderTargetMissing { surface } => {
                write!(f, "no room left for the {surface} mount region")
            }
        }
    }
}

impl Error for RenderingError {}
