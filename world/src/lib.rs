#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! World model construction for the Laser Arena viewer.
//!
//! [`World::parse`] turns one authoritative snapshot into a spatial grid plus
//! flat player and laser lists. The model is immutable once built: renderers
//! only ever read it, and every refresh replaces the whole model rather than
//! diffing against the previous one. Tanks are owned by the player list; the
//! grid references them by [`TankId`], so both views observe the same record.

use std::fmt;

use laser_arena_core::{GridCoord, GridDimensions, Laser, StaticObjectKind, Tank, WorldSnapshot};
use thiserror::Error;

/// Identifier of a tank within one parsed world.
///
/// Identifiers are assigned in snapshot order and index into the player list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TankId(u32);

impl TankId {
    /// Creates a new tank identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Occupant stored at one grid cell.
///
/// Every cell carries exactly one kind; tank cells reference the owning
/// record in the player list instead of duplicating it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    /// Nothing occupies the cell.
    Empty,
    /// A tree blocks the cell.
    Tree,
    /// A wall blocks the cell.
    Wall,
    /// A tank occupies the cell.
    Tank(TankId),
}

/// Grid cell with any tank occupant resolved to its owning record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellView<'a> {
    /// Nothing occupies the cell.
    Empty,
    /// A tree blocks the cell.
    Tree,
    /// A wall blocks the cell.
    Wall,
    /// A tank occupies the cell.
    Tank(&'a Tank),
}

/// Dense spatial grid owned by a single parsed world.
///
/// Cells are stored in a flat vector indexed by row-major arithmetic; the
/// grid is freshly allocated per parse and never resized afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    fn filled_empty(dimensions: GridDimensions) -> Self {
        Self {
            width: dimensions.width,
            height: dimensions.height,
            cells: vec![Cell::Empty; dimensions.cell_count()],
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns the occupant of the provided cell.
    ///
    /// Coordinates outside the grid read as [`Cell::Empty`].
    #[must_use]
    pub fn cell(&self, position: GridCoord) -> Cell {
        self.index(position)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(Cell::Empty)
    }

    fn index(&self, position: GridCoord) -> Option<usize> {
        if position.x() < self.width && position.y() < self.height {
            let x = usize::try_from(position.x()).ok()?;
            let y = usize::try_from(position.y()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(y * width + x)
        } else {
            None
        }
    }

    fn place(&mut self, position: GridCoord, cell: Cell) {
        if let Some(index) = self.index(position) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = cell;
            }
        }
    }
}

/// Parsed world model: the spatial grid plus player and laser lists.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    grid: Grid,
    players: Vec<Tank>,
    lasers: Vec<Laser>,
}

impl World {
    /// Builds a world model from one snapshot.
    ///
    /// The grid is freshly allocated per call; nothing is reused across
    /// snapshots. Static objects are written first and tanks second, so a
    /// later occupant silently replaces whatever shared its coordinate —
    /// tanks win ties against scenery. Tank cells are always
    /// [`Cell::Tank`], regardless of any kind tag carried by the raw
    /// payload. Lasers are stored verbatim; they never occupy cells, so
    /// their endpoints are not bounds-checked.
    ///
    /// A snapshot declaring an empty grid or placing any occupant outside
    /// the declared extent is rejected wholesale: a failed parse never
    /// yields a partially written world.
    pub fn parse(snapshot: &WorldSnapshot) -> Result<Self, ParseError> {
        let dimensions = snapshot.dimensions;
        if dimensions.width == 0 || dimensions.height == 0 {
            return Err(ParseError::MalformedSnapshot {
                width: dimensions.width,
                height: dimensions.height,
            });
        }

        let mut grid = Grid::filled_empty(dimensions);

        for object in &snapshot.static_objects {
            ensure_in_bounds(dimensions, object.position, EntityKind::StaticObject)?;
            let cell = match object.kind {
                StaticObjectKind::Tree => Cell::Tree,
                StaticObjectKind::Wall => Cell::Wall,
            };
            grid.place(object.position, cell);
        }

        let mut players = Vec::with_capacity(snapshot.tanks.len());
        for (index, tank) in snapshot.tanks.iter().enumerate() {
            ensure_in_bounds(dimensions, tank.position, EntityKind::Tank)?;
            grid.place(tank.position, Cell::Tank(TankId::new(index as u32)));
            players.push(tank.clone());
        }

        Ok(Self {
            grid,
            players,
            lasers: snapshot.lasers.clone(),
        })
    }

    /// Read-only view of the spatial grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Players in snapshot order.
    ///
    /// Each entry is the same record the grid references through its
    /// [`TankId`]; there is exactly one owned tank per snapshot entry.
    #[must_use]
    pub fn players(&self) -> &[Tank] {
        &self.players
    }

    /// Resolves a tank identifier to its owning record.
    #[must_use]
    pub fn tank(&self, id: TankId) -> Option<&Tank> {
        self.players.get(id.get() as usize)
    }

    /// Laser beams in flight, stored verbatim from the snapshot.
    #[must_use]
    pub fn lasers(&self) -> &[Laser] {
        &self.lasers
    }

    /// Returns the cell at `position` with any tank occupant resolved.
    #[must_use]
    pub fn cell_view(&self, position: GridCoord) -> CellView<'_> {
        match self.grid.cell(position) {
            Cell::Empty => CellView::Empty,
            Cell::Tree => CellView::Tree,
            Cell::Wall => CellView::Wall,
            Cell::Tank(id) => self.tank(id).map_or(CellView::Empty, CellView::Tank),
        }
    }
}

fn ensure_in_bounds(
    dimensions: GridDimensions,
    position: GridCoord,
    entity: EntityKind,
) -> Result<(), ParseError> {
    if dimensions.contains(position) {
        Ok(())
    } else {
        Err(ParseError::OutOfBounds {
            entity,
            x: position.x(),
            y: position.y(),
            width: dimensions.width,
            height: dimensions.height,
        })
    }
}

/// Entity class recorded in out-of-bounds failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    /// Scenery from the snapshot's static object list.
    StaticObject,
    /// Tank from the snapshot's tank list.
    Tank,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaticObject => write!(f, "static object"),
            Self::Tank => write!(f, "tank"),
        }
    }
}

/// Failures detected while building a world model from a snapshot.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The snapshot declared a grid without any cells.
    #[error("snapshot declares a degenerate {width}x{height} grid")]
    MalformedSnapshot {
        /// Declared number of columns.
        width: u32,
        /// Declared number of rows.
        height: u32,
    },
    /// An occupant's position lies outside the declared grid extent.
    #[error("{entity} at ({x}, {y}) lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// Kind of entity carrying the offending position.
        entity: EntityKind,
        /// Column index of the position.
        x: u32,
        /// Row index of the position.
        y: u32,
        /// Declared number of columns.
        width: u32,
        /// Declared number of rows.
        height: u32,
    },
}
