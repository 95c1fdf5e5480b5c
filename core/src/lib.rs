#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core snapshot contracts shared across the Laser Arena viewer.
//!
//! This crate defines the wire-facing data model the game server publishes:
//! one [`WorldSnapshot`] per tick describing the full arena state at an
//! instant. Snapshots are immutable inputs; the world crate turns each one
//! into a spatial grid and the rendering adapters project that grid into
//! visuals. Nothing here performs validation beyond what the type system and
//! the JSON decoder enforce — semantic checks such as grid bounds live in the
//! world crate's parser.

use serde::{Deserialize, Serialize};

/// Declared extent of the arena grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    /// Number of columns contained in the grid.
    pub width: u32,
    /// Number of rows contained in the grid.
    pub height: u32,
}

impl GridDimensions {
    /// Creates a new dimension pair.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of cells described by the dimensions.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Reports whether the coordinate lies inside the declared extent.
    #[must_use]
    pub const fn contains(&self, position: GridCoord) -> bool {
        position.x() < self.width && position.y() < self.height
    }
}

/// Location of a single grid cell.
///
/// Serialized on the wire as a two-element array `[x, y]`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct GridCoord {
    x: u32,
    y: u32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }
}

impl From<(u32, u32)> for GridCoord {
    fn from((x, y): (u32, u32)) -> Self {
        Self::new(x, y)
    }
}

impl From<GridCoord> for (u32, u32) {
    fn from(position: GridCoord) -> Self {
        (position.x, position.y)
    }
}

/// Compass orientation used for tank facings and laser travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Facing toward decreasing row indices.
    North,
    /// Facing toward increasing column indices.
    East,
    /// Facing toward increasing row indices.
    South,
    /// Facing toward decreasing column indices.
    West,
}

impl Orientation {
    /// Returns `true` for the north/south orientations.
    ///
    /// Laser overlay geometry treats every non-vertical direction as
    /// horizontal.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::North | Self::South)
    }
}

/// Kinds of scenery the server places on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaticObjectKind {
    /// A tree blocking the cell.
    Tree,
    /// A wall blocking the cell.
    Wall,
}

/// Scenery occupant placed at a fixed grid coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticObject {
    /// Grid coordinate occupied by the object.
    pub position: GridCoord,
    /// Kind of scenery present at the coordinate.
    #[serde(rename = "type")]
    pub kind: StaticObjectKind,
}

/// One tank as reported by the snapshot.
///
/// The same record doubles as the player entry shown in the status panel;
/// the world model places it on the grid and into the player list without
/// copying it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tank {
    /// Grid coordinate occupied by the tank.
    pub position: GridCoord,
    /// Display color supplied by the owning player, passed through verbatim.
    pub color: String,
    /// Facing direction of the hull.
    pub orientation: Orientation,
    /// Remaining lives; zero is a valid, lifeless value.
    pub energy: u32,
    /// Player name shown in the status panel.
    pub name: String,
}

/// In-flight laser beam spanning a straight run of cells.
///
/// Lasers are never placed into the grid; renderers draw them as overlays
/// covering both endpoints inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Laser {
    /// Coordinate where the beam begins.
    pub start_pos: GridCoord,
    /// Coordinate where the beam ends.
    pub end_pos: GridCoord,
    /// Direction the beam travels.
    pub direction: Orientation,
}

/// Complete state of the arena at one instant.
///
/// All four fields are required; a payload missing any of them is malformed
/// and fails to decode. Unknown fields are ignored, so a stray `type` tag on
/// a tank payload has no effect — the world parser decides cell kinds itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    /// Declared grid extent.
    pub dimensions: GridDimensions,
    /// Scenery occupants placed on the grid.
    pub static_objects: Vec<StaticObject>,
    /// Tanks present in the arena, in server order.
    pub tanks: Vec<Tank>,
    /// Laser beams currently in flight.
    pub lasers: Vec<Laser>,
}

impl WorldSnapshot {
    /// Decodes a snapshot from its JSON wire representation.
    ///
    /// Missing or wrong-typed fields surface as a decode error; callers are
    /// expected to keep their previous world when a tick fails to decode.
    pub fn from_json_str(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_decodes_from_wire_json() {
        let payload = r##"{
            "dimensions": {"width": 3, "height": 3},
            "staticObjects": [{"position": [0, 0], "type": "wall"}],
            "tanks": [{
                "position": [1, 1],
                "color": "#f00",
                "orientation": "north",
                "energy": 3,
                "name": "A"
            }],
            "lasers": []
        }"##;

        let snapshot = WorldSnapshot::from_json_str(payload).expect("snapshot decodes");
        assert_eq!(snapshot.dimensions, GridDimensions::new(3, 3));
        assert_eq!(snapshot.static_objects.len(), 1);
        assert_eq!(snapshot.static_objects[0].position, GridCoord::new(0, 0));
        assert_eq!(snapshot.static_objects[0].kind, StaticObjectKind::Wall);
        assert_eq!(snapshot.tanks.len(), 1);
        assert_eq!(snapshot.tanks[0].orientation, Orientation::North);
        assert_eq!(snapshot.tanks[0].color, "#f00");
        assert!(snapshot.lasers.is_empty());
    }

    #[test]
    fn positions_decode_from_two_element_arrays() {
        let position: GridCoord = serde_json::from_str("[4, 7]").expect("position decodes");
        assert_eq!(position, GridCoord::new(4, 7));
    }

    #[test]
    fn lasers_use_camel_case_endpoint_names() {
        let payload = r#"{
            "startPos": [2, 3],
            "endPos": [2, 7],
            "direction": "north"
        }"#;

        let laser: Laser = serde_json::from_str(payload).expect("laser decodes");
        assert_eq!(laser.start_pos, GridCoord::new(2, 3));
        assert_eq!(laser.end_pos, GridCoord::new(2, 7));
        assert_eq!(laser.direction, Orientation::North);
    }

    #[test]
    fn tank_payload_ignores_stray_kind_tag() {
        let payload = r#"{
            "position": [0, 2],
            "color": "blue",
            "orientation": "west",
            "energy": 0,
            "name": "B",
            "type": "tree"
        }"#;

        let tank: Tank = serde_json::from_str(payload).expect("tank decodes");
        assert_eq!(tank.name, "B");
        assert_eq!(tank.energy, 0);
    }

    #[test]
    fn snapshot_missing_tank_list_is_malformed() {
        let payload = r#"{
            "dimensions": {"width": 2, "height": 2},
            "staticObjects": [],
            "lasers": []
        }"#;

        assert!(WorldSnapshot::from_json_str(payload).is_err());
    }

    #[test]
    fn negative_positions_fail_to_decode() {
        let payload = r#"{"position": [-1, 0], "type": "tree"}"#;
        let decoded: Result<StaticObject, _> = serde_json::from_str(payload);
        assert!(decoded.is_err());
    }

    #[test]
    fn vertical_orientations_are_north_and_south() {
        assert!(Orientation::North.is_vertical());
        assert!(Orientation::South.is_vertical());
        assert!(!Orientation::East.is_vertical());
        assert!(!Orientation::West.is_vertical());
    }

    #[test]
    fn dimensions_contain_only_interior_coordinates() {
        let dimensions = GridDimensions::new(3, 2);
        assert!(dimensions.contains(GridCoord::new(0, 0)));
        assert!(dimensions.contains(GridCoord::new(2, 1)));
        assert!(!dimensions.contains(GridCoord::new(3, 0)));
        assert!(!dimensions.contains(GridCoord::new(0, 2)));
        assert_eq!(dimensions.cell_count(), 6);
    }
}
