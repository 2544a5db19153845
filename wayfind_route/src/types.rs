// Core types shared across the route engine.
//
// Defines grid coordinates (`GridCoord`), waypoint identifiers
// (`WaypointId`), and the six ray-march directions (`Direction`). All types
// derive `Serialize` and `Deserialize` so maps and query results can move
// through JSON unchanged.
//
// Axis conventions follow the map data, not screen space:
// - X: east  (positive) / west  (negative)
// - Y: south (positive) / north (negative)
// - Z: up    (positive) / down  (negative), one level per grid layer

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A cell position in the 3D route grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The neighboring cell one step along `dir`.
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy, dz) = dir.offset();
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Manhattan distance between two coordinates.
    pub fn manhattan_distance(self, other: Self) -> u32 {
        ((self.x - other.x).unsigned_abs())
            + ((self.y - other.y).unsigned_abs())
            + ((self.z - other.z).unsigned_abs())
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Waypoint IDs
// ---------------------------------------------------------------------------

/// Identifier of a navigable waypoint. The value is the integer stored in
/// the waypoint's grid cell, so it is stable across rebuilds of the same map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaypointId(pub u32);

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Ray-march directions
// ---------------------------------------------------------------------------

/// One of the six axis-aligned directions the graph builder marches along.
///
/// The discriminant is the direction index handed to the rendering layer as
/// a "direction hint" (0 = north ... 5 = up), so the declaration order is
/// part of the external contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// y - 1
    North = 0,
    /// x + 1
    East = 1,
    /// y + 1
    South = 2,
    /// x - 1
    West = 3,
    /// z - 1
    Down = 4,
    /// z + 1
    Up = 5,
}

impl Direction {
    /// All six directions in hint-index order.
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::Down,
        Direction::Up,
    ];

    /// The hint index (0..=5) of this direction.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Inverse of `index()`. Returns `None` for values outside 0..=5.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Unit step `(dx, dy, dz)` for this direction.
    pub fn offset(self) -> (i32, i32, i32) {
        match self {
            Direction::North => (0, -1, 0),
            Direction::East => (1, 0, 0),
            Direction::South => (0, 1, 0),
            Direction::West => (-1, 0, 0),
            Direction::Down => (0, 0, -1),
            Direction::Up => (0, 0, 1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
        }
    }

    /// True for the two floor-changing directions.
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Down | Direction::Up)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
            Direction::Down => "down a floor",
            Direction::Up => "up a floor",
        };
        f.write_str(name)
    }
}
