// Dense 3D cost grid: the authoritative static map.
//
// Each cell holds one raw integer that classifies as a waypoint id
// (0 <= v < sentinel), a corridor with crossing cost |v| (v < 0), or an
// impassable region (v == sentinel). Cells are stored classified in a flat
// `Vec<Cell>` indexed by `x + y * size_x + z * size_x * size_y`.
//
// Construction validates the whole map up front: ragged input, values above
// the sentinel, and waypoint ids that occur twice are all rejected, so every
// later stage can trust the id -> coordinate table. Out-of-bounds reads
// return `None`, which the graph builder treats as the end of a ray rather
// than an error.
//
// See also: `nav.rs` for the ray-march that turns this grid into a graph,
// `config.rs` for the JSON shape (`cells[x][y][z]`) the grid is read from.

use crate::error::GridError;
use crate::types::{GridCoord, WaypointId};
use std::collections::BTreeMap;

/// Default impassable sentinel. Chosen to exceed any real cost or id.
pub const IMPASSABLE: i32 = 1000;

/// Classified contents of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Waypoint(WaypointId),
    /// Traversable space; the payload is the cost of crossing this one cell.
    Corridor(u32),
    Impassable,
}

impl Cell {
    /// Classify a raw cell value against `sentinel`. Returns `None` for
    /// values above the sentinel, which no valid map contains.
    pub fn classify(value: i32, sentinel: i32) -> Option<Cell> {
        if value < 0 {
            Some(Cell::Corridor(value.unsigned_abs()))
        } else if value < sentinel {
            Some(Cell::Waypoint(WaypointId(value as u32)))
        } else if value == sentinel {
            Some(Cell::Impassable)
        } else {
            None
        }
    }
}

/// Validated 3D route grid.
#[derive(Clone, Debug)]
pub struct RouteGrid {
    /// Flat storage: index = x + y * size_x + z * size_x * size_y.
    cells: Vec<Cell>,
    /// Every waypoint in the grid, keyed by id.
    waypoints: BTreeMap<WaypointId, GridCoord>,
    impassable: i32,
    pub size_x: u32,
    pub size_y: u32,
    pub size_z: u32,
}

impl RouteGrid {
    /// Build a grid from raw values laid out as `columns[x][y][z]`.
    ///
    /// The shape is taken from `columns[0][0]`; every other column must
    /// match it exactly.
    pub fn from_columns(columns: &[Vec<Vec<i32>>], impassable: i32) -> Result<Self, GridError> {
        let size_x = columns.len();
        let size_y = columns.first().map_or(0, |plane| plane.len());
        let size_z = columns
            .first()
            .and_then(|plane| plane.first())
            .map_or(0, |col| col.len());
        if size_x == 0 || size_y == 0 || size_z == 0 {
            return Err(GridError::EmptyGrid);
        }

        let mut cells = vec![Cell::Impassable; size_x * size_y * size_z];
        let mut waypoints: BTreeMap<WaypointId, GridCoord> = BTreeMap::new();

        for (x, plane) in columns.iter().enumerate() {
            if plane.len() != size_y {
                return Err(GridError::RaggedGrid {
                    x,
                    y: plane.len().min(size_y),
                });
            }
            for (y, column) in plane.iter().enumerate() {
                if column.len() != size_z {
                    return Err(GridError::RaggedGrid { x, y });
                }
                for (z, &value) in column.iter().enumerate() {
                    let coord = GridCoord::new(x as i32, y as i32, z as i32);
                    let cell = Cell::classify(value, impassable)
                        .ok_or(GridError::ValueAboveSentinel { value, coord })?;
                    if let Cell::Waypoint(id) = cell {
                        if let Some(&first) = waypoints.get(&id) {
                            return Err(GridError::DuplicateWaypoint {
                                id,
                                first,
                                second: coord,
                            });
                        }
                        waypoints.insert(id, coord);
                    }
                    cells[x + y * size_x + z * size_x * size_y] = cell;
                }
            }
        }

        Ok(Self {
            cells,
            waypoints,
            impassable,
            size_x: size_x as u32,
            size_y: size_y as u32,
            size_z: size_z as u32,
        })
    }

    /// Check whether a coordinate is within bounds.
    pub fn in_bounds(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as u32) < self.size_x
            && (coord.y as u32) < self.size_y
            && (coord.z as u32) < self.size_z
    }

    fn index(&self, coord: GridCoord) -> Option<usize> {
        if self.in_bounds(coord) {
            let sx = self.size_x as usize;
            let sy = self.size_y as usize;
            Some(coord.x as usize + coord.y as usize * sx + coord.z as usize * sx * sy)
        } else {
            None
        }
    }

    /// Read a cell. Returns `None` for out-of-bounds coordinates.
    pub fn get(&self, coord: GridCoord) -> Option<Cell> {
        self.index(coord).map(|i| self.cells[i])
    }

    /// The sentinel value this grid was classified against.
    pub fn impassable(&self) -> i32 {
        self.impassable
    }

    /// Coordinate of a waypoint, if it exists in this grid.
    pub fn waypoint_position(&self, id: WaypointId) -> Option<GridCoord> {
        self.waypoints.get(&id).copied()
    }

    /// All waypoints with their coordinates, in ascending id order.
    pub fn waypoints(&self) -> impl Iterator<Item = (WaypointId, GridCoord)> + '_ {
        self.waypoints.iter().map(|(&id, &pos)| (id, pos))
    }

    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }
}
