// Construction-time error types.
//
// Only map loading can fail. Queries (`find_path`, `next_node`,
// `direction_hint`, `guide`) report failure as `None` or a `Guidance`
// variant so a rendering loop can keep running, and patch problems are
// logged and skipped. See `grid.rs` and `config.rs` for where these are
// raised.

use crate::types::{GridCoord, WaypointId};
use thiserror::Error;

/// A grid that cannot be turned into a consistent waypoint map.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid has no cells")]
    EmptyGrid,

    #[error("grid is ragged at x={x} y={y}: every column must match the first one's shape")]
    RaggedGrid { x: usize, y: usize },

    #[error("cell {coord} holds {value}, which is above the impassable sentinel")]
    ValueAboveSentinel { value: i32, coord: GridCoord },

    #[error("waypoint {id} appears at both {first} and {second}")]
    DuplicateWaypoint {
        id: WaypointId,
        first: GridCoord,
        second: GridCoord,
    },
}

/// Failure to load a `MapConfig` into a route graph.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("malformed map JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("marker {marker:?} is assigned to both {first} and {second}")]
    DuplicateMarker {
        marker: String,
        first: WaypointId,
        second: WaypointId,
    },
}
