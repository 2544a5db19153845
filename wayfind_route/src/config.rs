// Data-driven map configuration.
//
// Everything that describes one site lives in `MapConfig`, loaded from
// JSON: the raw cost grid (`cells[x][y][z]`), the waypoint directory
// (names, floor overrides, recognition markers), the manual patch list, and
// the navigation settings the indicator layer runs with. The engine never
// hard-codes a site; the built-in campus map is itself a JSON file embedded
// at compile time.
//
// `load_route_graph()` is the one-time construction entry point: it
// validates the grid, builds the graph, merges the directory, and applies
// the patch list. The returned `RouteGraph` is then only read.
//
// See also: `grid.rs`, `nav.rs`, `patch.rs` for the three build stages,
// `data/campus_map.json` for the embedded map.

use crate::error::MapError;
use crate::grid::{IMPASSABLE, RouteGrid};
use crate::guidance::DEFAULT_MARKER_HOLD_MS;
use crate::nav::{RouteGraph, WaypointMeta, build_route_graph};
use crate::patch::GraphPatch;
use crate::types::WaypointId;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Settings consumed by the per-frame navigation loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigationSettings {
    /// Confine route searches to the starting waypoint's floor.
    pub same_floor_only: bool,
    /// How long a marker stays current after it leaves view.
    pub marker_hold_ms: u64,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            same_floor_only: false,
            marker_hold_ms: DEFAULT_MARKER_HOLD_MS,
        }
    }
}

fn default_impassable() -> i32 {
    IMPASSABLE
}

/// A complete site map. Loaded from JSON, never mutated at runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Sentinel marking impassable cells.
    #[serde(default = "default_impassable")]
    pub impassable: i32,

    /// Raw cell values, indexed `cells[x][y][z]`.
    pub cells: Vec<Vec<Vec<i32>>>,

    /// Names, floor overrides, and markers, keyed by waypoint id.
    #[serde(default)]
    pub waypoints: BTreeMap<WaypointId, WaypointMeta>,

    /// Manual corrections, applied in order after the graph is built.
    #[serde(default)]
    pub patches: Vec<GraphPatch>,

    #[serde(default)]
    pub navigation: NavigationSettings,
}

impl MapConfig {
    /// Parse a map from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The built-in campus map: a 5x5x5 grid with 24 waypoints across
    /// three floors.
    ///
    /// Panics if the embedded JSON is malformed (should never happen in a
    /// released build).
    pub fn campus() -> Self {
        let json = include_str!("../../data/campus_map.json");
        Self::from_json(json).expect("embedded campus_map.json is malformed")
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::campus()
    }
}

/// Validate the grid, build the graph with metadata, and apply patches.
pub fn load_route_graph(config: &MapConfig) -> Result<RouteGraph, MapError> {
    let grid = RouteGrid::from_columns(&config.cells, config.impassable)?;
    let mut graph = build_route_graph(&grid, &config.waypoints)?;
    graph.apply_patches(&config.patches);
    info!(
        "route graph ready: {} waypoints, {} edges after {} patches",
        graph.node_count(),
        graph.edge_count(),
        config.patches.len(),
    );
    Ok(graph)
}
