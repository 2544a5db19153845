// Route graph: waypoints connected by ray-marched, cost-weighted edges.
//
// `build_route_graph()` derives the graph from a validated `RouteGrid`: for
// every waypoint and each of the six `Direction`s it steps cell by cell,
// summing corridor costs, until it reaches another waypoint (edge emitted),
// an impassable cell, or the grid boundary (no edge). Each edge remembers
// the direction that produced it as its hint. Edges are directed; the build
// does not add or check reverse edges.
//
// Node storage is a `Vec<Waypoint>` sorted by id with a parallel
// `Vec<EdgeList>` of outgoing edges, plus an id -> slot index. Iteration
// order is therefore always ascending id, independent of hashing.
//
// Waypoint metadata (name, floor override, marker) comes from the map's
// directory and is merged once at build time; a waypoint without a floor
// override lives on floor `z + 1`.
//
// See also: `grid.rs` for the grid being marched, `patch.rs` for the manual
// corrections applied on top, `pathfinding.rs` for Dijkstra over this graph.

use crate::error::MapError;
use crate::grid::{Cell, RouteGrid};
use crate::types::{Direction, GridCoord, WaypointId};
use log::{debug, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Externally supplied description of a waypoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WaypointMeta {
    pub name: String,
    /// Floor number shown to users. Overrides the `z + 1` default.
    #[serde(default)]
    pub floor: Option<i32>,
    /// Name of the physical recognition marker placed at this waypoint.
    #[serde(default)]
    pub marker: Option<String>,
}

/// A node in the route graph, with its metadata resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: WaypointId,
    pub position: GridCoord,
    pub floor: i32,
    pub name: String,
    pub marker: Option<String>,
}

/// A directed edge held in its source's adjacency list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEdge {
    pub to: WaypointId,
    /// Sum of the corridor costs crossed; endpoints contribute nothing.
    pub cost: u32,
    /// Ray direction that found this edge. `None` for patched edges.
    pub hint: Option<Direction>,
}

/// Outgoing edges of one waypoint. Ray-marching yields at most six.
pub type EdgeList = SmallVec<[RouteEdge; 6]>;

/// The route graph container.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteGraph {
    nodes: Vec<Waypoint>,
    edges: Vec<EdgeList>,
    slots: FxHashMap<WaypointId, usize>,
    markers: FxHashMap<String, WaypointId>,
    patches_applied: bool,
}

impl RouteGraph {
    /// Build the bare graph from grid geometry: default names, floors
    /// derived from z, no markers.
    pub fn from_grid(grid: &RouteGrid) -> Self {
        let mut graph = Self::default();
        for (id, position) in grid.waypoints() {
            graph.slots.insert(id, graph.nodes.len());
            graph.nodes.push(Waypoint {
                id,
                position,
                floor: position.z + 1,
                name: format!("Waypoint {}", id.0),
                marker: None,
            });
            graph.edges.push(ray_edges(grid, position));
        }
        graph
    }

    /// Merge externally supplied metadata into the node table. Entries for
    /// ids that are not in the grid are skipped.
    fn merge_directory(
        &mut self,
        directory: &BTreeMap<WaypointId, WaypointMeta>,
    ) -> Result<(), MapError> {
        for (&id, meta) in directory {
            let Some(slot) = self.slot(id) else {
                warn!("waypoint directory names {id}, which is not in the grid; ignoring");
                continue;
            };
            let node = &mut self.nodes[slot];
            node.name.clone_from(&meta.name);
            if let Some(floor) = meta.floor {
                node.floor = floor;
            }
            if let Some(marker) = &meta.marker {
                if let Some(&first) = self.markers.get(marker) {
                    return Err(MapError::DuplicateMarker {
                        marker: marker.clone(),
                        first,
                        second: id,
                    });
                }
                self.markers.insert(marker.clone(), id);
                node.marker = Some(marker.clone());
            }
        }
        Ok(())
    }

    pub(crate) fn slot(&self, id: WaypointId) -> Option<usize> {
        self.slots.get(&id).copied()
    }

    pub(crate) fn edges_at_mut(&mut self, slot: usize) -> &mut EdgeList {
        &mut self.edges[slot]
    }

    pub(crate) fn edges_at(&self, slot: usize) -> &[RouteEdge] {
        &self.edges[slot]
    }

    pub(crate) fn node_at(&self, slot: usize) -> &Waypoint {
        &self.nodes[slot]
    }

    pub(crate) fn mark_patched(&mut self) {
        self.patches_applied = true;
    }

    pub fn contains(&self, id: WaypointId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Look up a waypoint by id.
    pub fn waypoint(&self, id: WaypointId) -> Option<&Waypoint> {
        self.slot(id).map(|slot| &self.nodes[slot])
    }

    /// All waypoints in ascending id order.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.nodes
    }

    /// Resolved floor of a waypoint.
    pub fn floor_of(&self, id: WaypointId) -> Option<i32> {
        self.waypoint(id).map(|w| w.floor)
    }

    /// Waypoint carrying the named recognition marker.
    pub fn waypoint_for_marker(&self, marker: &str) -> Option<WaypointId> {
        self.markers.get(marker).copied()
    }

    /// Outgoing edges of a waypoint. Empty for unknown ids.
    pub fn edges_from(&self, id: WaypointId) -> &[RouteEdge] {
        self.slot(id)
            .map_or(&[][..], |slot| self.edges[slot].as_slice())
    }

    /// The edge `from -> to`, if one exists.
    pub fn edge(&self, from: WaypointId, to: WaypointId) -> Option<&RouteEdge> {
        self.edges_from(from).iter().find(|e| e.to == to)
    }

    /// `(source, outgoing edges)` for every waypoint, in id order.
    pub fn adjacency(&self) -> impl Iterator<Item = (WaypointId, &[RouteEdge])> + '_ {
        self.nodes
            .iter()
            .zip(&self.edges)
            .map(|(node, edges)| (node.id, edges.as_slice()))
    }

    /// Number of waypoints.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(|e| e.len()).sum()
    }

    /// Whether the manual patch set has been applied to this graph.
    pub fn patches_applied(&self) -> bool {
        self.patches_applied
    }
}

/// Build a route graph from a validated grid and the waypoint directory.
///
/// Fails only if two waypoints claim the same marker; grid consistency was
/// already checked when the `RouteGrid` was constructed.
pub fn build_route_graph(
    grid: &RouteGrid,
    directory: &BTreeMap<WaypointId, WaypointMeta>,
) -> Result<RouteGraph, MapError> {
    let mut graph = RouteGraph::from_grid(grid);
    graph.merge_directory(directory)?;
    debug!(
        "built route graph: {} waypoints, {} edges from a {}x{}x{} grid",
        graph.node_count(),
        graph.edge_count(),
        grid.size_x,
        grid.size_y,
        grid.size_z,
    );
    Ok(graph)
}

/// March all six directions from `origin` and collect the edges found.
fn ray_edges(grid: &RouteGrid, origin: GridCoord) -> EdgeList {
    Direction::ALL
        .into_iter()
        .filter_map(|dir| {
            march(grid, origin, dir).map(|(to, cost)| RouteEdge {
                to,
                cost,
                hint: Some(dir),
            })
        })
        .collect()
}

/// Step from `origin` along `dir` until something stops the ray. Returns the
/// waypoint reached and the corridor cost accumulated on the way.
pub fn march(grid: &RouteGrid, origin: GridCoord, dir: Direction) -> Option<(WaypointId, u32)> {
    let mut pos = origin;
    let mut cost: u32 = 0;
    loop {
        pos = pos.step(dir);
        match grid.get(pos)? {
            Cell::Impassable => return None,
            Cell::Corridor(c) => cost = cost.saturating_add(c),
            Cell::Waypoint(id) => return Some((id, cost)),
        }
    }
}
