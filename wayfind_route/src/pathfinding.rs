// Dijkstra shortest paths over the route graph.
//
// Uses a `BinaryHeap` as a min-heap via reversed ordering, with lazy
// deletion: stale heap entries are skipped once their node is closed.
// Distances, predecessors, and the closed set live in `Vec`s indexed by the
// graph's node slots.
//
// Ties are broken toward the smaller waypoint id both when popping and
// because relaxation only replaces a predecessor on a strictly smaller
// distance, so results are reproducible for a given graph.
//
// The same-floor mode skips relaxation into any node whose floor differs
// from the start's, which confines the whole search to that floor rather
// than merely rejecting cross-floor endpoints.
//
// See also: `nav.rs` for the `RouteGraph` being searched, `direction.rs`
// for turning a path into the next step.

use crate::nav::RouteGraph;
use crate::types::WaypointId;
use log::trace;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// The result of a successful search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePath {
    /// Waypoints from start to goal, inclusive. Never empty.
    pub nodes: Vec<WaypointId>,
    /// Sum of the edge costs along `nodes`.
    pub total_cost: u64,
}

impl RoutePath {
    /// Number of edges walked.
    pub fn hops(&self) -> usize {
        self.nodes.len() - 1
    }
}

/// Entry in the open set (min-heap via reversed ordering).
struct OpenEntry {
    dist: u64,
    id: WaypointId,
    slot: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.dist == other.dist && self.id == other.id
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: smallest (dist, id) is "greatest".
        other
            .dist
            .cmp(&self.dist)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Find the minimum-cost path from `start` to `goal`.
///
/// Returns `None` if either end is unknown, if `same_floor_only` is set and
/// the ends are on different floors, or if `goal` is unreachable.
pub fn find_path(
    graph: &RouteGraph,
    start: WaypointId,
    goal: WaypointId,
    same_floor_only: bool,
) -> Option<RoutePath> {
    if start == goal {
        return Some(RoutePath {
            nodes: vec![start],
            total_cost: 0,
        });
    }

    let start_slot = graph.slot(start)?;
    let goal_slot = graph.slot(goal)?;
    let start_floor = graph.node_at(start_slot).floor;

    if same_floor_only && graph.node_at(goal_slot).floor != start_floor {
        trace!("no same-floor route {start} -> {goal}: floors differ");
        return None;
    }

    let n = graph.node_count();
    let mut dist = vec![u64::MAX; n];
    let mut came_from: Vec<Option<usize>> = vec![None; n];
    let mut closed = vec![false; n];

    dist[start_slot] = 0;
    let mut open = BinaryHeap::new();
    open.push(OpenEntry {
        dist: 0,
        id: start,
        slot: start_slot,
    });

    while let Some(current) = open.pop() {
        let ci = current.slot;
        if closed[ci] {
            continue;
        }
        if ci == goal_slot {
            let path = reconstruct_path(graph, &came_from, start_slot, goal_slot, dist[ci]);
            trace!("route {start} -> {goal}: {:?}", path.nodes);
            return Some(path);
        }
        closed[ci] = true;

        for edge in graph.edges_at(ci) {
            let Some(ni) = graph.slot(edge.to) else {
                continue;
            };
            if closed[ni] {
                continue;
            }
            if same_floor_only && graph.node_at(ni).floor != start_floor {
                continue;
            }
            let tentative = dist[ci] + u64::from(edge.cost);
            if tentative < dist[ni] {
                dist[ni] = tentative;
                came_from[ni] = Some(ci);
                open.push(OpenEntry {
                    dist: tentative,
                    id: edge.to,
                    slot: ni,
                });
            }
        }
    }

    trace!("no route {start} -> {goal}");
    None
}

/// Total cost of walking `nodes` in order, using the cheapest edge between
/// each consecutive pair. Returns `None` if some pair is not connected.
pub fn path_cost(graph: &RouteGraph, nodes: &[WaypointId]) -> Option<u64> {
    nodes.windows(2).try_fold(0u64, |acc, pair| {
        graph
            .edges_from(pair[0])
            .iter()
            .filter(|e| e.to == pair[1])
            .map(|e| u64::from(e.cost))
            .min()
            .map(|c| acc + c)
    })
}

fn reconstruct_path(
    graph: &RouteGraph,
    came_from: &[Option<usize>],
    start_slot: usize,
    goal_slot: usize,
    total_cost: u64,
) -> RoutePath {
    let mut nodes = Vec::new();
    let mut current = goal_slot;
    loop {
        nodes.push(graph.node_at(current).id);
        if current == start_slot {
            break;
        }
        match came_from[current] {
            Some(prev) => current = prev,
            None => break,
        }
    }
    nodes.reverse();
    RoutePath { nodes, total_cost }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{IMPASSABLE, RouteGrid};

    const X: i32 = IMPASSABLE;

    fn graph_from(columns: Vec<Vec<Vec<i32>>>) -> RouteGraph {
        RouteGraph::from_grid(&RouteGrid::from_columns(&columns, X).unwrap())
    }

    fn ids(path: &RoutePath) -> Vec<u32> {
        path.nodes.iter().map(|w| w.0).collect()
    }

    /// One floor, a ring of four waypoints:
    ///
    /// ```text
    /// 0 -1- 1
    /// |     |
    /// 1     r
    /// |     |
    /// 2 -1- 3
    /// ```
    ///
    /// where `r` is the cost of the 1-3 corridor.
    fn ring(r: i32) -> RouteGraph {
        graph_from(vec![
            vec![vec![0], vec![-1], vec![2]],
            vec![vec![-1], vec![X], vec![-1]],
            vec![vec![1], vec![-r], vec![3]],
        ])
    }

    /// Two floors: 0 -50- 1 on floor 1, 2 -1- 3 on floor 3, joined by
    /// cost-1 shafts 0|2 and 1|3.
    fn two_floors() -> RouteGraph {
        graph_from(vec![
            vec![vec![0, -1, 2]],
            vec![vec![-50, X, -1]],
            vec![vec![1, -1, 3]],
        ])
    }

    #[test]
    fn trivial_path() {
        let graph = ring(5);
        let path = find_path(&graph, WaypointId(2), WaypointId(2), true).unwrap();
        assert_eq!(ids(&path), vec![2]);
        assert_eq!(path.total_cost, 0);
        assert_eq!(path.hops(), 0);
    }

    #[test]
    fn chooses_cheapest() {
        let graph = ring(5);
        let path = find_path(&graph, WaypointId(0), WaypointId(3), false).unwrap();
        assert_eq!(ids(&path), vec![0, 2, 3]);
        assert_eq!(path.total_cost, 2);
        assert_eq!(path_cost(&graph, &path.nodes), Some(2));
    }

    #[test]
    fn equal_costs_prefer_smaller_id() {
        let graph = ring(1);
        let path = find_path(&graph, WaypointId(0), WaypointId(3), false).unwrap();
        assert_eq!(ids(&path), vec![0, 1, 3]);
        assert_eq!(path.total_cost, 2);
    }

    #[test]
    fn unknown_ends_have_no_path() {
        let graph = ring(1);
        assert!(find_path(&graph, WaypointId(0), WaypointId(9), false).is_none());
        assert!(find_path(&graph, WaypointId(9), WaypointId(0), false).is_none());
    }

    #[test]
    fn disconnected_goal_has_no_path() {
        let graph = graph_from(vec![vec![vec![0]], vec![vec![X]], vec![vec![1]]]);
        assert!(find_path(&graph, WaypointId(0), WaypointId(1), false).is_none());
    }

    #[test]
    fn cross_floor_detour_when_unrestricted() {
        let graph = two_floors();
        let path = find_path(&graph, WaypointId(0), WaypointId(1), false).unwrap();
        assert_eq!(ids(&path), vec![0, 2, 3, 1]);
        assert_eq!(path.total_cost, 3);
    }

    #[test]
    fn same_floor_restricts_whole_search() {
        let graph = two_floors();
        let path = find_path(&graph, WaypointId(0), WaypointId(1), true).unwrap();
        assert_eq!(ids(&path), vec![0, 1]);
        assert_eq!(path.total_cost, 50);
    }

    #[test]
    fn same_floor_rejects_cross_floor_goal() {
        let graph = two_floors();
        assert!(find_path(&graph, WaypointId(0), WaypointId(2), true).is_none());
        assert!(find_path(&graph, WaypointId(0), WaypointId(2), false).is_some());
    }

    #[test]
    fn deterministic() {
        let graph = ring(1);
        let a = find_path(&graph, WaypointId(3), WaypointId(0), false).unwrap();
        let b = find_path(&graph, WaypointId(3), WaypointId(0), false).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn path_cost_rejects_gaps() {
        let graph = ring(5);
        assert_eq!(path_cost(&graph, &[WaypointId(0), WaypointId(3)]), None);
        assert_eq!(path_cost(&graph, &[WaypointId(0)]), Some(0));
    }
}
