// Manual connectivity corrections applied on top of the ray-marched graph.
//
// Axis-aligned ray marching misses some real connections (a corridor that
// bends, a doorway the grid cannot express) and finds some false ones. A map
// therefore carries a fixed list of `GraphPatch`es: undirected `Connect`s
// that add an edge both ways with a fixed cost and no direction hint, and
// undirected `Disconnect`s that drop both directions, optionally only when
// both endpoints sit on a given floor.
//
// The whole list is applied once per graph: `RouteGraph::apply_patches`
// checks and sets the graph's `patches_applied` flag. Each operation is also
// idempotent on its own, so `connect` never duplicates an edge and
// `disconnect` of a missing edge does nothing. Patches that name a waypoint
// absent from the grid are logged and skipped.
//
// See also: `nav.rs` for the graph being corrected, `config.rs` where the
// patch list is loaded as part of `MapConfig`.

use crate::nav::{RouteEdge, RouteGraph};
use crate::types::WaypointId;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// One manual correction to the route graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphPatch {
    /// Add `a <-> b` with the given cost, unless an edge to that target
    /// already exists on either side.
    Connect {
        a: WaypointId,
        b: WaypointId,
        cost: u32,
    },
    /// Remove `a <-> b`. With `floor: Some(f)`, only when both endpoints
    /// resolve to floor `f`.
    Disconnect {
        a: WaypointId,
        b: WaypointId,
        #[serde(default)]
        floor: Option<i32>,
    },
}

impl RouteGraph {
    /// Apply `patches` in order, unless a patch set was already applied to
    /// this graph. Returns whether anything was applied.
    pub fn apply_patches(&mut self, patches: &[GraphPatch]) -> bool {
        if self.patches_applied() {
            debug!("route graph already patched; skipping {} patches", patches.len());
            return false;
        }
        for patch in patches {
            match *patch {
                GraphPatch::Connect { a, b, cost } => self.connect(a, b, cost),
                GraphPatch::Disconnect { a, b, floor } => {
                    if let Some(floor) = floor {
                        let on_floor = |id| self.floor_of(id) == Some(floor);
                        if !(on_floor(a) && on_floor(b)) {
                            debug!("not disconnecting {a} <-> {b}: not both on floor {floor}");
                            continue;
                        }
                    }
                    self.disconnect(a, b);
                }
            }
        }
        self.mark_patched();
        true
    }

    /// Add an undirected, hint-less edge `a <-> b`. Each direction is only
    /// added if the source has no edge to that target yet.
    pub fn connect(&mut self, a: WaypointId, b: WaypointId, cost: u32) {
        let (Some(slot_a), Some(slot_b)) = (self.slot(a), self.slot(b)) else {
            warn!("patch connects {a} <-> {b}, but one end is not in the grid; skipping");
            return;
        };
        for (slot, to) in [(slot_a, b), (slot_b, a)] {
            let edges = self.edges_at_mut(slot);
            if !edges.iter().any(|e| e.to == to) {
                edges.push(RouteEdge {
                    to,
                    cost,
                    hint: None,
                });
            }
        }
    }

    /// Remove every edge `a -> b` and `b -> a`. Missing edges or unknown
    /// waypoints are not an error.
    pub fn disconnect(&mut self, a: WaypointId, b: WaypointId) {
        for (from, to) in [(a, b), (b, a)] {
            if let Some(slot) = self.slot(from) {
                self.edges_at_mut(slot).retain(|e| e.to != to);
            }
        }
    }
}
