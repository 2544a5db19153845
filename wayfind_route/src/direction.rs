// Turning a computed path into the next actionable step.
//
// `next_node()` finds the waypoint after the current one on a path, and
// `direction_hint()` reads the ray direction recorded on the edge between
// two waypoints. Patched edges carry no hint, so `planar_yaw()` provides
// the fallback the indicator layer uses instead: a heading derived from the
// two waypoints' grid coordinates.

use crate::nav::RouteGraph;
use crate::types::{Direction, WaypointId};

/// The waypoint right after `current` on `path`. `None` if `current` is not
/// on the path or is its last element (arrival).
pub fn next_node(path: &[WaypointId], current: WaypointId) -> Option<WaypointId> {
    let i = path.iter().position(|&id| id == current)?;
    path.get(i + 1).copied()
}

/// Direction hint of the edge `from -> to`. `None` if there is no such edge
/// or it was added by a patch.
pub fn direction_hint(graph: &RouteGraph, from: WaypointId, to: WaypointId) -> Option<Direction> {
    graph.edge(from, to).and_then(|e| e.hint)
}

/// Heading from `from` to `to` in the grid's horizontal plane, in radians.
///
/// Zero faces north (y - 1) and the angle grows counter-clockwise seen from
/// above, so east is -PI/2 and west is +PI/2. Returns `None` when either
/// waypoint is unknown or the two share x and y (a purely vertical move).
pub fn planar_yaw(graph: &RouteGraph, from: WaypointId, to: WaypointId) -> Option<f32> {
    let a = graph.waypoint(from)?.position;
    let b = graph.waypoint(to)?.position;
    let dx = (b.x - a.x) as f32;
    let dy = (b.y - a.y) as f32;
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    Some((-dx).atan2(-dy))
}
