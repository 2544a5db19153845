// Per-frame navigation step for the indicator layer.
//
// The rendering loop hands over two inputs each frame: the waypoint whose
// marker is currently recognized (if any) and the destination the user has
// selected (if any). `guide()` turns them into a `Guidance` value: what to
// walk toward next and which way to point. The path is recomputed on every
// call; nothing about earlier frames is kept in the graph.
//
// `MarkerTracker` supplies the "current waypoint" input. Marker detection
// flickers, so a marker that was seen within the last `hold_ms`
// milliseconds keeps counting as current after it drops out of view.
//
// Neither piece ever fails: every problem is a `Guidance` variant the
// caller can show as text while it keeps rendering.

use crate::direction::{direction_hint, next_node, planar_yaw};
use crate::nav::RouteGraph;
use crate::pathfinding::find_path;
use crate::types::{Direction, WaypointId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default time a marker stays current after it was last seen.
pub const DEFAULT_MARKER_HOLD_MS: u64 = 700;

/// What the indicator layer should show this frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Guidance {
    /// No destination selected.
    NoDestination,
    /// A destination is set but no marker is currently recognized.
    AwaitingMarker,
    /// The recognized waypoint is the destination.
    Arrived { at: WaypointId },
    /// No route from the recognized waypoint to the destination.
    NoRoute { from: WaypointId, to: WaypointId },
    /// Walk toward `next`.
    Step {
        next: WaypointId,
        /// Ray direction of the edge, when it came from the grid.
        hint: Option<Direction>,
        /// Coordinate-derived heading, for when `hint` is `None` or the
        /// indicator wants a continuous angle. `None` for vertical moves.
        yaw: Option<f32>,
        /// Cost still ahead, including this step.
        remaining_cost: u64,
    },
}

/// Compute this frame's guidance from the recognized waypoint and the
/// selected destination.
pub fn guide(
    graph: &RouteGraph,
    current: Option<WaypointId>,
    goal: Option<WaypointId>,
    same_floor_only: bool,
) -> Guidance {
    let Some(goal) = goal else {
        return Guidance::NoDestination;
    };
    let Some(current) = current else {
        return Guidance::AwaitingMarker;
    };
    if current == goal {
        return Guidance::Arrived { at: goal };
    }

    let no_route = Guidance::NoRoute {
        from: current,
        to: goal,
    };
    let Some(path) = find_path(graph, current, goal, same_floor_only) else {
        return no_route;
    };
    let Some(next) = next_node(&path.nodes, current) else {
        return no_route;
    };

    Guidance::Step {
        next,
        hint: direction_hint(graph, current, next),
        yaw: planar_yaw(graph, current, next),
        remaining_cost: path.total_cost,
    }
}

/// Chooses the current waypoint from per-frame marker sightings.
#[derive(Clone, Debug)]
pub struct MarkerTracker {
    hold_ms: u64,
    /// Last frame timestamp at which each waypoint's marker was visible.
    last_seen: BTreeMap<WaypointId, u64>,
}

impl MarkerTracker {
    pub fn new(hold_ms: u64) -> Self {
        Self {
            hold_ms,
            last_seen: BTreeMap::new(),
        }
    }

    pub fn hold_ms(&self) -> u64 {
        self.hold_ms
    }

    /// Record the markers visible at `now_ms` and return the current
    /// waypoint.
    ///
    /// A visible marker always wins; with several visible, the largest id
    /// is chosen. With none visible, the most recently seen marker is kept
    /// while it is younger than `hold_ms` (ties go to the smaller id).
    pub fn observe(&mut self, visible: &[WaypointId], now_ms: u64) -> Option<WaypointId> {
        for &id in visible {
            self.last_seen.insert(id, now_ms);
        }
        if let Some(&id) = visible.iter().max() {
            return Some(id);
        }

        let mut best: Option<(WaypointId, u64)> = None;
        for (&id, &seen) in &self.last_seen {
            if now_ms.saturating_sub(seen) >= self.hold_ms {
                continue;
            }
            if best.is_none_or(|(_, best_seen)| seen > best_seen) {
                best = Some((id, seen));
            }
        }
        best.map(|(id, _)| id)
    }
}

impl Default for MarkerTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_HOLD_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{IMPASSABLE, RouteGrid};

    const X: i32 = IMPASSABLE;

    fn w(id: u32) -> WaypointId {
        WaypointId(id)
    }

    /// 0 -2- 1 -3- 2 along x, with 3 stacked above 2 behind a 4-cost shaft
    /// and 5 isolated behind a wall.
    fn corridor() -> RouteGraph {
        let columns = vec![
            vec![vec![0, X, X]],
            vec![vec![-2, X, X]],
            vec![vec![1, X, X]],
            vec![vec![-3, X, X]],
            vec![vec![2, -4, 3]],
            vec![vec![X, X, X]],
            vec![vec![5, X, X]],
        ];
        RouteGraph::from_grid(&RouteGrid::from_columns(&columns, X).unwrap())
    }

    #[test]
    fn missing_inputs() {
        let graph = corridor();
        assert_eq!(guide(&graph, Some(w(0)), None, false), Guidance::NoDestination);
        assert_eq!(guide(&graph, None, None, false), Guidance::NoDestination);
        assert_eq!(guide(&graph, None, Some(w(2)), false), Guidance::AwaitingMarker);
    }

    #[test]
    fn arrival() {
        let graph = corridor();
        assert_eq!(
            guide(&graph, Some(w(2)), Some(w(2)), true),
            Guidance::Arrived { at: w(2) }
        );
    }

    #[test]
    fn step_toward_goal() {
        let graph = corridor();
        match guide(&graph, Some(w(0)), Some(w(2)), false) {
            Guidance::Step {
                next,
                hint,
                yaw,
                remaining_cost,
            } => {
                assert_eq!(next, w(1));
                assert_eq!(hint, Some(Direction::East));
                assert!(yaw.is_some());
                assert_eq!(remaining_cost, 5);
            }
            other => panic!("expected a step, got {other:?}"),
        }
    }

    #[test]
    fn vertical_step_has_hint_but_no_yaw() {
        let graph = corridor();
        match guide(&graph, Some(w(2)), Some(w(3)), false) {
            Guidance::Step {
                next, hint, yaw, ..
            } => {
                assert_eq!(next, w(3));
                assert_eq!(hint, Some(Direction::Up));
                assert_eq!(yaw, None);
            }
            other => panic!("expected a step, got {other:?}"),
        }
    }

    #[test]
    fn patched_step_has_yaw_but_no_hint() {
        let mut graph = corridor();
        graph.connect(w(1), w(5), 9);
        match guide(&graph, Some(w(1)), Some(w(5)), false) {
            Guidance::Step { hint, yaw, .. } => {
                assert_eq!(hint, None);
                assert!(yaw.is_some());
            }
            other => panic!("expected a step, got {other:?}"),
        }
    }

    #[test]
    fn unreachable_and_cross_floor_goals() {
        let graph = corridor();
        assert_eq!(
            guide(&graph, Some(w(0)), Some(w(5)), false),
            Guidance::NoRoute {
                from: w(0),
                to: w(5)
            }
        );
        assert_eq!(
            guide(&graph, Some(w(0)), Some(w(3)), true),
            Guidance::NoRoute {
                from: w(0),
                to: w(3)
            }
        );
    }

    #[test]
    fn tracker_prefers_visible_markers() {
        let mut tracker = MarkerTracker::default();
        assert_eq!(tracker.observe(&[w(4), w(2)], 0), Some(w(4)));
        assert_eq!(tracker.observe(&[w(2)], 10), Some(w(2)));
    }

    #[test]
    fn tracker_holds_recent_marker() {
        let mut tracker = MarkerTracker::new(700);
        tracker.observe(&[w(3)], 1_000);
        tracker.observe(&[w(8)], 1_100);
        // 8 was seen most recently.
        assert_eq!(tracker.observe(&[], 1_500), Some(w(8)));
        // 699 ms after the last sighting it still holds.
        assert_eq!(tracker.observe(&[], 1_799), Some(w(8)));
        // At 700 ms it has expired, and so has 3.
        assert_eq!(tracker.observe(&[], 1_800), None);
    }

    #[test]
    fn tracker_hold_tie_goes_to_smaller_id() {
        let mut tracker = MarkerTracker::new(500);
        tracker.observe(&[w(6), w(2)], 100);
        assert_eq!(tracker.observe(&[], 200), Some(w(2)));
    }

    #[test]
    fn guidance_serializes() {
        let json = serde_json::to_string(&Guidance::Arrived { at: w(4) }).unwrap();
        assert_eq!(json, r#"{"Arrived":{"at":4}}"#);
    }
}
