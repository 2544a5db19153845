// wayfind_route: indoor, multi-floor route engine.
//
// Given the waypoint a visitor's camera currently recognizes and the
// destination they picked, this crate answers which waypoint to walk toward
// next and which way to point an on-site indicator. Camera capture, marker
// recognition, and rendering live outside; this crate only sees waypoint ids
// going in and `Guidance` coming out.
//
// Module overview:
// - `types.rs`:       GridCoord, WaypointId, the six ray `Direction`s.
// - `grid.rs`:        RouteGrid, the static 3D cost grid and cell classification.
// - `nav.rs`:         RouteGraph + ray-march graph construction + waypoint metadata.
// - `patch.rs`:       GraphPatch, manual edge additions/removals, applied once.
// - `pathfinding.rs`: Dijkstra with optional same-floor restriction.
// - `direction.rs`:   next_node / direction_hint / planar_yaw fallback.
// - `guidance.rs`:    Per-frame Guidance and the MarkerTracker hold window.
// - `config.rs`:      MapConfig (JSON) + load_route_graph(), the build entry point.
// - `error.rs`:       GridError / MapError for construction failures.
//
// The graph is built once and then only read: every query takes
// `&RouteGraph`, so any number of callers can share one graph without
// locking. Queries report failure as `None`, never as a panic or `Err`.

pub mod config;
pub mod direction;
pub mod error;
pub mod grid;
pub mod guidance;
pub mod nav;
pub mod pathfinding;
pub mod patch;
pub mod types;

pub use config::{MapConfig, NavigationSettings, load_route_graph};
pub use direction::{direction_hint, next_node, planar_yaw};
pub use error::{GridError, MapError};
pub use grid::{Cell, IMPASSABLE, RouteGrid};
pub use guidance::{Guidance, MarkerTracker, guide};
pub use nav::{RouteEdge, RouteGraph, Waypoint, WaypointMeta, build_route_graph};
pub use pathfinding::{RoutePath, find_path, path_cost};
pub use patch::GraphPatch;
pub use types::{Direction, GridCoord, WaypointId};
