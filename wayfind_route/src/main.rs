// CLI entry point for querying a route map.
//
// Loads a map (the embedded campus map unless `--map` is given), builds the
// route graph once, and either lists the waypoints or prints the route
// between two of them with a per-step direction. Waypoints can be named by
// id or by marker name.
//
// Usage:
//   route [OPTIONS]
//     --map <FILE>          Map JSON (default: embedded campus map)
//     --from <WAYPOINT>     Start waypoint id or marker name
//     --to <WAYPOINT>       Destination waypoint id or marker name
//     --same-floor          Only route over the start's floor
//     --list                List waypoints and exit
//     --json                Print the route as JSON
//
// Set `RUST_LOG=debug` to see graph construction details.

use clap::Parser;
use wayfind_route::{
    MapConfig, RouteGraph, WaypointId, direction_hint, find_path, load_route_graph, planar_yaw,
};

#[derive(Parser, Debug)]
#[command(name = "route", about = "Query shortest routes on an indoor waypoint map")]
struct Args {
    /// Map JSON file. Defaults to the embedded campus map.
    #[arg(long)]
    map: Option<String>,

    /// Start waypoint, as an id or a marker name.
    #[arg(long)]
    from: Option<String>,

    /// Destination waypoint, as an id or a marker name.
    #[arg(long)]
    to: Option<String>,

    /// Only route over the start waypoint's floor.
    #[arg(long)]
    same_floor: bool,

    /// List all waypoints and exit.
    #[arg(long)]
    list: bool,

    /// Print the route as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.map {
        Some(path) => {
            let json = std::fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Failed to read {path}: {e}");
                std::process::exit(1);
            });
            MapConfig::from_json(&json).unwrap_or_else(|e| {
                eprintln!("Failed to parse {path}: {e}");
                std::process::exit(1);
            })
        }
        None => MapConfig::campus(),
    };

    let graph = load_route_graph(&config).unwrap_or_else(|e| {
        eprintln!("Invalid map: {e}");
        std::process::exit(1);
    });

    if args.list {
        print_waypoints(&graph);
        return;
    }

    let (Some(from), Some(to)) = (&args.from, &args.to) else {
        eprintln!("--from and --to are required unless --list is given");
        std::process::exit(1);
    };
    let start = resolve(&graph, from);
    let goal = resolve(&graph, to);
    let same_floor_only = args.same_floor || config.navigation.same_floor_only;

    let Some(path) = find_path(&graph, start, goal, same_floor_only) else {
        eprintln!("No route from {from} to {to}");
        std::process::exit(1);
    };

    if args.json {
        match serde_json::to_string_pretty(&path) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to serialize route: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    println!(
        "{} -> {}: {} hops, cost {}",
        label(&graph, start),
        label(&graph, goal),
        path.hops(),
        path.total_cost,
    );
    for pair in path.nodes.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let cost = graph.edge(a, b).map_or(0, |e| e.cost);
        let heading = match (direction_hint(&graph, a, b), planar_yaw(&graph, a, b)) {
            (Some(dir), _) => dir.to_string(),
            (None, Some(yaw)) => format!("heading {:.0} deg", yaw.to_degrees()),
            (None, None) => "direction unknown".to_string(),
        };
        println!("  {} -> {}  [{heading}, cost {cost}]", label(&graph, a), label(&graph, b));
    }
}

/// Resolve a CLI waypoint argument: a known id first, then a marker name.
fn resolve(graph: &RouteGraph, arg: &str) -> WaypointId {
    let by_id = arg
        .parse::<u32>()
        .ok()
        .map(WaypointId)
        .filter(|&id| graph.contains(id));
    by_id
        .or_else(|| graph.waypoint_for_marker(arg))
        .unwrap_or_else(|| {
            eprintln!("Unknown waypoint: {arg}");
            std::process::exit(1);
        })
}

fn label(graph: &RouteGraph, id: WaypointId) -> String {
    match graph.waypoint(id) {
        Some(w) => format!("{} ({id})", w.name),
        None => id.to_string(),
    }
}

fn print_waypoints(graph: &RouteGraph) {
    println!("{:>4}  {:>5}  {:<12}  {:<14}  name", "id", "floor", "grid", "marker");
    for w in graph.waypoints() {
        println!(
            "{:>4}  {:>5}  {:<12}  {:<14}  {}",
            w.id.0,
            w.floor,
            w.position.to_string(),
            w.marker.as_deref().unwrap_or("-"),
            w.name,
        );
    }
}
