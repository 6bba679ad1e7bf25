use linkstate_sim::{Cost, Topology};

/// Cheapest simple path from `source` to `destination`, found by trying
/// every path. Only usable on small graphs.
pub fn brute_force_distance(topology: &Topology, source: &str, destination: &str) -> Option<Cost> {
    let mut best = None;
    let mut visited = vec![source.to_string()];
    explore(topology, source, destination, 0, &mut visited, &mut best);
    best
}

fn explore(
    topology: &Topology,
    current: &str,
    destination: &str,
    cost: Cost,
    visited: &mut Vec<String>,
    best: &mut Option<Cost>,
) {
    if current == destination {
        *best = Some(best.map_or(cost, |known: Cost| known.min(cost)));
        return;
    }
    let Some(neighbors) = topology.neighbors(current) else {
        return;
    };
    for (neighbor, &link_cost) in neighbors {
        if visited.contains(neighbor) {
            continue;
        }
        visited.push(neighbor.clone());
        explore(topology, neighbor, destination, cost + link_cost, visited, best);
        visited.pop();
    }
}
