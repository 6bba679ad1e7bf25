use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use crate::error::{ConvergenceError, Result};
use crate::network::Topology;
use crate::protocol::{RouteEntry, RoutingTable};
use crate::{Cost, RouterId};

/// Shortest-path tree rooted at one router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPathTree {
    source: RouterId,
    distances: BTreeMap<RouterId, Cost>,
    previous: BTreeMap<RouterId, RouterId>,
    first_hops: BTreeMap<RouterId, RouterId>,
}

#[derive(Debug)]
struct State {
    cost: Cost,
    router: RouterId,
    first_hop: Option<RouterId>,
}

impl Eq for State {}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.router == other.router
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap, lower router id first on ties
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.router.cmp(&self.router))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra from `source` over `topology`.
///
/// Ties between equal-cost paths resolve deterministically: routers are
/// settled in (cost, id) order, neighbors are relaxed in id order, and a
/// known distance is only replaced by a strictly shorter one.
pub fn shortest_path_tree(topology: &Topology, source: &str) -> Result<ShortestPathTree> {
    if !topology.contains_router(source) {
        return Err(ConvergenceError::UnknownNode(source.to_string()));
    }

    let mut distances: BTreeMap<RouterId, Cost> = BTreeMap::new();
    let mut previous: BTreeMap<RouterId, RouterId> = BTreeMap::new();
    let mut first_hops: BTreeMap<RouterId, RouterId> = BTreeMap::new();
    let mut settled: BTreeSet<RouterId> = BTreeSet::new();
    let mut heap = BinaryHeap::new();

    distances.insert(source.to_string(), 0);
    heap.push(State {
        cost: 0,
        router: source.to_string(),
        first_hop: None,
    });

    while let Some(State {
        cost,
        router,
        first_hop,
    }) = heap.pop()
    {
        if !settled.insert(router.clone()) {
            continue;
        }
        if let Some(hop) = &first_hop {
            first_hops.insert(router.clone(), hop.clone());
        }

        for (neighbor, &link_cost) in topology.neighbors(&router).into_iter().flatten() {
            if settled.contains(neighbor) {
                continue;
            }

            let new_cost = cost.saturating_add(link_cost);
            let improves = distances
                .get(neighbor)
                .is_none_or(|&known| new_cost < known);

            if improves {
                distances.insert(neighbor.clone(), new_cost);
                previous.insert(neighbor.clone(), router.clone());
                heap.push(State {
                    cost: new_cost,
                    router: neighbor.clone(),
                    first_hop: Some(first_hop.clone().unwrap_or_else(|| neighbor.clone())),
                });
            }
        }
    }

    Ok(ShortestPathTree {
        source: source.to_string(),
        distances,
        previous,
        first_hops,
    })
}

/// Routing table of `source`: next hop and total cost to every reachable router.
pub fn compute_routing_table(topology: &Topology, source: &str) -> Result<RoutingTable> {
    Ok(shortest_path_tree(topology, source)?.routing_table())
}

impl ShortestPathTree {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn distance_to(&self, destination: &str) -> Option<Cost> {
        self.distances.get(destination).copied()
    }

    pub fn next_hop(&self, destination: &str) -> Option<&str> {
        self.first_hops.get(destination).map(String::as_str)
    }

    /// Routers reachable from the source, the source included.
    pub fn reachable(&self) -> impl Iterator<Item = &RouterId> {
        self.distances.keys()
    }

    /// The chosen path, `[source, .., destination]`.
    pub fn path_to(&self, destination: &str) -> Option<Vec<RouterId>> {
        self.distances.get(destination)?;

        let mut path = vec![destination.to_string()];
        let mut current = destination;
        while let Some(prev) = self.previous.get(current) {
            path.push(prev.clone());
            current = prev.as_str();
        }

        path.reverse();
        Some(path)
    }

    pub fn routing_table(&self) -> RoutingTable {
        let mut table = RoutingTable::new(self.source.clone());
        for (destination, next_hop) in &self.first_hops {
            if let Some(&cost) = self.distances.get(destination) {
                table.add_route(RouteEntry {
                    destination: destination.clone(),
                    next_hop: next_hop.clone(),
                    cost,
                });
            }
        }
        table
    }
}
