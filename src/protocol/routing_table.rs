use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::LinkStateDatabase;
use crate::{Cost, RouterId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub destination: RouterId,
    pub next_hop: RouterId,
    pub cost: Cost,
}

/// Destination -> (next hop, total cost) for one owning router.
///
/// Never holds a route to the owner itself, and unreachable destinations
/// are simply absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingTable {
    owner: RouterId,
    entries: BTreeMap<RouterId, RouteEntry>,
}

impl RoutingTable {
    pub fn new(owner: impl Into<RouterId>) -> Self {
        Self {
            owner: owner.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Table a router holds before convergence: one route per attached
    /// neighbor, reached directly.
    pub fn direct(lsdb: &LinkStateDatabase) -> Self {
        let mut table = Self::new(lsdb.router_id());
        for (neighbor, cost) in lsdb.links() {
            table.add_route(RouteEntry {
                destination: neighbor.clone(),
                next_hop: neighbor.clone(),
                cost,
            });
        }
        table
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns `false` (and stores nothing) for a route to the owner.
    pub fn add_route(&mut self, entry: RouteEntry) -> bool {
        if entry.destination == self.owner {
            return false;
        }
        self.entries.insert(entry.destination.clone(), entry);
        true
    }

    pub fn get_route(&self, destination: &str) -> Option<&RouteEntry> {
        self.entries.get(destination)
    }

    pub fn next_hop(&self, destination: &str) -> Option<&str> {
        self.get_route(destination).map(|entry| entry.next_hop.as_str())
    }

    pub fn cost_to(&self, destination: &str) -> Option<Cost> {
        self.get_route(destination).map(|entry| entry.cost)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Routes in ascending destination order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.values()
    }
}

impl fmt::Display for RoutingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Routing table for {}:", self.owner)?;
        writeln!(f, "{:<13}{:<10}{}", "Destination", "Next hop", "Cost")?;
        for entry in self.iter() {
            writeln!(f, "{:<13}{:<10}{}", entry.destination, entry.next_hop, entry.cost)?;
        }
        Ok(())
    }
}

/// Separator printed between per-router tables.
pub const REPORT_SEPARATOR: &str = "----------------------------------------";

/// Renders several tables, each followed by [`REPORT_SEPARATOR`].
pub fn render_report<'a, I>(tables: I) -> String
where
    I: IntoIterator<Item = &'a RoutingTable>,
{
    let mut out = String::new();
    for table in tables {
        out.push_str(&table.to_string());
        out.push_str(REPORT_SEPARATOR);
        out.push('\n');
    }
    out
}
