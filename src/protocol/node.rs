use log::debug;

use super::{GlobalLsaSet, LinkStateDatabase, RoutingTable, TopologyReconstructor};
use crate::algorithms::compute_routing_table;
use crate::error::Result;
use crate::network::Topology;

/// A router: its own LSA plus the routing table it currently believes in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterNode {
    lsdb: LinkStateDatabase,
    routing_table: RoutingTable,
}

impl RouterNode {
    /// Brings a router up on `topology`. Until it converges it only knows
    /// routes to its direct neighbors.
    pub fn new(topology: &Topology, router_id: &str) -> Result<Self> {
        Ok(Self::from_lsdb(LinkStateDatabase::originate(topology, router_id)?))
    }

    pub fn from_lsdb(lsdb: LinkStateDatabase) -> Self {
        let routing_table = RoutingTable::direct(&lsdb);
        Self {
            lsdb,
            routing_table,
        }
    }

    pub fn id(&self) -> &str {
        self.lsdb.router_id()
    }

    pub fn lsdb(&self) -> &LinkStateDatabase {
        &self.lsdb
    }

    pub fn routing_table(&self) -> &RoutingTable {
        &self.routing_table
    }

    /// Rebuilds this router's picture of the network from the flooded LSAs
    /// and replaces its routing table with the shortest-path one.
    pub fn converge(
        &mut self,
        lsas: &GlobalLsaSet,
        reconstructor: &TopologyReconstructor,
    ) -> Result<()> {
        let view = reconstructor.reconstruct(lsas)?;
        self.routing_table = compute_routing_table(&view, self.id())?;
        debug!(
            "{} converged: {} routes over {} routers",
            self.id(),
            self.routing_table.len(),
            view.router_count()
        );
        Ok(())
    }
}
