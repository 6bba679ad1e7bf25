use std::collections::BTreeMap;

use log::info;
use serde::{Deserialize, Serialize};

use super::LinkStateDatabase;
use crate::RouterId;
use crate::error::Result;
use crate::network::Topology;

/// Every router's LSA, as received by every other router after flooding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalLsaSet {
    databases: BTreeMap<RouterId, LinkStateDatabase>,
}

impl GlobalLsaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an LSA, replacing any earlier one from the same router.
    pub fn insert(&mut self, lsdb: LinkStateDatabase) -> Option<LinkStateDatabase> {
        self.databases.insert(lsdb.router_id().to_string(), lsdb)
    }

    pub fn get(&self, router_id: &str) -> Option<&LinkStateDatabase> {
        self.databases.get(router_id)
    }

    pub fn routers(&self) -> impl Iterator<Item = &RouterId> {
        self.databases.keys()
    }

    /// LSAs in ascending router order.
    pub fn iter(&self) -> impl Iterator<Item = &LinkStateDatabase> {
        self.databases.values()
    }

    pub fn len(&self) -> usize {
        self.databases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }
}

impl FromIterator<LinkStateDatabase> for GlobalLsaSet {
    fn from_iter<I: IntoIterator<Item = LinkStateDatabase>>(iter: I) -> Self {
        let mut set = Self::new();
        for lsdb in iter {
            set.insert(lsdb);
        }
        set
    }
}

/// Floods the LSA of each listed router in one synchronous, lossless round.
pub fn flood_routers<'a, I>(topology: &Topology, routers: I) -> Result<GlobalLsaSet>
where
    I: IntoIterator<Item = &'a str>,
{
    let lsas = routers
        .into_iter()
        .map(|router_id| LinkStateDatabase::originate(topology, router_id))
        .collect::<Result<GlobalLsaSet>>()?;

    let advertised: usize = lsas.iter().map(LinkStateDatabase::len).sum();
    info!(
        "Flooding complete: {} LSAs, {} advertised links",
        lsas.len(),
        advertised
    );
    Ok(lsas)
}

/// Floods the LSA of every router in `topology`.
pub fn flood(topology: &Topology) -> Result<GlobalLsaSet> {
    flood_routers(topology, topology.routers().map(String::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvergenceError;

    fn triangle() -> Topology {
        Topology::from_links(
            ["A", "B", "C"],
            [("A", "B", 1), ("B", "C", 2), ("A", "C", 5)],
        )
        .unwrap()
    }

    #[test]
    fn every_router_is_flooded() {
        let topology = triangle();
        let lsas = flood(&topology).unwrap();
        assert_eq!(lsas.len(), 3);
        for router in topology.routers() {
            let lsdb = lsas.get(router).unwrap();
            assert_eq!(lsdb.len(), topology.neighbors(router).unwrap().len());
        }
    }

    #[test]
    fn flooding_an_unknown_router_fails() {
        let topology = triangle();
        assert_eq!(
            flood_routers(&topology, ["A", "Q"]),
            Err(ConvergenceError::UnknownNode("Q".to_string()))
        );
    }

    #[test]
    fn later_lsa_replaces_earlier() {
        let mut lsas = GlobalLsaSet::new();
        lsas.insert(LinkStateDatabase::new("A").with_link("B", 1));
        let previous = lsas.insert(LinkStateDatabase::new("A").with_link("B", 4));
        assert_eq!(previous.unwrap().cost_to("B"), Some(1));
        assert_eq!(lsas.get("A").unwrap().cost_to("B"), Some(4));
    }
}
