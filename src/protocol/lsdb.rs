use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ConvergenceError, Result};
use crate::network::Topology;
use crate::{Cost, RouterId};

/// One router's view of its directly attached links: neighbor -> cost.
///
/// This is what a router advertises in its LSA. It is derived from the
/// topology each time and never maintained on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStateDatabase {
    router_id: RouterId,
    links: BTreeMap<RouterId, Cost>,
}

impl LinkStateDatabase {
    /// An empty advertisement for `router_id`.
    pub fn new(router_id: impl Into<RouterId>) -> Self {
        Self {
            router_id: router_id.into(),
            links: BTreeMap::new(),
        }
    }

    /// Collects the incident links of `router_id` from `topology`.
    pub fn originate(topology: &Topology, router_id: &str) -> Result<Self> {
        let links = topology
            .neighbors(router_id)
            .ok_or_else(|| ConvergenceError::UnknownNode(router_id.to_string()))?
            .clone();

        debug!("{} originates LSA with {} links", router_id, links.len());
        Ok(Self {
            router_id: router_id.to_string(),
            links,
        })
    }

    /// Adds an advertised link; used to build hand-written LSAs.
    pub fn with_link(mut self, neighbor: impl Into<RouterId>, cost: Cost) -> Self {
        self.links.insert(neighbor.into(), cost);
        self
    }

    pub fn router_id(&self) -> &str {
        &self.router_id
    }

    pub fn cost_to(&self, neighbor: &str) -> Option<Cost> {
        self.links.get(neighbor).copied()
    }

    pub fn links(&self) -> impl Iterator<Item = (&RouterId, Cost)> {
        self.links.iter().map(|(neighbor, &cost)| (neighbor, cost))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
