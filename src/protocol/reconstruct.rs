use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::GlobalLsaSet;
use crate::Cost;
use crate::error::{ConvergenceError, LinkFault, Result};
use crate::network::Topology;
use crate::network::topology::validate_link;

/// What to do when the two ends of a link advertise different costs.
///
/// LSAs are folded in ascending router order, so `FirstSeen` keeps the
/// report of the lower router id.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    #[default]
    FirstSeen,
    MaxCost,
    Reject,
}

/// Rebuilds the whole topology from a flooded LSA set.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopologyReconstructor {
    policy: ConflictPolicy,
}

impl TopologyReconstructor {
    pub fn new(policy: ConflictPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Folds every `(router, neighbor, cost)` triple into a fresh graph.
    ///
    /// A neighbor that never sent its own LSA is still added as a router.
    pub fn reconstruct(&self, lsas: &GlobalLsaSet) -> Result<Topology> {
        let mut seed = Topology::new();
        for router in lsas.routers() {
            seed.add_router(router.clone());
        }

        let topology = lsas.iter().try_fold(seed, |mut topology, lsdb| {
            for (neighbor, cost) in lsdb.links() {
                self.merge_link(&mut topology, lsdb.router_id(), neighbor, cost)?;
            }
            Ok::<_, ConvergenceError>(topology)
        })?;

        debug!(
            "Reconstructed topology: {} routers, {} links",
            topology.router_count(),
            topology.link_count()
        );
        Ok(topology)
    }

    fn merge_link(&self, topology: &mut Topology, from: &str, to: &str, cost: Cost) -> Result<()> {
        validate_link(from, to, cost)?;
        topology.add_router(to);

        let Some(existing) = topology.cost(from, to) else {
            topology.set_link_cost(from, to, cost)?;
            return Ok(());
        };
        if existing == cost {
            return Ok(());
        }

        match self.policy {
            ConflictPolicy::FirstSeen => {
                warn!(
                    "Conflicting LSA for {} <-> {}: keeping cost {}, ignoring {}",
                    from, to, existing, cost
                );
            }
            ConflictPolicy::MaxCost => {
                let kept = existing.max(cost);
                warn!(
                    "Conflicting LSA for {} <-> {}: costs {} and {}, keeping {}",
                    from, to, existing, cost, kept
                );
                topology.set_link_cost(from, to, kept)?;
            }
            ConflictPolicy::Reject => {
                return Err(ConvergenceError::invalid_link(
                    from,
                    to,
                    LinkFault::ConflictingCost {
                        existing,
                        requested: cost,
                    },
                ));
            }
        }
        Ok(())
    }
}
