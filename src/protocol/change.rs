use std::fmt;

use chrono::{DateTime, Utc};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{ConvergenceError, Result};
use crate::network::topology::validate_link;
use crate::network::{Link, Topology};
use crate::{Cost, MAX_LINK_COST, MIN_LINK_COST, RouterId};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    AddLink,
    RemoveLink,
    ReweightLink,
    /// One of the three above, picked uniformly.
    #[default]
    Random,
}

const CONCRETE_KINDS: [ChangeKind; 3] = [
    ChangeKind::AddLink,
    ChangeKind::RemoveLink,
    ChangeKind::ReweightLink,
];

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeKind::AddLink => "add-link",
            ChangeKind::RemoveLink => "remove-link",
            ChangeKind::ReweightLink => "reweight-link",
            ChangeKind::Random => "random",
        };
        f.write_str(name)
    }
}

/// What a change did to the topology. The last three variants leave it
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeRecord {
    LinkAdded(Link),
    LinkRemoved(Link),
    /// `link.cost` is the new cost.
    LinkReweighted { link: Link, old_cost: Cost },
    /// No candidate pair or link for the requested change.
    EmptyGraph { kind: ChangeKind },
    LinkAbsent { from: RouterId, to: RouterId },
    Unchanged(Link),
}

impl ChangeRecord {
    pub fn is_noop(&self) -> bool {
        matches!(
            self,
            ChangeRecord::EmptyGraph { .. }
                | ChangeRecord::LinkAbsent { .. }
                | ChangeRecord::Unchanged(_)
        )
    }
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeRecord::LinkAdded(link) => write!(f, "link added: {link}"),
            ChangeRecord::LinkRemoved(link) => write!(f, "link removed: {link}"),
            ChangeRecord::LinkReweighted { link, old_cost } => write!(
                f,
                "link reweighted: {} <-> {} (cost {} -> {})",
                link.from, link.to, old_cost, link.cost
            ),
            ChangeRecord::EmptyGraph { kind } => {
                let why = match kind {
                    ChangeKind::AddLink => "graph is complete",
                    _ => "graph has no links",
                };
                write!(f, "no eligible link for {kind}: {why}")
            }
            ChangeRecord::LinkAbsent { from, to } => write!(f, "no link between {from} and {to}"),
            ChangeRecord::Unchanged(link) => write!(f, "link unchanged: {link}"),
        }
    }
}

/// A new topology derived from an old one, plus what changed.
#[derive(Debug, Clone)]
pub struct TopologyChange {
    pub topology: Topology,
    pub record: ChangeRecord,
    pub at: DateTime<Utc>,
}

impl TopologyChange {
    fn new(topology: Topology, record: ChangeRecord) -> Self {
        if record.is_noop() {
            warn!("Topology unchanged: {}", record);
        } else {
            info!("Topology change: {}", record);
        }
        Self {
            topology,
            record,
            at: Utc::now(),
        }
    }

    /// Links `a` and `b` with `cost`.
    pub fn add_link(topology: &Topology, a: &str, b: &str, cost: Cost) -> Result<Self> {
        if let Some(existing) = topology.cost(a, b).filter(|&existing| existing == cost) {
            return Ok(Self::new(
                topology.clone(),
                ChangeRecord::Unchanged(Link::new(a, b, existing)),
            ));
        }

        let mut next = topology.clone();
        next.add_link(a, b, cost)?;
        Ok(Self::new(next, ChangeRecord::LinkAdded(Link::new(a, b, cost))))
    }

    /// Removes the link between `a` and `b`.
    pub fn remove_link(topology: &Topology, a: &str, b: &str) -> Result<Self> {
        ensure_routers(topology, a, b)?;

        let mut next = topology.clone();
        let record = match next.remove_link(a, b) {
            Some(cost) => ChangeRecord::LinkRemoved(Link::new(a, b, cost)),
            None => ChangeRecord::LinkAbsent {
                from: a.to_string(),
                to: b.to_string(),
            },
        };
        Ok(Self::new(next, record))
    }

    /// Gives the existing link between `a` and `b` a new cost.
    pub fn reweight_link(topology: &Topology, a: &str, b: &str, cost: Cost) -> Result<Self> {
        validate_link(a, b, cost)?;
        ensure_routers(topology, a, b)?;

        let record = match topology.cost(a, b) {
            None => ChangeRecord::LinkAbsent {
                from: a.to_string(),
                to: b.to_string(),
            },
            Some(old_cost) if old_cost == cost => ChangeRecord::Unchanged(Link::new(a, b, cost)),
            Some(old_cost) => {
                let mut next = topology.clone();
                next.set_link_cost(a, b, cost)?;
                return Ok(Self::new(
                    next,
                    ChangeRecord::LinkReweighted {
                        link: Link::new(a, b, cost),
                        old_cost,
                    },
                ));
            }
        };
        Ok(Self::new(topology.clone(), record))
    }
}

fn ensure_routers(topology: &Topology, a: &str, b: &str) -> Result<()> {
    for router in [a, b] {
        if !topology.contains_router(router) {
            return Err(ConvergenceError::UnknownNode(router.to_string()));
        }
    }
    Ok(())
}

/// Applies random topology events. The input topology is never modified;
/// each change returns a fresh copy.
#[derive(Debug, Clone)]
pub struct ChangeSimulator<R> {
    rng: R,
}

impl ChangeSimulator<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ChangeSimulator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn apply(&mut self, topology: &Topology, kind: ChangeKind) -> Result<TopologyChange> {
        match kind {
            ChangeKind::Random => {
                let concrete = CONCRETE_KINDS[self.rng.random_range(0..CONCRETE_KINDS.len())];
                self.apply(topology, concrete)
            }
            ChangeKind::AddLink => self.add_random_link(topology),
            ChangeKind::RemoveLink => self.remove_random_link(topology),
            ChangeKind::ReweightLink => self.reweight_random_link(topology),
        }
    }

    fn add_random_link(&mut self, topology: &Topology) -> Result<TopologyChange> {
        let candidates = topology.absent_links();
        let Some((a, b)) = candidates.choose(&mut self.rng) else {
            return Ok(empty_graph(topology, ChangeKind::AddLink));
        };
        let cost = self.rng.random_range(MIN_LINK_COST..=MAX_LINK_COST);
        TopologyChange::add_link(topology, a, b, cost)
    }

    fn remove_random_link(&mut self, topology: &Topology) -> Result<TopologyChange> {
        let links = topology.links();
        let Some(link) = links.choose(&mut self.rng) else {
            return Ok(empty_graph(topology, ChangeKind::RemoveLink));
        };
        TopologyChange::remove_link(topology, &link.from, &link.to)
    }

    fn reweight_random_link(&mut self, topology: &Topology) -> Result<TopologyChange> {
        let links = topology.links();
        let Some(link) = links.choose(&mut self.rng) else {
            return Ok(empty_graph(topology, ChangeKind::ReweightLink));
        };
        let cost = self.different_cost(link.cost);
        TopologyChange::reweight_link(topology, &link.from, &link.to, cost)
    }

    /// Uniform over the valid costs other than `current`.
    fn different_cost(&mut self, current: Cost) -> Cost {
        if !(MIN_LINK_COST..=MAX_LINK_COST).contains(&current) {
            return self.rng.random_range(MIN_LINK_COST..=MAX_LINK_COST);
        }
        let drawn = self.rng.random_range(MIN_LINK_COST..MAX_LINK_COST);
        if drawn >= current { drawn + 1 } else { drawn }
    }
}

fn empty_graph(topology: &Topology, kind: ChangeKind) -> TopologyChange {
    TopologyChange::new(topology.clone(), ChangeRecord::EmptyGraph { kind })
}
