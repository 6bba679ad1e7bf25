use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConvergenceError, LinkFault, Result};
use crate::{Cost, RouterId};

/// An undirected link, reported with `from < to`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Link {
    pub from: RouterId,
    pub to: RouterId,
    pub cost: Cost,
}

impl Link {
    pub fn new(a: impl Into<RouterId>, b: impl Into<RouterId>, cost: Cost) -> Self {
        let (a, b) = (a.into(), b.into());
        let (from, to) = if a <= b { (a, b) } else { (b, a) };
        Self { from, to, cost }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {} (cost {})", self.from, self.to, self.cost)
    }
}

/// Undirected weighted graph of routers.
///
/// Adjacency is stored in both directions so `cost(u, v) == cost(v, u)`
/// always holds. Self-loops and zero costs are rejected on insertion, and
/// there is at most one link per unordered pair.
///
/// Serialized as a router list plus a link list; deserializing goes through
/// [`Topology::from_links`], so malformed input is refused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TopologyRepr", into = "TopologyRepr")]
pub struct Topology {
    adjacency: BTreeMap<RouterId, BTreeMap<RouterId, Cost>>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a topology from a router list and `(a, b, cost)` triples.
    ///
    /// Every link endpoint must appear in `routers`.
    pub fn from_links<R, L, S>(routers: R, links: L) -> Result<Self>
    where
        R: IntoIterator<Item = S>,
        L: IntoIterator<Item = (S, S, Cost)>,
        S: AsRef<str>,
    {
        let mut topology = Self::new();
        for router in routers {
            topology.add_router(router.as_ref());
        }
        for (a, b, cost) in links {
            topology.add_link(a.as_ref(), b.as_ref(), cost)?;
        }
        Ok(topology)
    }

    /// Returns `false` if the router was already present.
    pub fn add_router(&mut self, router_id: impl Into<RouterId>) -> bool {
        let router_id = router_id.into();
        if self.adjacency.contains_key(&router_id) {
            return false;
        }
        self.adjacency.insert(router_id, BTreeMap::new());
        true
    }

    /// Adds a link between two known routers.
    ///
    /// Re-adding an existing link with the same cost is a no-op; a different
    /// cost is refused with [`LinkFault::ConflictingCost`].
    pub fn add_link(&mut self, a: &str, b: &str, cost: Cost) -> Result<()> {
        validate_link(a, b, cost)?;
        self.ensure_router(a)?;
        self.ensure_router(b)?;

        match self.cost(a, b) {
            Some(existing) if existing == cost => Ok(()),
            Some(existing) => Err(ConvergenceError::invalid_link(
                a,
                b,
                LinkFault::ConflictingCost {
                    existing,
                    requested: cost,
                },
            )),
            None => {
                self.insert_symmetric(a, b, cost);
                Ok(())
            }
        }
    }

    /// Inserts or overwrites a link (last write wins), returning the previous cost.
    pub fn set_link_cost(&mut self, a: &str, b: &str, cost: Cost) -> Result<Option<Cost>> {
        validate_link(a, b, cost)?;
        self.ensure_router(a)?;
        self.ensure_router(b)?;

        let previous = self.cost(a, b);
        self.insert_symmetric(a, b, cost);
        Ok(previous)
    }

    /// Removes a link, returning its cost if it existed.
    pub fn remove_link(&mut self, a: &str, b: &str) -> Option<Cost> {
        let removed = self.adjacency.get_mut(a)?.remove(b);
        if let Some(peers) = self.adjacency.get_mut(b) {
            peers.remove(a);
        }
        removed
    }

    pub fn contains_router(&self, router_id: &str) -> bool {
        self.adjacency.contains_key(router_id)
    }

    pub fn routers(&self) -> impl Iterator<Item = &RouterId> {
        self.adjacency.keys()
    }

    pub fn router_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn link_count(&self) -> usize {
        self.adjacency.values().map(BTreeMap::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn cost(&self, a: &str, b: &str) -> Option<Cost> {
        self.adjacency.get(a)?.get(b).copied()
    }

    /// Directly attached routers of `router_id`, ordered by id.
    pub fn neighbors(&self, router_id: &str) -> Option<&BTreeMap<RouterId, Cost>> {
        self.adjacency.get(router_id)
    }

    /// Every link once, ordered by `(from, to)`.
    pub fn links(&self) -> Vec<Link> {
        self.adjacency
            .iter()
            .flat_map(|(from, peers)| {
                peers
                    .range::<str, _>((
                        std::ops::Bound::Excluded(from.as_str()),
                        std::ops::Bound::Unbounded,
                    ))
                    .map(move |(to, &cost)| Link {
                        from: from.clone(),
                        to: to.clone(),
                        cost,
                    })
            })
            .collect()
    }

    /// Unordered router pairs with no link between them, ordered by `(a, b)`.
    pub fn absent_links(&self) -> Vec<(RouterId, RouterId)> {
        let routers: Vec<&RouterId> = self.adjacency.keys().collect();
        let mut absent = Vec::new();
        for (i, a) in routers.iter().enumerate() {
            for b in &routers[i + 1..] {
                if self.cost(a, b).is_none() {
                    absent.push(((*a).clone(), (*b).clone()));
                }
            }
        }
        absent
    }

    fn ensure_router(&self, router_id: &str) -> Result<()> {
        if self.contains_router(router_id) {
            Ok(())
        } else {
            Err(ConvergenceError::UnknownNode(router_id.to_string()))
        }
    }

    fn insert_symmetric(&mut self, a: &str, b: &str, cost: Cost) {
        if let Some(peers) = self.adjacency.get_mut(a) {
            peers.insert(b.to_string(), cost);
        }
        if let Some(peers) = self.adjacency.get_mut(b) {
            peers.insert(a.to_string(), cost);
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TopologyRepr {
    routers: Vec<RouterId>,
    #[serde(default)]
    links: Vec<Link>,
}

impl From<Topology> for TopologyRepr {
    fn from(topology: Topology) -> Self {
        Self {
            links: topology.links(),
            routers: topology.adjacency.into_keys().collect(),
        }
    }
}

impl TryFrom<TopologyRepr> for Topology {
    type Error = ConvergenceError;

    fn try_from(repr: TopologyRepr) -> Result<Self> {
        Topology::from_links(
            repr.routers.iter().map(String::as_str),
            repr.links
                .iter()
                .map(|link| (link.from.as_str(), link.to.as_str(), link.cost)),
        )
    }
}

/// Structural checks shared by construction and reconstruction.
pub(crate) fn validate_link(a: &str, b: &str, cost: Cost) -> Result<()> {
    if a == b {
        return Err(ConvergenceError::invalid_link(a, b, LinkFault::SelfLoop));
    }
    if cost == 0 {
        return Err(ConvergenceError::invalid_link(
            a,
            b,
            LinkFault::NonPositiveCost,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Topology {
        Topology::from_links(
            ["A", "B", "C", "D"],
            [("A", "B", 1), ("B", "C", 2), ("C", "D", 3), ("D", "A", 4)],
        )
        .unwrap()
    }

    #[test]
    fn links_are_symmetric() {
        let topology = square();
        assert_eq!(topology.cost("A", "B"), Some(1));
        assert_eq!(topology.cost("B", "A"), Some(1));
        assert_eq!(topology.cost("A", "C"), None);
        assert_eq!(topology.link_count(), 4);
    }

    #[test]
    fn links_listed_once_in_order() {
        let links = square().links();
        assert_eq!(
            links,
            vec![
                Link::new("A", "B", 1),
                Link::new("A", "D", 4),
                Link::new("B", "C", 2),
                Link::new("C", "D", 3),
            ]
        );
    }

    #[test]
    fn rejects_self_loop_and_zero_cost() {
        let mut topology = square();
        assert_eq!(
            topology.add_link("A", "A", 1),
            Err(ConvergenceError::invalid_link("A", "A", LinkFault::SelfLoop))
        );
        assert_eq!(
            topology.add_link("A", "C", 0),
            Err(ConvergenceError::invalid_link(
                "A",
                "C",
                LinkFault::NonPositiveCost
            ))
        );
    }

    #[test]
    fn rejects_unknown_endpoint() {
        let mut topology = square();
        assert_eq!(
            topology.add_link("A", "Z", 2),
            Err(ConvergenceError::UnknownNode("Z".to_string()))
        );
    }

    #[test]
    fn duplicate_link_with_conflicting_cost_is_refused() {
        let mut topology = square();
        assert!(topology.add_link("B", "A", 1).is_ok());
        let err = topology.add_link("B", "A", 7).unwrap_err();
        assert!(matches!(
            err,
            ConvergenceError::InvalidLink {
                reason: LinkFault::ConflictingCost {
                    existing: 1,
                    requested: 7
                },
                ..
            }
        ));
    }

    #[test]
    fn set_link_cost_is_last_write_wins() {
        let mut topology = square();
        assert_eq!(topology.set_link_cost("C", "B", 9).unwrap(), Some(2));
        assert_eq!(topology.cost("B", "C"), Some(9));
        assert_eq!(topology.set_link_cost("A", "C", 5).unwrap(), None);
        assert_eq!(topology.link_count(), 5);
    }

    #[test]
    fn remove_link_drops_both_directions() {
        let mut topology = square();
        assert_eq!(topology.remove_link("D", "C"), Some(3));
        assert_eq!(topology.cost("C", "D"), None);
        assert_eq!(topology.remove_link("D", "C"), None);
        assert_eq!(topology.router_count(), 4);
    }

    #[test]
    fn absent_links_cover_missing_pairs() {
        assert_eq!(
            square().absent_links(),
            vec![
                ("A".to_string(), "C".to_string()),
                ("B".to_string(), "D".to_string())
            ]
        );
    }

    #[test]
    fn json_goes_through_validation() {
        let topology = square();
        let json = serde_json::to_string(&topology).unwrap();
        assert_eq!(serde_json::from_str::<Topology>(&json).unwrap(), topology);

        let zero_cost = r#"{"routers":["A","B"],"links":[{"from":"A","to":"B","cost":0}]}"#;
        assert!(serde_json::from_str::<Topology>(zero_cost).is_err());

        let self_loop = r#"{"routers":["A"],"links":[{"from":"A","to":"A","cost":3}]}"#;
        assert!(serde_json::from_str::<Topology>(self_loop).is_err());

        let unknown = r#"{"routers":["A"],"links":[{"from":"A","to":"B","cost":3}]}"#;
        assert!(serde_json::from_str::<Topology>(unknown).is_err());

        let raw_adjacency = r#"{"adjacency":{"A":{"B":3,"A":0},"B":{}}}"#;
        assert!(serde_json::from_str::<Topology>(raw_adjacency).is_err());
    }
}
