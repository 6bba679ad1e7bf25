use log::{debug, warn};
use rand::Rng;

use super::Topology;
use crate::error::Result;
use crate::{MAX_LINK_COST, MIN_LINK_COST, RouterId};

/// Name of the `index`-th generated router, zero-padded so that lexical
/// order matches numeric order within a topology of `node_count` routers.
pub fn router_name(index: usize, node_count: usize) -> RouterId {
    let width = node_count.saturating_sub(1).to_string().len();
    format!("R{index:0width$}")
}

/// Random G(n, p) topology: every unordered router pair is linked with
/// probability `connection_probability`, each link costing 1 to 10.
pub fn generate_topology<R: Rng + ?Sized>(
    node_count: usize,
    connection_probability: f64,
    rng: &mut R,
) -> Result<Topology> {
    let probability = if connection_probability.is_nan() {
        warn!("Connection probability is NaN, generating no links");
        0.0
    } else {
        connection_probability.clamp(0.0, 1.0)
    };
    let names: Vec<RouterId> = (0..node_count).map(|i| router_name(i, node_count)).collect();

    let mut topology = Topology::new();
    for name in &names {
        topology.add_router(name.clone());
    }

    for (i, a) in names.iter().enumerate() {
        for b in &names[i + 1..] {
            if rng.random_bool(probability) {
                let cost = rng.random_range(MIN_LINK_COST..=MAX_LINK_COST);
                topology.add_link(a, b, cost)?;
            }
        }
    }

    debug!(
        "Generated topology: {} routers, {} links (p = {})",
        topology.router_count(),
        topology.link_count(),
        probability
    );
    Ok(topology)
}
