use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::RouterId;
use crate::error::{ConvergenceError, Result};
use crate::network::Topology;
use crate::protocol::{
    ConflictPolicy, GlobalLsaSet, LinkStateDatabase, RouterNode, RoutingTable,
    TopologyReconstructor, flood, render_report,
};

/// Runs the full pipeline: flood every LSA, then let every router rebuild
/// the topology and compute its routing table.
///
/// Flooding finishes before any router starts computing, and no result is
/// exposed until every router is done.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvergenceEngine {
    reconstructor: TopologyReconstructor,
}

impl ConvergenceEngine {
    pub fn new(policy: ConflictPolicy) -> Self {
        Self {
            reconstructor: TopologyReconstructor::new(policy),
        }
    }

    pub fn reconstructor(&self) -> &TopologyReconstructor {
        &self.reconstructor
    }

    /// Computes every routing table on the calling thread.
    pub fn run(&self, topology: &Topology) -> Result<Convergence> {
        let run_id = Uuid::new_v4();
        let span = info_span!("convergence", %run_id, routers = topology.router_count());
        let _entered = span.enter();

        let lsas = Arc::new(flood(topology)?);
        let nodes = lsas
            .iter()
            .map(|lsdb| converge_node(lsdb.clone(), &lsas, &self.reconstructor))
            .collect::<Result<Vec<_>>>()?;

        Ok(self.finish(run_id, lsas, nodes))
    }

    /// Computes every routing table on the blocking pool, one task per
    /// router, all reading the same flooded LSA set.
    pub async fn run_parallel(&self, topology: &Topology) -> Result<Convergence> {
        let run_id = Uuid::new_v4();
        let span = info_span!("convergence", %run_id, routers = topology.router_count());

        async move {
            let lsas = Arc::new(flood(topology)?);

            let mut workers = JoinSet::new();
            for lsdb in lsas.iter() {
                let lsdb = lsdb.clone();
                let lsas = Arc::clone(&lsas);
                let reconstructor = self.reconstructor;
                workers.spawn_blocking(move || converge_node(lsdb, &lsas, &reconstructor));
            }

            let mut nodes = Vec::with_capacity(lsas.len());
            while let Some(joined) = workers.join_next().await {
                let node = joined.map_err(|e| ConvergenceError::WorkerFailed(e.to_string()))??;
                nodes.push(node);
            }

            Ok::<_, ConvergenceError>(self.finish(run_id, lsas, nodes))
        }
        .instrument(span)
        .await
    }

    fn finish(&self, run_id: Uuid, lsas: Arc<GlobalLsaSet>, nodes: Vec<RouterNode>) -> Convergence {
        let nodes: BTreeMap<RouterId, RouterNode> = nodes
            .into_iter()
            .map(|node| (node.id().to_string(), node))
            .collect();

        let routes: usize = nodes.values().map(|node| node.routing_table().len()).sum();
        info!("Converged {} routers, {} routes", nodes.len(), routes);

        Convergence {
            run_id,
            lsas,
            nodes,
            reconstructor: self.reconstructor,
        }
    }
}

fn converge_node(
    lsdb: LinkStateDatabase,
    lsas: &GlobalLsaSet,
    reconstructor: &TopologyReconstructor,
) -> Result<RouterNode> {
    let mut node = RouterNode::from_lsdb(lsdb);
    node.converge(lsas, reconstructor)?;
    debug!(router = node.id(), "routing table ready");
    Ok(node)
}

/// Outcome of one pipeline run over a topology snapshot.
#[derive(Debug, Clone)]
pub struct Convergence {
    run_id: Uuid,
    lsas: Arc<GlobalLsaSet>,
    nodes: BTreeMap<RouterId, RouterNode>,
    reconstructor: TopologyReconstructor,
}

impl Convergence {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn lsas(&self) -> &GlobalLsaSet {
        &self.lsas
    }

    pub fn node(&self, router_id: &str) -> Option<&RouterNode> {
        self.nodes.get(router_id)
    }

    pub fn table(&self, router_id: &str) -> Option<&RoutingTable> {
        self.node(router_id).map(RouterNode::routing_table)
    }

    /// Tables in ascending router order.
    pub fn tables(&self) -> impl Iterator<Item = &RoutingTable> {
        self.nodes.values().map(RouterNode::routing_table)
    }

    pub fn routing_tables(&self) -> BTreeMap<RouterId, RoutingTable> {
        self.nodes
            .iter()
            .map(|(id, node)| (id.clone(), node.routing_table().clone()))
            .collect()
    }

    /// The topology every router rebuilt from the flooded LSAs.
    pub fn reconstructed(&self) -> Result<Topology> {
        self.reconstructor.reconstruct(&self.lsas)
    }

    /// Whether flooding and reconstruction reproduced `topology` exactly.
    pub fn fidelity_holds(&self, topology: &Topology) -> Result<bool> {
        Ok(self.reconstructed()? == *topology)
    }

    /// Text report of every table, in router order.
    pub fn report(&self) -> String {
        render_report(self.tables())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.routing_tables())
    }
}
