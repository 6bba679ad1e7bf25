pub mod algorithms;
pub mod config;
pub mod convergence;
pub mod error;
pub mod network;
pub mod protocol;

pub use convergence::{Convergence, ConvergenceEngine};
pub use error::{ConvergenceError, LinkFault, Result};
pub use network::{Link, Topology};
pub use protocol::{
    ChangeKind, ChangeRecord, ChangeSimulator, ConflictPolicy, GlobalLsaSet, LinkStateDatabase,
    RouteEntry, RouterNode, RoutingTable, TopologyChange, TopologyReconstructor,
};

pub type RouterId = String;
pub type Cost = u32;

/// Lowest cost a generated or simulated link can carry.
pub const MIN_LINK_COST: Cost = 1;
/// Highest cost a generated or simulated link can carry.
pub const MAX_LINK_COST: Cost = 10;
