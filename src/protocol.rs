pub mod change;
pub mod flooding;
pub mod lsdb;
pub mod node;
pub mod reconstruct;
pub mod routing_table;

pub use change::{ChangeKind, ChangeRecord, ChangeSimulator, TopologyChange};
pub use flooding::{GlobalLsaSet, flood, flood_routers};
pub use lsdb::LinkStateDatabase;
pub use node::RouterNode;
pub use reconstruct::{ConflictPolicy, TopologyReconstructor};
pub use routing_table::{REPORT_SEPARATOR, RouteEntry, RoutingTable, render_report};
