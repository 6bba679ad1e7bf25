pub mod generator;
pub mod topology;

pub use generator::{generate_topology, router_name};
pub use topology::{Link, Topology};
