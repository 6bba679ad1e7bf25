pub mod dijkstra;

pub use dijkstra::{ShortestPathTree, compute_routing_table, shortest_path_tree};
