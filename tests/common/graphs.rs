use linkstate_sim::Topology;
use linkstate_sim::network::generate_topology;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// A-B(1), B-C(2), A-C(5), C-D(1)
pub fn four_routers() -> Topology {
    Topology::from_links(
        ["A", "B", "C", "D"],
        [("A", "B", 1), ("B", "C", 2), ("A", "C", 5), ("C", "D", 1)],
    )
    .unwrap()
}

pub fn weighted_five() -> Topology {
    Topology::from_links(
        ["1", "2", "3", "4", "5"],
        [
            ("1", "2", 2),
            ("1", "3", 1),
            ("2", "3", 4),
            ("2", "4", 5),
            ("3", "4", 10),
            ("3", "5", 8),
            ("4", "5", 1),
        ],
    )
    .unwrap()
}

/// Two islands: {A, B, C} and {X, Y}.
pub fn split_network() -> Topology {
    Topology::from_links(
        ["A", "B", "C", "X", "Y"],
        [("A", "B", 3), ("B", "C", 1), ("X", "Y", 2)],
    )
    .unwrap()
}

pub fn single_link() -> Topology {
    Topology::from_links(["A", "B"], [("A", "B", 6)]).unwrap()
}

pub fn random(node_count: usize, probability: f64, seed: u64) -> Topology {
    generate_topology(node_count, probability, &mut StdRng::seed_from_u64(seed)).unwrap()
}
