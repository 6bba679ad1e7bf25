mod common;

use common::graphs;
use linkstate_sim::{
    ChangeKind, ChangeRecord, ChangeSimulator, ConvergenceEngine, MAX_LINK_COST, MIN_LINK_COST,
    Topology,
};

fn routers(topology: &Topology) -> Vec<String> {
    topology.routers().cloned().collect()
}

#[test]
fn add_link_creates_one_new_link() {
    let mut simulator = ChangeSimulator::seeded(5);
    for seed in 0..30 {
        let topology = graphs::random(6, 0.3, seed);
        let change = simulator.apply(&topology, ChangeKind::AddLink).unwrap();

        assert_eq!(routers(&change.topology), routers(&topology));
        match &change.record {
            ChangeRecord::LinkAdded(link) => {
                assert_ne!(link.from, link.to);
                assert_eq!(topology.cost(&link.from, &link.to), None);
                assert_eq!(change.topology.cost(&link.from, &link.to), Some(link.cost));
                assert!((MIN_LINK_COST..=MAX_LINK_COST).contains(&link.cost));
                assert_eq!(change.topology.link_count(), topology.link_count() + 1);
            }
            ChangeRecord::EmptyGraph { .. } => {
                assert!(topology.absent_links().is_empty());
                assert_eq!(change.topology, topology);
            }
            other => panic!("unexpected record {other:?}"),
        }
    }
}

#[test]
fn remove_link_drops_exactly_one() {
    let mut simulator = ChangeSimulator::seeded(8);
    for seed in 0..30 {
        let topology = graphs::random(6, 0.5, seed);
        let change = simulator.apply(&topology, ChangeKind::RemoveLink).unwrap();

        assert_eq!(routers(&change.topology), routers(&topology));
        if topology.link_count() == 0 {
            assert!(change.record.is_noop());
            continue;
        }
        let ChangeRecord::LinkRemoved(link) = &change.record else {
            panic!("unexpected record {:?}", change.record);
        };
        assert_eq!(topology.cost(&link.from, &link.to), Some(link.cost));
        assert_eq!(change.topology.cost(&link.from, &link.to), None);
        assert_eq!(change.topology.link_count(), topology.link_count() - 1);
    }
}

#[test]
fn reweight_link_never_keeps_the_cost() {
    let mut simulator = ChangeSimulator::seeded(13);
    for seed in 0..30 {
        let topology = graphs::random(5, 0.6, seed);
        let change = simulator.apply(&topology, ChangeKind::ReweightLink).unwrap();

        assert_eq!(routers(&change.topology), routers(&topology));
        assert_eq!(change.topology.link_count(), topology.link_count());
        if let ChangeRecord::LinkReweighted { link, old_cost } = &change.record {
            assert_eq!(topology.cost(&link.from, &link.to), Some(*old_cost));
            assert_eq!(change.topology.cost(&link.from, &link.to), Some(link.cost));
            assert_ne!(link.cost, *old_cost);
        } else {
            assert_eq!(topology.link_count(), 0);
        }
    }
}

#[test]
fn random_changes_are_reproducible() {
    let topology = graphs::four_routers();
    let first: Vec<ChangeRecord> = {
        let mut simulator = ChangeSimulator::seeded(21);
        (0..60)
            .map(|_| simulator.apply(&topology, ChangeKind::Random).unwrap().record)
            .collect()
    };
    let second: Vec<ChangeRecord> = {
        let mut simulator = ChangeSimulator::seeded(21);
        (0..60)
            .map(|_| simulator.apply(&topology, ChangeKind::Random).unwrap().record)
            .collect()
    };
    assert_eq!(first, second);

    let kinds = |record: &ChangeRecord| match record {
        ChangeRecord::LinkAdded(_) => 0,
        ChangeRecord::LinkRemoved(_) => 1,
        ChangeRecord::LinkReweighted { .. } => 2,
        _ => 3,
    };
    let mut seen: Vec<i32> = first.iter().map(kinds).collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen, vec![0, 1, 2]);
}

#[test]
fn second_removal_on_single_link_is_a_noop() {
    let mut simulator = ChangeSimulator::seeded(0);
    let topology = graphs::single_link();

    let first = simulator.apply(&topology, ChangeKind::RemoveLink).unwrap();
    assert!(!first.record.is_noop());
    assert_eq!(first.topology.link_count(), 0);

    let second = simulator.apply(&first.topology, ChangeKind::RemoveLink).unwrap();
    assert_eq!(
        second.record,
        ChangeRecord::EmptyGraph {
            kind: ChangeKind::RemoveLink
        }
    );
    assert_eq!(second.topology, first.topology);
    assert_eq!(
        second.record.to_string(),
        "no eligible link for remove-link: graph has no links"
    );
}

#[test]
fn changed_topology_reconverges() {
    let engine = ConvergenceEngine::default();
    let topology = graphs::four_routers();
    let before = engine.run(&topology).unwrap();

    let change = ChangeSimulator::seeded(4)
        .apply(&topology, ChangeKind::ReweightLink)
        .unwrap();
    let after = engine.run(&change.topology).unwrap();

    assert!(after.fidelity_holds(&change.topology).unwrap());
    assert!(!after.fidelity_holds(&topology).unwrap());
    assert_eq!(before.routing_tables(), engine.run(&topology).unwrap().routing_tables());
}
