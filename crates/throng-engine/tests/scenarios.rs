use throng_core::{CellTag, ClassId};
use throng_engine::SimConfig;
use throng_test_utils::fixtures::{approach, contested_cell, corridor_swap, crowd};
use throng_test_utils::ScenarioBuilder;

#[test]
fn agent_steps_onto_adjacent_attractor() {
    let (mut sim, agent) = approach(false);
    let m = sim.step_sequential(100.0, 0.0).unwrap();
    assert_eq!(m.moves, 1);
    assert_eq!(sim.agent_position(agent), Some((4, 4)));
    assert_eq!(sim.cell_state(4, 3).unwrap(), CellTag::Empty);
    assert_eq!(sim.cell_state(4, 4).unwrap(), CellTag::Occupied);
}

#[test]
fn agent_leaves_through_door_on_attractor() {
    let (mut sim, agent) = approach(true);
    let m = sim.step_sequential(100.0, 0.0).unwrap();
    assert_eq!(m.arrivals, 1);
    assert_eq!(sim.agent_count(), 0);
    assert_eq!(sim.agent_position(agent), None);
    assert_eq!(sim.cell_state(4, 3).unwrap(), CellTag::Empty);
    assert_eq!(sim.cell_state(4, 4).unwrap(), CellTag::Door);
}

#[test]
fn parallel_arrival_is_deferred_to_end_of_epoch() {
    let (mut sim, _) = approach(true);
    let m = sim.step_parallel(100.0, 1.0, 0.0).unwrap();
    assert_eq!(m.arrivals, 1);
    assert_eq!(m.agent_count, 0);
    sim.grid().check_invariants().unwrap();
}

#[test]
fn exactly_one_of_two_contenders_enters() {
    for seed in 0..16 {
        let (mut sim, [a, b]) = contested_cell(seed);
        let m = sim.step_parallel(1000.0, 1.0, 0.0).unwrap();
        assert_eq!(m.contested_cells, 1);
        assert_eq!(m.moves, 1);
        assert_eq!(m.blocked_proposals, 1);

        let (winner, loser) = if sim.agent_position(a) == Some((2, 2)) {
            (a, b)
        } else {
            (b, a)
        };
        assert_eq!(sim.agent_position(winner), Some((2, 2)));
        assert_eq!(sim.agent_inertia(winner), Some(0));
        assert_eq!(sim.agent_inertia(loser), Some(1));
        let start = if loser == a { (1, 2) } else { (3, 2) };
        assert_eq!(sim.agent_position(loser), Some(start));
    }
}

#[test]
fn nobody_enters_a_contested_cell_when_mu_is_zero() {
    let (mut sim, [a, b]) = contested_cell(0);
    let m = sim.step_parallel(1000.0, 0.0, 0.0).unwrap();
    assert_eq!(m.moves, 0);
    assert_eq!(m.blocked_proposals, 2);
    assert_eq!(sim.agent_position(a), Some((1, 2)));
    assert_eq!(sim.agent_position(b), Some((3, 2)));
    assert_eq!(sim.agent_inertia(a), Some(1));
    assert_eq!(sim.agent_inertia(b), Some(1));
}

#[test]
fn facing_agents_exchange_places() {
    let (mut sim, [a, b]) = corridor_swap();
    let m = sim.step_parallel(1000.0, 1.0, 0.0).unwrap();
    assert_eq!(m.exchanges, 1);
    // The first agent stays before its neighbour asks to swap; the swap
    // supersedes that stay.
    assert_eq!(m.stays, 0);
    assert_eq!(m.moves, 0);
    assert_eq!(sim.agent_position(a), Some((4, 1)));
    assert_eq!(sim.agent_position(b), Some((3, 1)));
    assert_eq!(sim.occupant_class(4, 1).unwrap(), Some(ClassId(0)));
    assert_eq!(sim.occupant_class(3, 1).unwrap(), Some(ClassId(1)));
    assert_eq!(sim.agent_inertia(a), Some(0));
    assert_eq!(sim.agent_inertia(b), Some(0));
    sim.grid().check_invariants().unwrap();
}

#[test]
fn no_exchange_without_place_change() {
    let (mut sim, agents) = ScenarioBuilder::new(8, 3, 2)
        .attractor(1, 1, 1)
        .attractor(0, 6, 1)
        .agent(3, 1, 0)
        .agent(4, 1, 1)
        .build()
        .unwrap();
    let m = sim.step_parallel(1000.0, 1.0, 0.0).unwrap();
    assert_eq!(m.exchanges, 0);
    // Each retreats from the other or stays; nobody passes through.
    let xa = sim.agent_position(agents[0]).unwrap().0;
    let xb = sim.agent_position(agents[1]).unwrap().0;
    assert!(xa < xb);
}

#[test]
fn zero_diffusion_keeps_trail_empty() {
    let mut sim = crowd(16, 16, 2, 3, 0.3);
    for _ in 0..25 {
        sim.step_parallel(2.0, 0.5, 0.3).unwrap();
        sim.step_sequential(2.0, 0.3).unwrap();
    }
    assert!(sim.grid().trail().is_zero());
}

#[test]
fn moving_agents_lay_trail_when_diffusion_is_on() {
    let (mut sim, _) = ScenarioBuilder::new(5, 5, 1)
        .configure(|c| c.diffusion_coeff = 0.1)
        .attractor(0, 4, 4)
        .clear(4, 3)
        .clear(4, 4)
        .agent(4, 3, 0)
        .build()
        .unwrap();
    sim.step_sequential(100.0, 0.0).unwrap();
    // Deposit of 10 * 0.1 on the new cell, then one epoch of decay at
    // the default rate 1.1 * 0.1.
    let target = sim.grid().cell_id(4, 4).unwrap();
    let laid = sim.grid().trail().get(ClassId(0), target);
    assert!((laid - 0.89).abs() < 1e-12);
}

fn boxed_in_agent() -> (throng_engine::Simulation, throng_core::AgentId) {
    let (sim, agents) = ScenarioBuilder::new(5, 5, 1)
        .configure(|c| c.diffusion_coeff = 0.1)
        .attractor(0, 3, 1)
        .walls(&[(2, 1), (1, 2)])
        .agent(1, 1, 0)
        .build()
        .unwrap();
    (sim, agents[0])
}

#[test]
fn agent_without_free_neighbours_stays_and_gains_inertia() {
    let (mut sim, agent) = boxed_in_agent();
    let m = sim.step_sequential(1000.0, 0.0).unwrap();
    assert_eq!(m.stays, 1);
    assert_eq!(sim.agent_inertia(agent), Some(1));
    let m = sim.step_parallel(1000.0, 1.0, 0.0).unwrap();
    assert_eq!(m.stays, 1);
    assert_eq!(sim.agent_position(agent), Some((1, 1)));
    assert_eq!(sim.agent_inertia(agent), Some(2));
}

#[test]
fn held_up_agent_lays_no_trail_when_it_moves_on() {
    let (mut sim, agent) = boxed_in_agent();
    sim.step_sequential(1000.0, 0.0).unwrap();
    assert_eq!(sim.agent_inertia(agent), Some(1));

    sim.clear_cell(2, 1).unwrap();
    let m = sim.step_sequential(1000.0, 0.0).unwrap();
    assert_eq!(m.moves, 1);
    assert_eq!(sim.agent_position(agent), Some((2, 1)));
    assert_eq!(sim.agent_inertia(agent), Some(0));
    assert!(sim.grid().trail().is_zero());
}

#[test]
fn relocating_an_attractor_reroutes_the_crowd() {
    let (mut sim, agents) = ScenarioBuilder::new(9, 9, 1)
        .attractor(0, 7, 4)
        .agent(4, 4, 0)
        .build()
        .unwrap();
    sim.relocate_attractor(ClassId(0), 1, 4).unwrap();
    for _ in 0..3 {
        sim.step_sequential(1000.0, 0.0).unwrap();
    }
    assert_eq!(sim.agent_position(agents[0]), Some((2, 4)));
}

#[test]
fn standard_layout_spawns_agents_from_producers() {
    let mut sim = throng_engine::Simulation::new(SimConfig {
        production_prob: 1.0,
        change_class_prob: 0.0,
        ..SimConfig::new(15, 15, 2)
    })
    .unwrap();
    let m = sim.step_parallel(1.0, 0.5, 0.0).unwrap();
    assert_eq!(m.spawns, 9);
    assert_eq!(sim.agent_count(), 9);
    for id in sim.agent_ids() {
        assert!(sim.agent_class(id).unwrap().0 < 2);
    }
}
