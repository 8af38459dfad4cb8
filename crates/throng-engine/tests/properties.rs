use std::collections::HashSet;

use proptest::prelude::*;
use throng_engine::{SimConfig, Simulation};
use throng_grid::TRAIL_MAX;
use throng_test_utils::ScenarioBuilder;

fn exit_crowd(seed: u64, classes: u8, change_place: f64, diffusion: f64) -> Simulation {
    let mut sim = Simulation::new(SimConfig {
        seed,
        exit_enabled: true,
        change_place_prob: change_place,
        diffusion_coeff: diffusion,
        production_prob: 0.2,
        change_class_prob: 0.05,
        ..SimConfig::new(14, 14, classes)
    })
    .unwrap();
    sim.random_setup(0.35, 0.03).unwrap();
    sim
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn agent_count_changes_only_by_spawns_and_arrivals(
        seed in any::<u64>(),
        classes in 1u8..4,
        change_place in 0.0f64..=1.0,
        eta in 0.0f64..20.0,
        mu in 0.0f64..=1.0,
        parallel in any::<bool>(),
    ) {
        let mut sim = exit_crowd(seed, classes, change_place, 0.0);
        for _ in 0..8 {
            let before = sim.agent_count();
            let m = if parallel {
                sim.step_parallel(eta, mu, 0.5).unwrap()
            } else {
                sim.step_sequential(eta, 0.5).unwrap()
            };
            prop_assert_eq!(
                sim.agent_count(),
                before + m.spawns as usize - m.arrivals as usize
            );
            prop_assert_eq!(m.agent_count, sim.agent_count());
        }
    }

    #[test]
    fn parallel_step_never_stacks_agents(
        seed in any::<u64>(),
        change_place in 0.0f64..=1.0,
        eta in 0.0f64..50.0,
        mu in 0.0f64..=1.0,
        nu in 0.0f64..2.0,
    ) {
        let (mut sim, _) = ScenarioBuilder::new(12, 12, 3)
            .seed(seed)
            .configure(|c| c.change_place_prob = change_place)
            .attractor(1, 2, 2)
            .build()
            .unwrap();
        sim.random_setup(0.5, 0.05).unwrap();
        for _ in 0..6 {
            let before = sim.agent_count();
            let m = sim.step_parallel(eta, mu, nu).unwrap();
            sim.grid().check_invariants().unwrap();
            let ids = sim.agent_ids();
            let cells: HashSet<_> = ids
                .iter()
                .filter_map(|&id| sim.agent_position(id))
                .collect();
            prop_assert_eq!(cells.len(), ids.len());
            prop_assert_eq!(ids.len(), before);
            prop_assert!(m.moves + m.exchanges * 2 <= before as u32);
        }
    }

    #[test]
    fn trail_stays_within_bounds(
        seed in any::<u64>(),
        diffusion in 0.01f64..1.0,
        decay in 0.0f64..1.0,
        eta in 0.0f64..10.0,
    ) {
        let mut sim = Simulation::new(SimConfig {
            seed,
            diffusion_coeff: diffusion,
            decay_rate: decay,
            production_prob: 0.3,
            ..SimConfig::new(12, 12, 2)
        })
        .unwrap();
        sim.random_setup(0.4, 0.0).unwrap();
        for _ in 0..10 {
            sim.step_parallel(eta, 0.5, 0.2).unwrap();
            for k in 0..2 {
                let layer = sim.grid().trail().layer(throng_core::ClassId(k));
                prop_assert!(layer.iter().all(|v| (0.0..=TRAIL_MAX).contains(v)));
            }
        }
    }
}
