//! Canonical test scenarios.
//!
//! - [`approach`]: one agent one step away from its attractor.
//! - [`contested_cell`]: two agents whose only way forward is the same cell.
//! - [`corridor_swap`]: two agents of opposite classes face to face in a
//!   one-cell-wide corridor.
//! - [`crowd`]: a seeded random crowd for property tests.

use throng_core::AgentId;
use throng_engine::Simulation;

use crate::ScenarioBuilder;

/// 5x5 grid, attractor at the corner `(4, 4)`, one agent at `(4, 3)`.
///
/// With `door` the attractor cell is turned into a door and exits are
/// enabled; otherwise it is cleared to empty floor.
pub fn approach(door: bool) -> (Simulation, AgentId) {
    let builder = ScenarioBuilder::new(5, 5, 1)
        .attractor(0, 4, 4)
        .clear(4, 3)
        .agent(4, 3, 0);
    let builder = if door {
        builder.door(4, 4).exits()
    } else {
        builder.clear(4, 4)
    };
    let (sim, agents) = builder.build().expect("approach fixture");
    (sim, agents[0])
}

/// 5x5 grid, attractor at `(2, 3)`. Agents at `(1, 2)` and `(3, 2)` are
/// boxed in by walls so their only move is into `(2, 2)`.
pub fn contested_cell(seed: u64) -> (Simulation, [AgentId; 2]) {
    let (sim, agents) = ScenarioBuilder::new(5, 5, 1)
        .seed(seed)
        .attractor(0, 2, 3)
        .walls(&[(1, 1), (1, 3), (3, 1), (3, 3), (2, 1)])
        .agent(1, 2, 0)
        .agent(3, 2, 0)
        .build()
        .expect("contested fixture");
    (sim, [agents[0], agents[1]])
}

/// 8x3 grid: a corridor along row 1. Class 0 heads for `(6, 1)`, class 1
/// for `(1, 1)`. Agent 0 (class 0) stands at `(3, 1)`, agent 1 (class 1)
/// at `(4, 1)`. Place exchange always succeeds.
pub fn corridor_swap() -> (Simulation, [AgentId; 2]) {
    let (sim, agents) = ScenarioBuilder::new(8, 3, 2)
        .configure(|c| c.change_place_prob = 1.0)
        .attractor(1, 1, 1)
        .attractor(0, 6, 1)
        .agent(3, 1, 0)
        .agent(4, 1, 1)
        .build()
        .expect("corridor fixture");
    (sim, [agents[0], agents[1]])
}

/// `columns x rows` grid with a random crowd of `classes` classes.
pub fn crowd(columns: u32, rows: u32, classes: u8, seed: u64, density: f64) -> Simulation {
    let (mut sim, _) = ScenarioBuilder::new(columns, rows, classes)
        .seed(seed)
        .build()
        .expect("crowd fixture");
    sim.random_setup(density, 0.05).expect("crowd setup");
    sim
}
