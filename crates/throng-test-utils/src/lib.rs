//! Test utilities for Throng development.
//!
//! [`ScenarioBuilder`] assembles a small, hand-furnished
//! [`Simulation`] with all background randomness (spawning, class
//! changes) switched off, so that tests observe only the behaviour they
//! set up. [`fixtures`] holds the canonical scenarios built with it.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use throng_core::{AgentId, ClassId, SimError};
use throng_engine::{LayoutKind, SimConfig, Simulation};

/// Builder for hand-furnished test simulations.
///
/// Starts from a bordered grid without producers, spawning or
/// reclassification. Furniture is applied in the order it was added,
/// attractor relocations first.
pub struct ScenarioBuilder {
    config: SimConfig,
    attractors: Vec<(ClassId, i32, i32)>,
    furniture: Vec<Furniture>,
}

enum Furniture {
    Wall(i32, i32),
    Door(i32, i32),
    Clear(i32, i32),
    Agent(i32, i32, ClassId),
}

impl ScenarioBuilder {
    pub fn new(columns: u32, rows: u32, num_classes: u8) -> Self {
        Self {
            config: SimConfig {
                layout: LayoutKind::Bordered,
                producer_enabled: false,
                change_class_prob: 0.0,
                production_prob: 0.0,
                ..SimConfig::new(columns, rows, num_classes)
            },
            attractors: Vec::new(),
            furniture: Vec::new(),
        }
    }

    /// Adjust any configuration field before the simulation is built.
    pub fn configure(mut self, f: impl FnOnce(&mut SimConfig)) -> Self {
        f(&mut self.config);
        self
    }

    pub fn seed(self, seed: u64) -> Self {
        self.configure(|c| c.seed = seed)
    }

    pub fn exits(self) -> Self {
        self.configure(|c| c.exit_enabled = true)
    }

    pub fn attractor(mut self, class: u8, x: i32, y: i32) -> Self {
        self.attractors.push((ClassId(class), x, y));
        self
    }

    pub fn wall(mut self, x: i32, y: i32) -> Self {
        self.furniture.push(Furniture::Wall(x, y));
        self
    }

    pub fn walls(mut self, cells: &[(i32, i32)]) -> Self {
        self.furniture
            .extend(cells.iter().map(|&(x, y)| Furniture::Wall(x, y)));
        self
    }

    pub fn door(mut self, x: i32, y: i32) -> Self {
        self.furniture.push(Furniture::Door(x, y));
        self
    }

    pub fn clear(mut self, x: i32, y: i32) -> Self {
        self.furniture.push(Furniture::Clear(x, y));
        self
    }

    pub fn agent(mut self, x: i32, y: i32, class: u8) -> Self {
        self.furniture.push(Furniture::Agent(x, y, ClassId(class)));
        self
    }

    /// Build the simulation and return it with the ids of the agents in
    /// the order they were added.
    pub fn build(self) -> Result<(Simulation, Vec<AgentId>), SimError> {
        let mut sim = Simulation::new(self.config)?;
        for (class, x, y) in self.attractors {
            sim.relocate_attractor(class, x, y)?;
        }
        let mut agents = Vec::new();
        for item in self.furniture {
            match item {
                Furniture::Wall(x, y) => {
                    sim.place_wall(x, y)?;
                }
                Furniture::Door(x, y) => {
                    sim.place_door(x, y)?;
                }
                Furniture::Clear(x, y) => {
                    sim.clear_cell(x, y)?;
                }
                Furniture::Agent(x, y, class) => {
                    let id = sim.place_agent_with_class(x, y, class)?.ok_or_else(|| {
                        SimError::invalid(format!("fixture agent refused at ({x}, {y})"))
                    })?;
                    agents.push(id);
                }
            }
        }
        Ok((sim, agents))
    }
}
