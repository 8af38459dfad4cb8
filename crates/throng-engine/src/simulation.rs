//! The epoch driver.
//!
//! [`Simulation`] owns the [`Grid`], the seeded RNG and the epoch
//! counter. Each epoch runs four phases:
//!
//! 1. **Decide**: every active agent samples a destination.
//! 2. **Resolve**: intents are granted (parallel policy only).
//! 3. **Field update**: the trail diffuses and decays.
//! 4. **Spawn / reclassify**: producers emit agents and agents may
//!    switch class.
//!
//! Agents that reach a door leave the roster only after the first two
//! phases, so ids stay valid throughout an epoch.
//!
//! # Ownership
//!
//! `Simulation` is [`Send`] but takes `&mut self` for every mutation, so
//! it can be moved to another thread but never manipulated from two at
//! once.

use std::fmt;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use throng_core::{AgentId, CellId, CellState, CellTag, ClassId, EpochId, SimError};
use throng_grid::{Agent, DensityPeak, Grid};
use tracing::{debug, trace, warn};

use crate::config::{check_coefficient, check_probability, SimConfig};
use crate::conflict::ConflictTable;
use crate::layout::build_grid;
use crate::metrics::EpochMetrics;
use crate::policy::{self, CandidateRules, Candidates, CostTerms, Weights};

// Compile-time assertion: Simulation is Send.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Simulation>();
    }
};

/// Outcome of one agent's parallel decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Decision {
    Stay,
    Exit,
    Enter(CellId),
    /// Swapped with a neighbour; `partner_stayed` when that neighbour had
    /// already been counted as staying this epoch.
    Exchanged { partner_stayed: bool },
}

/// A crowd simulation: grid, parameters, RNG and epoch counter.
pub struct Simulation {
    config: SimConfig,
    grid: Grid,
    rng: ChaCha8Rng,
    epoch: EpochId,
    decay: f64,
    scale: f64,
    last_metrics: EpochMetrics,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("columns", &self.config.columns)
            .field("rows", &self.config.rows)
            .field("num_classes", &self.config.num_classes)
            .field("agents", &self.grid.agent_count())
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Validate `config` and build the initial grid.
    ///
    /// Configuration problems surface as
    /// [`SimError::InvalidConfiguration`].
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let grid = build_grid(&config)?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let decay = config.effective_decay();
        let scale = policy::temperature_scale(config.columns, config.rows, config.size_exponent);
        debug!(
            columns = config.columns,
            rows = config.rows,
            classes = config.num_classes,
            seed = config.seed,
            "simulation created"
        );
        Ok(Self {
            config,
            grid,
            rng,
            epoch: EpochId::default(),
            decay,
            scale,
            last_metrics: EpochMetrics::default(),
        })
    }

    // ── Queries ─────────────────────────────────────────────────

    /// The configuration this simulation was built from.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Read-only view of the grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of completed epochs.
    pub fn epoch(&self) -> EpochId {
        self.epoch
    }

    /// Metrics of the most recent epoch.
    pub fn last_metrics(&self) -> &EpochMetrics {
        &self.last_metrics
    }

    /// Number of attractor classes.
    pub fn num_classes(&self) -> u8 {
        self.config.num_classes
    }

    /// Classification of the cell at `(x, y)`.
    pub fn cell_state(&self, x: i32, y: i32) -> Result<CellTag, SimError> {
        self.grid.cell_tag(x, y)
    }

    /// Class of the agent standing on `(x, y)`, if any.
    pub fn occupant_class(&self, x: i32, y: i32) -> Result<Option<ClassId>, SimError> {
        self.grid.occupant_class(x, y)
    }

    /// Density of the `window x window` square around `(x, y)`.
    pub fn local_density(&self, x: i32, y: i32, window: u32) -> Result<f64, SimError> {
        self.grid.local_density(x, y, window)
    }

    /// Highest window-7 density on the grid.
    pub fn max_density(&self) -> DensityPeak {
        self.grid.max_density()
    }

    /// Number of live agents.
    pub fn agent_count(&self) -> usize {
        self.grid.agent_count()
    }

    /// Ids of every live agent.
    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.grid.roster().ids()
    }

    /// Coordinates of `agent`, or `None` for an unknown or arrived agent.
    pub fn agent_position(&self, agent: AgentId) -> Option<(i32, i32)> {
        let cell = self.grid.agent(agent)?.cell()?;
        Some(self.grid.coords(cell))
    }

    /// Class of `agent`, or `None` for an unknown agent.
    pub fn agent_class(&self, agent: AgentId) -> Option<ClassId> {
        self.grid.agent(agent).map(|a| a.class())
    }

    /// Inertia of `agent`, or `None` for an unknown agent.
    pub fn agent_inertia(&self, agent: AgentId) -> Option<u32> {
        self.grid.agent(agent).map(|a| a.inertia())
    }

    // ── Mutators ────────────────────────────────────────────────

    /// Turn `(x, y)` into a wall, evicting any occupant.
    pub fn place_wall(&mut self, x: i32, y: i32) -> Result<Option<AgentId>, SimError> {
        self.grid.place_wall(x, y)
    }

    /// Turn `(x, y)` into a door, evicting any occupant.
    pub fn place_door(&mut self, x: i32, y: i32) -> Result<Option<AgentId>, SimError> {
        self.grid.place_door(x, y)
    }

    /// Turn `(x, y)` into a producer, evicting any occupant.
    pub fn place_producer(&mut self, x: i32, y: i32) -> Result<Option<AgentId>, SimError> {
        self.grid.place_producer(x, y)
    }

    /// Reset `(x, y)` to empty floor, evicting any occupant.
    pub fn clear_cell(&mut self, x: i32, y: i32) -> Result<Option<AgentId>, SimError> {
        self.grid.clear_cell(x, y)
    }

    /// Place an agent of a uniformly random class on `(x, y)`.
    ///
    /// Returns `Ok(None)` when the cell is neither empty nor a free
    /// producer.
    pub fn place_agent(&mut self, x: i32, y: i32) -> Result<Option<AgentId>, SimError> {
        let class = self.random_class();
        self.place_agent_with_class(x, y, class)
    }

    /// Place an agent of `class` on `(x, y)`.
    pub fn place_agent_with_class(
        &mut self,
        x: i32,
        y: i32,
        class: ClassId,
    ) -> Result<Option<AgentId>, SimError> {
        let placed = self.grid.place_agent(x, y, class)?;
        if placed.is_none() {
            warn!(x, y, "cell refused a new agent");
        }
        Ok(placed)
    }

    /// Move the attractor of `class` to `(x, y)`.
    pub fn relocate_attractor(&mut self, class: ClassId, x: i32, y: i32) -> Result<(), SimError> {
        self.grid.relocate_attractor(class, x, y)
    }

    /// Rebuild the obstacle gradient from the current walls.
    pub fn recompute_gradient(&mut self, coeff: f64, radius: u32) -> Result<(), SimError> {
        check_coefficient("gradient coeff", coeff)?;
        self.grid.recompute_gradient_field(coeff, radius)
    }

    /// Scatter agents and walls: for every cell, in row-major order,
    /// place an agent with `player_prob`, then a wall with `wall_prob`.
    pub fn random_setup(&mut self, player_prob: f64, wall_prob: f64) -> Result<(), SimError> {
        check_probability("player_prob", player_prob)?;
        check_probability("wall_prob", wall_prob)?;
        for y in 0..self.config.rows as i32 {
            for x in 0..self.config.columns as i32 {
                if self.rng.random::<f64>() < player_prob {
                    let class = self.random_class();
                    self.grid.place_agent(x, y, class)?;
                }
                if self.rng.random::<f64>() < wall_prob {
                    self.grid.place_wall(x, y)?;
                }
            }
        }
        debug!(agents = self.grid.agent_count(), "random setup done");
        Ok(())
    }

    /// Reassign every agent of `class` to a different, uniformly random
    /// class. Returns how many agents were retargeted.
    pub fn delete_class(&mut self, class: ClassId) -> Result<usize, SimError> {
        self.check_class(class)?;
        let n = self.config.num_classes;
        if n < 2 {
            return Err(SimError::invalid("cannot delete the only attractor class"));
        }
        let mut moved = 0;
        for id in self.grid.roster().ids() {
            if self.agent_class(id) != Some(class) {
                continue;
            }
            let mut other = self.rng.random_range(0..n - 1);
            if other >= class.0 {
                other += 1;
            }
            self.set_agent_class(id, ClassId(other))?;
            moved += 1;
        }
        debug!(class = class.0, moved, "deleted class");
        Ok(moved)
    }

    /// Let each agent join `class` with probability
    /// `1 / (num_classes + 1)`. Returns how many agents were drawn.
    pub fn open_class(&mut self, class: ClassId) -> Result<usize, SimError> {
        self.check_class(class)?;
        let p = 1.0 / (f64::from(self.config.num_classes) + 1.0);
        let mut joined = 0;
        for id in self.grid.roster().ids() {
            if self.rng.random::<f64>() < p {
                self.set_agent_class(id, class)?;
                joined += 1;
            }
        }
        debug!(class = class.0, joined, "opened class");
        Ok(joined)
    }

    // ── Epoch drivers ───────────────────────────────────────────

    /// Advance one epoch with the sequential policy.
    ///
    /// Agents decide in roster order and commit immediately, so later
    /// agents see earlier moves. Occupied cells are never candidates.
    pub fn step_sequential(&mut self, eta: f64, nu: f64) -> Result<EpochMetrics, SimError> {
        check_coefficient("eta", eta)?;
        check_coefficient("nu", nu)?;
        let start = Instant::now();
        let mut m = EpochMetrics {
            epoch: self.epoch,
            ..EpochMetrics::default()
        };
        let rules = CandidateRules {
            doors: self.config.exit_enabled,
            occupied: false,
        };
        let terms = self.cost_terms(nu);

        let decide_start = Instant::now();
        for id in self.grid.roster().ids() {
            let Some(here) = self.active_cell(id) else {
                continue;
            };
            let cands = policy::candidates(&self.grid, here, rules);
            let costs = self.floor_field_costs(id, &cands, terms)?;
            let target = cands[self.draw(&costs, eta)?];
            if target == here {
                self.stay(id)?;
                m.stays += 1;
            } else if self.grid.state(target) == CellState::Door {
                self.grid.mark_arrived(id)?;
                m.arrivals += 1;
            } else {
                self.commit_move(id, target)?;
                m.moves += 1;
            }
        }
        m.decide_us = decide_start.elapsed().as_micros() as u64;

        self.grid.remove_arrived();
        self.finish_epoch(m, start)
    }

    /// Advance one epoch with the parallel policy.
    ///
    /// Every agent decides against the same grid: moves into free cells
    /// are recorded as intents and granted afterwards. A cell proposed by
    /// several agents goes to one of them, chosen uniformly, with
    /// probability `mu`; otherwise nobody enters it.
    pub fn step_parallel(&mut self, eta: f64, mu: f64, nu: f64) -> Result<EpochMetrics, SimError> {
        check_coefficient("eta", eta)?;
        check_probability("mu", mu)?;
        check_coefficient("nu", nu)?;
        let start = Instant::now();
        let mut m = EpochMetrics {
            epoch: self.epoch,
            ..EpochMetrics::default()
        };
        let rules = CandidateRules {
            doors: self.config.exit_enabled,
            occupied: self.config.change_place_prob > 0.0,
        };
        let terms = self.cost_terms(nu);

        for agent in self.grid.agents_mut() {
            agent.set_wants_to_go(None);
        }

        // Decide
        let decide_start = Instant::now();
        let mut table = ConflictTable::new();
        for id in self.grid.roster().ids() {
            let Some(here) = self.active_cell(id) else {
                continue;
            };
            match self.decide_parallel(id, here, rules, terms, eta, &mut table)? {
                Decision::Stay => {
                    self.stay(id)?;
                    m.stays += 1;
                }
                Decision::Exit => {
                    self.grid.mark_arrived(id)?;
                    m.arrivals += 1;
                }
                Decision::Enter(cell) => table.propose(cell, id),
                Decision::Exchanged { partner_stayed } => {
                    m.exchanges += 1;
                    if partner_stayed {
                        m.stays = m.stays.saturating_sub(1);
                    }
                }
            }
        }
        m.decide_us = decide_start.elapsed().as_micros() as u64;

        // Resolve
        let resolve_start = Instant::now();
        for (cell, proposers) in table.drain() {
            let winner = match proposers.as_slice() {
                [only] => Some(*only),
                _ => {
                    m.contested_cells += 1;
                    if self.rng.random::<f64>() < mu {
                        Some(proposers[self.rng.random_range(0..proposers.len())])
                    } else {
                        None
                    }
                }
            };
            for &id in &proposers {
                if Some(id) == winner {
                    self.commit_move(id, cell)?;
                    m.moves += 1;
                } else {
                    self.stay(id)?;
                    m.stays += 1;
                    m.blocked_proposals += 1;
                }
            }
        }
        m.resolve_us = resolve_start.elapsed().as_micros() as u64;

        self.grid.remove_arrived();
        self.finish_epoch(m, start)
    }

    // ── Internals ───────────────────────────────────────────────

    /// One agent's parallel decision, including place negotiation.
    ///
    /// Drawing an occupied cell records it as the agent's wish. If the
    /// occupant wishes for this agent's cell, the two swap with
    /// probability `change_place_prob`; otherwise the cell is dropped
    /// from the candidates and the agent draws again. "Stay" is never
    /// dropped, so the loop ends.
    fn decide_parallel(
        &mut self,
        id: AgentId,
        here: CellId,
        rules: CandidateRules,
        terms: CostTerms,
        eta: f64,
        table: &mut ConflictTable,
    ) -> Result<Decision, SimError> {
        let class = self.agent_class(id).ok_or_else(|| missing(id))?;
        let rival = if self.config.cross_class_repulsion {
            policy::rival_class(&self.grid, here, class)
        } else {
            None
        };
        let mut cands = policy::candidates(&self.grid, here, rules);
        loop {
            let costs = match rival {
                Some(rival) => policy::repulsion_costs(&self.grid, class, rival, &cands),
                None => self.floor_field_costs(id, &cands, terms)?,
            };
            let idx = self.draw(&costs, eta)?;
            let target = cands[idx];
            if target == here {
                return Ok(Decision::Stay);
            }
            match self.grid.state(target) {
                CellState::Door => return Ok(Decision::Exit),
                CellState::Occupied(other) => {
                    self.agent_mut(id)?.set_wants_to_go(Some(target));
                    let mutual =
                        self.grid.agent(other).and_then(|a| a.wants_to_go()) == Some(here);
                    if mutual && self.rng.random::<f64>() < self.config.change_place_prob {
                        let partner_stayed = self.exchange(id, other, table)?;
                        return Ok(Decision::Exchanged { partner_stayed });
                    }
                    cands.remove(idx);
                }
                _ => return Ok(Decision::Enter(target)),
            }
        }
    }

    /// Swap `a` with `b`, which has already decided this epoch. Returns
    /// whether `b` had decided to stay rather than to enter a cell.
    fn exchange(
        &mut self,
        a: AgentId,
        b: AgentId,
        table: &mut ConflictTable,
    ) -> Result<bool, SimError> {
        let withdrawn = table.withdraw(b);
        if let Some(cell) = withdrawn {
            trace!(agent = b.0, cell = cell.0, "withdrew intent for exchange");
        }
        self.grid.exchange(a, b)?;
        for id in [a, b] {
            let agent = self.agent_mut(id)?;
            agent.set_wants_to_go(None);
            agent.reset_inertia();
        }
        Ok(withdrawn.is_none())
    }

    /// Move into a free cell, laying trail if the agent was not held up.
    fn commit_move(&mut self, id: AgentId, target: CellId) -> Result<(), SimError> {
        let agent = self.agent_mut(id)?;
        let was_moving = agent.inertia() == 0;
        let class = agent.class();
        agent.reset_inertia();
        self.grid.move_agent(id, target)?;
        if self.config.diffusion_enabled() && was_moving {
            let amount = self.config.trail_deposit();
            self.grid.trail_mut().deposit(class, target, amount);
        }
        Ok(())
    }

    fn stay(&mut self, id: AgentId) -> Result<(), SimError> {
        self.agent_mut(id)?.bump_inertia();
        Ok(())
    }

    /// Field update, spawning and reclassification, then bookkeeping.
    fn finish_epoch(
        &mut self,
        mut m: EpochMetrics,
        start: Instant,
    ) -> Result<EpochMetrics, SimError> {
        let field_start = Instant::now();
        if self.config.diffusion_enabled() {
            self.grid
                .trail_mut()
                .diffuse(self.config.diffusion_coeff, self.decay);
        }
        m.field_update_us = field_start.elapsed().as_micros() as u64;

        let spawn_start = Instant::now();
        m.spawns = self.spawn_at_producers()?;
        m.reclassifications = self.reclassify()?;
        m.spawn_us = spawn_start.elapsed().as_micros() as u64;

        self.epoch = EpochId(self.epoch.0 + 1);
        m.agent_count = self.grid.agent_count();
        m.total_us = start.elapsed().as_micros() as u64;
        debug!(
            epoch = m.epoch.0,
            agents = m.agent_count,
            moves = m.moves,
            exchanges = m.exchanges,
            arrivals = m.arrivals,
            contested = m.contested_cells,
            spawns = m.spawns,
            total_us = m.total_us,
            "epoch complete"
        );
        self.last_metrics = m.clone();
        Ok(m)
    }

    fn spawn_at_producers(&mut self) -> Result<u32, SimError> {
        let mut spawned = 0;
        for cell in self.grid.producers().to_vec() {
            if self.rng.random::<f64>() >= self.config.production_prob {
                continue;
            }
            let class = self.random_class();
            if self.grid.spawn(cell, class)?.is_some() {
                spawned += 1;
            }
        }
        Ok(spawned)
    }

    fn reclassify(&mut self) -> Result<u32, SimError> {
        if self.config.change_class_prob == 0.0 {
            return Ok(0);
        }
        let mut changed = 0;
        for id in self.grid.roster().ids() {
            if self.rng.random::<f64>() < self.config.change_class_prob {
                let class = self.random_class();
                self.set_agent_class(id, class)?;
                changed += 1;
            }
        }
        Ok(changed)
    }

    fn floor_field_costs(
        &self,
        id: AgentId,
        cands: &Candidates,
        terms: CostTerms,
    ) -> Result<Weights, SimError> {
        let agent = self.grid.agent(id).ok_or_else(|| missing(id))?;
        Ok(policy::floor_field_costs(&self.grid, agent, cands, terms))
    }

    fn draw(&mut self, costs: &[f64], eta: f64) -> Result<usize, SimError> {
        let weights = policy::selection_weights(costs, eta, self.scale)?;
        policy::sample_index(&weights, &mut self.rng)
    }

    fn cost_terms(&self, nu: f64) -> CostTerms {
        CostTerms {
            trail_weight: if self.config.diffusion_enabled() {
                self.config.trail_weight
            } else {
                0.0
            },
            nu,
        }
    }

    fn active_cell(&self, id: AgentId) -> Option<CellId> {
        self.grid
            .agent(id)
            .filter(|a| !a.is_arrived())
            .and_then(|a| a.cell())
    }

    fn random_class(&mut self) -> ClassId {
        ClassId(self.rng.random_range(0..self.config.num_classes))
    }

    fn set_agent_class(&mut self, id: AgentId, class: ClassId) -> Result<(), SimError> {
        self.agent_mut(id)?.set_class(class);
        Ok(())
    }

    fn agent_mut(&mut self, id: AgentId) -> Result<&mut Agent, SimError> {
        self.grid.agent_mut(id).ok_or_else(|| missing(id))
    }

    fn check_class(&self, class: ClassId) -> Result<(), SimError> {
        if class.0 >= self.config.num_classes {
            return Err(SimError::invalid(format!(
                "class {class} out of range for {} classes",
                self.config.num_classes
            )));
        }
        Ok(())
    }
}

fn missing(id: AgentId) -> SimError {
    SimError::invariant(format!("agent {id} is not in the roster"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutKind;

    fn bordered(columns: u32, rows: u32, classes: u8) -> SimConfig {
        SimConfig {
            layout: LayoutKind::Bordered,
            producer_enabled: false,
            change_class_prob: 0.0,
            ..SimConfig::new(columns, rows, classes)
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = Simulation::new(SimConfig::new(2, 2, 1)).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration { .. }));
    }

    #[test]
    fn random_classes_stay_in_range() {
        let mut sim = Simulation::new(bordered(10, 10, 3)).unwrap();
        for x in 1..9 {
            let id = sim.place_agent(x, 3).unwrap().unwrap();
            assert!(sim.agent_class(id).unwrap().0 < 3);
        }
        assert_eq!(sim.agent_count(), 8);
    }

    #[test]
    fn refused_placement_returns_none() {
        let mut sim = Simulation::new(bordered(6, 6, 1)).unwrap();
        assert_eq!(sim.place_agent(0, 0).unwrap(), None);
        assert!(matches!(
            sim.place_agent(6, 0),
            Err(SimError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn epochs_are_counted_and_metrics_kept() {
        let mut sim = Simulation::new(bordered(6, 6, 1)).unwrap();
        sim.place_agent(1, 1).unwrap();
        let m0 = sim.step_sequential(1.0, 0.5).unwrap();
        let m1 = sim.step_parallel(1.0, 0.5, 0.5).unwrap();
        assert_eq!(m0.epoch, EpochId(0));
        assert_eq!(m1.epoch, EpochId(1));
        assert_eq!(sim.epoch(), EpochId(2));
        assert_eq!(sim.last_metrics(), &m1);
        assert_eq!(m1.moves + m1.stays, 1);
    }

    #[test]
    fn driver_parameters_are_checked() {
        let mut sim = Simulation::new(bordered(6, 6, 1)).unwrap();
        assert!(sim.step_sequential(-1.0, 0.0).is_err());
        assert!(sim.step_parallel(1.0, 1.5, 0.0).is_err());
        assert!(sim.step_parallel(f64::NAN, 0.5, 0.0).is_err());
        assert_eq!(sim.epoch(), EpochId(0));
    }

    #[test]
    fn same_seed_same_trajectory() {
        let run = || {
            let mut sim = Simulation::new(SimConfig {
                seed: 42,
                ..bordered(12, 12, 2)
            })
            .unwrap();
            sim.random_setup(0.3, 0.05).unwrap();
            for _ in 0..10 {
                sim.step_parallel(5.0, 0.7, 0.2).unwrap();
            }
            sim.agent_ids()
                .into_iter()
                .map(|id| (sim.agent_position(id), sim.agent_class(id)))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn delete_class_retargets_everyone() {
        let mut sim = Simulation::new(bordered(10, 10, 3)).unwrap();
        for x in 1..9 {
            sim.place_agent_with_class(x, 2, ClassId(1)).unwrap();
        }
        assert_eq!(sim.delete_class(ClassId(1)).unwrap(), 8);
        for id in sim.agent_ids() {
            assert_ne!(sim.agent_class(id), Some(ClassId(1)));
        }
    }

    #[test]
    fn delete_class_needs_two_classes() {
        let mut sim = Simulation::new(bordered(6, 6, 1)).unwrap();
        assert!(sim.delete_class(ClassId(0)).is_err());
        assert!(sim.open_class(ClassId(1)).is_err());
    }

    #[test]
    fn open_class_only_moves_agents_into_the_class() {
        let mut sim = Simulation::new(bordered(12, 12, 2)).unwrap();
        for y in 1..11 {
            for x in 1..5 {
                sim.place_agent_with_class(x, y, ClassId(0)).unwrap();
            }
        }
        let joined = sim.open_class(ClassId(1)).unwrap();
        let in_one = sim
            .agent_ids()
            .into_iter()
            .filter(|&id| sim.agent_class(id) == Some(ClassId(1)))
            .count();
        assert_eq!(joined, in_one);
    }

    #[test]
    fn producers_spawn_at_full_probability() {
        let mut sim = Simulation::new(SimConfig {
            production_prob: 1.0,
            ..bordered(8, 8, 1)
        })
        .unwrap();
        sim.place_producer(1, 1).unwrap();
        sim.place_producer(6, 1).unwrap();
        let m = sim.step_sequential(0.0, 0.0).unwrap();
        assert_eq!(m.spawns, 2);
        assert_eq!(sim.agent_count(), 2);
    }

    #[test]
    fn recompute_gradient_rejects_negative_coefficient() {
        let mut sim = Simulation::new(bordered(6, 6, 1)).unwrap();
        assert!(sim.recompute_gradient(-1.0, 2).is_err());
        assert!(matches!(
            sim.recompute_gradient(1.0, 1 << 31),
            Err(SimError::InvalidConfiguration { .. })
        ));
        assert!(sim.grid().gradient().values().iter().all(|&v| v == 0.0));
        sim.recompute_gradient(1.0, 1).unwrap();
        assert!(sim.grid().gradient().values().iter().any(|&v| v > 0.0));
    }

    #[test]
    fn debug_output_names_the_simulation() {
        let sim = Simulation::new(bordered(6, 6, 1)).unwrap();
        assert!(format!("{sim:?}").starts_with("Simulation"));
    }
}
