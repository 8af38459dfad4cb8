//! Benchmark profiles for the Throng crowd simulator.
//!
//! Provides pre-built [`SimConfig`] profiles for benchmarking:
//!
//! - [`reference_profile`]: 100x100 grid (10K cells), three classes,
//!   exits, trail and place exchange enabled
//! - [`stress_profile`]: 316x316 grid (~100K cells) with the same settings
//! - [`populated`]: build a profile and scatter a crowd over it

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use throng_core::SimError;
use throng_engine::{SimConfig, Simulation};

/// Share of cells seeded with an agent by [`populated`].
pub const DEFAULT_DENSITY: f64 = 0.3;

/// 100x100 grid (10K cells) with every mechanism switched on.
pub fn reference_profile(seed: u64) -> SimConfig {
    SimConfig {
        exit_enabled: true,
        change_place_prob: 0.3,
        diffusion_coeff: 0.1,
        production_prob: 0.2,
        seed,
        ..SimConfig::new(100, 100, 3)
    }
}

/// 316x316 grid (~100K cells), otherwise identical to [`reference_profile`].
pub fn stress_profile(seed: u64) -> SimConfig {
    SimConfig {
        columns: 316,
        rows: 316,
        ..reference_profile(seed)
    }
}

/// Build `config`, scatter agents with `density` and sparse walls, and
/// compute the obstacle gradient.
pub fn populated(config: SimConfig, density: f64) -> Result<Simulation, SimError> {
    let mut sim = Simulation::new(config)?;
    sim.random_setup(density, 0.02)?;
    sim.recompute_gradient(0.5, 2)?;
    Ok(sim)
}
