//! Throng: a grid-based crowd simulator driven by stochastic floor fields.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Throng sub-crates. For most users, adding `throng` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use throng::prelude::*;
//!
//! // A 20x20 room with two exit-bound classes.
//! let config = SimConfig {
//!     exit_enabled: true,
//!     seed: 7,
//!     ..SimConfig::new(20, 20, 2)
//! };
//! let mut sim = Simulation::new(config).unwrap();
//! sim.random_setup(0.2, 0.02).unwrap();
//! sim.recompute_gradient(0.5, 2).unwrap();
//!
//! for _ in 0..50 {
//!     let m = sim.step_parallel(10.0, 0.8, 0.3).unwrap();
//!     assert_eq!(m.agent_count, sim.agent_count());
//! }
//! assert_eq!(sim.epoch(), EpochId(50));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `throng-core` | IDs, cell states, errors |
//! | [`grid`] | `throng-grid` | Cells, fields, agent roster, density |
//! | [`engine`] | `throng-engine` | Configuration, policies, epoch drivers |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and IDs (`throng-core`).
pub use throng_core as types;

/// Cell grid, scalar fields and agent roster (`throng-grid`).
///
/// [`grid::Grid`] is reachable read-only through
/// [`engine::Simulation::grid`].
pub use throng_grid as grid;

/// Configuration, movement policies and epoch drivers (`throng-engine`).
pub use throng_engine as engine;

/// Common imports for typical Throng usage.
///
/// ```rust
/// use throng::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use throng_core::{AgentId, CellTag, ClassId, EpochId, SimError};

    // Grid
    pub use throng_grid::{DensityPeak, Grid};

    // Engine
    pub use throng_engine::{ConfigError, EpochMetrics, LayoutKind, SimConfig, Simulation};
}
