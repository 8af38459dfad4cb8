//! Simulation engine for the Throng crowd simulator.
//!
//! [`Simulation`] advances a [`Grid`](throng_grid::Grid) one epoch at a
//! time with either of two named policies:
//!
//! - [`step_sequential`](Simulation::step_sequential): agents decide in
//!   turn and commit immediately.
//! - [`step_parallel`](Simulation::step_parallel): agents decide against
//!   a consistent grid, negotiate place exchanges, and contested cells
//!   are resolved afterwards through a [`ConflictTable`].
//!
//! Every stochastic choice draws from one seeded RNG, so a run is fully
//! determined by its [`SimConfig`] and the sequence of calls made on it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod conflict;
pub mod layout;
pub mod metrics;
pub mod policy;
pub mod simulation;

pub use config::{ConfigError, LayoutKind, SimConfig, MIN_DIMENSION};
pub use conflict::ConflictTable;
pub use metrics::EpochMetrics;
pub use simulation::Simulation;
