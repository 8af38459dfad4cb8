//! The cell grid of the Throng crowd simulator.
//!
//! [`Grid`] owns every [`Cell`], the agent [`Roster`] and both scalar
//! fields. It offers bounds-checked placement and removal, neighbour
//! queries, attractor relocation with distance refresh, and density
//! readings. It knows nothing about movement policies; the engine drives
//! agents through the move operations exposed here.
//!
//! # Fields
//!
//! - [`GradientField`]: static repulsion from walls, rebuilt on request.
//! - [`TrailField`]: per-class diffusing trail, updated every epoch.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod agent;
pub mod cell;
pub mod density;
pub mod field;
pub mod grid;

pub use agent::{Agent, Roster, HISTORY_LEN};
pub use cell::{euclidean, Cell};
pub use density::{DensityPeak, MAX_DENSITY_WINDOW, MIN_FLOOR_CELLS};
pub use field::{GradientField, TrailField, TRAIL_MAX};
pub use grid::Grid;
