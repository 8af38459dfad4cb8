//! Core types for the Throng crowd simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers, cell states and error type shared by the grid and
//! the simulation engine.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod error;
pub mod id;

pub use cell::{CellState, CellTag};
pub use error::SimError;
pub use id::{AgentId, CellId, ClassId, EpochId, MAX_CLASSES};
