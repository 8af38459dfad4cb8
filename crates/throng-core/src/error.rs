//! Error types for the Throng crowd simulator.
//!
//! Every fallible grid or simulation operation reports one of three
//! kinds: a coordinate outside the grid, a rejected configuration, or a
//! broken internal invariant. None of them is retried internally.

use std::error::Error;
use std::fmt;

/// Errors from grid and simulation operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    /// A coordinate lies outside `[0, width) x [0, height)`.
    OutOfBounds {
        /// Requested column.
        x: i32,
        /// Requested row.
        y: i32,
        /// Grid width (columns).
        width: u32,
        /// Grid height (rows).
        height: u32,
    },
    /// A parameter or argument was rejected (zero classes, empty grid,
    /// class index out of range, probability outside `[0, 1]`, ...).
    InvalidConfiguration {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// Internal state is inconsistent. Indicates a programming error,
    /// not a recoverable runtime condition.
    InvariantViolation {
        /// Description of the violated invariant.
        reason: String,
    },
}

impl SimError {
    /// Shorthand for [`SimError::InvalidConfiguration`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`SimError::InvariantViolation`].
    pub fn invariant(reason: impl Into<String>) -> Self {
        Self::InvariantViolation {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "coordinate ({x}, {y}) out of bounds: [0, {width}) x [0, {height})"
            ),
            Self::InvalidConfiguration { reason } => {
                write!(f, "invalid configuration: {reason}")
            }
            Self::InvariantViolation { reason } => {
                write!(f, "invariant violation: {reason}")
            }
        }
    }
}

impl Error for SimError {}
