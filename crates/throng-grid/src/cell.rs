//! A single grid location and its cached attractor distances.

use smallvec::SmallVec;
use throng_core::{CellState, ClassId, MAX_CLASSES};

/// Euclidean distance between two integer grid coordinates.
pub fn euclidean(a: (i32, i32), b: (i32, i32)) -> f64 {
    let dx = f64::from(a.0 - b.0);
    let dy = f64::from(a.1 - b.1);
    (dx * dx + dy * dy).sqrt()
}

/// One cell of the grid.
///
/// `distance[k]` caches the Euclidean distance from this cell to the
/// current position of attractor `k`. The grid refreshes it whenever an
/// attractor is relocated.
#[derive(Clone, Debug)]
pub struct Cell {
    x: i32,
    y: i32,
    pub(crate) state: CellState,
    pub(crate) distance: SmallVec<[f64; MAX_CLASSES]>,
}

impl Cell {
    pub(crate) fn new(x: i32, y: i32, attractors: &[(i32, i32)]) -> Self {
        Self {
            x,
            y,
            state: CellState::Empty,
            distance: attractors.iter().map(|&a| euclidean((x, y), a)).collect(),
        }
    }

    /// Column of this cell.
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Row of this cell.
    pub fn y(&self) -> i32 {
        self.y
    }

    /// `(x, y)` coordinates.
    pub fn coords(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Current state, including the occupant reference.
    pub fn state(&self) -> CellState {
        self.state
    }

    /// Cached distance to the attractor of `class`.
    ///
    /// Returns `f64::INFINITY` for a class the grid does not have.
    pub fn distance(&self, class: ClassId) -> f64 {
        self.distance
            .get(class.index())
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    /// All cached attractor distances, indexed by class.
    pub fn distances(&self) -> &[f64] {
        &self.distance
    }
}
