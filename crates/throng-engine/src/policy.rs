//! Floor-field movement policy.
//!
//! An agent picks its next cell from a small candidate set (its
//! orthogonal neighbours that it may enter, plus its own cell) by
//! sampling a Boltzmann distribution over movement costs:
//!
//! ```text
//! H(c) = distance[c][class]
//!        - trail_weight * trail[class][c]      (trail enabled only)
//!        + gradient[c]
//!        + 3 - min(10, nu * inertia)           (c recently vacated)
//! H(stay) += min(10, nu * inertia)
//! W(c) = exp(-eta * (H(c) - min H) / (width + height)^p)
//! ```
//!
//! Subtracting `min H` leaves the normalized weights unchanged and keeps
//! the best candidate at weight 1, so the sum never underflows to zero.
//! `eta = 0` gives a uniform choice; large `eta` gives greedy descent.

use rand::Rng;
use smallvec::SmallVec;
use throng_core::{CellId, CellState, ClassId, SimError};
use throng_grid::{Agent, Grid};

/// Candidate cells, the agent's own cell last.
pub type Candidates = SmallVec<[CellId; 5]>;

/// One value per candidate.
pub type Weights = SmallVec<[f64; 5]>;

/// Extra cost of stepping back onto a recently vacated cell.
pub const HISTORY_PENALTY: f64 = 3.0;

/// Cap of the inertia term.
pub const INERTIA_CAP: f64 = 10.0;

/// Which cells besides free floor an agent may consider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CandidateRules {
    /// Doors are candidates (exits enabled).
    pub doors: bool,
    /// Occupied neighbours are candidates (parallel policy with place
    /// exchange enabled).
    pub occupied: bool,
}

/// Inputs of the floor-field cost beyond the grid itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostTerms {
    /// Weight of the trail term, or zero when the trail is disabled.
    pub trail_weight: f64,
    /// Inertia sensitivity.
    pub nu: f64,
}

/// Temperature denominator `(width + height)^exponent`.
pub fn temperature_scale(width: u32, height: u32, exponent: f64) -> f64 {
    f64::from(width + height).powf(exponent)
}

/// Candidate cells for an agent standing on `here`.
///
/// Neighbours come in north, south, west, east order; `here` is always
/// the last entry, so "stay" is always available.
pub fn candidates(grid: &Grid, here: CellId, rules: CandidateRules) -> Candidates {
    let mut out: Candidates = grid
        .neighbours(here)
        .into_iter()
        .filter(|&n| match grid.state(n) {
            CellState::Empty => true,
            CellState::Door => rules.doors,
            CellState::Occupied(_) => rules.occupied,
            _ => false,
        })
        .collect();
    out.push(here);
    out
}

/// Class of the first neighbour of `here`, in north, south, west, east
/// order, occupied by an agent of a class other than `mine`.
pub fn rival_class(grid: &Grid, here: CellId, mine: ClassId) -> Option<ClassId> {
    grid.neighbours(here).into_iter().find_map(|n| match grid.state(n) {
        CellState::Occupied(other) => grid
            .agent(other)
            .map(Agent::class)
            .filter(|&class| class != mine),
        _ => None,
    })
}

/// Floor-field cost of every candidate for `agent`.
///
/// The last candidate is taken to be the agent's own cell and receives
/// the inertia bonus.
pub fn floor_field_costs(
    grid: &Grid,
    agent: &Agent,
    cands: &[CellId],
    terms: CostTerms,
) -> Weights {
    let class = agent.class();
    let inertia = (terms.nu * f64::from(agent.inertia())).min(INERTIA_CAP);
    let mut costs: Weights = cands
        .iter()
        .map(|&c| {
            let mut h = grid.distance(c, class) + grid.gradient().get(c);
            if terms.trail_weight != 0.0 {
                h -= terms.trail_weight * grid.trail().get(class, c);
            }
            if agent.has_visited(c) {
                h += HISTORY_PENALTY - inertia;
            }
            h
        })
        .collect();
    if let Some(stay) = costs.last_mut() {
        *stay += inertia;
    }
    costs
}

/// Cross-class repulsion cost: `distance[c][mine] - distance[c][rival]`.
pub fn repulsion_costs(grid: &Grid, mine: ClassId, rival: ClassId, cands: &[CellId]) -> Weights {
    cands
        .iter()
        .map(|&c| grid.distance(c, mine) - grid.distance(c, rival))
        .collect()
}

/// Normalized Boltzmann weights for `costs`.
///
/// Returns `Err(SimError::InvariantViolation)` when the costs are empty
/// or the weights do not form a distribution (non-finite inputs).
pub fn selection_weights(costs: &[f64], eta: f64, scale: f64) -> Result<Weights, SimError> {
    let min = costs.iter().copied().fold(f64::INFINITY, f64::min);
    let mut weights: Weights = costs
        .iter()
        .map(|&h| (-eta * (h - min) / scale).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    if !(sum.is_finite() && sum > 0.0) {
        return Err(SimError::invariant(format!(
            "categorical weights sum to {sum} for costs {costs:?}"
        )));
    }
    for w in &mut weights {
        *w /= sum;
    }
    Ok(weights)
}

/// Draw an index from the normalized `weights`.
pub fn sample_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Result<usize, SimError> {
    let u: f64 = rng.random();
    let mut acc = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        acc += w;
        if u < acc {
            return Ok(i);
        }
    }
    // Rounding can leave `acc` a hair below 1.
    weights
        .iter()
        .rposition(|&w| w > 0.0)
        .ok_or_else(|| SimError::invariant("cannot sample from an all-zero distribution"))
}
