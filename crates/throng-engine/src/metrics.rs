//! Per-epoch metrics for the simulation engine.
//!
//! [`EpochMetrics`] captures phase timings and movement counters for a
//! single epoch. Both epoch drivers return one; the simulation also keeps
//! the most recent copy for later inspection.

use throng_core::EpochId;

/// Timing and movement counters collected during a single epoch.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EpochMetrics {
    /// Epoch these metrics describe.
    pub epoch: EpochId,
    /// Wall-clock time for the whole epoch.
    pub total_us: u64,
    /// Time spent evaluating policies (and, sequentially, committing moves).
    pub decide_us: u64,
    /// Time spent resolving the conflict table. Zero for sequential epochs.
    pub resolve_us: u64,
    /// Time spent diffusing and decaying the trail field.
    pub field_update_us: u64,
    /// Time spent spawning and reclassifying agents.
    pub spawn_us: u64,
    /// Agents that moved into a new cell, exchanges excluded.
    pub moves: u32,
    /// Agents that ended the epoch on their own cell, losers of contested
    /// cells included. Exchanged agents are never counted here.
    pub stays: u32,
    /// Pairs of agents that swapped cells.
    pub exchanges: u32,
    /// Agents that reached a door and left the grid.
    pub arrivals: u32,
    /// Cells proposed by more than one agent.
    pub contested_cells: u32,
    /// Proposals that did not result in a move.
    pub blocked_proposals: u32,
    /// Agents created at producers.
    pub spawns: u32,
    /// Agents reassigned to a random class.
    pub reclassifications: u32,
    /// Live agents after the epoch.
    pub agent_count: usize,
}
