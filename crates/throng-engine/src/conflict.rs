//! Per-epoch table of movement intents.
//!
//! During the parallel decide phase every agent that wants to enter a
//! free cell registers an intent here instead of moving. The resolve
//! phase then walks the table in first-proposal order and grants each
//! cell to at most one proposer.

use indexmap::IndexMap;
use smallvec::SmallVec;
use throng_core::{AgentId, CellId};

/// Agents proposing the same cell, in proposal order.
pub type Proposers = SmallVec<[AgentId; 4]>;

/// Intents registered during one parallel epoch.
#[derive(Clone, Debug, Default)]
pub struct ConflictTable {
    by_cell: IndexMap<CellId, Proposers>,
    by_agent: IndexMap<AgentId, CellId>,
}

impl ConflictTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `agent`'s intent to enter `cell`, replacing any earlier
    /// intent of the same agent.
    pub fn propose(&mut self, cell: CellId, agent: AgentId) {
        self.withdraw(agent);
        self.by_cell.entry(cell).or_default().push(agent);
        self.by_agent.insert(agent, cell);
    }

    /// Drop `agent`'s pending intent. Returns the cell it had proposed.
    pub fn withdraw(&mut self, agent: AgentId) -> Option<CellId> {
        let cell = self.by_agent.shift_remove(&agent)?;
        if let Some(proposers) = self.by_cell.get_mut(&cell) {
            proposers.retain(|a| *a != agent);
            if proposers.is_empty() {
                self.by_cell.shift_remove(&cell);
            }
        }
        Some(cell)
    }

    /// Cell `agent` has proposed, if any.
    pub fn intent(&self, agent: AgentId) -> Option<CellId> {
        self.by_agent.get(&agent).copied()
    }

    /// Number of cells with at least one proposer.
    pub fn len(&self) -> usize {
        self.by_cell.len()
    }

    /// Whether no intent is registered.
    pub fn is_empty(&self) -> bool {
        self.by_cell.is_empty()
    }

    /// Consume the table, yielding each proposed cell with its proposers
    /// in first-proposal order.
    pub fn drain(self) -> impl Iterator<Item = (CellId, Proposers)> {
        self.by_cell.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proposals_group_by_cell_in_order() {
        let mut t = ConflictTable::new();
        t.propose(CellId(9), AgentId(2));
        t.propose(CellId(4), AgentId(0));
        t.propose(CellId(9), AgentId(1));
        assert_eq!(t.len(), 2);
        let cells: Vec<_> = t.drain().collect();
        assert_eq!(cells[0].0, CellId(9));
        assert_eq!(cells[0].1.as_slice(), &[AgentId(2), AgentId(1)]);
        assert_eq!(cells[1].1.as_slice(), &[AgentId(0)]);
    }

    #[test]
    fn withdraw_removes_the_intent_and_empty_cells() {
        let mut t = ConflictTable::new();
        t.propose(CellId(3), AgentId(5));
        t.propose(CellId(3), AgentId(6));
        assert_eq!(t.withdraw(AgentId(5)), Some(CellId(3)));
        assert_eq!(t.withdraw(AgentId(5)), None);
        assert_eq!(t.intent(AgentId(6)), Some(CellId(3)));
        t.withdraw(AgentId(6));
        assert!(t.is_empty());
    }

    #[test]
    fn reproposing_moves_the_intent() {
        let mut t = ConflictTable::new();
        t.propose(CellId(1), AgentId(0));
        t.propose(CellId(2), AgentId(0));
        assert_eq!(t.len(), 1);
        assert_eq!(t.intent(AgentId(0)), Some(CellId(2)));
    }
}
