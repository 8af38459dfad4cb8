//! Agents and the slot-based roster that owns them.
//!
//! The roster is the only long-lived owner of agents. Cells refer to
//! their occupant by [`AgentId`], agents refer to their cell by
//! [`CellId`]; neither side holds a pointer to the other.

use std::collections::VecDeque;

use throng_core::{AgentId, CellId, ClassId};

/// Number of previously occupied cells an agent remembers.
pub const HISTORY_LEN: usize = 20;

/// One mobile entity on the grid.
#[derive(Clone, Debug)]
pub struct Agent {
    id: AgentId,
    pub(crate) cell: Option<CellId>,
    class: ClassId,
    history: VecDeque<CellId>,
    inertia: u32,
    wants_to_go: Option<CellId>,
    pub(crate) arrived: bool,
}

impl Agent {
    fn new(id: AgentId, cell: CellId, class: ClassId) -> Self {
        Self {
            id,
            cell: Some(cell),
            class,
            history: VecDeque::with_capacity(HISTORY_LEN),
            inertia: 0,
            wants_to_go: None,
            arrived: false,
        }
    }

    /// Roster slot of this agent.
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Cell the agent stands on; `None` once it has arrived.
    pub fn cell(&self) -> Option<CellId> {
        self.cell
    }

    /// Attractor class the agent is heading for.
    pub fn class(&self) -> ClassId {
        self.class
    }

    /// Retarget the agent. Its distance and trail lookups follow the new
    /// class from the next decision on.
    pub fn set_class(&mut self, class: ClassId) {
        self.class = class;
    }

    /// Consecutive epochs without moving.
    pub fn inertia(&self) -> u32 {
        self.inertia
    }

    /// Count one more epoch spent in place.
    pub fn bump_inertia(&mut self) {
        self.inertia = self.inertia.saturating_add(1);
    }

    /// Forget accumulated inertia after a move.
    pub fn reset_inertia(&mut self) {
        self.inertia = 0;
    }

    /// Occupied cell this agent is negotiating for, if any.
    pub fn wants_to_go(&self) -> Option<CellId> {
        self.wants_to_go
    }

    /// Record (or clear) the cell this agent is negotiating for.
    pub fn set_wants_to_go(&mut self, cell: Option<CellId>) {
        self.wants_to_go = cell;
    }

    /// Whether the agent reached a door this epoch.
    pub fn is_arrived(&self) -> bool {
        self.arrived
    }

    /// Recently vacated cells, oldest first.
    pub fn history(&self) -> impl Iterator<Item = CellId> + '_ {
        self.history.iter().copied()
    }

    /// Whether `cell` is among the last [`HISTORY_LEN`] vacated cells.
    pub fn has_visited(&self, cell: CellId) -> bool {
        self.history.contains(&cell)
    }

    pub(crate) fn remember(&mut self, cell: CellId) {
        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(cell);
    }
}

/// Slot arena of live agents.
///
/// Removed agents leave a hole that the next insertion reuses, so ids of
/// live agents stay stable while others come and go.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    slots: Vec<Option<Agent>>,
    free: Vec<u32>,
    live: usize,
}

impl Roster {
    /// An empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, cell: CellId, class: ClassId) -> AgentId {
        self.live += 1;
        match self.free.pop() {
            Some(slot) => {
                let id = AgentId(slot);
                self.slots[slot as usize] = Some(Agent::new(id, cell, class));
                id
            }
            None => {
                let id = AgentId(self.slots.len() as u32);
                self.slots.push(Some(Agent::new(id, cell, class)));
                id
            }
        }
    }

    pub(crate) fn remove(&mut self, id: AgentId) -> Option<Agent> {
        let agent = self.slots.get_mut(id.index())?.take()?;
        self.free.push(id.0);
        self.live -= 1;
        Some(agent)
    }

    /// Live agent in slot `id`.
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.slots.get(id.index())?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    /// Number of live agents.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether no agent is alive.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live agents in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.slots.iter().flatten()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> + '_ {
        self.slots.iter_mut().flatten()
    }

    /// Snapshot of live ids in slot order.
    ///
    /// Epoch loops iterate this snapshot so that agents leaving or
    /// arriving mid-epoch never disturb the iteration.
    pub fn ids(&self) -> Vec<AgentId> {
        self.iter().map(Agent::id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_bounded_fifo() {
        let mut roster = Roster::new();
        let id = roster.insert(CellId(0), ClassId(0));
        let agent = roster.get_mut(id).unwrap();
        for i in 0..(HISTORY_LEN as u32 + 5) {
            agent.remember(CellId(i));
        }
        let kept: Vec<_> = agent.history().collect();
        assert_eq!(kept.len(), HISTORY_LEN);
        assert_eq!(kept[0], CellId(5));
        assert!(!agent.has_visited(CellId(4)));
        assert!(agent.has_visited(CellId(HISTORY_LEN as u32 + 4)));
    }

    #[test]
    fn removed_slots_are_reused() {
        let mut roster = Roster::new();
        let a = roster.insert(CellId(0), ClassId(0));
        let b = roster.insert(CellId(1), ClassId(0));
        assert_eq!(roster.len(), 2);

        let gone = roster.remove(a).unwrap();
        assert_eq!(gone.cell(), Some(CellId(0)));
        assert_eq!(roster.len(), 1);
        assert!(roster.get(a).is_none());
        assert!(roster.remove(a).is_none());

        let c = roster.insert(CellId(2), ClassId(1));
        assert_eq!(c, a);
        assert_eq!(roster.ids(), vec![c, b]);
    }

    #[test]
    fn inertia_counts_and_resets() {
        let mut roster = Roster::new();
        let id = roster.insert(CellId(3), ClassId(0));
        let agent = roster.get_mut(id).unwrap();
        agent.bump_inertia();
        agent.bump_inertia();
        assert_eq!(agent.inertia(), 2);
        agent.reset_inertia();
        assert_eq!(agent.inertia(), 0);
    }
}
