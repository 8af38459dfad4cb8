//! Cell classification.
//!
//! [`CellState`] is the owning representation stored in the grid: the
//! occupant reference lives inside the variant, so an occupied cell
//! without an agent (or an agent on a wall) cannot be expressed.
//! [`CellTag`] is the payload-free view handed to read-only consumers.

use crate::id::{AgentId, ClassId};

/// State of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CellState {
    /// Free floor.
    #[default]
    Empty,
    /// Impassable obstacle.
    Wall,
    /// Exit. Agents stepping onto it arrive when exits are enabled.
    Door,
    /// Floor holding exactly one agent.
    Occupied(AgentId),
    /// Spawn point. May host one agent while keeping its producer tag.
    Producer(Option<AgentId>),
    /// Target cell of attractor class `k`.
    Attractor(ClassId),
}

impl CellState {
    /// The agent standing on this cell, if any.
    pub fn occupant(self) -> Option<AgentId> {
        match self {
            Self::Occupied(id) => Some(id),
            Self::Producer(occupant) => occupant,
            _ => None,
        }
    }

    /// Payload-free classification.
    pub fn tag(self) -> CellTag {
        match self {
            Self::Empty => CellTag::Empty,
            Self::Wall => CellTag::Wall,
            Self::Door => CellTag::Door,
            Self::Occupied(_) => CellTag::Occupied,
            Self::Producer(_) => CellTag::Producer,
            Self::Attractor(k) => CellTag::Attractor(k),
        }
    }

    /// Whether an agent may be placed or moved onto this cell.
    pub fn accepts_agent(self) -> bool {
        matches!(self, Self::Empty | Self::Producer(None))
    }

    /// Whether this cell counts as open floor for density sampling.
    pub fn is_floor(self) -> bool {
        matches!(self, Self::Empty | Self::Occupied(_))
    }
}

/// Read-only classification of a cell, without occupant references.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellTag {
    /// Free floor.
    Empty,
    /// Impassable obstacle.
    Wall,
    /// Exit.
    Door,
    /// Floor holding an agent.
    Occupied,
    /// Spawn point (possibly hosting an agent).
    Producer,
    /// Target of the given attractor class.
    Attractor(ClassId),
}
