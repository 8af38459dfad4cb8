//! The cell grid: owner of cells, fields and the agent roster.
//!
//! All coordinate-taking methods are bounds-checked and fail with
//! [`SimError::OutOfBounds`]; nothing is silently clamped here.

use smallvec::SmallVec;
use throng_core::{AgentId, CellId, CellState, CellTag, ClassId, SimError, MAX_CLASSES};
use tracing::{debug, trace};

use crate::agent::{Agent, Roster};
use crate::cell::{euclidean, Cell};
use crate::field::{GradientField, TrailField};

/// North, south, west, east.
const OFFSETS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// A rectangular grid of cells with agents and scalar fields.
///
/// Construction puts a wall on every boundary cell and tags each
/// attractor position. Cell `(x, y)` has id `y * width + x`.
#[derive(Clone, Debug)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    attractors: SmallVec<[CellId; MAX_CLASSES]>,
    producers: Vec<CellId>,
    gradient: GradientField,
    trail: TrailField,
    roster: Roster,
}

impl Grid {
    /// Create a `width x height` grid with one attractor class per entry
    /// of `attractors`.
    ///
    /// Returns `Err(SimError::InvalidConfiguration)` for an empty grid or
    /// a class count outside `1..=MAX_CLASSES`, and
    /// `Err(SimError::OutOfBounds)` for an attractor outside the grid.
    pub fn new(width: u32, height: u32, attractors: &[(i32, i32)]) -> Result<Self, SimError> {
        if width == 0 || height == 0 {
            return Err(SimError::invalid(format!(
                "grid must have at least one cell, got {width}x{height}"
            )));
        }
        if width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(SimError::invalid("grid dimension exceeds i32::MAX"));
        }
        if attractors.is_empty() || attractors.len() > MAX_CLASSES {
            return Err(SimError::invalid(format!(
                "class count must be in 1..={MAX_CLASSES}, got {}",
                attractors.len()
            )));
        }

        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                cells.push(Cell::new(x, y, attractors));
            }
        }

        let mut grid = Self {
            width,
            height,
            cells,
            attractors: SmallVec::new(),
            producers: Vec::new(),
            gradient: GradientField::new(width, height),
            trail: TrailField::new(width, height, attractors.len()),
            roster: Roster::new(),
        };

        for cell in &mut grid.cells {
            let (x, y) = cell.coords();
            if x == 0 || y == 0 || x == width as i32 - 1 || y == height as i32 - 1 {
                cell.state = CellState::Wall;
            }
        }
        for (k, &(x, y)) in attractors.iter().enumerate() {
            let id = grid.cell_id(x, y)?;
            grid.cells[id.index()].state = CellState::Attractor(ClassId(k as u8));
            grid.attractors.push(id);
        }
        Ok(grid)
    }

    // ── Geometry ────────────────────────────────────────────────

    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of attractor classes.
    pub fn num_classes(&self) -> usize {
        self.attractors.len()
    }

    /// Whether `(x, y)` lies on the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    /// Id of the cell at `(x, y)`.
    pub fn cell_id(&self, x: i32, y: i32) -> Result<CellId, SimError> {
        if !self.in_bounds(x, y) {
            return Err(SimError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(CellId(y as u32 * self.width + x as u32))
    }

    /// Coordinates of `id`.
    pub fn coords(&self, id: CellId) -> (i32, i32) {
        self.cells[id.index()].coords()
    }

    /// Bounds-checked cell lookup.
    pub fn cell_at(&self, x: i32, y: i32) -> Result<&Cell, SimError> {
        let id = self.cell_id(x, y)?;
        Ok(&self.cells[id.index()])
    }

    /// Cell by id.
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    /// State of the cell `id`.
    pub fn state(&self, id: CellId) -> CellState {
        self.cells[id.index()].state
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Orthogonal neighbours of `id` in north, south, west, east order,
    /// omitting those beyond the boundary.
    pub fn neighbours(&self, id: CellId) -> SmallVec<[CellId; 4]> {
        let (x, y) = self.coords(id);
        OFFSETS
            .iter()
            .filter(|(dx, dy)| self.in_bounds(x + dx, y + dy))
            .map(|(dx, dy)| CellId((y + dy) as u32 * self.width + (x + dx) as u32))
            .collect()
    }

    /// Coordinates of the orthogonal neighbours of `(x, y)`.
    pub fn neighbors4(&self, x: i32, y: i32) -> Result<SmallVec<[(i32, i32); 4]>, SimError> {
        let id = self.cell_id(x, y)?;
        Ok(self
            .neighbours(id)
            .into_iter()
            .map(|n| self.coords(n))
            .collect())
    }

    // ── Read-only queries ───────────────────────────────────────

    /// Payload-free classification of `(x, y)`.
    pub fn cell_tag(&self, x: i32, y: i32) -> Result<CellTag, SimError> {
        Ok(self.cell_at(x, y)?.state.tag())
    }

    /// Class of the agent standing on `(x, y)`, if any.
    pub fn occupant_class(&self, x: i32, y: i32) -> Result<Option<ClassId>, SimError> {
        let cell = self.cell_at(x, y)?;
        Ok(cell
            .state
            .occupant()
            .and_then(|id| self.roster.get(id))
            .map(Agent::class))
    }

    /// Cached distance from `cell` to the attractor of `class`.
    pub fn distance(&self, cell: CellId, class: ClassId) -> f64 {
        self.cells[cell.index()].distance(class)
    }

    /// Current attractor cell of every class.
    pub fn attractors(&self) -> &[CellId] {
        &self.attractors
    }

    /// Producer cells in placement order.
    pub fn producers(&self) -> &[CellId] {
        &self.producers
    }

    /// Coordinates of every wall cell.
    pub fn walls(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells
            .iter()
            .filter(|c| c.state == CellState::Wall)
            .map(Cell::coords)
    }

    /// Static obstacle-repulsion field.
    pub fn gradient(&self) -> &GradientField {
        &self.gradient
    }

    /// Per-class trail field.
    pub fn trail(&self) -> &TrailField {
        &self.trail
    }

    /// Mutable access to the trail field (deposits and diffusion).
    pub fn trail_mut(&mut self) -> &mut TrailField {
        &mut self.trail
    }

    /// The agent roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Live agent by id.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.roster.get(id)
    }

    /// Mutable live agent by id.
    ///
    /// Position changes go through the grid's move operations, never
    /// through this handle.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.roster.get_mut(id)
    }

    /// Iterate every live agent mutably.
    pub fn agents_mut(&mut self) -> impl Iterator<Item = &mut Agent> + '_ {
        self.roster.iter_mut()
    }

    /// Number of agents in the roster, arrived ones included until the
    /// end-of-epoch sweep.
    pub fn agent_count(&self) -> usize {
        self.roster.len()
    }

    // ── Mutators ────────────────────────────────────────────────

    /// Overwrite the state of `id`, removing any occupant from the
    /// roster first and keeping the producer list in sync.
    ///
    /// Returns the evicted agent, if there was one.
    fn set_state(&mut self, id: CellId, state: CellState) -> Option<AgentId> {
        let old = self.cells[id.index()].state;
        let evicted = old.occupant();
        if let Some(agent) = evicted {
            self.roster.remove(agent);
            trace!(agent = agent.0, cell = id.0, "evicted agent");
        }
        let was_producer = matches!(old, CellState::Producer(_));
        let is_producer = matches!(state, CellState::Producer(_));
        if was_producer && !is_producer {
            self.producers.retain(|&p| p != id);
        } else if is_producer && !was_producer {
            self.producers.push(id);
        }
        self.cells[id.index()].state = state;
        evicted
    }

    /// Turn `(x, y)` into a wall. Returns the evicted agent, if any.
    pub fn place_wall(&mut self, x: i32, y: i32) -> Result<Option<AgentId>, SimError> {
        let id = self.cell_id(x, y)?;
        Ok(self.set_state(id, CellState::Wall))
    }

    /// Turn `(x, y)` into a door. Returns the evicted agent, if any.
    pub fn place_door(&mut self, x: i32, y: i32) -> Result<Option<AgentId>, SimError> {
        let id = self.cell_id(x, y)?;
        Ok(self.set_state(id, CellState::Door))
    }

    /// Turn `(x, y)` into a producer. A producer stays a producer, with
    /// its current guest, if it already was one.
    pub fn place_producer(&mut self, x: i32, y: i32) -> Result<Option<AgentId>, SimError> {
        let id = self.cell_id(x, y)?;
        if matches!(self.state(id), CellState::Producer(_)) {
            return Ok(None);
        }
        Ok(self.set_state(id, CellState::Producer(None)))
    }

    /// Reset `(x, y)` to empty floor. Returns the evicted agent, if any.
    ///
    /// Clearing an attractor cell only removes its tag; the attractor's
    /// recorded position, and therefore every distance, is unchanged.
    pub fn clear_cell(&mut self, x: i32, y: i32) -> Result<Option<AgentId>, SimError> {
        let id = self.cell_id(x, y)?;
        Ok(self.set_state(id, CellState::Empty))
    }

    /// Create an agent of `class` on `(x, y)`.
    ///
    /// Only empty cells and free producers accept a new agent; for any
    /// other cell this returns `Ok(None)` and leaves the grid unchanged.
    pub fn place_agent(
        &mut self,
        x: i32,
        y: i32,
        class: ClassId,
    ) -> Result<Option<AgentId>, SimError> {
        let id = self.cell_id(x, y)?;
        self.spawn(id, class)
    }

    /// [`place_agent`](Self::place_agent) by cell id.
    pub fn spawn(&mut self, cell: CellId, class: ClassId) -> Result<Option<AgentId>, SimError> {
        self.check_class(class)?;
        if !self.state(cell).accepts_agent() {
            return Ok(None);
        }
        let agent = self.roster.insert(cell, class);
        self.occupy(cell, agent)?;
        Ok(Some(agent))
    }

    /// Move attractor `class` to `(x, y)` and refresh every cell's
    /// distance to it.
    ///
    /// Agents standing on the old or the new position are evicted. The
    /// old cell loses its attractor tag if it still carries it. A target
    /// holding another class's attractor is rejected.
    pub fn relocate_attractor(&mut self, class: ClassId, x: i32, y: i32) -> Result<(), SimError> {
        self.check_class(class)?;
        let target = self.cell_id(x, y)?;
        if let CellState::Attractor(other) = self.state(target) {
            if other != class {
                return Err(SimError::invalid(format!(
                    "({x}, {y}) already holds the attractor of class {other}"
                )));
            }
        }
        let old = self.attractors[class.index()];

        match self.state(old) {
            CellState::Attractor(k) if k == class => {
                self.set_state(old, CellState::Empty);
            }
            CellState::Occupied(_) => {
                self.set_state(old, CellState::Empty);
            }
            CellState::Producer(Some(_)) => {
                self.set_state(old, CellState::Producer(None));
            }
            _ => {}
        }
        self.set_state(target, CellState::Attractor(class));
        self.attractors[class.index()] = target;

        let k = class.index();
        for cell in &mut self.cells {
            cell.distance[k] = euclidean(cell.coords(), (x, y));
        }
        debug!(class = class.0, x, y, "relocated attractor");
        Ok(())
    }

    /// Rebuild the static gradient from the current walls.
    ///
    /// Fails with `InvalidConfiguration` when `radius` exceeds `i32::MAX`.
    pub fn recompute_gradient_field(&mut self, coeff: f64, radius: u32) -> Result<(), SimError> {
        let r = i32::try_from(radius)
            .map_err(|_| SimError::invalid(format!("gradient radius {radius} is too large")))?;
        let walls: Vec<(i32, i32)> = self.walls().collect();
        self.gradient.recompute(walls.iter().copied(), coeff, r);
        debug!(walls = walls.len(), coeff, radius, "recomputed gradient field");
        Ok(())
    }

    /// Move `agent` onto the free cell `to`, remembering the cell it
    /// leaves. Inertia and trail bookkeeping belong to the caller.
    pub fn move_agent(&mut self, agent: AgentId, to: CellId) -> Result<(), SimError> {
        let from = self.position(agent)?;
        if !self.state(to).accepts_agent() {
            return Err(SimError::invariant(format!(
                "agent {agent} cannot move onto cell {to} in state {:?}",
                self.state(to)
            )));
        }
        self.vacate(from, agent)?;
        self.occupy(to, agent)?;
        let a = self.agent_slot(agent)?;
        a.remember(from);
        a.cell = Some(to);
        Ok(())
    }

    /// Swap the cells of two agents in one step.
    pub fn exchange(&mut self, a: AgentId, b: AgentId) -> Result<(), SimError> {
        let cell_a = self.position(a)?;
        let cell_b = self.position(b)?;
        self.vacate(cell_a, a)?;
        self.vacate(cell_b, b)?;
        self.occupy(cell_a, b)?;
        self.occupy(cell_b, a)?;
        let agent_a = self.agent_slot(a)?;
        agent_a.remember(cell_a);
        agent_a.cell = Some(cell_b);
        let agent_b = self.agent_slot(b)?;
        agent_b.remember(cell_b);
        agent_b.cell = Some(cell_a);
        trace!(a = a.0, b = b.0, "exchanged places");
        Ok(())
    }

    /// Take `agent` off its cell and flag it as arrived. It stays in the
    /// roster until [`remove_arrived`](Self::remove_arrived).
    pub fn mark_arrived(&mut self, agent: AgentId) -> Result<(), SimError> {
        let from = self.position(agent)?;
        self.vacate(from, agent)?;
        let a = self.agent_slot(agent)?;
        a.remember(from);
        a.cell = None;
        a.arrived = true;
        trace!(agent = agent.0, cell = from.0, "agent arrived");
        Ok(())
    }

    /// Drop every arrived agent from the roster. Returns how many left.
    pub fn remove_arrived(&mut self) -> usize {
        let arrived: Vec<AgentId> = self
            .roster
            .iter()
            .filter(|a| a.is_arrived())
            .map(Agent::id)
            .collect();
        for &id in &arrived {
            self.roster.remove(id);
        }
        arrived.len()
    }

    /// Remove `agent` from the grid entirely.
    pub fn remove_agent(&mut self, agent: AgentId) -> Result<Agent, SimError> {
        if let Some(cell) = self.agent_slot(agent)?.cell {
            self.vacate(cell, agent)?;
        }
        self.roster
            .remove(agent)
            .ok_or_else(|| SimError::invariant(format!("agent {agent} vanished from roster")))
    }

    /// Cross-check cells and roster.
    ///
    /// Every occupant reference must name a live agent standing on that
    /// cell, and every agent that has not arrived must be referenced by
    /// its cell.
    pub fn check_invariants(&self) -> Result<(), SimError> {
        let mut seen = 0usize;
        for (i, cell) in self.cells.iter().enumerate() {
            let Some(id) = cell.state.occupant() else {
                continue;
            };
            seen += 1;
            match self.roster.get(id) {
                Some(agent) if agent.cell() == Some(CellId(i as u32)) => {}
                Some(agent) => {
                    return Err(SimError::invariant(format!(
                        "cell {i} names agent {id}, which stands on {:?}",
                        agent.cell()
                    )))
                }
                None => {
                    return Err(SimError::invariant(format!(
                        "cell {i} names agent {id}, which is not in the roster"
                    )))
                }
            }
        }
        let placed = self.roster.iter().filter(|a| a.cell().is_some()).count();
        if placed != seen {
            return Err(SimError::invariant(format!(
                "{placed} agents claim a cell but {seen} cells hold an agent"
            )));
        }
        if let Some(a) = self.roster.iter().find(|a| a.cell().is_none() && !a.is_arrived()) {
            return Err(SimError::invariant(format!(
                "agent {} has no cell but has not arrived",
                a.id()
            )));
        }
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────

    fn check_class(&self, class: ClassId) -> Result<(), SimError> {
        if class.index() >= self.attractors.len() {
            return Err(SimError::invalid(format!(
                "class {class} out of range for {} classes",
                self.attractors.len()
            )));
        }
        Ok(())
    }

    fn agent_slot(&mut self, agent: AgentId) -> Result<&mut Agent, SimError> {
        self.roster
            .get_mut(agent)
            .ok_or_else(|| SimError::invariant(format!("agent {agent} is not in the roster")))
    }

    /// Current cell of a live, placed agent.
    pub fn position(&self, agent: AgentId) -> Result<CellId, SimError> {
        self.roster
            .get(agent)
            .and_then(Agent::cell)
            .ok_or_else(|| SimError::invariant(format!("agent {agent} has no cell")))
    }

    fn vacate(&mut self, cell: CellId, agent: AgentId) -> Result<(), SimError> {
        let slot = &mut self.cells[cell.index()].state;
        *slot = match *slot {
            CellState::Occupied(a) if a == agent => CellState::Empty,
            CellState::Producer(Some(a)) if a == agent => CellState::Producer(None),
            other => {
                return Err(SimError::invariant(format!(
                    "agent {agent} believes it stands on cell {cell}, which is {other:?}"
                )))
            }
        };
        Ok(())
    }

    fn occupy(&mut self, cell: CellId, agent: AgentId) -> Result<(), SimError> {
        let slot = &mut self.cells[cell.index()].state;
        *slot = match *slot {
            CellState::Empty => CellState::Occupied(agent),
            CellState::Producer(None) => CellState::Producer(Some(agent)),
            other => {
                return Err(SimError::invariant(format!(
                    "cell {cell} cannot take agent {agent} while {other:?}"
                )))
            }
        };
        Ok(())
    }
}
