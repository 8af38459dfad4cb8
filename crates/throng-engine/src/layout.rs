//! Initial grid furniture.

use throng_core::{CellTag, SimError, MAX_CLASSES};
use throng_grid::Grid;
use tracing::debug;

use crate::config::{LayoutKind, SimConfig};

/// Default attractor positions, one per class slot.
///
/// Slot `k` is used by class `k`; when producers are enabled the slot
/// after the last class hosts the producer block.
pub fn default_slots(columns: u32, rows: u32) -> [(i32, i32); MAX_CLASSES] {
    let w = columns as i32;
    let h = rows as i32;
    [(w / 2, h - 2), (w - 2, h / 2), (2, h / 2), (w / 2, 1)]
}

/// Build the grid described by `config`.
///
/// `config` must already be validated.
pub fn build_grid(config: &SimConfig) -> Result<Grid, SimError> {
    let slots = default_slots(config.columns, config.rows);
    let classes = usize::from(config.num_classes);
    let mut grid = Grid::new(config.columns, config.rows, &slots[..classes])?;

    if config.layout == LayoutKind::Bordered {
        return Ok(grid);
    }

    for &(ax, ay) in &slots[..classes] {
        for (x, y) in ring(ax, ay) {
            if furnishable(&grid, x, y) {
                grid.place_door(x, y)?;
            }
        }
    }
    if config.producer_enabled {
        let (px, py) = slots[classes];
        for (x, y) in ring(px, py).chain(std::iter::once((px, py))) {
            if furnishable(&grid, x, y) {
                grid.place_producer(x, y)?;
            }
        }
    }
    debug!(
        columns = config.columns,
        rows = config.rows,
        classes,
        producers = grid.producers().len(),
        "built standard layout"
    );
    Ok(grid)
}

/// The eight cells around `(x, y)`.
fn ring(x: i32, y: i32) -> impl Iterator<Item = (i32, i32)> {
    (-1..=1)
        .flat_map(move |dx| (-1..=1).map(move |dy| (dx, dy)))
        .filter(|&d| d != (0, 0))
        .map(move |(dx, dy)| (x + dx, y + dy))
}

/// Layout furniture never leaves the grid and never covers an attractor.
fn furnishable(grid: &Grid, x: i32, y: i32) -> bool {
    matches!(grid.cell_tag(x, y), Ok(tag) if !matches!(tag, CellTag::Attractor(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use throng_core::ClassId;

    #[test]
    fn slots_match_grid_dimensions() {
        assert_eq!(default_slots(30, 60), [(15, 58), (28, 30), (2, 30), (15, 1)]);
    }

    #[test]
    fn bordered_layout_has_only_walls_and_attractors() {
        let mut cfg = SimConfig::new(8, 8, 2);
        cfg.layout = LayoutKind::Bordered;
        let g = build_grid(&cfg).unwrap();
        assert_eq!(g.walls().count(), 28);
        assert!(g.producers().is_empty());
        assert_eq!(g.cell_tag(4, 6).unwrap(), CellTag::Attractor(ClassId(0)));
        assert_eq!(g.cell_tag(6, 4).unwrap(), CellTag::Attractor(ClassId(1)));
    }

    #[test]
    fn standard_layout_rings_attractors_with_doors() {
        let cfg = SimConfig::new(12, 12, 1);
        let g = build_grid(&cfg).unwrap();
        // Class 0 sits at (6, 10); its ring reaches into the bottom wall.
        for (x, y) in ring(6, 10) {
            assert_eq!(g.cell_tag(x, y).unwrap(), CellTag::Door, "({x}, {y})");
        }
        assert_eq!(g.cell_tag(6, 10).unwrap(), CellTag::Attractor(ClassId(0)));
    }

    #[test]
    fn producer_block_fills_the_next_slot() {
        let cfg = SimConfig::new(12, 12, 1);
        let g = build_grid(&cfg).unwrap();
        // Slot 1 is (10, 6).
        assert_eq!(g.producers().len(), 9);
        for (x, y) in ring(10, 6).chain([(10, 6)]) {
            assert_eq!(g.cell_tag(x, y).unwrap(), CellTag::Producer);
        }
    }

    #[test]
    fn furniture_is_clipped_on_tiny_grids() {
        let mut cfg = SimConfig::new(3, 3, 3);
        cfg.producer_enabled = false;
        let g = build_grid(&cfg).unwrap();
        g.check_invariants().unwrap();
        assert_eq!(g.num_classes(), 3);
    }
}
