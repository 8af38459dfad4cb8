//! Crowd density over a square window.
//!
//! Density is measured on a 0 to 10 scale as the occupied share of the
//! open floor (`Empty` or `Occupied` cells) inside the window. Walls,
//! doors, producers and attractors count neither way.

use throng_core::{CellState, SimError};

use crate::grid::Grid;

/// Fewest floor cells a window needs before its density is reported.
pub const MIN_FLOOR_CELLS: usize = 6;

/// Window used by [`Grid::max_density`].
pub const MAX_DENSITY_WINDOW: u32 = 7;

/// Highest density reading and where it was taken.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DensityPeak {
    /// Density on the 0 to 10 scale.
    pub value: f64,
    /// Column of the window centre.
    pub x: i32,
    /// Row of the window centre.
    pub y: i32,
}

impl Grid {
    /// Density of the `window x window` square centred on `(x, y)`,
    /// clipped to the grid.
    ///
    /// Returns 0 when the window holds fewer than [`MIN_FLOOR_CELLS`]
    /// floor cells. `window` must be odd.
    pub fn local_density(&self, x: i32, y: i32, window: u32) -> Result<f64, SimError> {
        self.cell_id(x, y)?;
        if window % 2 == 0 {
            return Err(SimError::invalid(format!(
                "density window must be odd, got {window}"
            )));
        }
        Ok(self.window_density(x, y, window))
    }

    /// Highest [`MAX_DENSITY_WINDOW`] density over every floor cell.
    ///
    /// Columns are scanned outermost. The first cell reaching a strictly
    /// higher value wins, and the scan stops early at a full 10. An empty
    /// crowd yields a zero peak at `(0, 0)`.
    pub fn max_density(&self) -> DensityPeak {
        let mut peak = DensityPeak {
            value: 0.0,
            x: 0,
            y: 0,
        };
        for x in 0..self.width() as i32 {
            for y in 0..self.height() as i32 {
                match self.cell_at(x, y) {
                    Ok(cell) if cell.state().is_floor() => {}
                    _ => continue,
                }
                let value = self.window_density(x, y, MAX_DENSITY_WINDOW);
                if value > peak.value {
                    peak = DensityPeak { value, x, y };
                    if value >= 10.0 {
                        return peak;
                    }
                }
            }
        }
        peak
    }

    fn window_density(&self, x: i32, y: i32, window: u32) -> f64 {
        let half = i32::try_from(window / 2).unwrap_or(i32::MAX);
        let max_x = self.width() as i32 - 1;
        let max_y = self.height() as i32 - 1;
        let cols = x.saturating_sub(half).max(0)..=x.saturating_add(half).min(max_x);
        let rows = y.saturating_sub(half).max(0)..=y.saturating_add(half).min(max_y);
        let mut floor = 0usize;
        let mut occupied = 0usize;
        for i in cols {
            for j in rows.clone() {
                let Ok(cell) = self.cell_at(i, j) else {
                    continue;
                };
                match cell.state() {
                    CellState::Empty => floor += 1,
                    CellState::Occupied(_) => {
                        floor += 1;
                        occupied += 1;
                    }
                    _ => {}
                }
            }
        }
        if floor < MIN_FLOOR_CELLS {
            return 0.0;
        }
        occupied as f64 * 10.0 / floor as f64
    }
}
