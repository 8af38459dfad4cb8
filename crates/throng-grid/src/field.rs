//! Scalar fields layered over the grid.
//!
//! - [`GradientField`]: static obstacle repulsion, rebuilt only on request.
//! - [`TrailField`]: one diffusing, decaying layer per agent class.
//!
//! Both are stored row-major with the same indexing as
//! [`CellId`](throng_core::CellId).

use throng_core::{CellId, ClassId};

/// Upper bound of every trail value.
pub const TRAIL_MAX: f64 = 5.0;

/// Static repulsion from walls.
///
/// Each wall at `(wx, wy)` adds `coeff / (|dx| + |dy| + 1)` to the cell
/// at `(wx + dx, wy + dy)` for every offset within `radius` on both axes.
/// Offsets that fall off the grid are clamped onto the edge cell, so
/// border walls pile their influence up along the border.
#[derive(Clone, Debug)]
pub struct GradientField {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl GradientField {
    /// An all-zero field.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as usize,
            height: height as usize,
            values: vec![0.0; width as usize * height as usize],
        }
    }

    /// Rebuild the field from scratch for the given wall positions.
    ///
    /// O(walls · (2·radius + 1)²).
    pub fn recompute(
        &mut self,
        walls: impl IntoIterator<Item = (i32, i32)>,
        coeff: f64,
        radius: i32,
    ) {
        self.values.fill(0.0);
        let r = radius.max(0);
        let max_x = self.width as i32 - 1;
        let max_y = self.height as i32 - 1;
        for (wx, wy) in walls {
            for dx in -r..=r {
                for dy in -r..=r {
                    let weight = coeff / (f64::from(dx.abs()) + f64::from(dy.abs()) + 1.0);
                    let x = wx.saturating_add(dx).clamp(0, max_x) as usize;
                    let y = wy.saturating_add(dy).clamp(0, max_y) as usize;
                    self.values[y * self.width + x] += weight;
                }
            }
        }
    }

    /// Repulsion at `cell`.
    pub fn get(&self, cell: CellId) -> f64 {
        self.values[cell.index()]
    }

    /// Raw row-major values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Per-class trail field.
///
/// Agents deposit into their class layer as they move; every epoch the
/// layers diffuse to their 4-connected neighbours, decay, and are
/// clipped to `[0, TRAIL_MAX]`.
#[derive(Clone, Debug)]
pub struct TrailField {
    width: usize,
    height: usize,
    classes: usize,
    values: Vec<f64>,
}

impl TrailField {
    /// An all-zero field with one layer per class.
    pub fn new(width: u32, height: u32, classes: usize) -> Self {
        let cells = width as usize * height as usize;
        Self {
            width: width as usize,
            height: height as usize,
            classes,
            values: vec![0.0; cells * classes],
        }
    }

    fn cells(&self) -> usize {
        self.width * self.height
    }

    /// Trail of `class` at `cell`.
    pub fn get(&self, class: ClassId, cell: CellId) -> f64 {
        self.values[class.index() * self.cells() + cell.index()]
    }

    /// One class layer, row-major.
    pub fn layer(&self, class: ClassId) -> &[f64] {
        let n = self.cells();
        &self.values[class.index() * n..(class.index() + 1) * n]
    }

    /// Add `amount` to `class` at `cell`, saturating at [`TRAIL_MAX`].
    pub fn deposit(&mut self, class: ClassId, cell: CellId, amount: f64) {
        let i = class.index() * self.cells() + cell.index();
        self.values[i] = (self.values[i] + amount).clamp(0.0, TRAIL_MAX);
    }

    /// Whether every value is zero.
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }

    /// Advance every layer by one epoch.
    ///
    /// ```text
    /// new[i] = coeff · Σ prev[neighbours(i)] / 4 + (1 - decay) · prev[i]
    /// ```
    ///
    /// Neighbours outside the grid contribute zero. The result is clipped
    /// to `[0, TRAIL_MAX]`.
    pub fn diffuse(&mut self, coeff: f64, decay: f64) {
        let rows = self.height;
        let cols = self.width;
        let n = self.cells();
        let keep = 1.0 - decay;
        for k in 0..self.classes {
            let layer = &mut self.values[k * n..(k + 1) * n];
            let prev = layer.to_vec();
            for r in 0..rows {
                for c in 0..cols {
                    let i = r * cols + c;
                    let mut sum = 0.0;
                    if r > 0 {
                        sum += prev[(r - 1) * cols + c];
                    }
                    if r + 1 < rows {
                        sum += prev[(r + 1) * cols + c];
                    }
                    if c > 0 {
                        sum += prev[r * cols + (c - 1)];
                    }
                    if c + 1 < cols {
                        sum += prev[r * cols + (c + 1)];
                    }
                    layer[i] = (coeff * sum / 4.0 + keep * prev[i]).clamp(0.0, TRAIL_MAX);
                }
            }
        }
    }
}
