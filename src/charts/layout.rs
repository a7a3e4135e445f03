//! Facet Layout Module
//! Grid bookkeeping for faceted charts: flattened-index arithmetic and the
//! label-thinning rules that keep dense grids legible.

/// Shape of a facet grid, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub nrows: usize,
    pub ncols: usize,
}

impl GridShape {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self { nrows, ncols }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.nrows * self.ncols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (row, col) of a cell in a flattened row-major sequence.
    pub fn cell(&self, index: usize) -> (usize, usize) {
        (index / self.ncols, index % self.ncols)
    }

    /// A cell keeps its y-axis label only in the first column of the
    /// vertically centred row.
    pub fn keep_y_label(&self, row: usize, col: usize) -> bool {
        col == 0 && row == self.nrows / 2
    }

    /// A cell keeps its x-axis label only in the horizontally centred column
    /// of the last row.
    pub fn keep_x_label(&self, row: usize, col: usize) -> bool {
        self.nrows > 0 && row == self.nrows - 1 && col == self.ncols / 2
    }
}

/// Proportional tick thinning: with more than 5 categories only the second,
/// middle and last tick labels survive.
pub fn keep_proportional_tick(len: usize, index: usize) -> bool {
    if len <= 5 {
        return true;
    }
    index == 1 || index == len / 2 || index == len - 1
}

/// Fixed tick thinning used by the compact layout: indices 1, 5 and 9 only,
/// whatever the category count.
pub fn keep_fixed_tick(index: usize) -> bool {
    matches!(index, 1 | 5 | 9)
}
