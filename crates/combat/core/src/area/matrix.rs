//! Bit-packed rectangular grid with a marked center cell.

use super::AreaError;

type Word = u64;
const BITS_PER_WORD: usize = Word::BITS as usize;

/// Geometric transform applied while copying one grid into another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatrixOperation {
    Copy,
    /// Reverse the column order of every row (left/right).
    Mirror,
    /// Reverse the row order (top/bottom).
    Flip,
    /// Quarter turn clockwise on screen (`y` grows downward).
    Rotate90,
    Rotate180,
    /// Quarter turn counter-clockwise on screen.
    Rotate270,
}

impl MatrixOperation {
    /// Output dimensions for an input of `rows x cols`.
    const fn output_dims(self, rows: u32, cols: u32) -> (u32, u32) {
        match self {
            Self::Rotate90 | Self::Rotate270 => (cols, rows),
            _ => (rows, cols),
        }
    }

    /// Where input cell `(row, col)` lands in the output.
    const fn map(self, row: u32, col: u32, rows: u32, cols: u32) -> (u32, u32) {
        match self {
            Self::Copy => (row, col),
            Self::Mirror => (row, cols - 1 - col),
            Self::Flip => (rows - 1 - row, col),
            Self::Rotate90 => (col, rows - 1 - row),
            Self::Rotate180 => (rows - 1 - row, cols - 1 - col),
            Self::Rotate270 => (cols - 1 - col, row),
        }
    }
}

/// A `rows x cols` grid of booleans packed into machine words.
///
/// Not `Clone`; grids are duplicated through [`MatrixArea::copy_from`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MatrixArea {
    data: Option<Vec<Word>>,
    center: (u32, u32),
    rows: u32,
    cols: u32,
}

impl MatrixArea {
    pub const fn new() -> Self {
        Self {
            data: None,
            center: (0, 0),
            rows: 0,
            cols: 0,
        }
    }

    /// Allocates zeroed storage for `rows x cols` cells, discarding any previous
    /// storage and resetting the center to `(0, 0)`.
    pub fn setup_area(&mut self, rows: u32, cols: u32) -> Result<(), AreaError> {
        if rows == 0 || cols == 0 {
            return Err(AreaError::EmptyGrid { rows, cols });
        }

        let cells = rows as usize * cols as usize;
        let words = cells.div_ceil(BITS_PER_WORD);

        let mut data = Vec::new();
        data.try_reserve_exact(words)
            .map_err(|_| AreaError::Allocation { rows, cols })?;
        data.resize(words, 0);

        self.data = Some(data);
        self.center = (0, 0);
        self.rows = rows;
        self.cols = cols;
        Ok(())
    }

    /// Releases storage. The grid reports uninitialized afterwards.
    pub fn clear(&mut self) {
        self.data = None;
        self.center = (0, 0);
        self.rows = 0;
        self.cols = 0;
    }

    pub fn is_initialized(&self) -> bool {
        self.data.is_some()
    }

    pub const fn rows(&self) -> u32 {
        self.rows
    }

    pub const fn cols(&self) -> u32 {
        self.cols
    }

    /// Caster cell as `(row, col)`.
    pub const fn center(&self) -> (u32, u32) {
        self.center
    }

    pub fn set_center(&mut self, row: u32, col: u32) -> Result<(), AreaError> {
        self.check_bounds(row, col)?;
        self.center = (row, col);
        Ok(())
    }

    pub fn set_value(&mut self, row: u32, col: u32, value: bool) -> Result<(), AreaError> {
        self.check_bounds(row, col)?;
        let index = self.index(row, col);
        let Some(data) = self.data.as_mut() else {
            return Err(AreaError::Uninitialized);
        };

        let mask: Word = 1 << (index % BITS_PER_WORD);
        if value {
            data[index / BITS_PER_WORD] |= mask;
        } else {
            data[index / BITS_PER_WORD] &= !mask;
        }
        Ok(())
    }

    /// Bounds-checked read. Cells outside the grid read as unset.
    pub fn get_value(&self, row: u32, col: u32) -> bool {
        if row >= self.rows || col >= self.cols || self.data.is_none() {
            return false;
        }
        self.get_value_unchecked(row, col)
    }

    /// Read without the row/column range check.
    ///
    /// Callers must stay inside `[0, rows) x [0, cols)`; a cell outside the grid
    /// aliases another cell or panics on the word index.
    #[inline]
    pub fn get_value_unchecked(&self, row: u32, col: u32) -> bool {
        let index = self.index(row, col);
        self.data
            .as_ref()
            .is_some_and(|data| data[index / BITS_PER_WORD] & (1 << (index % BITS_PER_WORD)) != 0)
    }

    /// Iterates set cells in row-major order.
    pub fn iter_set(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let cols = self.cols;
        (0..self.rows)
            .flat_map(move |row| (0..cols).map(move |col| (row, col)))
            .filter(|&(row, col)| self.get_value_unchecked(row, col))
    }

    /// Number of set cells.
    pub fn count(&self) -> usize {
        self.data
            .as_ref()
            .map_or(0, |data| data.iter().map(|w| w.count_ones() as usize).sum())
    }

    /// Rebuilds `self` as a transformed copy of `input`, center included.
    pub fn copy_from(&mut self, input: &MatrixArea, op: MatrixOperation) -> Result<(), AreaError> {
        if !input.is_initialized() {
            return Err(AreaError::Uninitialized);
        }

        let (rows, cols) = op.output_dims(input.rows, input.cols);
        self.setup_area(rows, cols)?;

        for (row, col) in input.iter_set() {
            let (r, c) = op.map(row, col, input.rows, input.cols);
            self.set_value(r, c, true)?;
        }

        let (center_row, center_col) = input.center;
        let (r, c) = op.map(center_row, center_col, input.rows, input.cols);
        self.set_center(r, c)
    }

    #[inline]
    const fn index(&self, row: u32, col: u32) -> usize {
        row as usize * self.cols as usize + col as usize
    }

    fn check_bounds(&self, row: u32, col: u32) -> Result<(), AreaError> {
        if !self.is_initialized() {
            return Err(AreaError::Uninitialized);
        }
        if row >= self.rows || col >= self.cols {
            return Err(AreaError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: u32, cols: u32, set: &[(u32, u32)], center: (u32, u32)) -> MatrixArea {
        let mut grid = MatrixArea::new();
        grid.setup_area(rows, cols).unwrap();
        for &(r, c) in set {
            grid.set_value(r, c, true).unwrap();
        }
        grid.set_center(center.0, center.1).unwrap();
        grid
    }

    #[test]
    fn setup_allocates_zeroed_storage() {
        let mut grid = MatrixArea::new();
        assert!(!grid.is_initialized());

        grid.setup_area(9, 9).unwrap();
        assert!(grid.is_initialized());
        assert_eq!(grid.count(), 0);
        assert_eq!((grid.rows(), grid.cols()), (9, 9));
    }

    #[test]
    fn resetup_discards_previous_bits() {
        let mut grid = grid_from(3, 3, &[(1, 1)], (1, 1));
        grid.setup_area(3, 3).unwrap();
        assert!(!grid.get_value(1, 1));
        assert_eq!(grid.center(), (0, 0));
    }

    #[test]
    fn values_span_word_boundaries() {
        // 9 x 9 = 81 cells, second word starts at index 64 = (7, 1)
        let mut grid = grid_from(9, 9, &[(7, 0), (7, 1), (8, 8)], (0, 0));
        assert!(grid.get_value(7, 0));
        assert!(grid.get_value(7, 1));
        assert!(grid.get_value(8, 8));
        assert_eq!(grid.count(), 3);

        grid.set_value(7, 1, false).unwrap();
        assert!(!grid.get_value(7, 1));
        assert_eq!(grid.count(), 2);
    }

    #[test]
    fn out_of_range_access_is_rejected() {
        let mut grid = grid_from(2, 3, &[], (0, 0));
        assert!(matches!(
            grid.set_value(2, 0, true),
            Err(AreaError::OutOfBounds { row: 2, .. })
        ));
        assert!(matches!(grid.set_center(0, 3), Err(AreaError::OutOfBounds { .. })));
        assert!(!grid.get_value(5, 5));
    }

    #[test]
    fn uninitialized_grid_rejects_writes() {
        let mut grid = MatrixArea::new();
        assert_eq!(grid.set_value(0, 0, true), Err(AreaError::Uninitialized));
    }

    #[test]
    fn rotations_move_a_forward_line() {
        // South-facing line: center on top, two cells below it.
        let south = grid_from(3, 1, &[(1, 0), (2, 0)], (0, 0));

        let mut west = MatrixArea::new();
        west.copy_from(&south, MatrixOperation::Rotate90).unwrap();
        assert_eq!((west.rows(), west.cols()), (1, 3));
        assert_eq!(west.center(), (0, 2));
        assert_eq!(west.iter_set().collect::<Vec<_>>(), vec![(0, 0), (0, 1)]);

        let mut east = MatrixArea::new();
        east.copy_from(&south, MatrixOperation::Rotate270).unwrap();
        assert_eq!(east.center(), (0, 0));
        assert_eq!(east.iter_set().collect::<Vec<_>>(), vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn mirror_then_flip_equals_rotate180() {
        let source = grid_from(3, 4, &[(0, 0), (1, 3), (2, 1)], (2, 1));

        let mut mirrored = MatrixArea::new();
        mirrored.copy_from(&source, MatrixOperation::Mirror).unwrap();
        let mut both = MatrixArea::new();
        both.copy_from(&mirrored, MatrixOperation::Flip).unwrap();

        let mut rotated = MatrixArea::new();
        rotated.copy_from(&source, MatrixOperation::Rotate180).unwrap();

        assert_eq!(both, rotated);
    }
}
