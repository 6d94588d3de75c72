use theme_match_core::{BoardView, CellCoord, Direction, PieceType};
use thiserror::Error;

/// Contract violations raised when callers address cells outside the grid.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The cell lies outside the configured dimensions.
    #[error("cell ({column}, {row}) lies outside the grid")]
    OutOfBounds {
        /// Requested column.
        column: u32,
        /// Requested row.
        row: u32,
    },
    /// The column lies outside the configured dimensions.
    #[error("column {column} lies outside the grid")]
    ColumnOutOfBounds {
        /// Requested column.
        column: u32,
    },
    /// The linear index lies past the last cell.
    #[error("linear index {index} lies outside the grid")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
    },
}

/// Snapshot of a single grid slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    piece: Option<PieceType>,
    warning: bool,
}

impl Cell {
    /// Piece occupying the cell, if any.
    #[must_use]
    pub const fn piece(&self) -> Option<PieceType> {
        self.piece
    }

    /// Whether the cell's column is currently full, for presentation feedback.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        self.warning
    }
}

/// Fixed-size matrix of cells, each holding zero or one piece.
///
/// Row zero is the top of the grid. Storage is row-major, so the linear index
/// of `(column, row)` is `row * columns + column`.
#[derive(Clone, Debug)]
pub struct Grid {
    columns: u32,
    rows: u32,
    pieces: Vec<Option<PieceType>>,
    warnings: Vec<bool>,
}

impl Grid {
    /// Creates an empty grid with the provided dimensions.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let width = usize::try_from(columns).unwrap_or(0);
        Self {
            columns,
            rows,
            pieces: vec![None; capacity],
            warnings: vec![false; width],
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Read-only view used by the systems.
    #[must_use]
    pub fn view(&self) -> BoardView<'_> {
        BoardView::new(&self.pieces, self.columns, self.rows)
    }

    /// Linear index of the cell.
    pub fn linear_index(&self, cell: CellCoord) -> Result<usize, GridError> {
        if !self.view().contains(cell) {
            return Err(GridError::OutOfBounds {
                column: cell.column(),
                row: cell.row(),
            });
        }
        let index = u64::from(cell.row()) * u64::from(self.columns) + u64::from(cell.column());
        usize::try_from(index).map_err(|_| GridError::OutOfBounds {
            column: cell.column(),
            row: cell.row(),
        })
    }

    /// Cell coordinate for a linear index; the inverse of [`Grid::linear_index`].
    pub fn coord_at(&self, index: usize) -> Result<CellCoord, GridError> {
        if index >= self.pieces.len() || self.columns == 0 {
            return Err(GridError::IndexOutOfBounds { index });
        }
        let index = u32::try_from(index).map_err(|_| GridError::IndexOutOfBounds { index })?;
        Ok(CellCoord::new(index % self.columns, index / self.columns))
    }

    /// Snapshot of the cell at `(column, row)`.
    pub fn cell_at(&self, cell: CellCoord) -> Result<Cell, GridError> {
        let index = self.linear_index(cell)?;
        let warning = self.column_warning(cell.column());
        Ok(Cell {
            piece: self.pieces[index],
            warning,
        })
    }

    /// Direction from `a` to `b` when both lie in the grid and are orthogonal neighbours.
    #[must_use]
    pub fn adjacency(&self, a: CellCoord, b: CellCoord) -> Option<Direction> {
        let view = self.view();
        if !view.contains(a) || !view.contains(b) {
            return None;
        }
        a.direction_to(b)
    }

    /// Neighbour of `cell` in `direction`, or `None` at the grid edge.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        self.view().neighbor(cell, direction)
    }

    /// Cell a new piece entering the column would occupy, or `None` when the column is full.
    pub fn first_free_cell_in_column(&self, column: u32) -> Result<Option<CellCoord>, GridError> {
        self.check_column(column)?;
        Ok(self.view().first_free_cell(column))
    }

    /// Whether the column has no free cell.
    pub fn is_column_full(&self, column: u32) -> Result<bool, GridError> {
        Ok(self.first_free_cell_in_column(column)?.is_none())
    }

    /// Column warning flags as last recomputed.
    #[must_use]
    pub fn warnings(&self) -> &[bool] {
        &self.warnings
    }

    fn column_warning(&self, column: u32) -> bool {
        usize::try_from(column)
            .ok()
            .and_then(|column| self.warnings.get(column).copied())
            .unwrap_or(false)
    }

    fn check_column(&self, column: u32) -> Result<(), GridError> {
        if column < self.columns {
            Ok(())
        } else {
            Err(GridError::ColumnOutOfBounds { column })
        }
    }

    pub(crate) fn piece(&self, cell: CellCoord) -> Option<PieceType> {
        self.view().piece(cell)
    }

    pub(crate) fn put(&mut self, cell: CellCoord, piece: Option<PieceType>) {
        if let Ok(index) = self.linear_index(cell) {
            self.pieces[index] = piece;
        }
    }

    pub(crate) fn take(&mut self, cell: CellCoord) -> Option<PieceType> {
        let index = self.linear_index(cell).ok()?;
        self.pieces[index].take()
    }

    pub(crate) fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Recomputes the per-column full flags, returning the columns that changed.
    pub(crate) fn refresh_warnings(&mut self) -> Vec<(u32, bool)> {
        let mut changed = Vec::new();
        for column in 0..self.columns {
            let full = self.view().is_column_full(column);
            let Ok(slot) = usize::try_from(column) else {
                continue;
            };
            if let Some(flag) = self.warnings.get_mut(slot) {
                if *flag != full {
                    *flag = full;
                    changed.push((column, full));
                }
            }
        }
        changed
    }
}
