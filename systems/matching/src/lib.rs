#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure match detector that scans board snapshots for qualifying runs.
//!
//! Rows are scanned before columns. Each run of at least
//! [`MIN_MATCH_LENGTH`] identical pieces is reported on its own, so a cell
//! shared by a row run and a column run contributes to both runs while being
//! listed only once in the cleared set.

use std::collections::HashSet;

use theme_match_core::{BoardView, CellCoord, PieceType, MIN_MATCH_LENGTH};

/// Axis along which a run was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Run along a row, left to right.
    Row,
    /// Run along a column, top to bottom.
    Column,
}

/// Maximal contiguous sequence of identical pieces that qualifies as a match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchRun {
    axis: Axis,
    piece: PieceType,
    cells: Vec<CellCoord>,
}

impl MatchRun {
    /// Axis the run lies on.
    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// Piece type shared by every cell of the run.
    #[must_use]
    pub const fn piece(&self) -> PieceType {
        self.piece
    }

    /// Cells of the run in scan order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }
}

/// Outcome of a single match check.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchReport {
    runs: Vec<MatchRun>,
    cleared: Vec<CellCoord>,
}

impl MatchReport {
    /// Qualifying runs, rows first then columns.
    #[must_use]
    pub fn runs(&self) -> &[MatchRun] {
        &self.runs
    }

    /// Distinct cells to clear, in the order they were first matched.
    #[must_use]
    pub fn cleared(&self) -> &[CellCoord] {
        &self.cleared
    }

    /// Reports whether the check found nothing to clear.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Consumes the report, yielding the runs and the cleared set.
    #[must_use]
    pub fn into_parts(self) -> (Vec<MatchRun>, Vec<CellCoord>) {
        (self.runs, self.cleared)
    }
}

/// Scans every row and column of the board for qualifying runs.
#[must_use]
pub fn detect(view: BoardView<'_>) -> MatchReport {
    let (columns, rows) = view.dimensions();
    let mut runs = Vec::new();

    for row in 0..rows {
        scan_line(
            view,
            Axis::Row,
            (0..columns).map(|column| CellCoord::new(column, row)),
            &mut runs,
        );
    }
    for column in 0..columns {
        scan_line(
            view,
            Axis::Column,
            (0..rows).map(|row| CellCoord::new(column, row)),
            &mut runs,
        );
    }

    let mut seen = HashSet::new();
    let mut cleared = Vec::new();
    for run in &runs {
        for &cell in &run.cells {
            if seen.insert(cell) {
                cleared.push(cell);
            }
        }
    }

    MatchReport { runs, cleared }
}

fn scan_line(
    view: BoardView<'_>,
    axis: Axis,
    line: impl Iterator<Item = CellCoord>,
    out: &mut Vec<MatchRun>,
) {
    let mut current: Option<PieceType> = None;
    let mut cells: Vec<CellCoord> = Vec::new();

    for cell in line {
        let piece = view.piece(cell);
        if piece.is_some() && piece == current {
            cells.push(cell);
            continue;
        }
        flush(axis, current, &mut cells, out);
        current = piece;
        if piece.is_some() {
            cells.push(cell);
        }
    }
    flush(axis, current, &mut cells, out);
}

fn flush(
    axis: Axis,
    piece: Option<PieceType>,
    cells: &mut Vec<CellCoord>,
    out: &mut Vec<MatchRun>,
) {
    if let Some(piece) = piece {
        if cells.len() >= MIN_MATCH_LENGTH {
            out.push(MatchRun {
                axis,
                piece,
                cells: std::mem::take(cells),
            });
        }
    }
    cells.clear();
}
