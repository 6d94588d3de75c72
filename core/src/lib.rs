#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Theme Match engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The session submits [`Command`]
//! values describing desired grid mutations, the world executes those commands
//! via its `apply` entry point, and then reports [`Event`] values that the
//! presentation and audio collaborators consume. Systems query immutable
//! [`BoardView`] snapshots and never mutate the grid themselves.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod levels;

pub use catalog::{PieceCatalog, PieceColor, PieceShape, PieceType, PIECE_SLOTS};
pub use levels::{level_params, LevelParams, LEVEL_TABLE};

/// Default number of grid columns.
pub const DEFAULT_COLUMNS: u32 = 8;

/// Default number of grid rows.
pub const DEFAULT_ROWS: u32 = 8;

/// Minimum run length that qualifies as a match.
pub const MIN_MATCH_LENGTH: usize = 3;

/// Time a swapped piece spends travelling to its new cell.
pub const SWAP_DURATION: Duration = Duration::from_millis(150);

/// Time a dropping piece spends falling into its new cell.
pub const DROP_DURATION: Duration = Duration::from_millis(500);

/// Delay between a drop pass and the match check that follows it.
pub const DROP_SETTLE_DELAY: Duration = Duration::from_millis(750);

/// Time a spawned piece spends bouncing into its cell before it can match.
pub const SPAWN_SETTLE_DURATION: Duration = Duration::from_millis(1000);

/// Time a cleared piece spends leaving the board.
pub const REMOVE_DURATION: Duration = Duration::from_millis(500);

/// Spacing between the staggered safe spawns of a periodic burst.
pub const SPAWN_STAGGER: Duration = Duration::from_millis(500);

/// Spacing between the safe spawns that fill the board at game start.
pub const INITIAL_SPAWN_STAGGER: Duration = Duration::from_millis(100);

/// Number of pieces spawned when a game starts.
pub const INITIAL_SPAWN_COUNT: u32 = 15;

/// Grace period the game-over collaborator waits before acting.
pub const GAME_OVER_GRACE: Duration = Duration::from_millis(3000);

/// Commands that express all permissible grid mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Drops a new piece into the first free cell of the column.
    PlacePiece {
        /// Column receiving the piece.
        column: u32,
        /// Piece type to place.
        piece: PieceType,
    },
    /// Places a piece directly into a cell, replacing any occupant.
    PlacePieceAt {
        /// Cell receiving the piece.
        cell: CellCoord,
        /// Piece type to place.
        piece: PieceType,
    },
    /// Exchanges the occupants of two cells.
    Swap {
        /// Cell whose occupant initiates the swap.
        from: CellCoord,
        /// Cell receiving the initiating occupant.
        to: CellCoord,
    },
    /// Removes the occupants of the provided cells.
    Clear {
        /// Cells to empty.
        cells: Vec<CellCoord>,
    },
    /// Moves every piece to the lowest empty cell beneath it.
    ApplyGravity,
    /// Removes every piece from the grid.
    ClearBoard,
}

/// Events reported by the world and the session after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// A new piece entered the grid.
    PieceSpawned {
        /// Cell that now holds the piece.
        cell: CellCoord,
        /// Type of the spawned piece.
        piece: PieceType,
    },
    /// A piece travelled between two cells.
    PieceMoved {
        /// Cell the piece left.
        from: CellCoord,
        /// Cell the piece now occupies.
        to: CellCoord,
        /// Kind of movement, which determines the animation duration.
        motion: Motion,
    },
    /// A piece was removed from the grid.
    PieceCleared {
        /// Cell that held the removed piece.
        cell: CellCoord,
    },
    /// A column entered or left the full state.
    ColumnWarningChanged {
        /// Column whose state changed.
        column: u32,
        /// Whether the column currently has no free cell.
        full: bool,
    },
    /// The tap-to-swap selection changed.
    SelectionChanged {
        /// Newly selected cell, or `None` once the selection is cleared.
        cell: Option<CellCoord>,
    },
    /// A qualifying run was scored.
    MatchScored {
        /// Number of pieces in the run.
        length: u32,
        /// Points awarded for the run.
        points: u32,
        /// Session score after awarding the points.
        score: u32,
    },
    /// The player advanced to a new level.
    LevelAdvanced {
        /// Level that became active.
        level: u32,
    },
    /// The cascade resolver changed state.
    ResolverStateChanged {
        /// State that became active.
        state: ResolverState,
    },
    /// A named audio cue should be played.
    Cue {
        /// Cue to trigger.
        cue: AudioCue,
    },
    /// The game was lost.
    GameOver {
        /// Delay the game-over collaborator waits before acting.
        grace: Duration,
    },
}

/// Kind of movement reported with [`Event::PieceMoved`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Motion {
    /// Piece exchanged with a neighbour.
    Swap,
    /// Piece fell under gravity.
    Drop,
}

impl Motion {
    /// Duration hint for animating the movement.
    #[must_use]
    pub const fn duration(self) -> Duration {
        match self {
            Self::Swap => SWAP_DURATION,
            Self::Drop => DROP_DURATION,
        }
    }
}

/// Discrete audio cues fired by the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AudioCue {
    /// Two pieces were swapped.
    Swap,
    /// A piece was spawned.
    Drop,
    /// A run of three was matched.
    Match,
    /// A run of four or more was matched.
    Bonus,
    /// A spawn filled its column.
    Warning,
    /// The game was lost.
    Lose,
    /// A new level was reached.
    Victory,
}

impl AudioCue {
    /// Stable name used by audio backends to look up the sample.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Swap => "swap",
            Self::Drop => "drop",
            Self::Match => "match",
            Self::Bonus => "bonus",
            Self::Warning => "warning",
            Self::Lose => "lose",
            Self::Victory => "victory",
        }
    }
}

/// Activity state of the cascade resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolverState {
    /// No cascade step is pending.
    Idle,
    /// A cascade pass is running or waiting for a drop batch to settle.
    Resolving,
}

/// Cardinal directions between orthogonally adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing column indices.
    Left,
    /// Toward increasing column indices.
    Right,
    /// Toward decreasing row indices, the top of the grid.
    Up,
    /// Toward increasing row indices, the bottom of the grid.
    Down,
}

impl Direction {
    /// All directions in a stable order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Row zero is the top of the grid; gravity pulls pieces toward the last row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Direction from this cell to `other` when the two are orthogonal neighbours.
    ///
    /// Diagonal, identical, and distant pairs yield `None`.
    #[must_use]
    pub fn direction_to(self, other: CellCoord) -> Option<Direction> {
        let column_diff = self.column.abs_diff(other.column);
        let row_diff = self.row.abs_diff(other.row);

        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if other.column > self.column {
                Some(Direction::Right)
            } else {
                Some(Direction::Left)
            }
        } else if other.row > self.row {
            Some(Direction::Down)
        } else {
            Some(Direction::Up)
        }
    }
}

/// Read-only view into the dense piece grid.
///
/// Cells are stored row-major: `index = row * columns + column`.
#[derive(Clone, Copy, Debug)]
pub struct BoardView<'a> {
    cells: &'a [Option<PieceType>],
    columns: u32,
    rows: u32,
}

impl<'a> BoardView<'a> {
    /// Captures a new board view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [Option<PieceType>], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Provides the dimensions of the underlying grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Returns the piece occupying the provided cell, if any.
    #[must_use]
    pub fn piece(&self, cell: CellCoord) -> Option<PieceType> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Returns the orthogonal neighbour in `direction`, or `None` at the grid edge.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        if !self.contains(cell) {
            return None;
        }

        let (column, row) = (cell.column(), cell.row());
        let neighbor = match direction {
            Direction::Left => CellCoord::new(column.checked_sub(1)?, row),
            Direction::Right => CellCoord::new(column + 1, row),
            Direction::Up => CellCoord::new(column, row.checked_sub(1)?),
            Direction::Down => CellCoord::new(column, row + 1),
        };

        self.contains(neighbor).then_some(neighbor)
    }

    /// Lowest free cell of the empty segment that starts at the top of the column.
    ///
    /// Returns `None` when the top cell is occupied or the column lies outside
    /// the grid.
    #[must_use]
    pub fn first_free_cell(&self, column: u32) -> Option<CellCoord> {
        if column >= self.columns {
            return None;
        }

        let mut free = None;
        for row in 0..self.rows {
            let cell = CellCoord::new(column, row);
            if self.piece(cell).is_some() {
                break;
            }
            free = Some(cell);
        }
        free
    }

    /// Reports whether the column cannot accept another piece.
    #[must_use]
    pub fn is_column_full(&self, column: u32) -> bool {
        self.first_free_cell(column).is_none()
    }

    /// Iterates over every cell coordinate with its occupant in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Option<PieceType>)> + 'a {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, piece)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *piece)
        })
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|piece| piece.is_some()).count()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
