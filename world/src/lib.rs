#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state management for Theme Match.

mod grid;

use theme_match_core::{CellCoord, Command, Event, Motion, PieceType, DEFAULT_COLUMNS, DEFAULT_ROWS};

pub use grid::{Cell, Grid, GridError};

/// Represents the authoritative Theme Match world state.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
}

impl World {
    /// Creates an empty world using the default 8x8 grid.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dimensions(DEFAULT_COLUMNS, DEFAULT_ROWS)
    }

    /// Creates an empty world with the provided grid dimensions.
    #[must_use]
    pub fn with_dimensions(columns: u32, rows: u32) -> Self {
        Self {
            grid: Grid::new(columns, rows),
        }
    }

    fn place_piece(&mut self, column: u32, piece: PieceType, out_events: &mut Vec<Event>) {
        let Some(cell) = self.grid.view().first_free_cell(column) else {
            return;
        };
        self.grid.put(cell, Some(piece));
        out_events.push(Event::PieceSpawned { cell, piece });
    }

    fn place_piece_at(&mut self, cell: CellCoord, piece: PieceType, out_events: &mut Vec<Event>) {
        if !self.grid.view().contains(cell) {
            return;
        }
        self.grid.put(cell, Some(piece));
        out_events.push(Event::PieceSpawned { cell, piece });
    }

    fn swap(&mut self, from: CellCoord, to: CellCoord, out_events: &mut Vec<Event>) {
        if self.grid.adjacency(from, to).is_none() {
            return;
        }
        let Some(moving) = self.grid.piece(from) else {
            return;
        };

        let displaced = self.grid.piece(to);
        self.grid.put(to, Some(moving));
        self.grid.put(from, displaced);

        out_events.push(Event::PieceMoved {
            from,
            to,
            motion: Motion::Swap,
        });
        if displaced.is_some() {
            out_events.push(Event::PieceMoved {
                from: to,
                to: from,
                motion: Motion::Swap,
            });
        }
    }

    fn clear(&mut self, cells: &[CellCoord], out_events: &mut Vec<Event>) {
        for &cell in cells {
            if self.grid.take(cell).is_some() {
                out_events.push(Event::PieceCleared { cell });
            }
        }
    }

    fn apply_gravity(&mut self, out_events: &mut Vec<Event>) {
        let rows = self.grid.rows();
        for index in (0..self.grid.len()).rev() {
            let Ok(from) = self.grid.coord_at(index) else {
                continue;
            };
            if self.grid.piece(from).is_none() {
                continue;
            }

            let landing = (from.row() + 1..rows)
                .rev()
                .map(|row| CellCoord::new(from.column(), row))
                .find(|cell| self.grid.piece(*cell).is_none());

            if let Some(to) = landing {
                let piece = self.grid.take(from);
                self.grid.put(to, piece);
                out_events.push(Event::PieceMoved {
                    from,
                    to,
                    motion: Motion::Drop,
                });
            }
        }
    }

    fn clear_board(&mut self, out_events: &mut Vec<Event>) {
        for index in 0..self.grid.len() {
            let Ok(cell) = self.grid.coord_at(index) else {
                continue;
            };
            if self.grid.take(cell).is_some() {
                out_events.push(Event::PieceCleared { cell });
            }
        }
    }

    fn refresh_warnings(&mut self, out_events: &mut Vec<Event>) {
        for (column, full) in self.grid.refresh_warnings() {
            out_events.push(Event::ColumnWarningChanged { column, full });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands that cannot be honoured (cells outside the grid, empty swap
/// sources, full columns) leave the grid untouched and emit nothing. Every
/// mutation is followed by a column warning recomputation.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlacePiece { column, piece } => world.place_piece(column, piece, out_events),
        Command::PlacePieceAt { cell, piece } => world.place_piece_at(cell, piece, out_events),
        Command::Swap { from, to } => world.swap(from, to, out_events),
        Command::Clear { cells } => world.clear(&cells, out_events),
        Command::ApplyGravity => world.apply_gravity(out_events),
        Command::ClearBoard => world.clear_board(out_events),
    }
    world.refresh_warnings(out_events);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Grid, World};
    use theme_match_core::BoardView;

    /// Provides read-only access to the grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Captures a read-only view of the pieces on the grid.
    #[must_use]
    pub fn board_view(world: &World) -> BoardView<'_> {
        world.grid.view()
    }

    /// Column warning flags, indexed by column.
    #[must_use]
    pub fn column_warnings(world: &World) -> &[bool] {
        world.grid.warnings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use theme_match_core::{PieceColor, PieceShape};

    const RED: PieceType = PieceType::new(PieceShape::Apple, PieceColor::Red);
    const BLUE: PieceType = PieceType::new(PieceShape::Diamond, PieceColor::Blue);

    fn place(world: &mut World, column: u32, row: u32, piece: PieceType) {
        let mut events = Vec::new();
        apply(
            world,
            Command::PlacePieceAt {
                cell: CellCoord::new(column, row),
                piece,
            },
            &mut events,
        );
    }

    #[test]
    fn place_piece_lands_on_top_of_the_stack() {
        let mut world = World::with_dimensions(3, 4);
        place(&mut world, 1, 3, RED);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlacePiece {
                column: 1,
                piece: BLUE,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::PieceSpawned {
                cell: CellCoord::new(1, 2),
                piece: BLUE,
            }]
        );
    }

    #[test]
    fn place_piece_into_full_column_is_ignored() {
        let mut world = World::with_dimensions(1, 2);
        place(&mut world, 0, 0, RED);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlacePiece {
                column: 0,
                piece: BLUE,
            },
            &mut events,
        );

        assert!(events.is_empty());
        assert_eq!(query::board_view(&world).piece(CellCoord::new(0, 0)), Some(RED));
    }

    #[test]
    fn swap_into_empty_cell_moves_the_piece() {
        let mut world = World::with_dimensions(3, 3);
        place(&mut world, 0, 2, RED);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Swap {
                from: CellCoord::new(0, 2),
                to: CellCoord::new(1, 2),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::PieceMoved {
                from: CellCoord::new(0, 2),
                to: CellCoord::new(1, 2),
                motion: Motion::Swap,
            }]
        );
        let view = query::board_view(&world);
        assert_eq!(view.piece(CellCoord::new(0, 2)), None);
        assert_eq!(view.piece(CellCoord::new(1, 2)), Some(RED));
    }

    #[test]
    fn swap_from_empty_or_distant_cell_is_ignored() {
        let mut world = World::with_dimensions(3, 3);
        place(&mut world, 2, 2, RED);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Swap {
                from: CellCoord::new(1, 2),
                to: CellCoord::new(2, 2),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::Swap {
                from: CellCoord::new(2, 2),
                to: CellCoord::new(0, 2),
            },
            &mut events,
        );

        assert!(events.is_empty());
    }

    #[test]
    fn gravity_compacts_each_column_in_one_pass() {
        let mut world = World::with_dimensions(2, 4);
        place(&mut world, 0, 0, RED);
        place(&mut world, 0, 2, BLUE);
        place(&mut world, 1, 1, BLUE);

        let mut events = Vec::new();
        apply(&mut world, Command::ApplyGravity, &mut events);

        let moves: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                Event::PieceMoved { from, to, motion } => {
                    assert_eq!(*motion, Motion::Drop);
                    Some((*from, *to))
                }
                _ => None,
            })
            .collect();

        assert_eq!(
            moves,
            vec![
                (CellCoord::new(0, 2), CellCoord::new(0, 3)),
                (CellCoord::new(1, 1), CellCoord::new(1, 3)),
                (CellCoord::new(0, 0), CellCoord::new(0, 2)),
            ]
        );
    }

    #[test]
    fn warnings_follow_column_fullness() {
        let mut world = World::with_dimensions(2, 2);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlacePiece {
                column: 0,
                piece: RED,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::PlacePiece {
                column: 0,
                piece: BLUE,
            },
            &mut events,
        );

        assert_eq!(
            events.last(),
            Some(&Event::ColumnWarningChanged {
                column: 0,
                full: true,
            })
        );
        assert_eq!(query::column_warnings(&world), &[true, false]);
        let cell = query::grid(&world)
            .cell_at(CellCoord::new(0, 1))
            .expect("cell in bounds");
        assert!(cell.is_warning());

        events.clear();
        apply(&mut world, Command::ClearBoard, &mut events);
        assert_eq!(
            events,
            vec![
                Event::PieceCleared {
                    cell: CellCoord::new(0, 0),
                },
                Event::PieceCleared {
                    cell: CellCoord::new(0, 1),
                },
                Event::ColumnWarningChanged {
                    column: 0,
                    full: false,
                },
            ]
        );
    }

    #[test]
    fn clear_reports_each_cell_once() {
        let mut world = World::with_dimensions(3, 1);
        place(&mut world, 0, 0, RED);
        place(&mut world, 1, 0, RED);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Clear {
                cells: vec![
                    CellCoord::new(0, 0),
                    CellCoord::new(0, 0),
                    CellCoord::new(1, 0),
                    CellCoord::new(2, 0),
                ],
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::PieceCleared {
                    cell: CellCoord::new(0, 0),
                },
                Event::PieceCleared {
                    cell: CellCoord::new(1, 0),
                },
            ]
        );
    }
}
