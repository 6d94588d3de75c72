#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Input adapter that turns pointer gestures into session intents.
//!
//! Screen positions use a y-down coordinate space anchored at the board's
//! top-left corner. Fling velocities follow the gesture convention of touch
//! backends instead: positive y points up the screen.

use glam::Vec2;
use theme_match_core::{CellCoord, Direction};

/// Screen-space placement of the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardLayout {
    columns: u32,
    rows: u32,
    origin: Vec2,
    cell_length: f32,
}

impl BoardLayout {
    /// Creates a layout whose top-left corner sits at `origin`.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, origin: Vec2, cell_length: f32) -> Self {
        Self {
            columns,
            rows,
            origin,
            cell_length,
        }
    }

    /// Side length of a single cell in screen units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// Total width of the board.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Total height of the board.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }

    /// Cell under a screen position, or `None` when the position misses the board.
    #[must_use]
    pub fn cell_at(&self, position: Vec2) -> Option<CellCoord> {
        if self.columns == 0 || self.rows == 0 || self.cell_length <= f32::EPSILON {
            return None;
        }

        let local = position - self.origin;
        if local.x < 0.0 || local.y < 0.0 || local.x >= self.width() || local.y >= self.height() {
            return None;
        }

        let column = (local.x / self.cell_length).floor() as u32;
        let row = (local.y / self.cell_length).floor() as u32;
        Some(CellCoord::new(
            column.min(self.columns - 1),
            row.min(self.rows - 1),
        ))
    }

    /// Screen position of the centre of `cell`.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Option<Vec2> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let offset = Vec2::new(cell.column() as f32 + 0.5, cell.row() as f32 + 0.5);
        Some(self.origin + offset * self.cell_length)
    }
}

/// Dominant cardinal direction of a fling velocity.
///
/// Positive y is up. Ties between the axes resolve to the vertical axis and a
/// zero (or non-finite) velocity yields no direction.
#[must_use]
pub fn direction_from_velocity(velocity: Vec2) -> Option<Direction> {
    if !velocity.is_finite() || velocity == Vec2::ZERO {
        return None;
    }

    if velocity.x.abs() > velocity.y.abs() {
        if velocity.x > 0.0 {
            Some(Direction::Right)
        } else {
            Some(Direction::Left)
        }
    } else if velocity.y > 0.0 {
        Some(Direction::Up)
    } else {
        Some(Direction::Down)
    }
}

/// Unit fling velocity that points toward `direction`.
#[must_use]
pub fn velocity_toward(direction: Direction) -> Vec2 {
    match direction {
        Direction::Left => Vec2::NEG_X,
        Direction::Right => Vec2::X,
        Direction::Up => Vec2::Y,
        Direction::Down => Vec2::NEG_Y,
    }
}

/// Raw pointer gesture reported by a frontend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// Tap or click.
    Tap {
        /// Screen position of the pointer.
        position: Vec2,
    },
    /// Fling that started over a piece.
    Fling {
        /// Screen position where the fling started.
        position: Vec2,
        /// Release velocity, positive y up.
        velocity: Vec2,
    },
}

/// Player intent understood by the game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Select or swap toward the cell.
    Activate(CellCoord),
    /// Swap the piece at `cell` with its neighbour in `direction`.
    Swipe {
        /// Cell the fling started on.
        cell: CellCoord,
        /// Dominant fling direction.
        direction: Direction,
    },
}

/// Translates a gesture into an intent, dropping gestures that miss the board.
#[must_use]
pub fn translate(layout: &BoardLayout, gesture: Gesture) -> Option<Intent> {
    match gesture {
        Gesture::Tap { position } => layout.cell_at(position).map(Intent::Activate),
        Gesture::Fling { position, velocity } => {
            let cell = layout.cell_at(position)?;
            let direction = direction_from_velocity(velocity)?;
            Some(Intent::Swipe { cell, direction })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_axis_wins() {
        assert_eq!(
            direction_from_velocity(Vec2::new(300.0, -20.0)),
            Some(Direction::Right)
        );
        assert_eq!(
            direction_from_velocity(Vec2::new(-300.0, 299.0)),
            Some(Direction::Left)
        );
        assert_eq!(
            direction_from_velocity(Vec2::new(10.0, 80.0)),
            Some(Direction::Up)
        );
        assert_eq!(
            direction_from_velocity(Vec2::new(-10.0, -80.0)),
            Some(Direction::Down)
        );
    }

    #[test]
    fn ties_resolve_vertically() {
        assert_eq!(
            direction_from_velocity(Vec2::new(5.0, 5.0)),
            Some(Direction::Up)
        );
        assert_eq!(
            direction_from_velocity(Vec2::new(5.0, -5.0)),
            Some(Direction::Down)
        );
    }

    #[test]
    fn still_or_broken_velocity_has_no_direction() {
        assert_eq!(direction_from_velocity(Vec2::ZERO), None);
        assert_eq!(direction_from_velocity(Vec2::new(f32::NAN, 1.0)), None);
    }

    #[test]
    fn velocity_toward_round_trips_through_direction() {
        for direction in Direction::ALL {
            assert_eq!(
                direction_from_velocity(velocity_toward(direction)),
                Some(direction)
            );
        }
    }
}
