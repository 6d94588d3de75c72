use std::time::Duration;

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use theme_match_core::{BoardView, CellCoord, Direction, PieceType};
use theme_match_system_matching::detect;

/// Headless player that flings a piece at a fixed cadence.
///
/// Swaps that would complete a run are preferred; otherwise a random piece
/// is flung in a random direction.
#[derive(Debug)]
pub(crate) struct Autoplayer {
    interval: Duration,
    elapsed: Duration,
    rng: ChaCha8Rng,
}

impl Autoplayer {
    pub(crate) fn new(interval: Duration, seed: u64) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Advances the cadence timer and returns a move once it expires.
    pub(crate) fn advance(
        &mut self,
        dt: Duration,
        view: BoardView<'_>,
    ) -> Option<(CellCoord, Direction)> {
        if self.interval.is_zero() {
            return None;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed < self.interval {
            return None;
        }
        self.elapsed = Duration::ZERO;
        self.choose(view)
    }

    fn choose(&mut self, view: BoardView<'_>) -> Option<(CellCoord, Direction)> {
        let scoring = scoring_swaps(view);
        if let Some(choice) = scoring.choose(&mut self.rng) {
            return Some(*choice);
        }

        let occupied: Vec<CellCoord> = view
            .iter()
            .filter_map(|(cell, piece)| piece.map(|_| cell))
            .collect();
        let cell = *occupied.choose(&mut self.rng)?;
        let direction = Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())];
        Some((cell, direction))
    }
}

/// Every fling that would complete at least one run.
fn scoring_swaps(view: BoardView<'_>) -> Vec<(CellCoord, Direction)> {
    let (columns, rows) = view.dimensions();
    let mut cells: Vec<Option<PieceType>> = view.iter().map(|(_, piece)| piece).collect();
    let mut found = Vec::new();

    for (from, piece) in view.iter() {
        if piece.is_none() {
            continue;
        }
        for direction in [Direction::Right, Direction::Down, Direction::Left, Direction::Up] {
            let Some(to) = view.neighbor(from, direction) else {
                continue;
            };
            let (a, b) = (index(from, columns), index(to, columns));
            cells.swap(a, b);
            if !detect(BoardView::new(&cells, columns, rows)).is_empty() {
                found.push((from, direction));
            }
            cells.swap(a, b);
        }
    }

    found
}

fn index(cell: CellCoord, columns: u32) -> usize {
    (cell.row() * columns + cell.column()) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use theme_match_core::{PieceCatalog, DEFAULT_COLUMNS, DEFAULT_ROWS};

    fn board(pieces: &[((u32, u32), usize)]) -> Vec<Option<PieceType>> {
        let catalog = PieceCatalog::default();
        let mut cells = vec![None; (DEFAULT_COLUMNS * DEFAULT_ROWS) as usize];
        for &((column, row), slot) in pieces {
            cells[index(CellCoord::new(column, row), DEFAULT_COLUMNS)] = catalog.slot(slot);
        }
        cells
    }

    #[test]
    fn finds_the_swap_that_completes_a_row() {
        let cells = board(&[((0, 7), 0), ((1, 7), 0), ((2, 6), 0), ((2, 7), 1)]);
        let view = BoardView::new(&cells, DEFAULT_COLUMNS, DEFAULT_ROWS);

        let swaps = scoring_swaps(view);

        assert!(swaps.contains(&(CellCoord::new(2, 6), Direction::Down)));
        assert!(swaps.contains(&(CellCoord::new(2, 7), Direction::Up)));
    }

    #[test]
    fn waits_for_the_interval_before_moving() {
        let cells = board(&[((4, 7), 2)]);
        let view = BoardView::new(&cells, DEFAULT_COLUMNS, DEFAULT_ROWS);
        let mut player = Autoplayer::new(Duration::from_millis(300), 9);

        assert_eq!(player.advance(Duration::from_millis(200), view), None);
        let chosen = player.advance(Duration::from_millis(100), view);
        assert_eq!(chosen.map(|(cell, _)| cell), Some(CellCoord::new(4, 7)));
    }

    #[test]
    fn empty_board_offers_no_move() {
        let cells = board(&[]);
        let view = BoardView::new(&cells, DEFAULT_COLUMNS, DEFAULT_ROWS);
        let mut player = Autoplayer::new(Duration::from_millis(10), 9);
        assert_eq!(player.advance(Duration::from_millis(10), view), None);
    }
}
