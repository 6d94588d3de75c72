#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawn scheduler that decides when and where new pieces enter the grid.
//!
//! The scheduler owns the periodic countdown and a seeded RNG. It plans spawn
//! requests as delays relative to the current tick and resolves each request
//! against a board snapshot when the caller is ready to place it.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use theme_match_core::{
    level_params, BoardView, LevelParams, INITIAL_SPAWN_STAGGER, PIECE_SLOTS, SPAWN_STAGGER,
};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    level: LevelParams,
}

impl Config {
    /// Creates a configuration for level one using the provided seed.
    #[must_use]
    pub fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            level: level_params(1),
        }
    }

    /// Starts the scheduler with a different level row.
    #[must_use]
    pub const fn with_level(mut self, level: LevelParams) -> Self {
        self.level = level;
        self
    }
}

/// Column selection policy of a spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Random column regardless of room; a full column means the game is lost.
    Unsafe,
    /// Random column among those with room.
    Safe,
    /// Safe placement planned by the opening wave.
    Opening,
}

/// Spawn planned for a point in time relative to the tick that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpawnRequest {
    delay: Duration,
    placement: Placement,
}

impl SpawnRequest {
    /// Time to wait before resolving the spawn.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Column selection policy.
    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.placement
    }
}

/// Outcome of resolving a spawn against the current board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnDecision {
    /// Drop the piece from `slot` into `column`.
    Place {
        /// Target column, guaranteed to have room.
        column: u32,
        /// Catalog slot of the piece to drop.
        slot: usize,
    },
    /// An unsafe spawn drew a full column.
    Overflow {
        /// Column that had no room.
        column: u32,
    },
    /// A safe spawn found no column with room and is skipped.
    NoRoom,
}

/// Spawn scheduler driven by simulated time.
#[derive(Debug)]
pub struct Spawning {
    params: LevelParams,
    remaining: Duration,
    armed: bool,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            params: config.level,
            remaining: config.level.spawn_interval(),
            armed: true,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Loads a level row and restarts the countdown from its interval.
    pub fn configure(&mut self, params: LevelParams) {
        self.params = params;
        self.remaining = params.spawn_interval();
    }

    /// Stops the periodic countdown for good.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Reports whether the periodic countdown is running.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Time left before the next periodic burst.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Level row currently driving the scheduler.
    #[must_use]
    pub const fn params(&self) -> LevelParams {
        self.params
    }

    /// Advances the countdown by `dt`, planning a burst when it expires.
    ///
    /// The countdown expires only when `dt` exceeds the time left, fires at
    /// most once per call and restarts from the full interval. A burst is one
    /// unsafe spawn right away followed by `spawn_batch - 1` safe spawns
    /// staggered [`SPAWN_STAGGER`] apart.
    pub fn advance(&mut self, dt: Duration, out: &mut Vec<SpawnRequest>) {
        if !self.armed {
            return;
        }

        if dt <= self.remaining {
            self.remaining -= dt;
            return;
        }

        self.remaining = self.params.spawn_interval();
        out.push(SpawnRequest {
            delay: Duration::ZERO,
            placement: Placement::Unsafe,
        });
        for index in 1..self.params.spawn_batch() {
            out.push(SpawnRequest {
                delay: SPAWN_STAGGER * index,
                placement: Placement::Safe,
            });
        }
    }

    /// Plans the safe spawns that populate the board when a game starts.
    pub fn initial_wave(&self, count: u32, out: &mut Vec<SpawnRequest>) {
        for index in 0..count {
            out.push(SpawnRequest {
                delay: INITIAL_SPAWN_STAGGER * index,
                placement: Placement::Opening,
            });
        }
    }

    /// Chooses the column and piece for a spawn that is due now.
    pub fn resolve(&mut self, placement: Placement, view: BoardView<'_>) -> SpawnDecision {
        let (columns, _) = view.dimensions();
        if columns == 0 {
            return SpawnDecision::NoRoom;
        }

        let column = match placement {
            Placement::Unsafe => {
                let column = self.rng.gen_range(0..columns);
                if view.is_column_full(column) {
                    return SpawnDecision::Overflow { column };
                }
                column
            }
            Placement::Safe | Placement::Opening => {
                let open: Vec<u32> = (0..columns)
                    .filter(|column| !view.is_column_full(*column))
                    .collect();
                if open.is_empty() {
                    return SpawnDecision::NoRoom;
                }
                open[self.rng.gen_range(0..open.len())]
            }
        };

        SpawnDecision::Place {
            column,
            slot: self.draw_slot(),
        }
    }

    fn draw_slot(&mut self) -> usize {
        let highest = usize::from(self.params.difficulty()).min(PIECE_SLOTS - 1);
        self.rng.gen_range(0..=highest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_starts_at_the_level_interval() {
        let spawning = Spawning::new(Config::new(7));
        assert_eq!(spawning.remaining(), Duration::from_millis(5000));
        assert!(spawning.is_armed());
    }

    #[test]
    fn configured_level_sets_the_first_countdown() {
        let spawning = Spawning::new(Config::new(7).with_level(level_params(3)));
        assert_eq!(spawning.remaining(), Duration::from_millis(4000));
        assert_eq!(spawning.params(), level_params(3));
    }

    #[test]
    fn exact_expiry_waits_for_the_next_tick() {
        let mut spawning = Spawning::new(Config::new(7));
        let mut requests = Vec::new();

        spawning.advance(Duration::from_millis(5000), &mut requests);
        assert!(requests.is_empty());
        assert_eq!(spawning.remaining(), Duration::ZERO);

        spawning.advance(Duration::from_millis(1), &mut requests);
        assert_eq!(requests.len(), 3);
    }

    #[test]
    fn slot_draws_stay_within_difficulty() {
        let mut spawning = Spawning::new(Config::new(99));
        for _ in 0..500 {
            assert!(spawning.draw_slot() <= 3);
        }
    }
}
