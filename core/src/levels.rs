//! Difficulty progression table.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Parameters that govern spawning and progression for one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelParams {
    difficulty: u8,
    spawn_interval: Duration,
    spawn_batch: u32,
    points_to_next: u32,
}

impl LevelParams {
    /// Creates a level row.
    #[must_use]
    pub const fn new(
        difficulty: u8,
        spawn_interval: Duration,
        spawn_batch: u32,
        points_to_next: u32,
    ) -> Self {
        Self {
            difficulty,
            spawn_interval,
            spawn_batch,
            points_to_next,
        }
    }

    /// Highest piece slot index (inclusive) drawn by spawns.
    #[must_use]
    pub const fn difficulty(&self) -> u8 {
        self.difficulty
    }

    /// Time between periodic spawn bursts.
    #[must_use]
    pub const fn spawn_interval(&self) -> Duration {
        self.spawn_interval
    }

    /// Number of pieces introduced by each periodic burst.
    #[must_use]
    pub const fn spawn_batch(&self) -> u32 {
        self.spawn_batch
    }

    /// Cumulative matched-piece count required to reach the next level.
    #[must_use]
    pub const fn points_to_next(&self) -> u32 {
        self.points_to_next
    }
}

/// Level rows for levels 1 through 9.
pub const LEVEL_TABLE: [LevelParams; 9] = [
    LevelParams::new(3, Duration::from_millis(5000), 3, 15),
    LevelParams::new(3, Duration::from_millis(4000), 4, 20),
    LevelParams::new(4, Duration::from_millis(4000), 4, 25),
    LevelParams::new(4, Duration::from_millis(4000), 5, 30),
    LevelParams::new(4, Duration::from_millis(3500), 5, 35),
    LevelParams::new(5, Duration::from_millis(3500), 5, 40),
    LevelParams::new(5, Duration::from_millis(3500), 6, 45),
    LevelParams::new(6, Duration::from_millis(3500), 6, 50),
    LevelParams::new(6, Duration::from_millis(3000), 6, 60),
];

/// Looks up the parameters for a one-based level.
///
/// Levels past the end of the table keep the last row; level zero is treated
/// as level one.
#[must_use]
pub fn level_params(level: u32) -> LevelParams {
    let index = usize::try_from(level.saturating_sub(1)).unwrap_or(usize::MAX);
    LEVEL_TABLE
        .get(index)
        .copied()
        .unwrap_or(LEVEL_TABLE[LEVEL_TABLE.len() - 1])
}
