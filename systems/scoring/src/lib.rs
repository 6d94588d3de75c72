#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Score and level tracker that converts matched runs into points and progression.

use theme_match_core::{level_params, AudioCue, Event, LevelParams};

/// Points awarded for a run of `length` pieces.
///
/// Lengths below three never qualify as a match and award nothing.
#[must_use]
pub const fn score_for(length: u32) -> u32 {
    match length {
        0..=2 => 0,
        3 => 1,
        4 => 5,
        5 => 10,
        6 => 25,
        _ => 50,
    }
}

/// Tracks the session score, the active level, and progress toward the next level.
#[derive(Clone, Debug)]
pub struct ScoreTracker {
    score: u32,
    level: u32,
    points_to_next: i64,
    params: LevelParams,
}

impl ScoreTracker {
    /// Creates a tracker positioned at level one with no score.
    #[must_use]
    pub fn new() -> Self {
        let params = level_params(1);
        Self {
            score: 0,
            level: 1,
            points_to_next: i64::from(params.points_to_next()),
            params,
        }
    }

    /// Accumulated score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Active one-based level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Matched pieces still required before the next level.
    ///
    /// Goes negative only transiently inside [`ScoreTracker::record`].
    #[must_use]
    pub const fn points_to_next(&self) -> i64 {
        self.points_to_next
    }

    /// Parameters of the active level.
    #[must_use]
    pub const fn params(&self) -> LevelParams {
        self.params
    }

    /// Scores one qualifying run and applies any resulting level advance.
    ///
    /// Emits [`Event::MatchScored`] followed by the `match` or `bonus` cue.
    /// When the threshold is crossed the tracker advances exactly one level,
    /// emits [`Event::LevelAdvanced`] and the `victory` cue, and returns the
    /// parameters of the new level so the caller can re-arm its spawner.
    pub fn record(&mut self, length: u32, out: &mut Vec<Event>) -> Option<LevelParams> {
        let points = score_for(length);
        self.score = self.score.saturating_add(points);
        out.push(Event::MatchScored {
            length,
            points,
            score: self.score,
        });
        let cue = if length > 3 {
            AudioCue::Bonus
        } else {
            AudioCue::Match
        };
        out.push(Event::Cue { cue });

        self.points_to_next -= i64::from(length);
        if self.points_to_next > 0 {
            return None;
        }

        self.level = self.level.saturating_add(1);
        self.params = level_params(self.level);
        self.points_to_next = i64::from(self.params.points_to_next());
        out.push(Event::LevelAdvanced { level: self.level });
        if self.level > 1 {
            out.push(Event::Cue {
                cue: AudioCue::Victory,
            });
        }
        Some(self.params)
    }
}

impl Default for ScoreTracker {
    fn default() -> Self {
        Self::new()
    }
}
