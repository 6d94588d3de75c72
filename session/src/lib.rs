#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game session aggregate that owns the grid and drives the cascade resolver.
//!
//! A [`GameSession`] is the single writer of the world. Adapters feed it
//! simulated time through [`GameSession::tick`] and player intents through
//! [`GameSession::activate_cell`] and [`GameSession::swipe`]. Every mutation
//! is reported as an [`Event`] appended to the caller's buffer in causal order.
//!
//! Delayed pipeline steps (swap settle, spawn settle, drop settle, staggered
//! spawns) are scheduled continuations that fire once the session clock
//! reaches them. The resolver leaves `Idle` as soon as a swap is accepted or
//! a piece is spawned, and a match check only runs once every swap and spawn
//! still moving on the board has settled.

mod timeline;

use std::time::Duration;

use theme_match_core::{
    AudioCue, CellCoord, Command, Direction, Event, PieceCatalog, PieceType, ResolverState,
    DEFAULT_COLUMNS, DEFAULT_ROWS, DROP_SETTLE_DELAY, GAME_OVER_GRACE, INITIAL_SPAWN_COUNT,
    SPAWN_SETTLE_DURATION, SWAP_DURATION,
};
use theme_match_system_matching::detect;
use theme_match_system_scoring::ScoreTracker;
use theme_match_system_spawning::{Config, Placement, SpawnDecision, SpawnRequest, Spawning};
use theme_match_world::{self as world, query, World};

use crate::timeline::{Continuation, Timeline};

/// Parameters used to construct a [`GameSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    columns: u32,
    rows: u32,
    seed: u64,
    initial_spawns: u32,
    catalog: PieceCatalog,
}

impl SessionConfig {
    /// Creates the default configuration: an 8x8 grid, seed zero, fifteen
    /// opening spawns and the built-in catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            seed: 0,
            initial_spawns: INITIAL_SPAWN_COUNT,
            catalog: PieceCatalog::default(),
        }
    }

    /// Overrides the grid dimensions.
    #[must_use]
    pub const fn with_dimensions(mut self, columns: u32, rows: u32) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    /// Overrides the seed of the spawn RNG.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Overrides the number of safe spawns planned by [`GameSession::start`].
    #[must_use]
    pub const fn with_initial_spawns(mut self, count: u32) -> Self {
        self.initial_spawns = count;
        self
    }

    /// Overrides the piece catalog.
    #[must_use]
    pub const fn with_catalog(mut self, catalog: PieceCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Grid dimensions as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Seed of the spawn RNG.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of opening safe spawns.
    #[must_use]
    pub const fn initial_spawns(&self) -> u32 {
        self.initial_spawns
    }

    /// Piece catalog spawns draw from.
    #[must_use]
    pub const fn catalog(&self) -> &PieceCatalog {
        &self.catalog
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The board may be seeded; the periodic spawner is not running yet.
    Ready,
    /// The game is in progress.
    Running,
    /// The game was lost; input and time no longer have any effect.
    Over,
}

/// Aggregate owning the world, progression counters and scheduled work.
#[derive(Debug)]
pub struct GameSession {
    world: World,
    catalog: PieceCatalog,
    scoring: ScoreTracker,
    spawning: Spawning,
    timeline: Timeline,
    state: ResolverState,
    phase: Phase,
    selection: Option<CellCoord>,
    clock: Duration,
    initial_spawns: u32,
    match_checks: u32,
    settling: u32,
    drop_pending: bool,
}

impl GameSession {
    /// Creates a session with an empty board.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let (columns, rows) = config.dimensions();
        let scoring = ScoreTracker::new();
        let spawning = Spawning::new(Config::new(config.seed()).with_level(scoring.params()));
        Self {
            world: World::with_dimensions(columns, rows),
            catalog: config.catalog,
            scoring,
            spawning,
            timeline: Timeline::default(),
            state: ResolverState::Idle,
            phase: Phase::Ready,
            selection: None,
            clock: Duration::ZERO,
            initial_spawns: config.initial_spawns(),
            match_checks: 0,
            settling: 0,
            drop_pending: false,
        }
    }

    /// Read-only access to the world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Piece catalog in use.
    #[must_use]
    pub const fn catalog(&self) -> &PieceCatalog {
        &self.catalog
    }

    /// Accumulated score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.scoring.score()
    }

    /// Active one-based level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.scoring.level()
    }

    /// Matched pieces still required before the next level.
    #[must_use]
    pub const fn points_to_next(&self) -> i64 {
        self.scoring.points_to_next()
    }

    /// Current cascade resolver state.
    #[must_use]
    pub const fn resolver_state(&self) -> ResolverState {
        self.state
    }

    /// Lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Reports whether the game has been lost.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }

    /// Cell currently selected for a tap-to-swap, if any.
    #[must_use]
    pub const fn selection(&self) -> Option<CellCoord> {
        self.selection
    }

    /// Simulated time elapsed since the session was created.
    #[must_use]
    pub const fn clock(&self) -> Duration {
        self.clock
    }

    /// Number of match checks run so far.
    #[must_use]
    pub const fn match_checks(&self) -> u32 {
        self.match_checks
    }

    /// Number of continuations waiting on the timeline.
    #[must_use]
    pub fn pending_continuations(&self) -> usize {
        self.timeline.len()
    }

    /// Time left before the next periodic spawn burst.
    #[must_use]
    pub const fn spawn_countdown(&self) -> Duration {
        self.spawning.remaining()
    }

    /// Places pieces directly onto the board before the game starts.
    ///
    /// Placements never trigger a match check; the cascade only reacts to
    /// swaps, spawns and drops.
    pub fn seed_board(&mut self, placements: &[(CellCoord, PieceType)], out: &mut Vec<Event>) {
        if self.phase == Phase::Over {
            return;
        }
        for &(cell, piece) in placements {
            world::apply(&mut self.world, Command::PlacePieceAt { cell, piece }, out);
        }
    }

    /// Starts the game: plans the opening spawns and arms the periodic spawner.
    pub fn start(&mut self) {
        if self.phase != Phase::Ready {
            return;
        }
        self.phase = Phase::Running;
        self.spawning.configure(self.scoring.params());

        let mut requests = Vec::new();
        self.spawning.initial_wave(self.initial_spawns, &mut requests);
        self.schedule_spawns(&requests);
    }

    /// Advances simulated time by `dt` and runs everything that became due.
    pub fn tick(&mut self, dt: Duration, out: &mut Vec<Event>) {
        if self.phase == Phase::Over {
            return;
        }
        self.clock = self.clock.saturating_add(dt);

        if self.phase == Phase::Running {
            let mut requests = Vec::new();
            self.spawning.advance(dt, &mut requests);
            self.schedule_spawns(&requests);
        }

        while let Some((at, continuation)) = self.timeline.pop_due(self.clock) {
            self.run(at, continuation, out);
            if self.phase == Phase::Over {
                break;
            }
        }
    }

    /// Handles a tap or click on `cell`.
    ///
    /// The first tap on an occupied cell selects it. The next tap on a
    /// different cell clears the selection and swaps the two cells when they
    /// are orthogonal neighbours; anything else is silently rejected.
    pub fn activate_cell(&mut self, cell: CellCoord, out: &mut Vec<Event>) {
        if self.phase == Phase::Over {
            return;
        }

        let view = query::board_view(&self.world);
        let (inside, occupied) = (view.contains(cell), view.piece(cell).is_some());
        if !inside {
            self.set_selection(None, out);
            return;
        }

        match self.selection {
            None => {
                if occupied {
                    self.set_selection(Some(cell), out);
                }
            }
            Some(selected) => {
                self.set_selection(None, out);
                if query::grid(&self.world).adjacency(selected, cell).is_some() {
                    self.swap(selected, cell, out);
                }
            }
        }
    }

    /// Handles a fling of the piece at `cell` toward `direction`.
    pub fn swipe(&mut self, cell: CellCoord, direction: Direction, out: &mut Vec<Event>) {
        if self.phase == Phase::Over {
            return;
        }
        self.set_selection(None, out);
        if let Some(target) = query::grid(&self.world).neighbor(cell, direction) {
            self.swap(cell, target, out);
        }
    }

    fn swap(&mut self, from: CellCoord, to: CellCoord, out: &mut Vec<Event>) {
        let mut moved = Vec::new();
        world::apply(&mut self.world, Command::Swap { from, to }, &mut moved);
        if !moved
            .iter()
            .any(|event| matches!(event, Event::PieceMoved { .. }))
        {
            return;
        }

        out.push(Event::Cue {
            cue: AudioCue::Swap,
        });
        out.extend(moved);
        self.set_state(ResolverState::Resolving, out);
        self.settling += 1;
        self.timeline.schedule(
            self.clock.saturating_add(SWAP_DURATION),
            Continuation::SwapSettled,
        );
    }

    fn run(&mut self, at: Duration, continuation: Continuation, out: &mut Vec<Event>) {
        match continuation {
            Continuation::SwapSettled | Continuation::SpawnSettled => {
                self.settling = self.settling.saturating_sub(1);
                // A pending drop settle re-checks the latest board.
                if self.settling == 0 && !self.drop_pending {
                    self.resolve(at, out);
                }
            }
            Continuation::DropSettled => {
                self.drop_pending = false;
                if self.settling == 0 {
                    self.resolve(at, out);
                }
            }
            Continuation::Spawn(placement) => self.spawn(at, placement, out),
        }
    }

    fn resolve(&mut self, at: Duration, out: &mut Vec<Event>) {
        self.match_checks += 1;
        self.set_state(ResolverState::Resolving, out);

        let (runs, cleared) = detect(query::board_view(&self.world)).into_parts();
        for run in &runs {
            let length = u32::try_from(run.cells().len()).unwrap_or(u32::MAX);
            if let Some(params) = self.scoring.record(length, out) {
                self.spawning.configure(params);
            }
        }
        if !cleared.is_empty() {
            world::apply(&mut self.world, Command::Clear { cells: cleared }, out);
        }

        let mut dropped = Vec::new();
        world::apply(&mut self.world, Command::ApplyGravity, &mut dropped);
        let anything_dropped = dropped
            .iter()
            .any(|event| matches!(event, Event::PieceMoved { .. }));
        out.extend(dropped);

        if anything_dropped {
            self.drop_pending = true;
            self.timeline.schedule(
                at.saturating_add(DROP_SETTLE_DELAY),
                Continuation::DropSettled,
            );
        } else {
            self.set_state(ResolverState::Idle, out);
        }
    }

    fn spawn(&mut self, at: Duration, placement: Placement, out: &mut Vec<Event>) {
        let decision = self
            .spawning
            .resolve(placement, query::board_view(&self.world));
        match decision {
            SpawnDecision::Place { column, slot } => {
                let Some(piece) = self.catalog.slot(slot) else {
                    return;
                };
                out.push(Event::Cue {
                    cue: AudioCue::Drop,
                });
                world::apply(&mut self.world, Command::PlacePiece { column, piece }, out);
                // The opening wave fills the board silently.
                if placement != Placement::Opening
                    && query::board_view(&self.world).is_column_full(column)
                {
                    out.push(Event::Cue {
                        cue: AudioCue::Warning,
                    });
                }
                self.set_state(ResolverState::Resolving, out);
                self.settling += 1;
                self.timeline.schedule(
                    at.saturating_add(SPAWN_SETTLE_DURATION),
                    Continuation::SpawnSettled,
                );
            }
            SpawnDecision::Overflow { .. } => self.lose(out),
            SpawnDecision::NoRoom => {}
        }
    }

    fn lose(&mut self, out: &mut Vec<Event>) {
        if self.phase == Phase::Over {
            return;
        }
        self.phase = Phase::Over;
        self.timeline.clear();
        self.settling = 0;
        self.drop_pending = false;
        self.spawning.disarm();
        self.set_selection(None, out);

        world::apply(&mut self.world, Command::ClearBoard, out);
        out.push(Event::Cue {
            cue: AudioCue::Lose,
        });
        out.push(Event::GameOver {
            grace: GAME_OVER_GRACE,
        });
        self.set_state(ResolverState::Idle, out);
    }

    fn schedule_spawns(&mut self, requests: &[SpawnRequest]) {
        for request in requests {
            self.timeline.schedule(
                self.clock.saturating_add(request.delay()),
                Continuation::Spawn(request.placement()),
            );
        }
    }

    fn set_state(&mut self, state: ResolverState, out: &mut Vec<Event>) {
        if self.state != state {
            self.state = state;
            out.push(Event::ResolverStateChanged { state });
        }
    }

    fn set_selection(&mut self, cell: Option<CellCoord>, out: &mut Vec<Event>) {
        if self.selection != cell {
            self.selection = cell;
            out.push(Event::SelectionChanged { cell });
        }
    }
}
