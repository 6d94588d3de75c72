#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Theme Match game.
//!
//! The binary drives a [`GameSession`] with a fixed simulation step, lets an
//! autoplayer fling pieces through the input adapter, and prints every event
//! the session reports as a timestamped log line.

mod autoplay;
mod config;

use std::{fmt::Write as _, path::PathBuf, time::Duration};

use anyhow::{ensure, Result};
use clap::Parser;
use glam::Vec2;
use theme_match_core::{
    CellCoord, Direction, Event, PieceCatalog, ResolverState, DEFAULT_COLUMNS, DEFAULT_ROWS,
    REMOVE_DURATION,
};
use theme_match_input::{translate, velocity_toward, BoardLayout, Gesture, Intent};
use theme_match_session::{GameSession, SessionConfig};
use theme_match_world::query;

use crate::autoplay::Autoplayer;

const CELL_PIXELS: f32 = 64.0;
const FLING_SPEED: f32 = 900.0;

/// Headless Theme Match simulation.
#[derive(Debug, Parser)]
#[command(name = "theme-match", version)]
struct CliArgs {
    /// Seed for spawn and autoplayer randomness.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Simulated seconds to run before stopping.
    #[arg(long, default_value_t = 120, value_name = "SECS")]
    seconds: u64,

    /// Length of one simulation step in milliseconds.
    #[arg(long, default_value_t = 16, value_name = "MS")]
    step_ms: u64,

    /// Number of grid columns.
    #[arg(long, default_value_t = DEFAULT_COLUMNS, value_name = "COLS")]
    columns: u32,

    /// Number of grid rows.
    #[arg(long, default_value_t = DEFAULT_ROWS, value_name = "ROWS")]
    rows: u32,

    /// Piece manifest (TOML) assigning a shape and colour to every slot.
    #[arg(long, value_name = "FILE")]
    pieces: Option<PathBuf>,

    /// Milliseconds between autoplayer moves; zero disables the autoplayer.
    #[arg(long, default_value_t = 400, value_name = "MS")]
    autoplay_interval_ms: u64,

    /// Print only the final summary.
    #[arg(long)]
    quiet: bool,
}

/// Entry point for the Theme Match command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    run(&args)
}

fn run(args: &CliArgs) -> Result<()> {
    ensure!(
        args.columns > 0 && args.rows > 0,
        "the grid needs at least one column and one row"
    );
    ensure!(args.step_ms > 0, "the simulation step must be positive");

    let catalog = match &args.pieces {
        Some(path) => config::load_catalog(path)?,
        None => PieceCatalog::default(),
    };

    let mut session = GameSession::new(
        SessionConfig::new()
            .with_dimensions(args.columns, args.rows)
            .with_seed(args.seed)
            .with_catalog(catalog),
    );
    let layout = BoardLayout::new(args.columns, args.rows, Vec2::ZERO, CELL_PIXELS);
    let mut player = Autoplayer::new(
        Duration::from_millis(args.autoplay_interval_ms),
        args.seed.wrapping_add(1),
    );
    let step = Duration::from_millis(args.step_ms);
    let limit = Duration::from_secs(args.seconds);
    let mut stats = RunStats::default();
    let mut events = Vec::new();

    session.start();
    while session.clock() < limit && !session.is_over() {
        let chosen = player.advance(step, query::board_view(session.world()));
        if let Some((cell, direction)) = chosen {
            for gesture in gestures_for(&layout, cell, direction, stats.moves) {
                if let Some(intent) = translate(&layout, gesture) {
                    dispatch(&mut session, intent, &mut events);
                }
            }
            stats.moves += 1;
        }

        session.tick(step, &mut events);
        for event in &events {
            stats.observe(event);
            if !args.quiet {
                println!("[{:>9.3}s] {}", session.clock().as_secs_f32(), describe(event));
            }
        }
        events.clear();
    }

    println!("{}", render_board(&session));
    println!(
        "{} after {:.1}s: score {}, level {}, {} moves, {} matches, {} spawns, {} match checks",
        if session.is_over() {
            "game over"
        } else {
            "stopped"
        },
        session.clock().as_secs_f32(),
        session.score(),
        session.level(),
        stats.moves,
        stats.matches,
        stats.spawns,
        session.match_checks(),
    );
    Ok(())
}

/// Expresses an autoplayer move as pointer gestures: even moves fling, odd
/// moves tap the piece and then its neighbour.
fn gestures_for(
    layout: &BoardLayout,
    cell: CellCoord,
    direction: Direction,
    move_index: u64,
) -> Vec<Gesture> {
    let Some(position) = layout.cell_center(cell) else {
        return Vec::new();
    };

    if move_index % 2 == 0 {
        return vec![Gesture::Fling {
            position,
            velocity: velocity_toward(direction) * FLING_SPEED,
        }];
    }

    // Screen y grows downward while fling velocity grows upward.
    let step = velocity_toward(direction) * Vec2::new(1.0, -1.0);
    let target = position + step * layout.cell_length();
    if layout.cell_at(target).is_none() {
        return Vec::new();
    }
    vec![
        Gesture::Tap { position },
        Gesture::Tap { position: target },
    ]
}

fn dispatch(session: &mut GameSession, intent: Intent, out: &mut Vec<Event>) {
    match intent {
        Intent::Activate(cell) => session.activate_cell(cell, out),
        Intent::Swipe { cell, direction } => session.swipe(cell, direction, out),
    }
}

#[derive(Debug, Default)]
struct RunStats {
    moves: u64,
    matches: u64,
    spawns: u64,
}

impl RunStats {
    fn observe(&mut self, event: &Event) {
        match event {
            Event::MatchScored { .. } => self.matches += 1,
            Event::PieceSpawned { .. } => self.spawns += 1,
            _ => {}
        }
    }
}

fn describe(event: &Event) -> String {
    match event {
        Event::PieceSpawned { cell, piece } => format!("spawned {piece} at {}", coord(*cell)),
        Event::PieceMoved { from, to, motion } => format!(
            "moved {} -> {} ({motion:?}, {} ms)",
            coord(*from),
            coord(*to),
            motion.duration().as_millis()
        ),
        Event::PieceCleared { cell } => format!(
            "cleared {} ({} ms)",
            coord(*cell),
            REMOVE_DURATION.as_millis()
        ),
        Event::ColumnWarningChanged { column, full } => {
            if *full {
                format!("column {column} is full")
            } else {
                format!("column {column} has room")
            }
        }
        Event::SelectionChanged { cell: Some(cell) } => format!("selected {}", coord(*cell)),
        Event::SelectionChanged { cell: None } => "selection cleared".to_owned(),
        Event::MatchScored {
            length,
            points,
            score,
        } => format!("matched {length} for {points} points (score {score})"),
        Event::LevelAdvanced { level } => format!("level {level}"),
        Event::ResolverStateChanged { state } => match state {
            ResolverState::Idle => "resolver idle".to_owned(),
            ResolverState::Resolving => "resolver resolving".to_owned(),
        },
        Event::Cue { cue } => format!("cue {}", cue.name()),
        Event::GameOver { grace } => format!("game over (grace {:.1}s)", grace.as_secs_f32()),
    }
}

fn coord(cell: CellCoord) -> String {
    format!("({}, {})", cell.column(), cell.row())
}

/// Draws the board with one letter per catalog slot and `.` for empty cells.
fn render_board(session: &GameSession) -> String {
    let view = query::board_view(session.world());
    let slots = session.catalog().slots();
    let (columns, _) = view.dimensions();
    let mut rendered = String::new();

    for (cell, piece) in view.iter() {
        let glyph = match piece {
            None => '.',
            Some(piece) => slots
                .iter()
                .position(|slot| *slot == piece)
                .and_then(|index| char::from_digit(index as u32 + 10, 36))
                .map_or('?', |glyph| glyph.to_ascii_uppercase()),
        };
        rendered.push(glyph);
        if cell.column() + 1 == columns {
            rendered.push('\n');
        } else {
            rendered.push(' ');
        }
    }

    let _ = write!(
        rendered,
        "score {} | level {} | next level in {}",
        session.score(),
        session.level(),
        session.points_to_next()
    );
    rendered
}
