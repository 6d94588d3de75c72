use theme_match_core::{CellCoord, Command, PieceColor, PieceShape, PieceType};
use theme_match_system_matching::{detect, Axis};
use theme_match_world::{self as world, query, World};

const RED: PieceType = PieceType::new(PieceShape::Apple, PieceColor::Red);
const BLUE: PieceType = PieceType::new(PieceShape::Diamond, PieceColor::Blue);
const GOLD: PieceType = PieceType::new(PieceShape::Chip, PieceColor::Gold);

fn world_with(pieces: &[((u32, u32), PieceType)]) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    for &((column, row), piece) in pieces {
        world::apply(
            &mut world,
            Command::PlacePieceAt {
                cell: CellCoord::new(column, row),
                piece,
            },
            &mut events,
        );
    }
    world
}

#[test]
fn top_row_triple_is_cleared() {
    let world = world_with(&[
        ((0, 0), RED),
        ((1, 0), RED),
        ((2, 0), RED),
        ((3, 0), BLUE),
    ]);

    let report = detect(query::board_view(&world));

    assert_eq!(report.runs().len(), 1);
    assert_eq!(report.runs()[0].cells().len(), 3);
    assert_eq!(
        report.cleared(),
        &[
            CellCoord::new(0, 0),
            CellCoord::new(1, 0),
            CellCoord::new(2, 0),
        ]
    );
}

#[test]
fn crossing_runs_share_a_cell_but_score_separately() {
    // A plus shape centred on (3, 4).
    let world = world_with(&[
        ((2, 4), GOLD),
        ((3, 4), GOLD),
        ((4, 4), GOLD),
        ((3, 3), GOLD),
        ((3, 5), GOLD),
    ]);

    let report = detect(query::board_view(&world));

    let runs: Vec<_> = report
        .runs()
        .iter()
        .map(|run| (run.axis(), run.cells().len()))
        .collect();
    assert_eq!(runs, vec![(Axis::Row, 3), (Axis::Column, 3)]);
    assert_eq!(report.cleared().len(), 5);
    let shared = report
        .cleared()
        .iter()
        .filter(|cell| **cell == CellCoord::new(3, 4))
        .count();
    assert_eq!(shared, 1);
}

#[test]
fn runs_do_not_wrap_across_row_boundaries() {
    // Linear indices 6, 7, 8 hold the same piece but span two rows.
    let world = world_with(&[((6, 0), RED), ((7, 0), RED), ((0, 1), RED)]);
    assert!(detect(query::board_view(&world)).is_empty());
}

#[test]
fn runs_do_not_wrap_across_column_boundaries() {
    let world = world_with(&[((0, 6), BLUE), ((0, 7), BLUE), ((1, 0), BLUE)]);
    assert!(detect(query::board_view(&world)).is_empty());
}

#[test]
fn rows_are_reported_before_columns() {
    let world = world_with(&[
        ((5, 1), BLUE),
        ((5, 2), BLUE),
        ((5, 3), BLUE),
        ((0, 7), RED),
        ((1, 7), RED),
        ((2, 7), RED),
    ]);

    let report = detect(query::board_view(&world));
    let axes: Vec<_> = report.runs().iter().map(|run| run.axis()).collect();
    assert_eq!(axes, vec![Axis::Row, Axis::Column]);
    assert_eq!(report.runs()[0].piece(), RED);
    assert_eq!(report.runs()[1].piece(), BLUE);
}

#[test]
fn detection_is_idempotent() {
    let world = world_with(&[
        ((0, 7), RED),
        ((1, 7), RED),
        ((2, 7), RED),
        ((2, 6), RED),
        ((2, 5), RED),
        ((6, 7), BLUE),
        ((6, 6), BLUE),
    ]);

    let first = detect(query::board_view(&world));
    let second = detect(query::board_view(&world));

    assert_eq!(first, second);
    assert_eq!(first.cleared().len(), 5);
}

#[test]
fn full_length_line_matches_end_to_end() {
    let pieces: Vec<_> = (0..8).map(|column| ((column, 7), GOLD)).collect();
    let world = world_with(&pieces);

    let report = detect(query::board_view(&world));
    assert_eq!(report.runs().len(), 1);
    assert_eq!(report.runs()[0].cells().len(), 8);
}
