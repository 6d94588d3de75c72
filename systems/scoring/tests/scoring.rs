use theme_match_core::{level_params, AudioCue, Event};
use theme_match_system_scoring::ScoreTracker;

fn level_advances(events: &[Event]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::LevelAdvanced { level } => Some(*level),
            _ => None,
        })
        .collect()
}

#[test]
fn fifteen_matched_pieces_reach_level_two() {
    let mut tracker = ScoreTracker::new();
    let mut events = Vec::new();

    for _ in 0..4 {
        assert_eq!(tracker.record(3, &mut events), None);
    }
    assert_eq!(tracker.level(), 1);
    assert_eq!(tracker.points_to_next(), 3);

    let advanced = tracker.record(3, &mut events);

    assert_eq!(advanced, Some(level_params(2)));
    assert_eq!(tracker.level(), 2);
    assert_eq!(tracker.score(), 5);
    assert_eq!(tracker.points_to_next(), 20);
    assert_eq!(level_advances(&events), vec![2]);
    assert_eq!(
        &events[events.len() - 2..],
        &[
            Event::LevelAdvanced { level: 2 },
            Event::Cue {
                cue: AudioCue::Victory,
            },
        ]
    );
}

#[test]
fn threshold_decrements_by_length_not_points() {
    let mut tracker = ScoreTracker::new();
    let mut events = Vec::new();

    let _ = tracker.record(6, &mut events);

    assert_eq!(tracker.score(), 25);
    assert_eq!(tracker.points_to_next(), 9);
    assert_eq!(tracker.level(), 1);
}

#[test]
fn a_single_run_advances_at_most_one_level() {
    let mut tracker = ScoreTracker::new();
    let mut events = Vec::new();

    // 40 pieces would cover levels one and two, but only one advance happens.
    let advanced = tracker.record(40, &mut events);

    assert_eq!(advanced.map(|params| params.difficulty()), Some(3));
    assert_eq!(tracker.level(), 2);
    assert_eq!(tracker.points_to_next(), 20);
    assert_eq!(level_advances(&events), vec![2]);
}

#[test]
fn score_never_decreases() {
    let mut tracker = ScoreTracker::new();
    let mut events = Vec::new();
    let mut previous = tracker.score();

    for length in [3, 5, 3, 7, 4, 3, 6, 3, 3, 8, 3] {
        let _ = tracker.record(length, &mut events);
        assert!(tracker.score() >= previous);
        previous = tracker.score();
    }
}

#[test]
fn progression_walks_the_level_table() {
    let mut tracker = ScoreTracker::new();
    let mut events = Vec::new();

    for level in 1..=9 {
        assert_eq!(tracker.level(), level);
        assert_eq!(tracker.params(), level_params(level));
        let needed = level_params(level).points_to_next();
        let _ = tracker.record(needed, &mut events);
    }

    assert_eq!(tracker.level(), 10);
    assert_eq!(tracker.params(), level_params(9));
    assert_eq!(level_advances(&events), (2..=10).collect::<Vec<_>>());
}
