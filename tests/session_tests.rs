//! Session tests: state machine, scoring, Time mode countdown and settle delay.

use sumstack::core::{
    find_overlap, is_compacted, level_for_score, GridConfig, RandomSource, Session,
    SessionEvent, SimpleRng, Tile,
};
use sumstack::types::{GameCommand, GameMode, GameStatus, TileId, GRID_ROWS, TIME_LIMIT_SECS};

/// Replays a fixed list of draws, cycling when exhausted.
struct Scripted {
    draws: Vec<u32>,
    pos: usize,
}

impl Scripted {
    fn new(draws: &[u32]) -> Self {
        Self {
            draws: draws.to_vec(),
            pos: 0,
        }
    }
}

impl RandomSource for Scripted {
    fn next_u32(&mut self) -> u32 {
        let v = self.draws[self.pos % self.draws.len()];
        self.pos += 1;
        v
    }

    fn next_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        self.next_u32().clamp(lo, hi)
    }
}

fn tile(id: u64, value: u32, row: u8, col: u8) -> Tile {
    Tile::new(TileId(id), value, row, col)
}

fn staged(config: GridConfig, mode: GameMode, tiles: Vec<Tile>, target: u32) -> Session<SimpleRng> {
    let mut s = Session::new(config, SimpleRng::new(99)).unwrap();
    assert!(s.start_game(mode));
    s.load_layout(tiles, target).unwrap();
    s.drain_events();
    s
}

fn assert_consistent(s: &Session<impl RandomSource>) {
    assert_eq!(find_overlap(s.tiles()), None, "two tiles share a cell");
    if !s.is_clear_pending() {
        assert!(is_compacted(s.tiles()), "column has a gap");
    }
    assert_eq!(s.level(), level_for_score(s.score()));
}

#[test]
fn test_scripted_opening_and_first_clear() {
    // 18 opening values, then the target, then the injected row.
    let mut draws = vec![7, 8, 1, 1, 1, 1];
    draws.extend([2; 12]);
    draws.push(15);
    draws.extend([3; 6]);
    let mut s = Session::new(GridConfig::headless(), Scripted::new(&draws)).unwrap();

    s.start_game(GameMode::Classic);
    assert_eq!(s.target(), 15);
    let seven = s.grid().tile_at(0, 0).unwrap().id;
    let eight = s.grid().tile_at(0, 1).unwrap().id;

    assert!(s.select_tile(seven));
    assert!(s.select_tile(eight));

    assert_eq!(s.score(), 2 * 10);
    assert!(s.selected_ids().is_empty());
    // Two removed, one row of six injected.
    assert_eq!(s.tiles().len(), 18 - 2 + 6);
    assert!(s.grid().tile_at(0, 0).is_some_and(|t| t.value == 3));
    assert_consistent(&s);

    let events = s.drain_events();
    assert!(events.contains(&SessionEvent::Cleared {
        matched: 2,
        points: 20,
        big: false
    }));
    assert!(events.contains(&SessionEvent::RowInjected));
}

#[test]
fn test_overshoot_drops_selection_and_keeps_score() {
    let wide_values = GridConfig {
        block_max: 10,
        ..GridConfig::headless()
    };
    let mut s = staged(
        wide_values,
        GameMode::Classic,
        vec![tile(1, 10, 0, 0), tile(2, 10, 0, 1)],
        15,
    );

    s.select_tile(TileId(1));
    assert_eq!(s.selection_sum(), 10);
    s.select_tile(TileId(2));

    assert!(s.selected_ids().is_empty());
    assert_eq!(s.score(), 0);
    assert_eq!(s.tiles().len(), 2);
    assert_eq!(s.drain_events(), vec![SessionEvent::Overshoot { sum: 20 }]);
}

#[test]
fn test_time_mode_overflow_ends_game_and_stops_countdown() {
    let mut s = staged(
        GridConfig::headless(),
        GameMode::Time,
        vec![tile(1, 4, 0, 0), tile(2, 5, GRID_ROWS - 1, 0)],
        20,
    );

    for _ in 0..TIME_LIMIT_SECS {
        s.tick(1000);
    }

    assert_eq!(s.status(), GameStatus::GameOver);
    assert_eq!(s.time_left(), 0);
    assert_eq!(s.tiles().len(), 2);
    assert_eq!(
        s.drain_events().last(),
        Some(&SessionEvent::GameOver { score: 0 })
    );

    assert!(!s.tick(5000));
    assert_eq!(s.time_left(), 0);
    assert!(!s.select_tile(TileId(1)));
}

/// Column 0 stacked to the danger row, plus a 7 and an 8 beside it.
fn stacked_column() -> Vec<Tile> {
    let mut tiles: Vec<Tile> = (0..GRID_ROWS).map(|r| tile(100 + r as u64, 1, r, 0)).collect();
    tiles.push(tile(1, 7, 0, 1));
    tiles.push(tile(2, 8, 0, 2));
    tiles.push(tile(3, 4, 0, 3));
    tiles
}

#[test]
fn test_classic_clear_that_overflows_ends_game() {
    let mut s = staged(GridConfig::headless(), GameMode::Classic, stacked_column(), 15);

    s.select_tile(TileId(1));
    s.select_tile(TileId(2));

    assert_eq!(s.status(), GameStatus::GameOver);
    assert_eq!(s.score(), 20);
    assert!(s.selected_ids().is_empty());
    assert_eq!(s.tiles().len(), GRID_ROWS as usize + 1);
    assert_eq!(
        s.drain_events(),
        vec![
            SessionEvent::Cleared {
                matched: 2,
                points: 20,
                big: false
            },
            SessionEvent::GameOver { score: 20 },
        ]
    );
    assert!(!s.select_tile(TileId(3)));
}

#[test]
fn test_selection_queued_during_settle_is_dropped_on_overflow() {
    let config = GridConfig::headless().with_settle_delay_ms(200);
    let mut s = staged(config, GameMode::Classic, stacked_column(), 15);

    s.select_tile(TileId(1));
    s.select_tile(TileId(2));
    assert!(s.is_clear_pending());
    assert!(s.select_tile(TileId(3)));

    s.tick(250);

    assert_eq!(s.status(), GameStatus::GameOver);
    assert!(!s.is_clear_pending());
    assert!(s.selected_ids().is_empty());
    assert!(s.grid().contains(TileId(3)));
    assert_eq!(s.snapshot().selection_sum, 0);
}

#[test]
fn test_time_mode_injects_and_resets_countdown() {
    let mut s = staged(GridConfig::headless(), GameMode::Time, vec![tile(1, 4, 0, 0)], 20);

    s.tick(9_999);
    assert_eq!(s.time_left(), 1);
    s.tick(1);
    assert_eq!(s.time_left(), TIME_LIMIT_SECS);
    assert_eq!(s.tiles().len(), 7);
    assert_eq!(s.grid().tile(TileId(1)).map(|t| t.row), Some(1));
    assert_consistent(&s);
}

#[test]
fn test_pause_freezes_countdown() {
    let mut s = staged(GridConfig::headless(), GameMode::Time, vec![tile(1, 4, 0, 0)], 20);

    s.tick(3_500);
    assert_eq!(s.time_left(), 7);

    assert!(s.apply_command(GameCommand::TogglePause));
    assert!(!s.tick(60_000));
    assert!(!s.select_tile(TileId(1)));
    assert_eq!(s.time_left(), 7);

    assert!(s.apply_command(GameCommand::TogglePause));
    s.tick(500);
    assert_eq!(s.time_left(), 6);
}

#[test]
fn test_settle_delay_queues_selection_until_clear_resolves() {
    let config = GridConfig::headless().with_settle_delay_ms(200);
    let mut s = staged(
        config,
        GameMode::Time,
        vec![
            tile(1, 6, 0, 0),
            tile(2, 9, 1, 0),
            tile(3, 4, 2, 0),
            tile(4, 2, 0, 1),
        ],
        15,
    );

    s.select_tile(TileId(1));
    s.select_tile(TileId(2));
    assert!(s.is_clear_pending());
    assert_eq!(s.score(), 20);
    assert!(s.tiles().iter().filter(|t| t.is_removing).count() == 2);

    // Queued: tile 3 still sits at row 2 until the clear resolves.
    assert!(s.select_tile(TileId(3)));
    assert!(s.selected_ids().len() == 2);

    assert!(!s.tick(150));
    assert!(s.is_clear_pending());

    assert!(s.tick(50));
    assert!(!s.is_clear_pending());
    assert_eq!(s.grid().tile(TileId(3)).map(|t| t.row), Some(0));
    assert_eq!(s.selected_ids(), &[TileId(3)]);
    assert_consistent(&s);
}

#[test]
fn test_settle_delay_holds_countdown_time() {
    let config = GridConfig::headless().with_settle_delay_ms(200);
    let mut s = staged(
        config,
        GameMode::Time,
        vec![tile(1, 6, 0, 0), tile(2, 9, 0, 1), tile(3, 1, 0, 2)],
        15,
    );

    s.tick(900);
    s.select_tile(TileId(1));
    s.select_tile(TileId(2));
    s.tick(150);
    assert_eq!(s.time_left(), TIME_LIMIT_SECS);

    // Clear resolves, then the held 150ms plus this tick reach a full second.
    s.tick(50);
    assert_eq!(s.time_left(), TIME_LIMIT_SECS - 1);
}

#[test]
fn test_score_is_sum_of_clears_at_their_level() {
    let config = GridConfig {
        cols: 16,
        rows: 10,
        initial_rows: 6,
        block_min: 1,
        block_max: 1,
        target_min: 12,
        target_max: 12,
        ..GridConfig::headless()
    };
    let mut s = Session::new(config, SimpleRng::new(5)).unwrap();
    s.start_game(GameMode::Classic);

    let mut expected = 0u32;
    let mut reached_level_two = false;
    for _ in 0..6 {
        assert_eq!(s.status(), GameStatus::Playing);
        let level = s.level();

        let mut picks: Vec<&Tile> = s.tiles().iter().collect();
        picks.sort_by_key(|t| std::cmp::Reverse(t.row));
        let ids: Vec<TileId> = picks.iter().take(12).map(|t| t.id).collect();
        for id in ids {
            s.select_tile(id);
        }

        expected += 12 * 10 * level;
        assert_eq!(s.score(), expected);
        assert_consistent(&s);
        reached_level_two |= s.level() == 2;
    }
    assert!(reached_level_two);
}

#[test]
fn test_random_play_never_breaks_grid_invariants() {
    let mut s = Session::new(GridConfig::headless(), SimpleRng::new(2024)).unwrap();
    let mut picker = SimpleRng::new(77);
    s.start_game(GameMode::Time);

    for _ in 0..2_000 {
        if s.status() != GameStatus::Playing {
            break;
        }
        let tiles = s.tiles();
        if !tiles.is_empty() {
            let idx = picker.next_u32() as usize % tiles.len();
            let id = tiles[idx].id;
            s.select_tile(id);
        }
        s.tick(250);
        assert_consistent(&s);
        assert!(s.tiles().iter().all(|t| t.row < GRID_ROWS));
    }
}

#[test]
fn test_commands_outside_play_are_ignored() {
    let mut s = Session::new(GridConfig::headless(), SimpleRng::new(1)).unwrap();
    assert!(!s.select_tile(TileId(1)));
    assert!(!s.toggle_pause());
    assert!(!s.restart());
    assert!(!s.tick(1000));

    assert!(s.apply_command(GameCommand::Start(GameMode::Classic)));
    assert!(!s.apply_command(GameCommand::Start(GameMode::Time)));
    assert!(!s.select_tile(TileId(9_999)));

    assert!(s.set_status(GameStatus::Menu));
    assert_eq!(s.status(), GameStatus::Menu);
    assert!(s.tiles().is_empty());
    assert!(!s.set_status(GameStatus::Playing));
}
