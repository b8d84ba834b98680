use asobiba_core::blocks::{BlocksAction, BlocksRules, BlocksState, Piece};
use asobiba_core::cascade::BoardRules;
use asobiba_core::grid::{find_matches, Cell, Gem, Grid};
use asobiba_core::match3::{Match3Action, Match3Rules, Match3State};
use asobiba_core::quiz::{
    QuizAction, QuizState, ANSWER_SCORE, QUESTION_TICK_LIMIT, QUIZ_CATALOG, STREAK_BONUS,
};
use asobiba_core::rng::GameRng;
use asobiba_core::snapshot::{restore_match3, snapshot_match3, GameStateSnapshot};

fn build_grid(rows: &[&str]) -> Grid {
    let height = rows.len();
    let width = rows.first().map(|row| row.len()).unwrap_or(0);
    let mut cells = Vec::with_capacity(width * height);
    for row in rows {
        for ch in row.chars() {
            cells.push(match ch {
                '.' => Cell::Empty,
                'A' => Cell::Gem(Gem::Ruby),
                'B' => Cell::Gem(Gem::Amber),
                'C' => Cell::Gem(Gem::Emerald),
                'D' => Cell::Gem(Gem::Sapphire),
                other => panic!("unknown fixture char {other}"),
            });
        }
    }
    Grid::from_cells(width, height, cells).expect("fixture dimensions")
}

fn match3_fixture(rows: &[&str]) -> Match3State {
    let grid = build_grid(rows);
    let rules = Match3Rules {
        cols: grid.cols(),
        rows: grid.rows(),
        board: BoardRules {
            min_group_size: 3,
            gem_count: 4,
            refill: false,
        },
        move_budget: 10,
    };
    Match3State {
        grid,
        rules,
        rng: GameRng::new(1),
        seed: 1,
        score: 0,
        moves_left: rules.move_budget,
        cascades: 0,
        game_over: false,
    }
}

#[test]
fn match3_deal_opens_quiet() {
    let state = Match3State::new(Match3Rules::default(), 0x5EED_0001);
    assert!(find_matches(&state.grid, state.rules.board.min_group_size).is_empty());
    assert!(state.grid.cells().iter().all(|cell| !cell.is_empty()));
    assert_eq!(state.moves_left, state.rules.move_budget);
}

#[test]
fn match3_deal_is_deterministic_per_seed() {
    let first = Match3State::new(Match3Rules::default(), 42);
    let second = Match3State::new(Match3Rules::default(), 42);
    assert_eq!(first.grid, second.grid);
}

#[test]
fn match3_swap_without_match_reverts() {
    let state_before = match3_fixture(&["ABC", "BCD", "CDA"]);
    let mut state = state_before.clone();
    state.apply(Match3Action::Swap { a: 0, b: 1 });
    assert_eq!(state.grid, state_before.grid);
    assert_eq!(state.moves_left, state_before.moves_left);
    assert_eq!(state.score, 0);
}

#[test]
fn match3_swap_into_match_clears_and_consumes_a_move() {
    // Swapping cells 4 and 7 lines up the rubies across the bottom row.
    let mut state = match3_fixture(&["BCD", "DAB", "ABA"]);
    state.apply(Match3Action::Swap { a: 4, b: 7 });
    assert_eq!(state.moves_left, 9);
    assert_eq!(state.score, 30);
    assert_eq!(state.cascades, 1);
    // The amber above the cleared run settles onto the bottom row.
    assert_eq!(state.grid.cell(7), Cell::Gem(Gem::Amber));
}

#[test]
fn match3_rejects_non_adjacent_swaps() {
    let state_before = match3_fixture(&["BCD", "DAB", "ABA"]);
    let mut state = state_before.clone();
    state.apply(Match3Action::Swap { a: 0, b: 8 });
    assert_eq!(state.grid, state_before.grid);
    assert_eq!(state.moves_left, state_before.moves_left);
}

#[test]
fn match3_game_ends_when_moves_run_out() {
    let mut state = match3_fixture(&["BCD", "DAB", "ABA"]);
    state.moves_left = 1;
    state.apply(Match3Action::Swap { a: 4, b: 7 });
    assert_eq!(state.moves_left, 0);
    assert!(state.game_over);
    let frozen = state.grid.clone();
    state.apply(Match3Action::Swap { a: 0, b: 1 });
    assert_eq!(state.grid, frozen);
}

fn blocks_fixture() -> BlocksState {
    let mut state = BlocksState::new(BlocksRules::default(), 99);
    state.piece = Piece {
        gems: [Gem::Ruby, Gem::Amber, Gem::Emerald],
        col: 4,
        row: 0,
    };
    state.next_gems = [Gem::Sapphire, Gem::Amber, Gem::Ruby];
    state
}

#[test]
fn blocks_hard_drop_locks_at_the_floor() {
    let mut state = blocks_fixture();
    state.apply(BlocksAction::Drop);
    let rows = state.grid.rows();
    let bottom = state.grid.index_of(4, rows - 1).expect("in bounds");
    let middle = state.grid.index_of(4, rows - 2).expect("in bounds");
    let top = state.grid.index_of(4, rows - 3).expect("in bounds");
    assert_eq!(state.grid.cell(bottom), Cell::Gem(Gem::Emerald));
    assert_eq!(state.grid.cell(middle), Cell::Gem(Gem::Amber));
    assert_eq!(state.grid.cell(top), Cell::Gem(Gem::Ruby));
    assert!(!state.game_over);
    assert_eq!(state.piece.gems, [Gem::Sapphire, Gem::Amber, Gem::Ruby]);
    assert_eq!(state.piece.row, 0);
}

#[test]
fn blocks_tick_advances_at_the_drop_interval() {
    let mut state = blocks_fixture();
    let interval = state.ticks_per_drop();
    for _ in 0..interval - 1 {
        state.apply(BlocksAction::Tick);
    }
    assert_eq!(state.piece.row, 0);
    state.apply(BlocksAction::Tick);
    assert_eq!(state.piece.row, 1);
}

#[test]
fn blocks_shift_respects_well_walls() {
    let mut state = blocks_fixture();
    for _ in 0..state.rules.cols {
        state.apply(BlocksAction::ShiftLeft);
    }
    assert_eq!(state.piece.col, 0);
    for _ in 0..state.rules.cols * 2 {
        state.apply(BlocksAction::ShiftRight);
    }
    assert_eq!(state.piece.col, state.rules.cols - 1);
}

#[test]
fn blocks_cycle_rotates_the_triple() {
    let mut state = blocks_fixture();
    state.apply(BlocksAction::Cycle);
    assert_eq!(state.piece.gems, [Gem::Emerald, Gem::Ruby, Gem::Amber]);
    state.apply(BlocksAction::Cycle);
    state.apply(BlocksAction::Cycle);
    assert_eq!(state.piece.gems, [Gem::Ruby, Gem::Amber, Gem::Emerald]);
}

#[test]
fn blocks_lock_clears_a_completed_run() {
    let mut state = blocks_fixture();
    let rows = state.grid.rows();
    for row in [rows - 1, rows - 2] {
        let id = state.grid.index_of(4, row).expect("in bounds");
        state.grid.set_cell(id, Cell::Gem(Gem::Ruby));
    }
    state.piece = Piece {
        gems: [Gem::Amber, Gem::Ruby, Gem::Ruby],
        col: 4,
        row: 0,
    };
    state.apply(BlocksAction::Drop);
    assert_eq!(state.cleared, 4);
    // The amber survivor settles onto the floor once the rubies vanish.
    let bottom = state.grid.index_of(4, rows - 1).expect("in bounds");
    assert_eq!(state.grid.cell(bottom), Cell::Gem(Gem::Amber));
    let above = state.grid.index_of(4, rows - 2).expect("in bounds");
    assert!(state.grid.cell(above).is_empty());
}

#[test]
fn blocks_top_out_ends_the_game() {
    let mut state = blocks_fixture();
    // Fill the spawn column from row 2 down with alternating gems (no runs),
    // leaving only two free rows: the locked piece pokes above the well.
    for row in 2..state.grid.rows() {
        let gem = if row % 2 == 0 { Gem::Sapphire } else { Gem::Emerald };
        let id = state.grid.index_of(4, row).expect("in bounds");
        state.grid.set_cell(id, Cell::Gem(gem));
    }
    state.apply(BlocksAction::Drop);
    assert!(state.game_over);
}

#[test]
fn quiz_scores_streaks_and_finishes() {
    let mut state = QuizState::new();
    let first = state.question().expect("catalog not empty");
    state.apply(QuizAction::Answer(first.answer));
    assert_eq!(state.score, ANSWER_SCORE);
    assert_eq!(state.streak, 1);

    let second = state.question().expect("second question");
    state.apply(QuizAction::Answer(second.answer));
    assert_eq!(state.score, ANSWER_SCORE * 2 + STREAK_BONUS);
    assert_eq!(state.streak, 2);

    // A wrong answer resets the streak without touching the score.
    let third = state.question().expect("third question");
    let wrong = (third.answer + 1) % 4;
    state.apply(QuizAction::Answer(wrong));
    assert_eq!(state.streak, 0);
    assert_eq!(state.score, ANSWER_SCORE * 2 + STREAK_BONUS);

    while !state.finished {
        let question = state.question().expect("question while unfinished");
        state.apply(QuizAction::Answer(question.answer));
    }
    assert_eq!(state.index, QUIZ_CATALOG.len());
    assert!(state.question().is_none());
}

#[test]
fn quiz_timeout_advances_like_a_miss() {
    let mut state = QuizState::new();
    state.apply(QuizAction::Answer(QUIZ_CATALOG[0].answer));
    assert_eq!(state.streak, 1);
    for _ in 0..QUESTION_TICK_LIMIT {
        state.apply(QuizAction::Tick);
    }
    assert_eq!(state.index, 2);
    assert_eq!(state.streak, 0);
    assert_eq!(state.ticks_left, QUESTION_TICK_LIMIT);
}

#[test]
fn match3_snapshot_restores_the_same_position() {
    let mut state = Match3State::new(Match3Rules::default(), 7);
    state.apply(Match3Action::Swap { a: 0, b: 1 });
    let snapshot = snapshot_match3(&state);
    let GameStateSnapshot::Match3(inner) = &snapshot.state else {
        panic!("wrong snapshot variant");
    };
    let restored = restore_match3(inner).expect("restore");
    assert_eq!(restored.grid, state.grid);
    assert_eq!(restored.score, state.score);
    assert_eq!(restored.moves_left, state.moves_left);
    assert_eq!(restored.rng.state(), state.rng.state());
}

#[test]
fn corrupt_grid_snapshot_is_rejected() {
    let state = Match3State::new(Match3Rules::default(), 7);
    let snapshot = snapshot_match3(&state);
    let GameStateSnapshot::Match3(mut inner) = snapshot.state else {
        panic!("wrong snapshot variant");
    };
    inner.grid.cells[0] = 200;
    assert!(restore_match3(&inner).is_none());
}
