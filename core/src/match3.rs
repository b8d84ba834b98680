use crate::cascade::{resolve_board, validate_board_rules, BoardRules};
use crate::grid::{find_matches, Cell, Grid};
use crate::rng::GameRng;

pub const MATCH3_COLS_DEFAULT: usize = 15;
pub const MATCH3_ROWS_DEFAULT: usize = 15;
pub const MATCH3_MOVE_BUDGET_DEFAULT: u32 = 30;

// Bounds the re-deal loop that clears accidental starting matches.
pub const DEAL_PASS_CAP: u32 = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match3Rules {
    pub cols: usize,
    pub rows: usize,
    pub board: BoardRules,
    pub move_budget: u32,
}

impl Default for Match3Rules {
    fn default() -> Self {
        Self {
            cols: MATCH3_COLS_DEFAULT,
            rows: MATCH3_ROWS_DEFAULT,
            board: BoardRules::default(),
            move_budget: MATCH3_MOVE_BUDGET_DEFAULT,
        }
    }
}

pub fn validate_match3_rules(rules: &Match3Rules) -> Result<(), String> {
    if rules.cols == 0 || rules.rows == 0 {
        return Err("board dimensions must be non-zero".to_string());
    }
    if rules.move_budget == 0 {
        return Err("move budget must be non-zero".to_string());
    }
    validate_board_rules(&rules.board)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Match3Action {
    Swap { a: usize, b: usize },
    Restart { seed: u32 },
}

#[derive(Clone, Debug)]
pub struct Match3State {
    pub grid: Grid,
    pub rules: Match3Rules,
    pub rng: GameRng,
    pub seed: u32,
    pub score: u64,
    pub moves_left: u32,
    pub cascades: u64,
    pub game_over: bool,
}

impl Match3State {
    pub fn new(rules: Match3Rules, seed: u32) -> Self {
        let mut rng = GameRng::new(seed);
        let grid = deal_board(rules.cols, rules.rows, &rules.board, &mut rng);
        Self {
            grid,
            rules,
            rng,
            seed,
            score: 0,
            moves_left: rules.move_budget,
            cascades: 0,
            game_over: false,
        }
    }

    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        if a >= self.grid.len() || b >= self.grid.len() || a == b {
            return false;
        }
        let (col_a, row_a) = self.grid.col_row(a);
        let (col_b, row_b) = self.grid.col_row(b);
        let dc = col_a.abs_diff(col_b);
        let dr = row_a.abs_diff(row_b);
        dc + dr == 1
    }

    pub fn apply(&mut self, action: Match3Action) {
        match action {
            Match3Action::Swap { a, b } => self.swap(a, b),
            Match3Action::Restart { seed } => {
                *self = Match3State::new(self.rules, seed);
            }
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if self.game_over || !self.are_adjacent(a, b) {
            return;
        }
        let cell_a = self.grid.cell(a);
        let cell_b = self.grid.cell(b);
        if cell_a.is_empty() || cell_b.is_empty() {
            return;
        }
        self.grid.set_cell(a, cell_b);
        self.grid.set_cell(b, cell_a);
        if find_matches(&self.grid, self.rules.board.min_group_size).is_empty() {
            // No match: the swap reverts and costs nothing.
            self.grid.set_cell(a, cell_a);
            self.grid.set_cell(b, cell_b);
            return;
        }
        let outcome = resolve_board(&mut self.grid, &self.rules.board, &mut self.rng);
        self.score += outcome.score;
        self.cascades += outcome.rounds as u64;
        self.moves_left = self.moves_left.saturating_sub(1);
        if self.moves_left == 0 {
            self.game_over = true;
        }
    }
}

// Fill the board, then re-roll matched cells until the opening position is
// quiet. The pass cap keeps the loop bounded even for tiny gem counts that
// cannot avoid matches; the final pass leaves whatever remains.
pub fn deal_board(cols: usize, rows: usize, board: &BoardRules, rng: &mut GameRng) -> Grid {
    let mut grid = Grid::new(cols, rows);
    for id in 0..grid.len() {
        grid.set_cell(id, Cell::Gem(rng.gem(board.gem_count)));
    }
    for _ in 0..DEAL_PASS_CAP {
        let groups = find_matches(&grid, board.min_group_size);
        if groups.is_empty() {
            break;
        }
        for group in &groups {
            for &id in &group.cells {
                grid.set_cell(id, Cell::Gem(rng.gem(board.gem_count)));
            }
        }
    }
    grid
}
