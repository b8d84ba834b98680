use crate::cascade::{resolve_board, validate_board_rules, BoardRules, CascadeOutcome};
use crate::grid::{Cell, Gem, Grid};
use crate::rng::GameRng;

pub const BLOCKS_COLS_DEFAULT: usize = 8;
pub const BLOCKS_ROWS_DEFAULT: usize = 18;
pub const PIECE_SIZE: usize = 3;

pub const TICKS_PER_DROP_START: u32 = 12;
pub const TICKS_PER_DROP_MIN: u32 = 2;
pub const LEVEL_CLEAR_STEP: usize = 20;

pub const DROP_BONUS_PER_ROW: u64 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlocksRules {
    pub cols: usize,
    pub rows: usize,
    pub board: BoardRules,
}

impl Default for BlocksRules {
    fn default() -> Self {
        Self {
            cols: BLOCKS_COLS_DEFAULT,
            rows: BLOCKS_ROWS_DEFAULT,
            // Falling-block wells settle by gravity only; nothing rains back in.
            board: BoardRules {
                refill: false,
                ..BoardRules::default()
            },
        }
    }
}

pub fn validate_blocks_rules(rules: &BlocksRules) -> Result<(), String> {
    if rules.cols == 0 || rules.rows < PIECE_SIZE {
        return Err("well must be at least one column and three rows".to_string());
    }
    if rules.board.refill {
        return Err("falling-block wells do not refill".to_string());
    }
    validate_board_rules(&rules.board)
}

// A vertical triple. `row` is the bottom cell; the other two sit above it and
// may still be off the top of the well (negative rows) right after spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub gems: [Gem; PIECE_SIZE],
    pub col: usize,
    pub row: i32,
}

impl Piece {
    pub fn cell_rows(&self) -> [i32; PIECE_SIZE] {
        [self.row - 2, self.row - 1, self.row]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlocksAction {
    ShiftLeft,
    ShiftRight,
    Cycle,
    Drop,
    Tick,
    Restart { seed: u32 },
}

#[derive(Clone, Debug)]
pub struct BlocksState {
    pub grid: Grid,
    pub rules: BlocksRules,
    pub rng: GameRng,
    pub seed: u32,
    pub piece: Piece,
    pub next_gems: [Gem; PIECE_SIZE],
    pub score: u64,
    pub cleared: usize,
    pub drop_ticks: u32,
    pub game_over: bool,
}

impl BlocksState {
    pub fn new(rules: BlocksRules, seed: u32) -> Self {
        let mut rng = GameRng::new(seed);
        let piece = spawn_piece(&rules, &mut rng);
        let next_gems = roll_gems(&rules, &mut rng);
        Self {
            grid: Grid::new(rules.cols, rules.rows),
            rules,
            rng,
            seed,
            piece,
            next_gems,
            score: 0,
            cleared: 0,
            drop_ticks: 0,
            game_over: false,
        }
    }

    pub fn level(&self) -> u32 {
        (self.cleared / LEVEL_CLEAR_STEP) as u32
    }

    pub fn ticks_per_drop(&self) -> u32 {
        TICKS_PER_DROP_START
            .saturating_sub(self.level())
            .max(TICKS_PER_DROP_MIN)
    }

    pub fn apply(&mut self, action: BlocksAction) {
        if let BlocksAction::Restart { seed } = action {
            *self = BlocksState::new(self.rules, seed);
            return;
        }
        if self.game_over {
            return;
        }
        match action {
            BlocksAction::ShiftLeft => self.shift(-1),
            BlocksAction::ShiftRight => self.shift(1),
            BlocksAction::Cycle => {
                let [top, mid, bottom] = self.piece.gems;
                self.piece.gems = [bottom, top, mid];
            }
            BlocksAction::Drop => self.hard_drop(),
            BlocksAction::Tick => self.tick(),
            BlocksAction::Restart { .. } => {}
        }
    }

    fn shift(&mut self, delta: i32) {
        let col = self.piece.col as i32 + delta;
        if col < 0 || col as usize >= self.rules.cols {
            return;
        }
        if piece_fits(&self.grid, col as usize, self.piece.row) {
            self.piece.col = col as usize;
        }
    }

    fn tick(&mut self) {
        self.drop_ticks += 1;
        if self.drop_ticks < self.ticks_per_drop() {
            return;
        }
        self.drop_ticks = 0;
        if piece_fits(&self.grid, self.piece.col, self.piece.row + 1) {
            self.piece.row += 1;
        } else {
            self.lock_piece();
        }
    }

    fn hard_drop(&mut self) {
        let mut fell = 0u64;
        while piece_fits(&self.grid, self.piece.col, self.piece.row + 1) {
            self.piece.row += 1;
            fell += 1;
        }
        self.score += fell * DROP_BONUS_PER_ROW;
        self.lock_piece();
    }

    fn lock_piece(&mut self) {
        let rows = self.piece.cell_rows();
        for (gem, row) in self.piece.gems.iter().zip(rows) {
            if row < 0 {
                // Part of the piece never entered the well: topped out.
                self.game_over = true;
            } else if let Some(id) = self.grid.index_of(self.piece.col, row as usize) {
                self.grid.set_cell(id, Cell::Gem(*gem));
            }
        }
        if self.game_over {
            return;
        }
        let outcome = resolve_board(&mut self.grid, &self.rules.board, &mut self.rng);
        self.absorb(outcome);
        self.piece = Piece {
            gems: self.next_gems,
            col: spawn_col(&self.rules),
            row: 0,
        };
        self.next_gems = roll_gems(&self.rules, &mut self.rng);
        self.drop_ticks = 0;
        if !piece_fits(&self.grid, self.piece.col, self.piece.row) {
            self.game_over = true;
        }
    }

    fn absorb(&mut self, outcome: CascadeOutcome) {
        self.score += outcome.score;
        self.cleared += outcome.cleared;
    }
}

pub fn spawn_col(rules: &BlocksRules) -> usize {
    rules.cols / 2
}

fn roll_gems(rules: &BlocksRules, rng: &mut GameRng) -> [Gem; PIECE_SIZE] {
    [
        rng.gem(rules.board.gem_count),
        rng.gem(rules.board.gem_count),
        rng.gem(rules.board.gem_count),
    ]
}

fn spawn_piece(rules: &BlocksRules, rng: &mut GameRng) -> Piece {
    Piece {
        gems: roll_gems(rules, rng),
        col: spawn_col(rules),
        row: 0,
    }
}

// In-well cells must be empty; cells still above the top edge are fine.
pub fn piece_fits(grid: &Grid, col: usize, bottom_row: i32) -> bool {
    for offset in 0..PIECE_SIZE as i32 {
        let row = bottom_row - offset;
        if row < 0 {
            continue;
        }
        let Some(id) = grid.index_of(col, row as usize) else {
            return false;
        };
        if !grid.cell(id).is_empty() {
            return false;
        }
    }
    true
}
