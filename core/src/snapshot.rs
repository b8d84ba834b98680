use rkyv::{Archive, Deserialize, Serialize};

use crate::blocks::{validate_blocks_rules, BlocksRules, BlocksState, Piece, PIECE_SIZE};
use crate::cascade::BoardRules;
use crate::grid::{Cell, Gem, Grid};
use crate::match3::{validate_match3_rules, Match3Rules, Match3State};
use crate::rng::GameRng;

pub const GAME_SNAPSHOT_VERSION: u32 = 1;

// Cells are stored one byte each: 0 for empty, gem index + 1 otherwise.
pub const CELL_EMPTY: u8 = 0;

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub cols: u32,
    pub rows: u32,
    pub cells: Vec<u8>,
}

pub fn encode_cell(cell: Cell) -> u8 {
    match cell.gem() {
        None => CELL_EMPTY,
        Some(gem) => gem.index() as u8 + 1,
    }
}

pub fn decode_cell(code: u8) -> Option<Cell> {
    if code == CELL_EMPTY {
        return Some(Cell::Empty);
    }
    Gem::from_index(code as usize - 1).map(Cell::Gem)
}

pub fn encode_grid(grid: &Grid) -> GridSnapshot {
    GridSnapshot {
        cols: grid.cols() as u32,
        rows: grid.rows() as u32,
        cells: grid.cells().iter().map(|cell| encode_cell(*cell)).collect(),
    }
}

pub fn decode_grid(snapshot: &GridSnapshot) -> Option<Grid> {
    validate_grid_snapshot(snapshot).ok()?;
    let cells = snapshot
        .cells
        .iter()
        .map(|code| decode_cell(*code))
        .collect::<Option<Vec<Cell>>>()?;
    Grid::from_cells(snapshot.cols as usize, snapshot.rows as usize, cells)
}

pub fn validate_grid_snapshot(snapshot: &GridSnapshot) -> Result<(), String> {
    let total = snapshot.cols as usize * snapshot.rows as usize;
    if snapshot.cells.len() != total {
        return Err(format!(
            "cell count {} does not match {}x{}",
            snapshot.cells.len(),
            snapshot.cols,
            snapshot.rows
        ));
    }
    if let Some(code) = snapshot
        .cells
        .iter()
        .find(|code| decode_cell(**code).is_none())
    {
        return Err(format!("unknown cell code {code}"));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Archive, Serialize, Deserialize)]
pub struct BoardRulesSnapshot {
    pub min_group_size: u32,
    pub gem_count: u32,
    pub refill: bool,
}

impl From<BoardRules> for BoardRulesSnapshot {
    fn from(rules: BoardRules) -> Self {
        Self {
            min_group_size: rules.min_group_size as u32,
            gem_count: rules.gem_count as u32,
            refill: rules.refill,
        }
    }
}

impl From<BoardRulesSnapshot> for BoardRules {
    fn from(snapshot: BoardRulesSnapshot) -> Self {
        Self {
            min_group_size: snapshot.min_group_size as usize,
            gem_count: snapshot.gem_count as usize,
            refill: snapshot.refill,
        }
    }
}

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
pub struct Match3Snapshot {
    pub grid: GridSnapshot,
    pub board: BoardRulesSnapshot,
    pub move_budget: u32,
    pub rng_state: u32,
    pub seed: u32,
    pub score: u64,
    pub moves_left: u32,
    pub cascades: u64,
    pub game_over: bool,
}

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
pub struct BlocksSnapshot {
    pub grid: GridSnapshot,
    pub board: BoardRulesSnapshot,
    pub rng_state: u32,
    pub seed: u32,
    pub piece_gems: [u8; PIECE_SIZE],
    pub piece_col: u32,
    pub piece_row: i32,
    pub next_gems: [u8; PIECE_SIZE],
    pub score: u64,
    pub cleared: u64,
    pub drop_ticks: u32,
    pub game_over: bool,
}

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
pub enum GameStateSnapshot {
    Match3(Match3Snapshot),
    Blocks(BlocksSnapshot),
}

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub version: u32,
    pub state: GameStateSnapshot,
}

pub fn snapshot_match3(state: &Match3State) -> GameSnapshot {
    GameSnapshot {
        version: GAME_SNAPSHOT_VERSION,
        state: GameStateSnapshot::Match3(Match3Snapshot {
            grid: encode_grid(&state.grid),
            board: state.rules.board.into(),
            move_budget: state.rules.move_budget,
            rng_state: state.rng.state(),
            seed: state.seed,
            score: state.score,
            moves_left: state.moves_left,
            cascades: state.cascades,
            game_over: state.game_over,
        }),
    }
}

pub fn restore_match3(snapshot: &Match3Snapshot) -> Option<Match3State> {
    let grid = decode_grid(&snapshot.grid)?;
    let rules = Match3Rules {
        cols: grid.cols(),
        rows: grid.rows(),
        board: snapshot.board.into(),
        move_budget: snapshot.move_budget,
    };
    validate_match3_rules(&rules).ok()?;
    Some(Match3State {
        grid,
        rules,
        rng: GameRng::from_state(snapshot.rng_state),
        seed: snapshot.seed,
        score: snapshot.score,
        moves_left: snapshot.moves_left,
        cascades: snapshot.cascades,
        game_over: snapshot.game_over,
    })
}

pub fn snapshot_blocks(state: &BlocksState) -> GameSnapshot {
    GameSnapshot {
        version: GAME_SNAPSHOT_VERSION,
        state: GameStateSnapshot::Blocks(BlocksSnapshot {
            grid: encode_grid(&state.grid),
            board: state.rules.board.into(),
            rng_state: state.rng.state(),
            seed: state.seed,
            piece_gems: encode_gems(&state.piece.gems),
            piece_col: state.piece.col as u32,
            piece_row: state.piece.row,
            next_gems: encode_gems(&state.next_gems),
            score: state.score,
            cleared: state.cleared as u64,
            drop_ticks: state.drop_ticks,
            game_over: state.game_over,
        }),
    }
}

pub fn restore_blocks(snapshot: &BlocksSnapshot) -> Option<BlocksState> {
    let grid = decode_grid(&snapshot.grid)?;
    let rules = BlocksRules {
        cols: grid.cols(),
        rows: grid.rows(),
        board: snapshot.board.into(),
    };
    validate_blocks_rules(&rules).ok()?;
    let piece = Piece {
        gems: decode_gems(&snapshot.piece_gems)?,
        col: snapshot.piece_col as usize,
        row: snapshot.piece_row,
    };
    if piece.col >= rules.cols || piece.row < 0 || piece.row as usize >= rules.rows {
        return None;
    }
    Some(BlocksState {
        grid,
        rules,
        rng: GameRng::from_state(snapshot.rng_state),
        seed: snapshot.seed,
        piece,
        next_gems: decode_gems(&snapshot.next_gems)?,
        score: snapshot.score,
        cleared: snapshot.cleared as usize,
        drop_ticks: snapshot.drop_ticks,
        game_over: snapshot.game_over,
    })
}

fn encode_gems(gems: &[Gem; PIECE_SIZE]) -> [u8; PIECE_SIZE] {
    [
        gems[0].index() as u8,
        gems[1].index() as u8,
        gems[2].index() as u8,
    ]
}

fn decode_gems(codes: &[u8; PIECE_SIZE]) -> Option<[Gem; PIECE_SIZE]> {
    Some([
        Gem::from_index(codes[0] as usize)?,
        Gem::from_index(codes[1] as usize)?,
        Gem::from_index(codes[2] as usize)?,
    ])
}
