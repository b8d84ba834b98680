use crate::grid::{find_matches, Cell, Gem, Grid, MatchGroup};
use crate::rng::GameRng;

pub const CASCADE_ROUND_CAP: u32 = 32;
pub const MATCH_BASE_SCORE: u64 = 10;

pub const GEM_COUNT_DEFAULT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardRules {
    pub min_group_size: usize,
    pub gem_count: usize,
    pub refill: bool,
}

impl Default for BoardRules {
    fn default() -> Self {
        Self {
            min_group_size: crate::grid::MIN_GROUP_SIZE_DEFAULT,
            gem_count: GEM_COUNT_DEFAULT,
            refill: true,
        }
    }
}

pub fn validate_board_rules(rules: &BoardRules) -> Result<(), String> {
    if rules.min_group_size < 2 {
        return Err("min group size below 2".to_string());
    }
    if rules.gem_count == 0 || rules.gem_count > Gem::ALL.len() {
        return Err(format!(
            "gem count must be 1..={}, got {}",
            Gem::ALL.len(),
            rules.gem_count
        ));
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CascadeOutcome {
    pub rounds: u32,
    pub cleared: usize,
    pub score: u64,
    pub capped: bool,
}

pub fn clear_groups(grid: &mut Grid, groups: &[MatchGroup]) -> usize {
    let mut cleared = 0;
    for group in groups {
        for &id in &group.cells {
            if !grid.cell(id).is_empty() {
                grid.set_cell(id, Cell::Empty);
                cleared += 1;
            }
        }
    }
    cleared
}

// Compact each column downward; empties end up at the top. Returns how many
// gems changed row.
pub fn apply_gravity(grid: &mut Grid) -> usize {
    let cols = grid.cols();
    let rows = grid.rows();
    let mut moved = 0;
    for col in 0..cols {
        let mut write_row = rows;
        for row in (0..rows).rev() {
            let Some(id) = grid.index_of(col, row) else {
                continue;
            };
            let Some(gem) = grid.cell(id).gem() else {
                continue;
            };
            write_row -= 1;
            if write_row != row {
                let Some(target) = grid.index_of(col, write_row) else {
                    continue;
                };
                grid.set_cell(target, Cell::Gem(gem));
                grid.set_cell(id, Cell::Empty);
                moved += 1;
            }
        }
        for row in 0..write_row {
            if let Some(id) = grid.index_of(col, row) {
                grid.set_cell(id, Cell::Empty);
            }
        }
    }
    moved
}

pub fn refill_from_top(grid: &mut Grid, rng: &mut GameRng, gem_count: usize) -> usize {
    let mut filled = 0;
    for id in 0..grid.len() {
        if grid.cell(id).is_empty() {
            grid.set_cell(id, Cell::Gem(rng.gem(gem_count)));
            filled += 1;
        }
    }
    filled
}

pub fn chain_score(cleared: usize, round: u32) -> u64 {
    cleared as u64 * MATCH_BASE_SCORE * round.max(1) as u64
}

// Clear, settle, optionally refill, re-scan until the board is quiet. The round
// cap bounds the loop even when refill keeps producing new matches.
pub fn resolve_board(grid: &mut Grid, rules: &BoardRules, rng: &mut GameRng) -> CascadeOutcome {
    let mut outcome = CascadeOutcome::default();
    loop {
        if outcome.rounds >= CASCADE_ROUND_CAP {
            outcome.capped = true;
            break;
        }
        let groups = find_matches(grid, rules.min_group_size);
        if groups.is_empty() {
            break;
        }
        outcome.rounds += 1;
        let cleared = clear_groups(grid, &groups);
        outcome.cleared += cleared;
        outcome.score += chain_score(cleared, outcome.rounds);
        apply_gravity(grid);
        if rules.refill {
            refill_from_top(grid, rng, rules.gem_count);
        }
    }
    outcome
}
