pub mod action;
pub mod blocks;
pub mod cascade;
pub mod catalog;
pub mod codec;
pub mod grid;
pub mod match3;
pub mod quiz;
pub mod rng;
pub mod snapshot;

pub use action::GameAction;
pub use blocks::{BlocksAction, BlocksRules, BlocksState};
pub use cascade::{resolve_board, BoardRules, CascadeOutcome, CASCADE_ROUND_CAP};
pub use catalog::{game_by_label, game_by_slug, GameCatalogEntry, DEFAULT_GAME_SLUG, GAME_CATALOG};
pub use codec::{decode, encode};
pub use grid::{find_matches, Cell, Gem, Grid, MatchGroup, MIN_GROUP_SIZE_DEFAULT};
pub use match3::{Match3Action, Match3Rules, Match3State};
pub use quiz::{QuizAction, QuizState, QUIZ_CATALOG};
pub use rng::{GameRng, DEAL_SEED_DEFAULT};
pub use snapshot::{
    restore_blocks, restore_match3, snapshot_blocks, snapshot_match3, GameSnapshot,
    GameStateSnapshot, GAME_SNAPSHOT_VERSION,
};
