use std::cell::RefCell;
use std::rc::Rc;

use image::RgbaImage;

use asobiba_core::blocks::{BlocksAction, BlocksRules, BlocksState};
use asobiba_core::catalog::{game_by_slug, GameCatalogEntry};
use asobiba_core::match3::{Match3Rules, Match3State};
use asobiba_core::quiz::{QuizAction, QuizState};
use asobiba_core::snapshot::{
    restore_blocks, restore_match3, snapshot_blocks, snapshot_match3, GameStateSnapshot,
};
use asobiba_core::GameAction;

use crate::coloring::{ColoringAction, ColoringState, ColoringView};
use crate::local_snapshot::{
    clear_game_snapshot, load_boot_record, load_game_snapshot, load_high_scores, load_settings,
    save_boot_record, save_game_snapshot, save_high_scores, save_settings, snapshot_fingerprint,
};
use crate::persisted::{BootRecord, HighScoreTable, SettingsBlob, ThemeMode};
use crate::runtime::TickDriver;
use crate::store::KeyValueStore;

pub const MATCH3_SLUG: &str = "gem-swap";
pub const BLOCKS_SLUG: &str = "gem-columns";
pub const QUIZ_SLUG: &str = "color-sense";
pub const COLORING_SLUG: &str = "coloring-book";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameRoute {
    Menu,
    Match3,
    Blocks,
    Quiz,
    Coloring,
}

pub fn route_slug(route: GameRoute) -> Option<&'static str> {
    match route {
        GameRoute::Menu => None,
        GameRoute::Match3 => Some(MATCH3_SLUG),
        GameRoute::Blocks => Some(BLOCKS_SLUG),
        GameRoute::Quiz => Some(QUIZ_SLUG),
        GameRoute::Coloring => Some(COLORING_SLUG),
    }
}

pub fn route_entry(route: GameRoute) -> Option<&'static GameCatalogEntry> {
    route_slug(route).and_then(game_by_slug)
}

#[derive(Clone, Debug)]
pub enum AppAction {
    Route(GameRoute),
    StartMatch3 { seed: u32 },
    StartBlocks { seed: u32 },
    StartQuiz,
    StartColoring { width: u32, height: u32 },
    Game(GameAction),
    Coloring(ColoringAction),
    Tick { elapsed_ms: f32 },
    SetTheme(ThemeMode),
}

pub type AppSubscriber = Rc<dyn Fn()>;

#[derive(Clone)]
pub struct AppSnapshot {
    pub route: GameRoute,
    pub match3: Option<Match3State>,
    pub blocks: Option<BlocksState>,
    pub quiz: Option<QuizState>,
    pub coloring: Option<ColoringView>,
    pub scores: HighScoreTable,
    pub settings: SettingsBlob,
}

struct AppState {
    route: GameRoute,
    match3: Option<Match3State>,
    blocks: Option<BlocksState>,
    quiz: Option<QuizState>,
    coloring: Option<ColoringState>,
    driver: TickDriver,
    settings: SettingsBlob,
    scores: HighScoreTable,
    boot: BootRecord,
    store: Box<dyn KeyValueStore>,
    save_fingerprint: Option<u64>,
}

impl AppState {
    fn new(store: Box<dyn KeyValueStore>) -> Self {
        let settings = load_settings(store.as_ref());
        let scores = load_high_scores(store.as_ref());
        let boot = load_boot_record(store.as_ref());
        Self {
            route: GameRoute::Menu,
            match3: None,
            blocks: None,
            quiz: None,
            coloring: None,
            driver: TickDriver::default(),
            settings,
            scores,
            boot,
            store,
            save_fingerprint: None,
        }
    }
}

fn build_snapshot_from_state(state: &AppState) -> AppSnapshot {
    AppSnapshot {
        route: state.route,
        match3: state.match3.clone(),
        blocks: state.blocks.clone(),
        quiz: state.quiz,
        coloring: state.coloring.as_ref().map(|coloring| coloring.view()),
        scores: state.scores.clone(),
        settings: state.settings,
    }
}

struct SnapshotBuffer {
    front: AppSnapshot,
    back: AppSnapshot,
}

impl SnapshotBuffer {
    fn new(state: &AppState) -> Self {
        let snapshot = build_snapshot_from_state(state);
        Self {
            front: snapshot.clone(),
            back: snapshot,
        }
    }

    fn refresh_from_state(&mut self, state: &AppState) {
        self.back = build_snapshot_from_state(state);
        std::mem::swap(&mut self.front, &mut self.back);
    }
}

pub struct AppCore {
    state: RefCell<AppState>,
    snapshots: RefCell<SnapshotBuffer>,
    subscribers: Rc<RefCell<Vec<AppSubscriber>>>,
}

pub struct AppSubscription {
    subscriber: AppSubscriber,
    subscribers: Rc<RefCell<Vec<AppSubscriber>>>,
}

impl Drop for AppSubscription {
    fn drop(&mut self) {
        self.subscribers
            .borrow_mut()
            .retain(|existing| !Rc::ptr_eq(existing, &self.subscriber));
    }
}

impl AppCore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Rc<Self> {
        let state = AppState::new(store);
        let snapshots = SnapshotBuffer::new(&state);
        Rc::new(Self {
            state: RefCell::new(state),
            snapshots: RefCell::new(snapshots),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        })
    }

    pub fn subscribe(&self, subscriber: AppSubscriber) -> AppSubscription {
        self.subscribers.borrow_mut().push(subscriber.clone());
        AppSubscription {
            subscriber,
            subscribers: Rc::clone(&self.subscribers),
        }
    }

    pub fn snapshot(&self) -> AppSnapshot {
        self.snapshots.borrow().front.clone()
    }

    pub fn with_coloring_canvas<R>(&self, reader: impl FnOnce(&RgbaImage) -> R) -> Option<R> {
        let state = self.state.borrow();
        state.coloring.as_ref().map(|coloring| reader(coloring.canvas()))
    }

    pub fn dispatch(&self, action: AppAction) {
        {
            let mut state = self.state.borrow_mut();
            apply_action(&mut state, action);
            finalize_scores(&mut state);
            autosave(&mut state);
        }
        self.notify();
    }

    // Restores the last autosaved grid game, if one round-trips cleanly.
    pub fn resume_saved_game(&self) -> bool {
        let resumed = {
            let mut state = self.state.borrow_mut();
            resume_from_store(&mut state)
        };
        if resumed {
            self.notify();
        }
        resumed
    }

    fn notify(&self) {
        {
            let state = self.state.borrow();
            let mut snapshots = self.snapshots.borrow_mut();
            snapshots.refresh_from_state(&state);
        }
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            (subscriber)();
        }
    }
}

fn apply_action(state: &mut AppState, action: AppAction) {
    match action {
        AppAction::Route(route) => {
            state.route = route;
            remember_route(state, route);
        }
        AppAction::StartMatch3 { seed } => {
            state.match3 = Some(Match3State::new(Match3Rules::default(), seed));
            state.route = GameRoute::Match3;
            state.driver.reset();
            drop_autosave(state);
            remember_route(state, state.route);
        }
        AppAction::StartBlocks { seed } => {
            state.blocks = Some(BlocksState::new(BlocksRules::default(), seed));
            state.route = GameRoute::Blocks;
            state.driver.reset();
            drop_autosave(state);
            remember_route(state, state.route);
        }
        AppAction::StartQuiz => {
            state.quiz = Some(QuizState::new());
            state.route = GameRoute::Quiz;
            state.driver.reset();
            remember_route(state, state.route);
        }
        AppAction::StartColoring { width, height } => {
            state.coloring = Some(ColoringState::new(width, height));
            state.route = GameRoute::Coloring;
            remember_route(state, state.route);
        }
        AppAction::Game(game_action) => match game_action {
            GameAction::Match3(inner) => {
                if let Some(match3) = state.match3.as_mut() {
                    match3.apply(inner);
                }
            }
            GameAction::Blocks(inner) => {
                if let Some(blocks) = state.blocks.as_mut() {
                    blocks.apply(inner);
                }
            }
            GameAction::Quiz(inner) => {
                if let Some(quiz) = state.quiz.as_mut() {
                    quiz.apply(inner);
                }
            }
        },
        AppAction::Coloring(coloring_action) => {
            if let Some(coloring) = state.coloring.as_mut() {
                coloring.apply(coloring_action);
            }
        }
        AppAction::Tick { elapsed_ms } => {
            let steps = state.driver.advance(elapsed_ms);
            for _ in 0..steps {
                match state.route {
                    GameRoute::Blocks => {
                        if let Some(blocks) = state.blocks.as_mut() {
                            blocks.apply(BlocksAction::Tick);
                        }
                    }
                    GameRoute::Quiz => {
                        if let Some(quiz) = state.quiz.as_mut() {
                            quiz.apply(QuizAction::Tick);
                        }
                    }
                    _ => {}
                }
            }
        }
        AppAction::SetTheme(theme_mode) => {
            if state.settings.theme_mode != theme_mode {
                state.settings.theme_mode = theme_mode;
                save_settings(state.store.as_mut(), &state.settings);
            }
        }
    }
}

fn remember_route(state: &mut AppState, route: GameRoute) {
    let last_game = route_slug(route).map(str::to_string);
    if state.boot.last_game != last_game {
        state.boot.last_game = last_game;
        save_boot_record(state.store.as_mut(), &state.boot);
    }
}

// Finished games feed the high-score table; only improvements touch the store.
fn finalize_scores(state: &mut AppState) {
    let mut changed = false;
    if let Some(match3) = state.match3.as_ref() {
        if match3.game_over {
            changed |= state.scores.record(MATCH3_SLUG, match3.score);
        }
    }
    if let Some(blocks) = state.blocks.as_ref() {
        if blocks.game_over {
            changed |= state.scores.record(BLOCKS_SLUG, blocks.score);
        }
    }
    if let Some(quiz) = state.quiz.as_ref() {
        if quiz.finished {
            changed |= state.scores.record(QUIZ_SLUG, quiz.score);
        }
    }
    if changed {
        save_high_scores(state.store.as_mut(), &state.scores);
    }
}

// Autosaves the active grid game, gated on a state fingerprint so quiet frames
// cost nothing. A finished game clears the save instead.
fn autosave(state: &mut AppState) {
    let snapshot = match state.route {
        GameRoute::Match3 => state.match3.as_ref().map(|match3| {
            (match3.game_over, snapshot_match3(match3))
        }),
        GameRoute::Blocks => state.blocks.as_ref().map(|blocks| {
            (blocks.game_over, snapshot_blocks(blocks))
        }),
        _ => None,
    };
    let Some((game_over, snapshot)) = snapshot else {
        return;
    };
    if game_over {
        drop_autosave(state);
        return;
    }
    let fingerprint = snapshot_fingerprint(&snapshot);
    if fingerprint.is_none() || fingerprint == state.save_fingerprint {
        return;
    }
    save_game_snapshot(state.store.as_mut(), &snapshot);
    state.save_fingerprint = fingerprint;
    if !state.boot.resume_pending {
        state.boot.resume_pending = true;
        save_boot_record(state.store.as_mut(), &state.boot);
    }
}

fn drop_autosave(state: &mut AppState) {
    clear_game_snapshot(state.store.as_mut());
    state.save_fingerprint = None;
    if state.boot.resume_pending {
        state.boot.resume_pending = false;
        save_boot_record(state.store.as_mut(), &state.boot);
    }
}

fn resume_from_store(state: &mut AppState) -> bool {
    let Some(snapshot) = load_game_snapshot(state.store.as_ref()) else {
        log::debug!("resume: no saved game");
        return false;
    };
    let fingerprint = snapshot_fingerprint(&snapshot);
    match &snapshot.state {
        GameStateSnapshot::Match3(inner) => match restore_match3(inner) {
            Some(restored) => {
                state.match3 = Some(restored);
                state.route = GameRoute::Match3;
            }
            None => {
                log::debug!("resume: match3 snapshot failed validation");
                return false;
            }
        },
        GameStateSnapshot::Blocks(inner) => match restore_blocks(inner) {
            Some(restored) => {
                state.blocks = Some(restored);
                state.route = GameRoute::Blocks;
            }
            None => {
                log::debug!("resume: blocks snapshot failed validation");
                return false;
            }
        },
    }
    state.driver.reset();
    state.save_fingerprint = fingerprint;
    log::debug!("resume: restored saved game");
    true
}
