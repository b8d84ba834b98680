use std::cell::Cell;
use std::rc::Rc;

use asobiba::app_core::{AppAction, AppCore, GameRoute, BLOCKS_SLUG, QUIZ_SLUG};
use asobiba::coloring::ColoringAction;
use asobiba::persisted::ThemeMode;
use asobiba::store::MemoryStore;
use asobiba_core::blocks::BlocksAction;
use asobiba_core::quiz::{QuizAction, QUIZ_CATALOG};
use asobiba_core::GameAction;

fn fresh_app() -> Rc<AppCore> {
    AppCore::new(Box::new(MemoryStore::new()))
}

#[test]
fn boots_on_the_menu_with_defaults() {
    let app = fresh_app();
    let snapshot = app.snapshot();
    assert_eq!(snapshot.route, GameRoute::Menu);
    assert!(snapshot.match3.is_none());
    assert!(snapshot.scores.entries.is_empty());
    assert_eq!(snapshot.settings.theme_mode, ThemeMode::System);
}

#[test]
fn subscribers_hear_every_dispatch_until_dropped() {
    let app = fresh_app();
    let heard = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&heard);
    let subscription = app.subscribe(Rc::new(move || {
        counter.set(counter.get() + 1);
    }));

    app.dispatch(AppAction::Route(GameRoute::Quiz));
    app.dispatch(AppAction::StartQuiz);
    assert_eq!(heard.get(), 2);

    drop(subscription);
    app.dispatch(AppAction::Route(GameRoute::Menu));
    assert_eq!(heard.get(), 2);
}

#[test]
fn starting_a_game_routes_and_deals() {
    let app = fresh_app();
    app.dispatch(AppAction::StartMatch3 { seed: 21 });
    let snapshot = app.snapshot();
    assert_eq!(snapshot.route, GameRoute::Match3);
    let match3 = snapshot.match3.expect("match3 dealt");
    assert!(!match3.game_over);
    assert_eq!(match3.seed, 21);
}

#[test]
fn ticks_drive_only_the_active_game() {
    let app = fresh_app();
    app.dispatch(AppAction::StartBlocks { seed: 5 });
    let interval = app.snapshot().blocks.expect("blocks").ticks_per_drop();

    // One step per dispatch at the driver's fixed step size.
    let step_ms = asobiba::runtime::TICK_STEP_MS;
    for _ in 0..interval {
        app.dispatch(AppAction::Tick { elapsed_ms: step_ms });
    }
    assert_eq!(app.snapshot().blocks.expect("blocks").piece.row, 1);

    // Off the blocks route the well stops falling.
    app.dispatch(AppAction::Route(GameRoute::Menu));
    for _ in 0..interval * 3 {
        app.dispatch(AppAction::Tick { elapsed_ms: step_ms });
    }
    assert_eq!(app.snapshot().blocks.expect("blocks").piece.row, 1);
}

#[test]
fn finished_quiz_lands_in_the_high_scores() {
    let app = fresh_app();
    app.dispatch(AppAction::StartQuiz);
    for _ in 0..QUIZ_CATALOG.len() {
        let snapshot = app.snapshot();
        let quiz = snapshot.quiz.expect("quiz running");
        if quiz.finished {
            break;
        }
        let question = QUIZ_CATALOG[quiz.index];
        app.dispatch(AppAction::Game(GameAction::Quiz(QuizAction::Answer(
            question.answer,
        ))));
    }
    let snapshot = app.snapshot();
    assert!(snapshot.quiz.expect("quiz").finished);
    let best = snapshot.scores.best(QUIZ_SLUG).expect("score recorded");
    assert!(best > 0);
}

#[test]
fn autosaved_game_survives_a_resume() {
    let app = fresh_app();
    app.dispatch(AppAction::StartBlocks { seed: 9 });
    app.dispatch(AppAction::Game(GameAction::Blocks(BlocksAction::Drop)));
    let before = app.snapshot().blocks.expect("blocks running");

    assert!(app.resume_saved_game());
    let resumed = app.snapshot().blocks.expect("blocks restored");
    assert_eq!(resumed.grid, before.grid);
    assert_eq!(resumed.score, before.score);
    assert_eq!(resumed.piece.gems, before.piece.gems);
}

#[test]
fn coloring_actions_flow_through_the_shell() {
    let app = fresh_app();
    app.dispatch(AppAction::StartColoring {
        width: 16,
        height: 16,
    });
    app.dispatch(AppAction::Coloring(ColoringAction::Fill { x: 4, y: 4 }));
    let view = app.snapshot().coloring.expect("coloring view");
    assert_eq!(view.fills, 1);
    assert!(view.can_undo);

    let corner = app
        .with_coloring_canvas(|canvas| *canvas.get_pixel(0, 0))
        .expect("canvas");
    assert_ne!(corner.0, [255, 255, 255, 255]);
}

#[test]
fn blocks_game_over_records_the_score() {
    let app = fresh_app();
    app.dispatch(AppAction::StartBlocks { seed: 3 });
    // Hard-drop until the well tops out; the round cap on piece count is
    // generous enough for an 8x18 well.
    for _ in 0..200 {
        if app.snapshot().blocks.expect("blocks").game_over {
            break;
        }
        app.dispatch(AppAction::Game(GameAction::Blocks(BlocksAction::Drop)));
    }
    let snapshot = app.snapshot();
    assert!(snapshot.blocks.expect("blocks").game_over);
    assert!(snapshot.scores.best(BLOCKS_SLUG).is_some());
}

#[test]
fn theme_changes_persist_in_settings() {
    let app = fresh_app();
    app.dispatch(AppAction::SetTheme(ThemeMode::Dark));
    assert_eq!(app.snapshot().settings.theme_mode, ThemeMode::Dark);
}
