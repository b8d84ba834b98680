use crate::blocks::BlocksAction;
use crate::match3::Match3Action;
use crate::quiz::QuizAction;

#[derive(Clone, Copy, Debug)]
pub enum GameAction {
    Match3(Match3Action),
    Blocks(BlocksAction),
    Quiz(QuizAction),
}
