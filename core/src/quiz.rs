pub const ANSWER_SCORE: u64 = 10;
pub const STREAK_BONUS: u64 = 5;

// Per-question countdown in ticks (10 s at the 60 Hz tick step).
pub const QUESTION_TICK_LIMIT: u32 = 600;

pub const CHOICES_PER_QUESTION: usize = 4;

#[derive(Clone, Copy, Debug)]
pub struct QuizQuestion {
    pub prompt: &'static str,
    pub choices: [&'static str; CHOICES_PER_QUESTION],
    pub answer: usize,
}

pub const QUIZ_CATALOG: &[QuizQuestion] = &[
    QuizQuestion {
        prompt: "Which color sits opposite red on the color wheel?",
        choices: ["green", "orange", "blue", "violet"],
        answer: 0,
    },
    QuizQuestion {
        prompt: "Which color is complementary to blue?",
        choices: ["red", "orange", "green", "yellow"],
        answer: 1,
    },
    QuizQuestion {
        prompt: "Which color is complementary to yellow?",
        choices: ["green", "red", "violet", "orange"],
        answer: 2,
    },
    QuizQuestion {
        prompt: "Mixing red and blue pigment gives which color?",
        choices: ["brown", "green", "orange", "violet"],
        answer: 3,
    },
    QuizQuestion {
        prompt: "Mixing blue and yellow pigment gives which color?",
        choices: ["green", "violet", "gray", "orange"],
        answer: 0,
    },
    QuizQuestion {
        prompt: "Mixing red and yellow pigment gives which color?",
        choices: ["pink", "orange", "brown", "green"],
        answer: 1,
    },
    QuizQuestion {
        prompt: "Which of these is a primary color in pigment mixing?",
        choices: ["green", "orange", "yellow", "violet"],
        answer: 2,
    },
    QuizQuestion {
        prompt: "Which of these is a secondary color?",
        choices: ["red", "blue", "yellow", "green"],
        answer: 3,
    },
    QuizQuestion {
        prompt: "Which color is usually described as warm?",
        choices: ["orange", "blue", "teal", "indigo"],
        answer: 0,
    },
    QuizQuestion {
        prompt: "Which color is usually described as cool?",
        choices: ["red", "blue", "orange", "yellow"],
        answer: 1,
    },
    QuizQuestion {
        prompt: "Adding white to a hue produces a what?",
        choices: ["shade", "tone", "tint", "cast"],
        answer: 2,
    },
    QuizQuestion {
        prompt: "Adding black to a hue produces a what?",
        choices: ["tint", "glaze", "wash", "shade"],
        answer: 3,
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizAction {
    Answer(usize),
    Tick,
    Restart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizState {
    pub index: usize,
    pub score: u64,
    pub streak: u32,
    pub correct: u32,
    pub ticks_left: u32,
    pub finished: bool,
}

impl QuizState {
    pub fn new() -> Self {
        Self {
            index: 0,
            score: 0,
            streak: 0,
            correct: 0,
            ticks_left: QUESTION_TICK_LIMIT,
            finished: QUIZ_CATALOG.is_empty(),
        }
    }

    pub fn question(&self) -> Option<&'static QuizQuestion> {
        if self.finished {
            return None;
        }
        QUIZ_CATALOG.get(self.index)
    }

    pub fn apply(&mut self, action: QuizAction) {
        match action {
            QuizAction::Restart => *self = QuizState::new(),
            QuizAction::Answer(choice) => self.answer(choice),
            QuizAction::Tick => self.tick(),
        }
    }

    fn answer(&mut self, choice: usize) {
        let Some(question) = self.question() else {
            return;
        };
        if choice >= CHOICES_PER_QUESTION {
            return;
        }
        if choice == question.answer {
            self.score += ANSWER_SCORE + self.streak as u64 * STREAK_BONUS;
            self.streak += 1;
            self.correct += 1;
        } else {
            self.streak = 0;
        }
        self.advance();
    }

    fn tick(&mut self) {
        if self.finished {
            return;
        }
        self.ticks_left = self.ticks_left.saturating_sub(1);
        if self.ticks_left == 0 {
            // Running out the clock scores like a wrong answer.
            self.streak = 0;
            self.advance();
        }
    }

    fn advance(&mut self) {
        self.index += 1;
        self.ticks_left = QUESTION_TICK_LIMIT;
        if self.index >= QUIZ_CATALOG.len() {
            self.finished = true;
        }
    }
}

impl Default for QuizState {
    fn default() -> Self {
        Self::new()
    }
}
