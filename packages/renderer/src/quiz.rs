use serde::{Deserialize, Serialize};
use tutorly_model::QuizData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizOutcome {
    Unanswered,
    Correct,
    Incorrect,
}

/// Reader-side state of one quiz: pick an option, submit to reveal whether
/// it was right, retry to start over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizState {
    option_count: usize,
    correct_answer: usize,
    selected: Option<usize>,
    submitted: bool,
}

impl QuizState {
    pub fn new(option_count: usize, correct_answer: usize) -> Self {
        Self {
            option_count,
            correct_answer,
            selected: None,
            submitted: false,
        }
    }

    pub fn for_quiz(quiz: &QuizData) -> Self {
        Self::new(quiz.options.len(), quiz.correct_answer)
    }

    /// Choose an option. Ignored after submission or for options that
    /// don't exist; returns whether the selection changed.
    pub fn select(&mut self, option: usize) -> bool {
        if self.submitted || option >= self.option_count {
            return false;
        }
        self.selected = Some(option);
        true
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn can_submit(&self) -> bool {
        !self.submitted && self.selected.is_some()
    }

    /// Lock in the selection. Nothing happens without one.
    pub fn submit(&mut self) -> QuizOutcome {
        if self.can_submit() {
            self.submitted = true;
        }
        self.outcome()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn is_correct(&self) -> Option<bool> {
        match self.outcome() {
            QuizOutcome::Unanswered => None,
            outcome => Some(outcome == QuizOutcome::Correct),
        }
    }

    pub fn outcome(&self) -> QuizOutcome {
        match (self.submitted, self.selected) {
            (true, Some(selected)) if selected == self.correct_answer => QuizOutcome::Correct,
            (true, Some(_)) => QuizOutcome::Incorrect,
            _ => QuizOutcome::Unanswered,
        }
    }

    pub fn retry(&mut self) {
        self.selected = None;
        self.submitted = false;
    }
}
