use std::fmt;

use quiz_core::model::{CHOICE_COUNT, Question};

/// Where the controller is in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    Idle,
    AwaitingAnswer(usize),
    ShowingFeedback(usize),
    Finished,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::AwaitingAnswer(i) => write!(f, "awaiting answer to question {}", i + 1),
            Self::ShowingFeedback(i) => write!(f, "showing feedback for question {}", i + 1),
            Self::Finished => f.write_str("finished"),
        }
    }
}

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

/// Display state for the question currently awaiting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub text: String,
    pub choices: [String; CHOICE_COUNT],
    pub score: u32,
}

impl QuestionView {
    pub(crate) fn new(index: usize, total: usize, question: &Question, score: u32) -> Self {
        Self {
            index,
            total,
            text: question.text().to_owned(),
            choices: question.choices().clone(),
            score,
        }
    }

    /// 1-based question number.
    #[must_use]
    pub fn number(&self) -> usize {
        self.index + 1
    }

    #[must_use]
    pub fn score_line(&self) -> String {
        format!("Score : {}/{}", self.score, self.total)
    }
}

/// Outcome of one submitted answer, shown during the feedback window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub index: usize,
    pub is_correct: bool,
    pub chosen_choice: String,
    pub correct_choice: String,
    pub score: u32,
}

impl AnswerFeedback {
    #[must_use]
    pub fn message(&self) -> &'static str {
        if self.is_correct {
            "Correct answer!"
        } else {
            "Wrong answer!"
        }
    }
}
