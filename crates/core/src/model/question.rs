use thiserror::Error;

/// Number of choices every question offers.
pub const CHOICE_COUNT: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("expected {expected} choices, got {len}")]
    WrongChoiceCount { expected: usize, len: usize },

    #[error("correct choice {0:?} is not one of the choices")]
    UnknownCorrectChoice(String),

    #[error("correct choice {0:?} appears more than once")]
    AmbiguousCorrectChoice(String),
}

/// A multiple-choice question with exactly one correct choice.
///
/// The correct choice is kept as an index into `choices`, so the
/// "matches exactly one choice" rule only has to be checked once, on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    choices: [String; CHOICE_COUNT],
    correct: usize,
}

impl Question {
    /// Builds a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the text is blank,
    /// `QuestionError::WrongChoiceCount` unless exactly four choices are given,
    /// and `UnknownCorrectChoice` / `AmbiguousCorrectChoice` unless
    /// `correct_choice` matches exactly one choice.
    pub fn new(
        text: impl Into<String>,
        choices: Vec<String>,
        correct_choice: &str,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let len = choices.len();
        let choices: [String; CHOICE_COUNT] =
            choices
                .try_into()
                .map_err(|_| QuestionError::WrongChoiceCount {
                    expected: CHOICE_COUNT,
                    len,
                })?;

        let mut matches = choices
            .iter()
            .enumerate()
            .filter(|(_, choice)| choice.as_str() == correct_choice)
            .map(|(idx, _)| idx);
        let correct = matches
            .next()
            .ok_or_else(|| QuestionError::UnknownCorrectChoice(correct_choice.to_owned()))?;
        if matches.next().is_some() {
            return Err(QuestionError::AmbiguousCorrectChoice(
                correct_choice.to_owned(),
            ));
        }

        Ok(Self {
            text,
            choices,
            correct,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn choices(&self) -> &[String; CHOICE_COUNT] {
        &self.choices
    }

    #[must_use]
    pub fn choice(&self, index: usize) -> Option<&str> {
        self.choices.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn correct_choice(&self) -> &str {
        &self.choices[self.correct]
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct
    }
}
