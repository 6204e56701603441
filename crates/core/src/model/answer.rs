/// One answered question within a session, in the order it was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerLogEntry {
    pub question_text: String,
    pub chosen_choice_text: String,
    pub is_correct: bool,
}

impl AnswerLogEntry {
    #[must_use]
    pub fn new(
        question_text: impl Into<String>,
        chosen_choice_text: impl Into<String>,
        is_correct: bool,
    ) -> Self {
        Self {
            question_text: question_text.into(),
            chosen_choice_text: chosen_choice_text.into(),
            is_correct,
        }
    }
}
