use quiz_core::ElapsedTime;
use quiz_core::model::{AnswerLogEntry, HistoryEntry, ScoreBand};

/// End-of-session report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    pub score: u32,
    pub total: u32,
    pub elapsed: ElapsedTime,
    pub band: ScoreBand,
    pub resume: Vec<AnswerLogEntry>,
    pub history_entry: HistoryEntry,
    /// False when the history write failed; the session still finished.
    pub history_saved: bool,
}

impl QuizSummary {
    #[must_use]
    pub fn score_line(&self) -> String {
        format!("You got {} out of {} right!", self.score, self.total)
    }

    #[must_use]
    pub fn duration_line(&self) -> String {
        format!("Total time: {}", self.elapsed)
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        self.band.message()
    }

    /// One line per answered question, in answer order.
    #[must_use]
    pub fn resume_lines(&self) -> Vec<String> {
        self.resume
            .iter()
            .map(|entry| {
                let mark = if entry.is_correct { "✅" } else { "❌" };
                format!(
                    "Question : {} | Your answer : {} | {mark}",
                    entry.question_text, entry.chosen_choice_text
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_render_score_time_and_resume() {
        let summary = QuizSummary {
            score: 1,
            total: 2,
            elapsed: ElapsedTime::from_seconds(65),
            band: ScoreBand::for_score(1),
            resume: vec![
                AnswerLogEntry::new("2+2?", "4", true),
                AnswerLogEntry::new("3+3?", "5", false),
            ],
            history_entry: HistoryEntry::from_result(1, 2, ElapsedTime::from_seconds(65)),
            history_saved: true,
        };

        assert_eq!(summary.score_line(), "You got 1 out of 2 right!");
        assert_eq!(summary.duration_line(), "Total time: 1:05");
        assert_eq!(
            summary.resume_lines(),
            vec![
                "Question : 2+2? | Your answer : 4 | ✅".to_owned(),
                "Question : 3+3? | Your answer : 5 | ❌".to_owned(),
            ]
        );
        assert_eq!(summary.message(), ScoreBand::Beginning.message());
    }
}
