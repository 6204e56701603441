mod answer;
mod commentary;
mod history;
mod question;
mod settings;

pub use answer::AnswerLogEntry;
pub use commentary::ScoreBand;
pub use history::HistoryEntry;
pub use question::{CHOICE_COUNT, Question, QuestionError};
pub use settings::{QuizSettings, QuizSettingsError};
