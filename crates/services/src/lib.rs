#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod question_bank;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::QuizServices;
pub use error::{AppServicesError, HistoryError, LoadError, SessionError};
pub use question_bank::QuestionBank;

pub use sessions::{
    AnswerFeedback, HistoryListItem, HistoryService, QuestionView, QuizController, QuizEvent,
    QuizIntent, QuizSessionHandle, QuizSessionLoop, QuizSummary, SessionPhase, SessionProgress,
    StepOutcome, TimerTick,
};
