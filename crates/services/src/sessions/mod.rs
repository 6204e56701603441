mod plan;
mod progress;
mod service;
mod summary;
mod timer;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{select_session, shuffled};
pub use progress::{AnswerFeedback, QuestionView, SessionPhase, SessionProgress};
pub use service::{QuizController, StepOutcome};
pub use summary::QuizSummary;
pub use timer::{SessionTimer, TimerTick};
pub use view::{HistoryListItem, HistoryService};
pub use workflow::{QuizEvent, QuizIntent, QuizSessionHandle, QuizSessionLoop};
