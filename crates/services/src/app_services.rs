use std::path::Path;

use quiz_core::model::QuizSettings;
use storage::repository::Storage;

use crate::error::{AppServicesError, LoadError};
use crate::question_bank::QuestionBank;
use crate::sessions::{HistoryService, QuizController, QuizSessionHandle, QuizSessionLoop};
use crate::Clock;

/// Assembles the quiz services over a storage backend.
///
/// The question pool is loaded once during assembly. A failed load is not
/// fatal: the pool stays empty, the error is kept for the presentation layer
/// and `QuizIntent::ReloadQuestions` can retry.
pub struct QuizServices {
    controller: QuizController,
    history: HistoryService,
    load_error: Option<LoadError>,
}

impl QuizServices {
    /// Build services whose history lives in `SQLite` and whose questions are
    /// read from the JSON file at `questions_path`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or migrated.
    pub async fn new_sqlite(
        db_url: &str,
        questions_path: impl AsRef<Path>,
        clock: Clock,
        settings: QuizSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url, questions_path).await?;
        Ok(Self::from_storage(storage, clock, settings).await)
    }

    /// Build services over an existing storage backend.
    pub async fn from_storage(storage: Storage, clock: Clock, settings: QuizSettings) -> Self {
        let mut bank = QuestionBank::new(storage.questions);
        let load_error = match bank.load().await {
            Ok(count) => {
                tracing::info!(count, "questions ready");
                None
            }
            Err(err) => Some(err),
        };

        let history = HistoryService::new(storage.history);
        let controller = QuizController::new(bank, history.clone())
            .with_settings(settings)
            .with_clock(clock);

        Self {
            controller,
            history,
            load_error,
        }
    }

    /// The error from the initial question load, if it failed.
    #[must_use]
    pub fn load_error(&self) -> Option<&LoadError> {
        self.load_error.as_ref()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.controller.bank().len()
    }

    #[must_use]
    pub fn history(&self) -> HistoryService {
        self.history.clone()
    }

    #[must_use]
    pub fn controller(&self) -> &QuizController {
        &self.controller
    }

    #[must_use]
    pub fn into_controller(self) -> QuizController {
        self.controller
    }

    /// Hand the controller to a session loop on the current runtime.
    #[must_use]
    pub fn spawn_session(self) -> QuizSessionHandle {
        QuizSessionLoop::new(self.controller).spawn()
    }
}
