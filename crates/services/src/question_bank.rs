use std::sync::Arc;

use quiz_core::model::Question;
use storage::repository::QuestionSource;

use crate::error::LoadError;

/// Read-only question pool, filled once from a `QuestionSource`.
///
/// Loading fails closed: after a failed load the pool is empty and no
/// session can start until a later `load` succeeds.
#[derive(Clone)]
pub struct QuestionBank {
    source: Arc<dyn QuestionSource>,
    questions: Arc<[Question]>,
}

impl QuestionBank {
    /// An empty bank that will read from `source` on `load`.
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self {
            source,
            questions: Arc::from(Vec::new()),
        }
    }

    /// Read the whole pool from the source, replacing the current one.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the resource is missing, unreachable or malformed.
    /// The pool is left empty in that case.
    pub async fn load(&mut self) -> Result<usize, LoadError> {
        match self.source.load_questions().await {
            Ok(questions) => {
                let count = questions.len();
                self.questions = Arc::from(questions);
                tracing::debug!(count, "question pool loaded");
                Ok(count)
            }
            Err(err) => {
                self.questions = Arc::from(Vec::new());
                let err = LoadError::from(err);
                tracing::warn!(error = %err, "failed to load questions");
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl std::fmt::Debug for QuestionBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionBank")
            .field("len", &self.questions.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use storage::repository::{InMemoryRepository, StorageError};

    struct Unreachable;

    #[async_trait]
    impl QuestionSource for Unreachable {
        async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    fn question(text: &str) -> Question {
        Question::new(
            text,
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            "a",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn load_fills_pool() {
        let repo = InMemoryRepository::with_questions(vec![question("Q1"), question("Q2")]);
        let mut bank = QuestionBank::new(Arc::new(repo));

        assert!(bank.is_empty());
        assert_eq!(bank.load().await.unwrap(), 2);
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.questions()[0].text(), "Q1");
    }

    #[tokio::test]
    async fn failed_load_leaves_pool_empty() {
        let mut bank = QuestionBank::new(Arc::new(Unreachable));
        let err = bank.load().await.unwrap_err();

        assert!(matches!(err, LoadError::Unreachable(_)));
        assert!(bank.is_empty());
    }
}
