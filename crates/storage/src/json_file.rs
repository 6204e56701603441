//! Question pool read from a static JSON file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::Question;

use crate::repository::{QuestionRecord, QuestionSource, StorageError, questions_from_records};

/// Reads a JSON array of `{ "question", "choix", "reponse" }` records.
///
/// The file is re-read on every `load_questions` call; callers load once at
/// startup and keep the result.
#[derive(Debug, Clone)]
pub struct JsonFileQuestionSource {
    path: PathBuf,
}

impl JsonFileQuestionSource {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuestionSource for JsonFileQuestionSource {
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => StorageError::NotFound,
                _ => StorageError::Connection(format!("{}: {e}", self.path.display())),
            })?;

        let records: Vec<QuestionRecord> =
            serde_json::from_str(&raw).map_err(|e| StorageError::Serialization(e.to_string()))?;
        let questions = questions_from_records(records)?;

        tracing::debug!(
            path = %self.path.display(),
            count = questions.len(),
            "loaded question file"
        );
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn loads_valid_file() {
        let file = write_temp(
            r#"[
                {"question": "2+2?", "choix": ["3", "4", "5", "6"], "reponse": "4"},
                {"question": "Red + blue?", "choix": ["Green", "Purple", "Orange", "Brown"], "reponse": "Purple"}
            ]"#,
        );

        let questions = JsonFileQuestionSource::new(file.path())
            .load_questions()
            .await
            .unwrap();

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].correct_choice(), "Purple");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonFileQuestionSource::new(dir.path().join("absent.json"))
            .load_questions()
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn malformed_json_is_a_serialization_error() {
        let file = write_temp(r#"[{"question": "2+2?", "choix": "#);
        let err = JsonFileQuestionSource::new(file.path())
            .load_questions()
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[tokio::test]
    async fn record_without_matching_answer_aborts_loading() {
        let file = write_temp(
            r#"[{"question": "2+2?", "choix": ["3", "5", "6", "7"], "reponse": "4"}]"#,
        );
        let err = JsonFileQuestionSource::new(file.path())
            .load_questions()
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidQuestion { index: 0, .. }));
    }

    #[tokio::test]
    async fn bundled_question_file_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/questions.json");
        let questions = JsonFileQuestionSource::new(path)
            .load_questions()
            .await
            .unwrap();
        assert!(questions.len() >= 10);
    }
}
