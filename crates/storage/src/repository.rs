use async_trait::async_trait;
use quiz_core::model::{HistoryEntry, Question, QuestionError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Name of the key-value slot holding the score history.
pub const HISTORY_KEY: &str = "historiqueScores";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid question #{index}: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// Persisted shape for a question in the question resource.
///
/// This mirrors the domain `Question` so sources can deserialize without
/// leaking the resource's key names into the domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    #[serde(rename = "choix")]
    pub choices: Vec<String>,
    #[serde(rename = "reponse")]
    pub answer: String,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            question: question.text().to_owned(),
            choices: question.choices().to_vec(),
            answer: question.correct_choice().to_owned(),
        }
    }

    /// Convert the record back into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the record breaks a question invariant.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(self.question, self.choices, &self.answer)
    }
}

/// Validate a batch of records, failing on the first malformed one.
///
/// # Errors
///
/// Returns `StorageError::InvalidQuestion` naming the offending record.
pub fn questions_from_records(records: Vec<QuestionRecord>) -> Result<Vec<Question>, StorageError> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            record
                .into_question()
                .map_err(|source| StorageError::InvalidQuestion { index, source })
        })
        .collect()
}

/// Read-only source of the question pool.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Load every question from the resource.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the resource is unreachable or any record is malformed.
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError>;
}

/// Minimal string key-value store, one value per named slot.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace a slot's whole value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Append-only score history.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Append an entry after every entry already stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the history cannot be read or written back.
    async fn append_entry(&self, entry: &HistoryEntry) -> Result<(), StorageError>;

    /// All entries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn list_entries(&self) -> Result<Vec<HistoryEntry>, StorageError>;
}

/// History kept as one JSON array inside a key-value slot.
///
/// Appends read the whole array, push, and write the whole array back.
/// A slot that does not parse is treated as empty.
pub struct KeyValueHistory {
    store: Arc<dyn KeyValueStore>,
    key: String,
    append_lock: tokio::sync::Mutex<()>,
}

impl KeyValueHistory {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, HISTORY_KEY)
    }

    #[must_use]
    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            append_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Slot holding the last unreadable history value, kept before an append
    /// replaces it.
    #[must_use]
    pub fn backup_key(&self) -> String {
        format!("{}.unreadable", self.key)
    }

    fn parse_slot(&self, raw: &str) -> Option<Vec<HistoryEntry>> {
        match serde_json::from_str::<Vec<HistoryEntry>>(raw) {
            Ok(entries) => Some(entries),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "unreadable history slot, treating as empty");
                None
            }
        }
    }

    async fn read_slot(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        let raw = self.store.get_item(&self.key).await?;
        Ok(raw
            .as_deref()
            .and_then(|raw| self.parse_slot(raw))
            .unwrap_or_default())
    }
}

#[async_trait]
impl HistoryRepository for KeyValueHistory {
    async fn append_entry(&self, entry: &HistoryEntry) -> Result<(), StorageError> {
        let _guard = self.append_lock.lock().await;

        let mut entries = match self.store.get_item(&self.key).await? {
            None => Vec::new(),
            Some(raw) => match self.parse_slot(&raw) {
                Some(entries) => entries,
                None => {
                    let backup = self.backup_key();
                    self.store.set_item(&backup, &raw).await?;
                    tracing::warn!(key = %self.key, %backup, "kept unreadable history before replacing it");
                    Vec::new()
                }
            },
        };
        entries.push(entry.clone());
        let raw = serde_json::to_string(&entries)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set_item(&self.key, &raw).await?;

        tracing::debug!(key = %self.key, len = entries.len(), "appended history entry");
        Ok(())
    }

    async fn list_entries(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        self.read_slot().await
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    items: Arc<Mutex<HashMap<String, String>>>,
    questions: Arc<Mutex<Vec<Question>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository whose question source yields the given pool.
    #[must_use]
    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            items: Arc::new(Mutex::new(HashMap::new())),
            questions: Arc::new(Mutex::new(questions)),
        }
    }
}

#[async_trait]
impl QuestionSource for InMemoryRepository {
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryRepository {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .items
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .items
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Aggregates the question source and history behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionSource>,
    pub history: Arc<dyn HistoryRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(questions: Vec<Question>) -> Self {
        let repo = InMemoryRepository::with_questions(questions);
        let source: Arc<dyn QuestionSource> = Arc::new(repo.clone());
        let store: Arc<dyn KeyValueStore> = Arc::new(repo);
        let history: Arc<dyn HistoryRepository> = Arc::new(KeyValueHistory::new(store));
        Self {
            questions: source,
            history,
        }
    }
}
