use std::sync::Arc;

use quiz_core::model::HistoryEntry;
use storage::repository::{HistoryRepository, InMemoryRepository, KeyValueHistory};

use crate::error::HistoryError;

/// Presentation-facing row of the score history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryListItem {
    pub score: String,
    pub duration: String,
}

impl HistoryListItem {
    #[must_use]
    pub fn from_entry(entry: &HistoryEntry) -> Self {
        Self {
            score: entry.score_label().to_owned(),
            duration: entry.duration_label().to_owned(),
        }
    }

    #[must_use]
    pub fn display_line(&self) -> String {
        format!("Score : {} - Temps: {}", self.score, self.duration)
    }
}

/// Score history facade that hides the repository from the session and the UI.
///
/// Reads fail open: an unreadable history is reported as empty.
#[derive(Clone)]
pub struct HistoryService {
    history: Arc<dyn HistoryRepository>,
}

impl HistoryService {
    #[must_use]
    pub fn new(history: Arc<dyn HistoryRepository>) -> Self {
        Self { history }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryRepository::new());
        Self::new(Arc::new(KeyValueHistory::new(store)))
    }

    /// Append one finished session.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` if the history cannot be written.
    pub async fn append(&self, entry: &HistoryEntry) -> Result<(), HistoryError> {
        self.history.append_entry(entry).await?;
        Ok(())
    }

    /// Every stored entry, oldest first; empty if the history cannot be read.
    pub async fn load_all(&self) -> Vec<HistoryEntry> {
        match self.history.list_entries().await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(error = %err, "history unavailable, showing it as empty");
                Vec::new()
            }
        }
    }

    pub async fn list_items(&self) -> Vec<HistoryListItem> {
        self.load_all()
            .await
            .iter()
            .map(HistoryListItem::from_entry)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use storage::repository::StorageError;

    struct Broken;

    #[async_trait]
    impl HistoryRepository for Broken {
        async fn append_entry(&self, _entry: &HistoryEntry) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk full".into()))
        }

        async fn list_entries(&self) -> Result<Vec<HistoryEntry>, StorageError> {
            Err(StorageError::Connection("disk gone".into()))
        }
    }

    #[tokio::test]
    async fn lists_display_lines_in_order() {
        let service = HistoryService::in_memory();
        service
            .append(&HistoryEntry::new("7 /10", "1:30"))
            .await
            .unwrap();
        service
            .append(&HistoryEntry::new("9 /10", "0:48"))
            .await
            .unwrap();

        let lines: Vec<_> = service
            .list_items()
            .await
            .iter()
            .map(HistoryListItem::display_line)
            .collect();
        assert_eq!(
            lines,
            ["Score : 7 /10 - Temps: 1:30", "Score : 9 /10 - Temps: 0:48"]
        );
    }

    #[tokio::test]
    async fn unreadable_history_is_empty() {
        let service = HistoryService::new(Arc::new(Broken));
        assert!(service.load_all().await.is_empty());
        assert!(service.append(&HistoryEntry::new("1 /10", "0:05")).await.is_err());
    }
}
