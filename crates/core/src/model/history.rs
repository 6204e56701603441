use serde::{Deserialize, Serialize};

use crate::time::ElapsedTime;

/// Summary of one finished session as kept in the score history.
///
/// Both fields are stored pre-formatted (`"7 /10"`, `"1:30"`); the serialized
/// keys are `score` and `temps` to stay readable by existing history slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "score")]
    score_label: String,
    #[serde(rename = "temps")]
    duration_label: String,
}

impl HistoryEntry {
    /// Rehydrate an entry from already formatted labels.
    #[must_use]
    pub fn new(score_label: impl Into<String>, duration_label: impl Into<String>) -> Self {
        Self {
            score_label: score_label.into(),
            duration_label: duration_label.into(),
        }
    }

    /// Build an entry for a finished session.
    #[must_use]
    pub fn from_result(score: u32, total: u32, elapsed: ElapsedTime) -> Self {
        Self::new(format!("{score} /{total}"), elapsed.readout())
    }

    #[must_use]
    pub fn score_label(&self) -> &str {
        &self.score_label
    }

    #[must_use]
    pub fn duration_label(&self) -> &str {
        &self.duration_label
    }
}
