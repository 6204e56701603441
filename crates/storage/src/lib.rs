#![forbid(unsafe_code)]

pub mod json_file;
pub mod repository;
pub mod sqlite;

pub use json_file::JsonFileQuestionSource;
pub use repository::{
    HistoryRepository, InMemoryRepository, KeyValueHistory, KeyValueStore, QuestionRecord,
    QuestionSource, Storage, StorageError,
};
