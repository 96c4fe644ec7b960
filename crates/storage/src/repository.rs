use lang_core::Locale;
use lang_core::model::{Dataset, LessonIndex};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("io error at {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid dataset content: {0}")]
    Invalid(#[from] lang_core::Error),

    #[error("connection error: {0}")]
    Connection(String),
}

/// Source of lesson datasets, one per locale.
pub trait DatasetSource: Send + Sync {
    /// Load the dataset translated for exactly `locale`.
    ///
    /// Returns `Ok(None)` when no content exists for that locale, which lets
    /// callers move on to a fallback locale.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if content exists but cannot be read or parsed.
    fn load(&self, locale: &Locale) -> Result<Option<Dataset>, StorageError>;
}

/// Host-side store for the best progress reached per lesson.
pub trait ProgressStore: Send + Sync {
    /// Fetch every saved best value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    fn load_best(&self) -> Result<HashMap<LessonIndex, u32>, StorageError>;

    /// Persist a new best value for one lesson.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    fn save_best(&self, lesson: LessonIndex, best: u32) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    datasets: Arc<Mutex<HashMap<Locale, Dataset>>>,
    best: Arc<Mutex<HashMap<LessonIndex, u32>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            datasets: Arc::new(Mutex::new(HashMap::new())),
            best: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register a dataset under the locale it was built for.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_dataset(&self, dataset: Dataset) -> Result<(), StorageError> {
        let mut guard = self
            .datasets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(dataset.locale().clone(), dataset);
        Ok(())
    }
}

impl DatasetSource for InMemoryRepository {
    fn load(&self, locale: &Locale) -> Result<Option<Dataset>, StorageError> {
        let guard = self
            .datasets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(locale).cloned())
    }
}

impl ProgressStore for InMemoryRepository {
    fn load_best(&self) -> Result<HashMap<LessonIndex, u32>, StorageError> {
        let guard = self
            .best
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save_best(&self, lesson: LessonIndex, best: u32) -> Result<(), StorageError> {
        let mut guard = self
            .best
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(lesson, best);
        Ok(())
    }
}

/// Aggregates the dataset source and progress store behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub datasets: Arc<dyn DatasetSource>,
    pub progress: Arc<dyn ProgressStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let datasets: Arc<dyn DatasetSource> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressStore> = Arc::new(repo);
        Self { datasets, progress }
    }

    /// Datasets read from JSON files under `root`, progress kept in memory.
    #[must_use]
    pub fn filesystem(root: impl Into<PathBuf>) -> Self {
        let datasets: Arc<dyn DatasetSource> = Arc::new(crate::fs::FsDatasetSource::new(root));
        let progress: Arc<dyn ProgressStore> = Arc::new(InMemoryRepository::new());
        Self { datasets, progress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lang_core::model::{Lesson, WordDraft};

    fn build_dataset(locale: &str) -> Dataset {
        let word = WordDraft::new("red", "red", "words/red.png")
            .validate()
            .unwrap();
        let lesson = Lesson::new("Colors", vec![word]).unwrap();
        Dataset::new(locale.parse().unwrap(), vec![lesson]).unwrap()
    }

    #[test]
    fn loads_only_exact_locale() {
        let repo = InMemoryRepository::new();
        repo.insert_dataset(build_dataset("fr")).unwrap();

        let fr: Locale = "fr".parse().unwrap();
        let fr_ca: Locale = "fr_CA".parse().unwrap();
        assert!(repo.load(&fr).unwrap().is_some());
        assert!(repo.load(&fr_ca).unwrap().is_none());
    }

    #[test]
    fn round_trips_best_progress() {
        let repo = InMemoryRepository::new();
        repo.save_best(LessonIndex::new(2), 7).unwrap();
        repo.save_best(LessonIndex::new(2), 9).unwrap();

        let best = repo.load_best().unwrap();
        assert_eq!(best.get(&LessonIndex::new(2)), Some(&9));
        assert_eq!(best.len(), 1);
    }

    #[test]
    fn storage_clones_share_state() {
        let repo = InMemoryRepository::new();
        let clone = repo.clone();
        clone.save_best(LessonIndex::new(0), 1).unwrap();
        assert_eq!(repo.load_best().unwrap().len(), 1);
    }
}
