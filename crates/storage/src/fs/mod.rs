//! Datasets stored as JSON files: one language-agnostic word list plus one
//! `content-<locale>.json` translation file per locale.

use lang_core::Locale;
use lang_core::model::Dataset;
use serde::de::DeserializeOwned;
use std::io;
use std::path::{Path, PathBuf};

use crate::repository::{DatasetSource, StorageError};

mod mapping;

use mapping::{RawContent, RawLesson, join_dataset};

/// Default name of the word list inside a dataset root.
pub const WORDS_FILE: &str = "words.json";

#[derive(Debug, Clone)]
pub struct FsDatasetSource {
    root: PathBuf,
    words_file: String,
}

impl FsDatasetSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            words_file: WORDS_FILE.to_owned(),
        }
    }

    #[must_use]
    pub fn with_words_file(mut self, words_file: impl Into<String>) -> Self {
        self.words_file = words_file.into();
        self
    }

    /// Path of the translation file for `locale`.
    #[must_use]
    pub fn content_path(&self, locale: &Locale) -> PathBuf {
        self.root.join(format!("content-{locale}.json"))
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, StorageError> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StorageError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
    }
}

fn parse<T: DeserializeOwned>(path: &Path, raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw)
        .map_err(|e| StorageError::Serialization(format!("{}: {e}", path.display())))
}

impl DatasetSource for FsDatasetSource {
    fn load(&self, locale: &Locale) -> Result<Option<Dataset>, StorageError> {
        let content_path = self.content_path(locale);
        let Some(raw_content) = read_optional(&content_path)? else {
            tracing::debug!(path = %content_path.display(), "no content file for locale");
            return Ok(None);
        };
        let content: RawContent = parse(&content_path, &raw_content)?;

        let words_path = self.root.join(&self.words_file);
        let raw_words = read_optional(&words_path)?.ok_or_else(|| StorageError::Io {
            path: words_path.clone(),
            message: "word list is missing".into(),
        })?;
        let lessons: Vec<RawLesson> = parse(&words_path, &raw_words)?;

        let dataset = join_dataset(locale, lessons, &content)?;
        if dataset.is_none() {
            tracing::warn!(%locale, "content file translates none of the listed words");
        }
        Ok(dataset)
    }
}
