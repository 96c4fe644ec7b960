use thiserror::Error;

use crate::locale::Locale;
use crate::model::ids::LessonId;
use crate::model::word::Word;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson name cannot be empty")]
    EmptyName,

    #[error("lesson `{0}` has no words")]
    NoWords(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DatasetError {
    #[error("dataset for `{0}` contains no lessons")]
    NoLessons(Locale),
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A themed, ordered set of words.
///
/// Navigation addresses lessons by position; the id, when the word list
/// carries one, is what hosts can key on across locales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: Option<LessonId>,
    name: String,
    words: Vec<Word>,
}

impl Lesson {
    /// Creates a lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyName` for a blank name and
    /// `LessonError::NoWords` when `words` is empty.
    pub fn new(name: impl Into<String>, words: Vec<Word>) -> Result<Self, LessonError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(LessonError::EmptyName);
        }
        if words.is_empty() {
            return Err(LessonError::NoWords(name));
        }
        Ok(Self {
            id: None,
            name,
            words,
        })
    }

    #[must_use]
    pub fn with_id(mut self, id: LessonId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<&LessonId> {
        self.id.as_ref()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Number of sub-items a learner steps through.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

//
// ─── DATASET ───────────────────────────────────────────────────────────────────
//

/// Lessons loaded for one locale. Read-only once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    locale: Locale,
    lessons: Vec<Lesson>,
}

impl Dataset {
    /// Creates a dataset.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::NoLessons` when `lessons` is empty.
    pub fn new(locale: Locale, lessons: Vec<Lesson>) -> Result<Self, DatasetError> {
        if lessons.is_empty() {
            return Err(DatasetError::NoLessons(locale));
        }
        Ok(Self { locale, lessons })
    }

    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }
}
