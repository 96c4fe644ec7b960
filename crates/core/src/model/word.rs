use thiserror::Error;

use crate::model::ids::WordId;
use crate::model::image::{ImageRef, ImageRefError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WordError {
    #[error("word id cannot be empty")]
    EmptyId,

    #[error("translated text for word `{0}` cannot be empty")]
    EmptyText(WordId),

    #[error("image for word `{id}`: {source}")]
    InvalidImage {
        id: WordId,
        #[source]
        source: ImageRefError,
    },
}

/// A translated word paired with its picture. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    id: WordId,
    text: String,
    image: ImageRef,
}

impl Word {
    /// Build a word from already-validated parts.
    ///
    /// # Errors
    ///
    /// Returns `WordError::EmptyText` if the translated text is blank.
    pub fn new(id: WordId, text: impl Into<String>, image: ImageRef) -> Result<Self, WordError> {
        if id.as_str().trim().is_empty() {
            return Err(WordError::EmptyId);
        }
        let text = text.into().trim().to_owned();
        if text.is_empty() {
            return Err(WordError::EmptyText(id));
        }
        Ok(Self { id, text, image })
    }

    #[must_use]
    pub fn id(&self) -> &WordId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn image(&self) -> &ImageRef {
        &self.image
    }
}

/// Unvalidated word input, as read from a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordDraft {
    pub id: String,
    pub text: String,
    pub image: String,
}

impl WordDraft {
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            image: image.into(),
        }
    }

    /// Validate the draft into a `Word`.
    ///
    /// # Errors
    ///
    /// Returns `WordError` for a blank id, blank text or unusable image reference.
    pub fn validate(self) -> Result<Word, WordError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(WordError::EmptyId);
        }
        let id = WordId::new(id);
        let image = ImageRef::parse(&self.image).map_err(|source| WordError::InvalidImage {
            id: id.clone(),
            source,
        })?;
        Word::new(id, self.text, image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_validates_into_word() {
        let word = WordDraft::new("apple", " pomme ", "words/apple.png")
            .validate()
            .unwrap();
        assert_eq!(word.id().as_str(), "apple");
        assert_eq!(word.text(), "pomme");
        assert!(word.image().as_path().is_some());
    }

    #[test]
    fn blank_text_is_rejected() {
        let err = WordDraft::new("apple", "  ", "words/apple.png")
            .validate()
            .unwrap_err();
        assert_eq!(err, WordError::EmptyText(WordId::new("apple")));
    }

    #[test]
    fn missing_image_is_rejected() {
        let err = WordDraft::new("apple", "pomme", "").validate().unwrap_err();
        assert!(matches!(
            err,
            WordError::InvalidImage {
                source: ImageRefError::Empty,
                ..
            }
        ));
    }
}
