use std::fmt;
use std::str::FromStr;

/// Position of a lesson inside a resolved dataset.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LessonIndex(usize);

impl LessonIndex {
    /// Creates a new `LessonIndex`
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the underlying position
    #[must_use]
    pub fn value(&self) -> usize {
        self.0
    }

    /// Normalizes a signed position into `[0, lesson_count)` by modular wrap.
    ///
    /// Returns `None` when there are no lessons to wrap into.
    #[must_use]
    pub fn wrapped(raw: isize, lesson_count: usize) -> Option<Self> {
        let count = isize::try_from(lesson_count).ok().filter(|c| *c > 0)?;
        let index = raw.rem_euclid(count);
        usize::try_from(index).ok().map(Self)
    }

    /// The following lesson, wrapping from the last back to the first.
    #[must_use]
    pub fn next(self, lesson_count: usize) -> Self {
        if lesson_count == 0 {
            return self;
        }
        Self((self.0 % lesson_count + 1) % lesson_count)
    }

    /// The preceding lesson, wrapping from the first to the last.
    #[must_use]
    pub fn previous(self, lesson_count: usize) -> Self {
        if lesson_count == 0 {
            return self;
        }
        let current = self.0 % lesson_count;
        Self((current + lesson_count - 1) % lesson_count)
    }
}

/// Stable, language-agnostic identifier of a lesson in the word list.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LessonId(String);

impl LessonId {
    /// Creates a new `LessonId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stable, language-agnostic identifier joining a word to its translation.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordId(String);

impl WordId {
    /// Creates a new `WordId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LessonIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LessonIndex({})", self.0)
    }
}

impl fmt::Debug for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LessonId({})", self.0)
    }
}

impl fmt::Debug for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WordId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for LessonIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for LessonIndex {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<usize>()
            .map(LessonIndex::new)
            .map_err(|_| ParseIdError {
                kind: "LessonIndex".to_string(),
            })
    }
}

impl FromStr for LessonId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseIdError {
                kind: "LessonId".to_string(),
            });
        }
        Ok(LessonId::new(trimmed))
    }
}

impl FromStr for WordId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseIdError {
                kind: "WordId".to_string(),
            });
        }
        Ok(WordId::new(trimmed))
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_normalizes_negative_and_overflowing_positions() {
        assert_eq!(LessonIndex::wrapped(-1, 4), Some(LessonIndex::new(3)));
        assert_eq!(LessonIndex::wrapped(4, 4), Some(LessonIndex::new(0)));
        assert_eq!(LessonIndex::wrapped(9, 4), Some(LessonIndex::new(1)));
        assert_eq!(LessonIndex::wrapped(-9, 4), Some(LessonIndex::new(3)));
        assert_eq!(LessonIndex::wrapped(2, 4), Some(LessonIndex::new(2)));
    }

    #[test]
    fn wrapped_without_lessons_is_none() {
        assert_eq!(LessonIndex::wrapped(0, 0), None);
    }

    #[test]
    fn next_wraps_from_last_to_first() {
        assert_eq!(LessonIndex::new(2).next(3), LessonIndex::new(0));
        assert_eq!(LessonIndex::new(0).next(3), LessonIndex::new(1));
    }

    #[test]
    fn previous_wraps_from_first_to_last() {
        assert_eq!(LessonIndex::new(0).previous(3), LessonIndex::new(2));
        assert_eq!(LessonIndex::new(2).previous(3), LessonIndex::new(1));
    }

    #[test]
    fn single_lesson_wraps_onto_itself() {
        assert_eq!(LessonIndex::new(0).next(1), LessonIndex::new(0));
        assert_eq!(LessonIndex::new(0).previous(1), LessonIndex::new(0));
    }

    #[test]
    fn test_lesson_index_from_str() {
        let id: LessonIndex = "3".parse().unwrap();
        assert_eq!(id, LessonIndex::new(3));
        assert!("-1".parse::<LessonIndex>().is_err());
    }

    #[test]
    fn test_word_id_display() {
        let id = WordId::new("apple");
        assert_eq!(id.to_string(), "apple");
        assert!("  ".parse::<WordId>().is_err());
    }

    #[test]
    fn test_lesson_id_from_str_trims() {
        let id: LessonId = " colors ".parse().unwrap();
        assert_eq!(id.as_str(), "colors");
        assert!("".parse::<LessonId>().is_err());
    }
}
