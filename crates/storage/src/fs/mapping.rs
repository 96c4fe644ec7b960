use lang_core::Locale;
use lang_core::model::{Dataset, Lesson, LessonId, WordDraft};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use crate::repository::StorageError;

/// Lesson entry of the language-agnostic word list.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawLesson {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub content: Vec<RawWord>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawWord {
    pub id: String,
    pub image: String,
}

/// Translations for one locale.
///
/// Word ids and lesson ids share this one key space: a key names a word's
/// text and, when a lesson carries the same id, that lesson's title too.
/// Word lists should keep the two sets of ids disjoint.
pub(crate) type RawContent = HashMap<String, String>;

fn translation<'a>(content: &'a RawContent, id: &str) -> Option<&'a str> {
    content
        .get(id.trim())
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
}

fn lesson_id(raw: &RawLesson) -> Option<LessonId> {
    raw.id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(LessonId::new)
}

/// Join the word list with one locale's translations.
///
/// Words without a translation are left out, and so are lessons left
/// without words. A lesson whose id has a translation takes it as its
/// title. Returns `Ok(None)` when nothing at all is translated.
pub(crate) fn join_dataset(
    locale: &Locale,
    lessons: Vec<RawLesson>,
    content: &RawContent,
) -> Result<Option<Dataset>, StorageError> {
    let word_ids: HashSet<&str> = lessons
        .iter()
        .flat_map(|lesson| lesson.content.iter().map(|word| word.id.trim()))
        .collect();
    for id in lessons
        .iter()
        .filter_map(lesson_id)
        .filter(|id| word_ids.contains(id.as_str()))
    {
        tracing::warn!(lesson = %id, %locale, "lesson id is also a word id; both share one translation");
    }

    let mut joined = Vec::with_capacity(lessons.len());

    for raw in lessons {
        let id = lesson_id(&raw);
        let mut words = Vec::with_capacity(raw.content.len());
        for word in raw.content {
            let Some(text) = translation(content, &word.id) else {
                continue;
            };
            let word = WordDraft::new(word.id, text, word.image)
                .validate()
                .map_err(lang_core::Error::from)?;
            words.push(word);
        }

        if words.is_empty() {
            tracing::debug!(lesson = %raw.name, %locale, "skipping lesson without translated words");
            continue;
        }

        let name = id
            .as_ref()
            .and_then(|id| translation(content, id.as_str()))
            .map_or(raw.name.clone(), str::to_owned);
        let mut lesson = Lesson::new(name, words).map_err(lang_core::Error::from)?;
        if let Some(id) = id {
            lesson = lesson.with_id(id);
        }
        joined.push(lesson);
    }

    if joined.is_empty() {
        return Ok(None);
    }

    let dataset = Dataset::new(locale.clone(), joined).map_err(lang_core::Error::from)?;
    Ok(Some(dataset))
}
