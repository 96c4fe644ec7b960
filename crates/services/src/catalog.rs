use lang_core::Locale;
use lang_core::model::{Dataset, Lesson, LessonId, LessonIndex};

/// Menu projection of one lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub index: LessonIndex,
    pub id: Option<LessonId>,
    pub label: String,
    pub word_count: usize,
}

/// Ordered lessons of a resolved dataset. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonCatalog {
    locale: Locale,
    lessons: Vec<Lesson>,
}

impl LessonCatalog {
    #[must_use]
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            locale: dataset.locale().clone(),
            lessons: dataset.lessons().to_vec(),
        }
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
    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    #[must_use]
    pub fn lesson(&self, index: LessonIndex) -> Option<&Lesson> {
        self.lessons.get(index.value())
    }

    /// Map any signed position onto a lesson of this catalog.
    #[must_use]
    pub fn wrap(&self, raw: isize) -> LessonIndex {
        LessonIndex::wrapped(raw, self.len()).unwrap_or_default()
    }

    #[must_use]
    pub fn menu(&self) -> Vec<MenuItem> {
        self.lessons
            .iter()
            .enumerate()
            .map(|(i, lesson)| MenuItem {
                index: LessonIndex::new(i),
                id: lesson.id().cloned(),
                label: lesson.name().to_owned(),
                word_count: lesson.word_count(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lang_core::model::WordDraft;

    fn catalog() -> LessonCatalog {
        let lesson = |name: &str, ids: &[&str]| {
            let words = ids
                .iter()
                .map(|id| {
                    WordDraft::new(*id, *id, format!("words/{id}.png"))
                        .validate()
                        .unwrap()
                })
                .collect();
            Lesson::new(name, words)
                .unwrap()
                .with_id(LessonId::new(name.to_lowercase()))
        };
        let dataset = Dataset::new(
            "en".parse().unwrap(),
            vec![
                lesson("Colors", &["red", "blue"]),
                lesson("Animals", &["cat"]),
                lesson("Fruits", &["apple", "pear", "plum"]),
            ],
        )
        .unwrap();
        LessonCatalog::from_dataset(&dataset)
    }

    #[test]
    fn menu_follows_dataset_order() {
        let menu = catalog().menu();
        let labels: Vec<_> = menu.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Colors", "Animals", "Fruits"]);
        assert_eq!(menu[2].index, LessonIndex::new(2));
        assert_eq!(menu[2].word_count, 3);
        assert_eq!(menu[1].id, Some(LessonId::new("animals")));
    }

    #[test]
    fn menu_is_deterministic() {
        let catalog = catalog();
        assert_eq!(catalog.menu(), catalog.menu());
    }

    #[test]
    fn wrap_stays_in_range() {
        let catalog = catalog();
        assert_eq!(catalog.wrap(-1), LessonIndex::new(2));
        assert_eq!(catalog.wrap(3), LessonIndex::new(0));
        assert_eq!(catalog.lesson(catalog.wrap(7)).unwrap().name(), "Animals");
    }
}
