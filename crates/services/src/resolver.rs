use std::sync::Arc;

use lang_core::Locale;
use lang_core::model::Dataset;
use storage::repository::DatasetSource;

use crate::error::ResolveError;

/// Which attempt produced the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionTier {
    /// The requested locale, as asked.
    Exact,
    /// The requested locale with its region stripped.
    BaseLanguage,
    /// The activity's default language.
    DefaultFallback,
}

/// A dataset together with the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDataset {
    pub requested: Locale,
    pub dataset: Dataset,
    pub tier: ResolutionTier,
}

impl ResolvedDataset {
    /// True when the learner is seeing the default language instead of theirs.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.tier == ResolutionTier::DefaultFallback
    }

    /// True unless the exact requested locale was found.
    #[must_use]
    pub fn is_inexact(&self) -> bool {
        self.tier != ResolutionTier::Exact
    }
}

/// Resolves a locale to a dataset: exact locale, then base language, then default.
#[derive(Clone)]
pub struct DatasetResolver {
    source: Arc<dyn DatasetSource>,
    default_locale: Locale,
}

impl DatasetResolver {
    #[must_use]
    pub fn new(source: Arc<dyn DatasetSource>, default_locale: Locale) -> Self {
        Self {
            source,
            default_locale,
        }
    }

    /// Locales to try, in order, skipping ones already tried.
    fn candidates(&self, requested: &Locale) -> Vec<(Locale, ResolutionTier)> {
        let mut tiers = vec![(requested.clone(), ResolutionTier::Exact)];
        if let Some(base) = requested.base() {
            tiers.push((base, ResolutionTier::BaseLanguage));
        }
        if tiers.iter().all(|(l, _)| l != &self.default_locale) {
            tiers.push((self.default_locale.clone(), ResolutionTier::DefaultFallback));
        }
        tiers
    }

    /// Resolve `requested` to a dataset.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::NoDataset` when no tier has content, and
    /// `ResolveError::Source` when the last tier tried fails to read its
    /// content. Read failures on earlier tiers are logged and skipped.
    pub fn resolve(&self, requested: &Locale) -> Result<ResolvedDataset, ResolveError> {
        let candidates = self.candidates(requested);
        let last = candidates.len() - 1;
        for (position, (locale, tier)) in candidates.into_iter().enumerate() {
            tracing::debug!(%locale, ?tier, "trying dataset");
            let dataset = match self.source.load(&locale) {
                Ok(Some(dataset)) => dataset,
                Ok(None) => continue,
                Err(err) if position < last => {
                    tracing::warn!(%locale, ?tier, error = %err, "unreadable dataset, trying next");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            match tier {
                ResolutionTier::Exact => {}
                ResolutionTier::BaseLanguage => {
                    tracing::info!(%requested, %locale, "using base-language dataset");
                }
                ResolutionTier::DefaultFallback => {
                    tracing::warn!(%requested, %locale, "falling back to default-language dataset");
                }
            }
            return Ok(ResolvedDataset {
                requested: requested.clone(),
                dataset,
                tier,
            });
        }

        Err(ResolveError::NoDataset {
            requested: requested.clone(),
            default: self.default_locale.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lang_core::model::{Lesson, WordDraft};
    use storage::repository::{InMemoryRepository, StorageError};

    fn dataset(locale: &str) -> Dataset {
        let word = WordDraft::new("cat", format!("cat-{locale}"), "words/cat.png")
            .validate()
            .unwrap();
        Dataset::new(
            locale.parse().unwrap(),
            vec![Lesson::new("Animals", vec![word]).unwrap()],
        )
        .unwrap()
    }

    fn resolver(locales: &[&str]) -> DatasetResolver {
        let repo = InMemoryRepository::new();
        for locale in locales {
            repo.insert_dataset(dataset(locale)).unwrap();
        }
        DatasetResolver::new(Arc::new(repo), "en".parse().unwrap())
    }

    fn locale(raw: &str) -> Locale {
        raw.parse().unwrap()
    }

    #[test]
    fn exact_match_wins() {
        let resolved = resolver(&["en", "fr", "fr_CA"])
            .resolve(&locale("fr_CA"))
            .unwrap();
        assert_eq!(resolved.tier, ResolutionTier::Exact);
        assert_eq!(resolved.dataset.locale(), &locale("fr_CA"));
        assert!(!resolved.is_inexact());
    }

    #[test]
    fn region_is_stripped_before_default() {
        let resolved = resolver(&["en", "fr"]).resolve(&locale("fr_CA")).unwrap();
        assert_eq!(resolved.tier, ResolutionTier::BaseLanguage);
        assert_eq!(resolved.dataset.locale(), &locale("fr"));
        assert!(resolved.is_inexact());
        assert!(!resolved.is_fallback());
    }

    #[test]
    fn default_language_is_last_resort() {
        for requested in ["de_AT", "de", "pt_BR"] {
            let resolved = resolver(&["en", "fr"]).resolve(&locale(requested)).unwrap();
            assert_eq!(resolved.tier, ResolutionTier::DefaultFallback);
            assert_eq!(resolved.dataset.locale(), &locale("en"));
            assert!(resolved.is_fallback());
            assert_eq!(resolved.requested, locale(requested));
        }
    }

    #[test]
    fn requesting_default_region_finds_base_without_fallback_flag() {
        let resolved = resolver(&["en"]).resolve(&locale("en_GB")).unwrap();
        assert_eq!(resolved.tier, ResolutionTier::BaseLanguage);
        assert!(!resolved.is_fallback());
    }

    #[test]
    fn missing_default_is_fatal() {
        let err = resolver(&["fr"]).resolve(&locale("de")).unwrap_err();
        assert!(matches!(err, ResolveError::NoDataset { .. }));
    }

    struct BrokenSource;

    impl DatasetSource for BrokenSource {
        fn load(&self, _locale: &Locale) -> Result<Option<Dataset>, StorageError> {
            Err(StorageError::Serialization("broken".into()))
        }
    }

    #[test]
    fn source_failures_are_not_treated_as_misses() {
        let resolver = DatasetResolver::new(Arc::new(BrokenSource), locale("en"));
        let err = resolver.resolve(&locale("fr")).unwrap_err();
        assert!(matches!(err, ResolveError::Source(_)));
    }

    /// Fails for the listed locales and defers to a repository otherwise.
    struct PartlyBroken {
        broken: Vec<Locale>,
        inner: InMemoryRepository,
    }

    impl DatasetSource for PartlyBroken {
        fn load(&self, locale: &Locale) -> Result<Option<Dataset>, StorageError> {
            if self.broken.contains(locale) {
                return Err(StorageError::Serialization(format!("content-{locale}.json")));
            }
            self.inner.load(locale)
        }
    }

    fn partly_broken(broken: &[&str], present: &[&str]) -> DatasetResolver {
        let inner = InMemoryRepository::new();
        for raw in present {
            inner.insert_dataset(dataset(raw)).unwrap();
        }
        let source = PartlyBroken {
            broken: broken.iter().map(|raw| locale(raw)).collect(),
            inner,
        };
        DatasetResolver::new(Arc::new(source), locale("en"))
    }

    #[test]
    fn unreadable_regional_dataset_falls_back_to_default() {
        let resolved = partly_broken(&["fr_CA"], &["en"])
            .resolve(&locale("fr_CA"))
            .unwrap();
        assert_eq!(resolved.tier, ResolutionTier::DefaultFallback);
        assert_eq!(resolved.dataset.locale(), &locale("en"));
    }

    #[test]
    fn unreadable_regional_dataset_falls_back_to_base_language() {
        let resolved = partly_broken(&["fr_CA"], &["en", "fr"])
            .resolve(&locale("fr_CA"))
            .unwrap();
        assert_eq!(resolved.tier, ResolutionTier::BaseLanguage);
        assert_eq!(resolved.dataset.locale(), &locale("fr"));
    }

    #[test]
    fn unreadable_default_dataset_is_reported() {
        let err = partly_broken(&["en"], &["fr"])
            .resolve(&locale("de"))
            .unwrap_err();
        assert!(matches!(err, ResolveError::Source(_)));
    }
}
