//! Locale identifiers in `language[_REGION]` form.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LocaleError {
    #[error("locale cannot be empty")]
    Empty,

    #[error("invalid language code `{0}`")]
    InvalidLanguage(String),

    #[error("invalid region code `{0}`")]
    InvalidRegion(String),
}

/// Language whose dataset is assumed to always ship with the activity.
pub const DEFAULT_LOCALE: &str = "en";

/// A parsed locale such as `fr` or `pt_BR`.
///
/// POSIX decorations (`.UTF-8`, `@euro`) are dropped on parse and `-` is
/// accepted as the region separator, so `pt-br.UTF-8` reads as `pt_BR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    /// Build a locale from a language code and optional region.
    ///
    /// # Errors
    ///
    /// Returns `LocaleError` if either part is not a short alphanumeric code.
    pub fn new(language: &str, region: Option<&str>) -> Result<Self, LocaleError> {
        let language = language.trim();
        if language.is_empty() {
            return Err(LocaleError::Empty);
        }
        if !is_code(language, 2, 8) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(LocaleError::InvalidLanguage(language.to_owned()));
        }
        let region = match region.map(str::trim) {
            None => None,
            Some(r) if is_code(r, 2, 8) => Some(r.to_ascii_uppercase()),
            Some(r) => return Err(LocaleError::InvalidRegion(r.to_owned())),
        };
        Ok(Self {
            language: language.to_ascii_lowercase(),
            region,
        })
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// The same locale without its region, or `None` if it has none.
    #[must_use]
    pub fn base(&self) -> Option<Locale> {
        self.region.as_ref().map(|_| Locale {
            language: self.language.clone(),
            region: None,
        })
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: DEFAULT_LOCALE.to_owned(),
            region: None,
        }
    }
}

fn is_code(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphanumeric())
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}_{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let raw = raw.split(['.', '@']).next().unwrap_or_default();
        if raw.is_empty() {
            return Err(LocaleError::Empty);
        }
        match raw.split_once(['_', '-']) {
            Some((language, region)) => Locale::new(language, Some(region)),
            None => Locale::new(raw, None),
        }
    }
}

/// Which locale the learner asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LocaleSetting {
    /// Follow the host's locale.
    #[default]
    System,
    Explicit(Locale),
}

impl LocaleSetting {
    /// Pick the locale to request from the dataset resolver.
    ///
    /// `System` uses `system` when the host knows it and `default` otherwise.
    #[must_use]
    pub fn resolve(&self, system: Option<&Locale>, default: &Locale) -> Locale {
        match self {
            LocaleSetting::Explicit(locale) => locale.clone(),
            LocaleSetting::System => system.cloned().unwrap_or_else(|| default.clone()),
        }
    }
}

impl FromStr for LocaleSetting {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("system") {
            return Ok(LocaleSetting::System);
        }
        s.parse().map(LocaleSetting::Explicit)
    }
}

impl fmt::Display for LocaleSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocaleSetting::System => f.write_str("system"),
            LocaleSetting::Explicit(locale) => write!(f, "{locale}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_language_and_region() {
        let locale: Locale = "pt_BR".parse().unwrap();
        assert_eq!(locale.language(), "pt");
        assert_eq!(locale.region(), Some("BR"));
        assert_eq!(locale.to_string(), "pt_BR");
    }

    #[test]
    fn strips_posix_decorations() {
        let locale: Locale = "fr-fr.UTF-8".parse().unwrap();
        assert_eq!(locale.to_string(), "fr_FR");
        let locale: Locale = "de_DE@euro".parse().unwrap();
        assert_eq!(locale.to_string(), "de_DE");
    }

    #[test]
    fn base_drops_region() {
        let locale: Locale = "fr_CA".parse().unwrap();
        assert_eq!(locale.base().unwrap().to_string(), "fr");
        assert_eq!(locale.base().unwrap().base(), None);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!("".parse::<Locale>(), Err(LocaleError::Empty));
        assert!(matches!(
            "f".parse::<Locale>(),
            Err(LocaleError::InvalidLanguage(_))
        ));
        assert!(matches!(
            "fr_".parse::<Locale>(),
            Err(LocaleError::InvalidRegion(_))
        ));
        assert!(matches!(
            "en/x".parse::<Locale>(),
            Err(LocaleError::InvalidLanguage(_))
        ));
    }

    #[test]
    fn system_setting_falls_back_to_default() {
        let default: Locale = "en".parse().unwrap();
        let system: Locale = "es_MX".parse().unwrap();
        let setting: LocaleSetting = "System".parse().unwrap();
        assert_eq!(setting, LocaleSetting::System);
        assert_eq!(setting.resolve(Some(&system), &default), system);
        assert_eq!(setting.resolve(None, &default), default);

        let explicit: LocaleSetting = "it".parse().unwrap();
        assert_eq!(explicit.resolve(Some(&system), &default).to_string(), "it");
    }
}
