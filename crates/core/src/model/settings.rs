use serde::Deserialize;
use thiserror::Error;

use crate::locale::{DEFAULT_LOCALE, Locale, LocaleError, LocaleSetting};
use crate::model::minigame::{MiniGameKind, MiniGamePipeline, MiniGameSpec, PipelineError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivitySettings {
    locale: LocaleSetting,
    default_locale: Locale,
    pipeline: MiniGamePipeline,
}

/// One pipeline stage as written in a settings file.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MiniGameSpecDraft {
    pub kind: MiniGameKind,
    pub mode: u32,
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub truncates_word_list: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActivitySettingsDraft {
    pub locale: Option<String>,
    pub default_locale: Option<String>,
    pub pipeline: Option<Vec<MiniGameSpecDraft>>,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("invalid locale: {0}")]
    Locale(#[source] LocaleError),
    #[error("invalid default locale: {0}")]
    DefaultLocale(#[source] LocaleError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ActivitySettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft into settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a locale does not parse or the pipeline is invalid.
    pub fn validate(self) -> Result<ActivitySettings, SettingsError> {
        let locale = match normalize_optional(self.locale) {
            Some(raw) => raw.parse().map_err(SettingsError::Locale)?,
            None => LocaleSetting::System,
        };
        let default_locale = normalize_optional(self.default_locale)
            .unwrap_or_else(|| DEFAULT_LOCALE.to_owned())
            .parse()
            .map_err(SettingsError::DefaultLocale)?;
        let pipeline = match self.pipeline {
            Some(stages) => MiniGamePipeline::new(
                stages
                    .into_iter()
                    .map(MiniGameSpecDraft::into_spec)
                    .collect(),
            )?,
            None => MiniGamePipeline::standard(),
        };

        Ok(ActivitySettings {
            locale,
            default_locale,
            pipeline,
        })
    }
}

impl MiniGameSpecDraft {
    fn into_spec(self) -> MiniGameSpec {
        let spec = MiniGameSpec::new(self.kind, self.mode).truncating(self.truncates_word_list);
        match normalize_optional(self.view) {
            Some(view) => spec.with_view(view),
            None => spec,
        }
    }
}

impl ActivitySettings {
    #[must_use]
    pub fn new(locale: LocaleSetting, default_locale: Locale, pipeline: MiniGamePipeline) -> Self {
        Self {
            locale,
            default_locale,
            pipeline,
        }
    }

    #[must_use]
    pub fn locale(&self) -> &LocaleSetting {
        &self.locale
    }

    #[must_use]
    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    #[must_use]
    pub fn pipeline(&self) -> &MiniGamePipeline {
        &self.pipeline
    }

    #[must_use]
    pub fn with_locale(mut self, locale: LocaleSetting) -> Self {
        self.locale = locale;
        self
    }

    pub fn set_locale(&mut self, locale: LocaleSetting) {
        self.locale = locale;
    }
}

impl Default for ActivitySettings {
    fn default() -> Self {
        Self {
            locale: LocaleSetting::System,
            default_locale: Locale::default(),
            pipeline: MiniGamePipeline::standard(),
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
