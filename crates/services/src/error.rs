//! Shared error types for the services crate.

use thiserror::Error;

use lang_core::Locale;
use lang_core::model::MiniGameKind;
use storage::repository::StorageError;

/// Errors emitted by `DatasetResolver`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResolveError {
    #[error("no dataset for `{requested}`, its base language, or default `{default}`")]
    NoDataset { requested: Locale, default: Locale },
    #[error(transparent)]
    Source(#[from] StorageError),
}

/// Errors emitted by `ActivityController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ActivityError {
    #[error("activity has not been started")]
    NotStarted,
    #[error("no lesson is active")]
    NoActiveLesson,
    #[error("no mini-game registered for `{0}`")]
    MissingMiniGame(MiniGameKind),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
