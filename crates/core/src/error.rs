use thiserror::Error;

use crate::locale::LocaleError;
use crate::model::{DatasetError, LessonError, PipelineError, SettingsError, WordError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Locale(#[from] LocaleError),
    #[error(transparent)]
    Word(#[from] WordError),
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
