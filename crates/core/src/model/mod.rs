mod ids;
mod image;
mod lesson;
mod minigame;
mod progress;
mod settings;
mod word;

pub use ids::{LessonId, LessonIndex, ParseIdError, WordId};
pub use image::{ImageRef, ImageRefError};
pub use lesson::{Dataset, DatasetError, Lesson, LessonError};
pub use minigame::{MiniGameKind, MiniGamePipeline, MiniGameSpec, PipelineError};
pub use progress::ProgressRecord;
pub use settings::{ActivitySettings, ActivitySettingsDraft, MiniGameSpecDraft, SettingsError};
pub use word::{Word, WordDraft, WordError};
