#![forbid(unsafe_code)]

pub mod catalog;
pub mod controller;
pub mod error;
pub mod resolver;
pub mod sessions;
pub mod shuffle;

pub use catalog::{LessonCatalog, MenuItem};
pub use controller::{ActivityConfig, ActivityController};
pub use error::{ActivityError, ResolveError};
pub use resolver::{DatasetResolver, ResolutionTier, ResolvedDataset};
pub use shuffle::Shuffler;

pub use sessions::{
    ActivityView, LevelSession, MenuEntry, MenuView, MiniGame, MiniGameDispatch,
    MiniGameSequencer, MiniGameView, NullSink, ProgressTracker, RecordingSink, SequencerStep,
    SessionPhase, SubItemStep, SubItemView, ViewSink,
};
