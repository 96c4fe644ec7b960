mod level;
mod progress;
mod sequencer;
mod view;

// Public API of the lesson-session subsystem.
pub use level::{LevelSession, SessionPhase, SubItemStep};
pub use progress::ProgressTracker;
pub use sequencer::{MiniGame, MiniGameDispatch, MiniGameSequencer, SequencerStep};
pub use view::{
    ActivityView, MenuEntry, MenuView, MiniGameView, NullSink, RecordingSink, SubItemView,
    ViewSink,
};
