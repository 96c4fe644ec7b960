use std::collections::HashMap;
use std::fmt;

use lang_core::model::{Lesson, LessonIndex, MiniGameKind, MiniGamePipeline, MiniGameSpec, Word};

use super::level::LevelSession;
use super::view::{ActivityView, MiniGameView, ViewSink};
use crate::error::ActivityError;
use crate::shuffle::Shuffler;

/// Everything a mini-game needs to run one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiniGameDispatch {
    pub lesson: LessonIndex,
    /// 0-based stage position in the pipeline.
    pub stage: usize,
    pub spec: MiniGameSpec,
    /// Freshly shuffled copy of the lesson's words.
    pub words: Vec<Word>,
}

impl MiniGameDispatch {
    #[must_use]
    pub fn mode(&self) -> u32 {
        self.spec.mode()
    }

    #[must_use]
    pub fn kind(&self) -> MiniGameKind {
        self.spec.kind()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerStep {
    Dispatch(MiniGameDispatch),
    /// Every stage ran; the lesson is complete.
    Exhausted,
}

/// A mini-game collaborator.
///
/// Each started stage must eventually lead to exactly one
/// `ActivityController::mini_game_won` call.
pub trait MiniGame {
    fn start(&mut self, sink: &mut dyn ViewSink, dispatch: MiniGameDispatch);
}

/// Runs the end-of-lesson pipeline stage by stage.
pub struct MiniGameSequencer {
    pipeline: MiniGamePipeline,
    games: HashMap<MiniGameKind, Box<dyn MiniGame>>,
}

impl MiniGameSequencer {
    #[must_use]
    pub fn new(pipeline: MiniGamePipeline) -> Self {
        Self {
            pipeline,
            games: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_mini_game(mut self, kind: MiniGameKind, game: Box<dyn MiniGame>) -> Self {
        self.register(kind, game);
        self
    }

    /// Register a collaborator, replacing any previous one for `kind`.
    pub fn register(&mut self, kind: MiniGameKind, game: Box<dyn MiniGame>) {
        self.games.insert(kind, game);
    }

    /// Kinds used by the pipeline with no registered collaborator.
    #[must_use]
    pub fn missing_kinds(&self) -> Vec<MiniGameKind> {
        let mut missing = Vec::new();
        for spec in self.pipeline.iter() {
            let kind = spec.kind();
            if !self.games.contains_key(&kind) && !missing.contains(&kind) {
                missing.push(kind);
            }
        }
        missing
    }

    /// Prepare the next stage for `session`, or report the pipeline done.
    pub fn advance(
        &self,
        session: &mut LevelSession,
        lesson: &Lesson,
        shuffler: &mut Shuffler,
    ) -> SequencerStep {
        let stage = session.pipeline_position();
        let Some(spec) = self.pipeline.stage(stage) else {
            tracing::debug!(lesson = %session.lesson_index(), "mini-game pipeline exhausted");
            return SequencerStep::Exhausted;
        };

        let words = shuffler.shuffled(lesson.words());
        let visible_total = spec.truncates_word_list().then_some(words.len());
        session.mark_stage_dispatched(visible_total);

        SequencerStep::Dispatch(MiniGameDispatch {
            lesson: session.lesson_index(),
            stage,
            spec: spec.clone(),
            words,
        })
    }

    /// Show the mini-game view and hand the stage to its collaborator.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::MissingMiniGame` if no collaborator is
    /// registered for the stage's kind.
    pub fn launch(
        &mut self,
        dispatch: MiniGameDispatch,
        total: usize,
        sink: &mut dyn ViewSink,
    ) -> Result<(), ActivityError> {
        let kind = dispatch.kind();
        let game = self
            .games
            .get_mut(&kind)
            .ok_or(ActivityError::MissingMiniGame(kind))?;

        tracing::info!(
            lesson = %dispatch.lesson,
            stage = dispatch.stage,
            %kind,
            mode = dispatch.mode(),
            "starting mini-game"
        );
        sink.show(ActivityView::MiniGame(MiniGameView {
            lesson: dispatch.lesson,
            stage: dispatch.stage,
            kind,
            mode: dispatch.mode(),
            view: dispatch.spec.view().to_owned(),
            total,
        }));
        game.start(sink, dispatch);
        Ok(())
    }
}

impl fmt::Debug for MiniGameSequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiniGameSequencer")
            .field("pipeline", &self.pipeline)
            .field("registered", &self.games.keys().collect::<Vec<_>>())
            .finish()
    }
}
