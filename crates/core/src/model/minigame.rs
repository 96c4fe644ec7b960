use serde::Deserialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PipelineError {
    #[error("mini-game pipeline must contain at least one stage")]
    Empty,

    #[error("mini-game stage {stage} has mode 0; modes start at 1")]
    InvalidMode { stage: usize },

    #[error("mini-game stage {stage} has an empty view reference")]
    EmptyView { stage: usize },
}

/// Which mini-game collaborator runs a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MiniGameKind {
    Quiz,
    Spelling,
}

impl MiniGameKind {
    /// View asset a host loads for this mini-game by default.
    #[must_use]
    pub fn default_view(self) -> &'static str {
        match self {
            MiniGameKind::Quiz => "Quiz.qml",
            MiniGameKind::Spelling => "SpellIt.qml",
        }
    }
}

impl fmt::Display for MiniGameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MiniGameKind::Quiz => f.write_str("quiz"),
            MiniGameKind::Spelling => f.write_str("spelling"),
        }
    }
}

/// One stage of the end-of-lesson pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiniGameSpec {
    kind: MiniGameKind,
    mode: u32,
    view: String,
    truncates_word_list: bool,
}

impl MiniGameSpec {
    #[must_use]
    pub fn new(kind: MiniGameKind, mode: u32) -> Self {
        Self {
            kind,
            mode,
            view: kind.default_view().to_owned(),
            truncates_word_list: false,
        }
    }

    #[must_use]
    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = view.into();
        self
    }

    /// Mark this stage as one whose mini-game may shorten its working set, so
    /// the learner-visible total is re-read from the rebuilt word queue.
    #[must_use]
    pub fn truncating(mut self, truncates: bool) -> Self {
        self.truncates_word_list = truncates;
        self
    }

    #[must_use]
    pub fn kind(&self) -> MiniGameKind {
        self.kind
    }

    #[must_use]
    pub fn mode(&self) -> u32 {
        self.mode
    }

    #[must_use]
    pub fn view(&self) -> &str {
        &self.view
    }

    #[must_use]
    pub fn truncates_word_list(&self) -> bool {
        self.truncates_word_list
    }
}

/// Ordered stages shared by every lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiniGamePipeline {
    stages: Vec<MiniGameSpec>,
}

impl MiniGamePipeline {
    /// Creates a pipeline.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError` if there are no stages, a stage uses mode 0 or
    /// has no view reference.
    pub fn new(stages: Vec<MiniGameSpec>) -> Result<Self, PipelineError> {
        if stages.is_empty() {
            return Err(PipelineError::Empty);
        }
        for (stage, spec) in stages.iter().enumerate() {
            if spec.mode == 0 {
                return Err(PipelineError::InvalidMode { stage });
            }
            if spec.view.trim().is_empty() {
                return Err(PipelineError::EmptyView { stage });
            }
        }
        Ok(Self { stages })
    }

    /// Three quiz rounds of rising difficulty, then one spelling round.
    ///
    /// The spelling round works on a possibly shortened word set.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            stages: vec![
                MiniGameSpec::new(MiniGameKind::Quiz, 1),
                MiniGameSpec::new(MiniGameKind::Quiz, 2),
                MiniGameSpec::new(MiniGameKind::Quiz, 3),
                MiniGameSpec::new(MiniGameKind::Spelling, 1).truncating(true),
            ],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    #[must_use]
    pub fn stage(&self, position: usize) -> Option<&MiniGameSpec> {
        self.stages.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MiniGameSpec> {
        self.stages.iter()
    }
}

impl Default for MiniGamePipeline {
    fn default() -> Self {
        Self::standard()
    }
}
