use std::sync::{Arc, Mutex};

use lang_core::Locale;
use lang_core::model::{LessonIndex, MiniGameKind, Word};

use crate::catalog::MenuItem;

/// Presentation-agnostic view models pushed to the host.
///
/// This is intentionally **not** a rendering layer:
/// - no pre-formatted strings
/// - no widget or asset loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityView {
    Menu(MenuView),
    SubItem(SubItemView),
    MiniGame(MiniGameView),
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub item: MenuItem,
    pub best_saved: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    pub entries: Vec<MenuEntry>,
    pub locale: Locale,
    /// The default-language dataset is shown instead of the learner's.
    pub fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubItemView {
    pub lesson: LessonIndex,
    pub lesson_name: String,
    pub word: Word,
    /// 1-based.
    pub sub_item: usize,
    pub total: usize,
    pub remaining: usize,
    pub previous_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiniGameView {
    pub lesson: LessonIndex,
    pub stage: usize,
    pub kind: MiniGameKind,
    pub mode: u32,
    pub view: String,
    pub total: usize,
}

/// Receiver of view-model updates.
pub trait ViewSink {
    fn show(&mut self, view: ActivityView);
}

/// Sink that drops every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ViewSink for NullSink {
    fn show(&mut self, _view: ActivityView) {}
}

/// Sink that keeps every update; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    views: Arc<Mutex<Vec<ActivityView>>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn views(&self) -> Vec<ActivityView> {
        self.views
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn last(&self) -> Option<ActivityView> {
        self.views
            .lock()
            .ok()
            .and_then(|guard| guard.last().cloned())
    }

    /// Drain recorded views.
    pub fn take(&self) -> Vec<ActivityView> {
        self.views
            .lock()
            .map(|mut guard| std::mem::take(&mut *guard))
            .unwrap_or_default()
    }
}

impl ViewSink for RecordingSink {
    fn show(&mut self, view: ActivityView) {
        if let Ok(mut guard) = self.views.lock() {
            guard.push(view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_clones_share_buffer() {
        let sink = RecordingSink::new();
        let mut writer = sink.clone();
        writer.show(ActivityView::Stopped);
        assert_eq!(sink.last(), Some(ActivityView::Stopped));
        assert_eq!(sink.take().len(), 1);
        assert!(sink.views().is_empty());
    }
}
