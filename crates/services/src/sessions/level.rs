use std::fmt;

use lang_core::model::{Lesson, LessonIndex, Word};

use super::progress::ProgressTracker;
use super::view::SubItemView;
use crate::shuffle::Shuffler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Stepping through the lesson's words.
    LessonActive,
    /// Words exhausted; mini-games are running.
    MiniGamePipeline,
}

/// Outcome of a sub-item transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubItemStep {
    /// A different word is now current.
    Show,
    /// The last word was passed; the mini-game pipeline should start.
    /// Carries the new best progress when the attempt raised it.
    PipelineReady { new_best: Option<u32> },
    /// Nothing changed (floor reached, or not in word traversal).
    Ignored,
}

/// State of one visit to a lesson.
///
/// Created on every lesson entry and replaced on the next.
#[derive(Clone)]
pub struct LevelSession {
    lesson: LessonIndex,
    lesson_name: String,
    words: Vec<Word>,
    sublevel_count: usize,
    /// 1-based.
    sub_item: usize,
    /// Learner-visible sub-item total; a truncating stage may lower it.
    total: usize,
    remaining: Vec<usize>,
    pipeline_position: usize,
    phase: SessionPhase,
}

impl LevelSession {
    /// Enter `lesson` with a freshly shuffled word queue and a zeroed attempt.
    pub fn enter(
        index: LessonIndex,
        lesson: &Lesson,
        progress: &mut ProgressTracker,
        shuffler: &mut Shuffler,
    ) -> Self {
        let words = shuffler.shuffled(lesson.words());
        let sublevel_count = words.len();
        progress.begin_attempt(index);
        tracing::info!(lesson = %index, name = lesson.name(), words = sublevel_count, "entering lesson");

        Self {
            lesson: index,
            lesson_name: lesson.name().to_owned(),
            words,
            sublevel_count,
            sub_item: 1,
            total: sublevel_count,
            remaining: (2..=sublevel_count).collect(),
            pipeline_position: 0,
            phase: SessionPhase::LessonActive,
        }
    }

    #[must_use]
    pub fn lesson_index(&self) -> LessonIndex {
        self.lesson
    }

    #[must_use]
    pub fn lesson_name(&self) -> &str {
        &self.lesson_name
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn sub_item(&self) -> usize {
        self.sub_item
    }

    #[must_use]
    pub fn sublevel_count(&self) -> usize {
        self.sublevel_count
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Sub-item positions not shown yet during this visit.
    #[must_use]
    pub fn remaining(&self) -> &[usize] {
        &self.remaining
    }

    /// Number of pipeline stages already dispatched.
    #[must_use]
    pub fn pipeline_position(&self) -> usize {
        self.pipeline_position
    }

    /// The shuffled working queue.
    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    #[must_use]
    pub fn current_word(&self) -> Option<&Word> {
        self.sub_item
            .checked_sub(1)
            .and_then(|position| self.words.get(position))
    }

    #[must_use]
    pub fn previous_enabled(&self) -> bool {
        self.phase == SessionPhase::LessonActive && self.sub_item > 1
    }

    /// View of the current word, or `None` once the pipeline has started.
    #[must_use]
    pub fn sub_item_view(&self) -> Option<SubItemView> {
        if self.phase != SessionPhase::LessonActive {
            return None;
        }
        let word = self.current_word()?.clone();
        Some(SubItemView {
            lesson: self.lesson,
            lesson_name: self.lesson_name.clone(),
            word,
            sub_item: self.sub_item,
            total: self.total,
            remaining: self.remaining.len(),
            previous_enabled: self.previous_enabled(),
        })
    }

    /// Move to the next word, or into the pipeline after the last one.
    pub fn advance_sub_item(&mut self, progress: &mut ProgressTracker) -> SubItemStep {
        if self.phase != SessionPhase::LessonActive {
            return SubItemStep::Ignored;
        }

        progress.increment_attempt(self.lesson);
        let next = self.sub_item + 1;
        if next > self.sublevel_count {
            self.phase = SessionPhase::MiniGamePipeline;
            let new_best = progress.commit_current(self.lesson);
            tracing::debug!(lesson = %self.lesson, ?new_best, "lesson words exhausted");
            return SubItemStep::PipelineReady { new_best };
        }

        self.sub_item = next;
        self.remaining.retain(|position| *position != next);
        SubItemStep::Show
    }

    /// Move back one word. At the first word this is a no-op and the attempt
    /// counter is left untouched.
    pub fn retreat_sub_item(&mut self, progress: &mut ProgressTracker) -> SubItemStep {
        if self.phase != SessionPhase::LessonActive || self.sub_item <= 1 {
            return SubItemStep::Ignored;
        }
        self.sub_item -= 1;
        progress.decrement_attempt(self.lesson);
        SubItemStep::Show
    }

    pub(crate) fn mark_stage_dispatched(&mut self, visible_total: Option<usize>) {
        if let Some(total) = visible_total {
            self.total = total;
        }
        self.pipeline_position += 1;
    }
}

impl fmt::Debug for LevelSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelSession")
            .field("lesson", &self.lesson)
            .field("words_len", &self.words.len())
            .field("sub_item", &self.sub_item)
            .field("total", &self.total)
            .field("remaining_len", &self.remaining.len())
            .field("pipeline_position", &self.pipeline_position)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use lang_core::model::WordDraft;

    fn build_lesson(count: usize) -> Lesson {
        let words = (0..count)
            .map(|i| {
                WordDraft::new(format!("w{i}"), format!("word {i}"), format!("words/{i}.png"))
                    .validate()
                    .unwrap()
            })
            .collect();
        Lesson::new("Numbers", words).unwrap()
    }

    fn enter(count: usize) -> (LevelSession, ProgressTracker) {
        let mut progress = ProgressTracker::new();
        let session = LevelSession::enter(
            LessonIndex::new(0),
            &build_lesson(count),
            &mut progress,
            &mut Shuffler::disabled(),
        );
        (session, progress)
    }

    #[test]
    fn entering_starts_at_first_word() {
        let (session, progress) = enter(3);
        assert_eq!(session.sub_item(), 1);
        assert_eq!(session.sublevel_count(), 3);
        assert_eq!(session.pipeline_position(), 0);
        assert_eq!(session.phase(), SessionPhase::LessonActive);
        assert_eq!(session.remaining(), &[2, 3]);
        assert!(!session.previous_enabled());
        assert_eq!(session.current_word().unwrap().text(), "word 0");
        assert_eq!(progress.current_attempt(LessonIndex::new(0)), 0);
    }

    #[test]
    fn entering_shuffles_a_copy_of_every_word() {
        let lesson = build_lesson(12);
        let mut progress = ProgressTracker::new();
        let session = LevelSession::enter(
            LessonIndex::new(0),
            &lesson,
            &mut progress,
            &mut Shuffler::seeded(3),
        );
        let mut queued: Vec<_> = session.words().iter().map(|w| w.id().clone()).collect();
        let mut original: Vec<_> = lesson.words().iter().map(|w| w.id().clone()).collect();
        queued.sort();
        original.sort();
        assert_eq!(queued, original);
    }

    #[test]
    fn displayed_word_follows_sub_item() {
        let (mut session, mut progress) = enter(3);
        assert_eq!(session.advance_sub_item(&mut progress), SubItemStep::Show);
        assert_eq!(session.current_word().unwrap().text(), "word 1");
        let view = session.sub_item_view().unwrap();
        assert_eq!(view.sub_item, 2);
        assert_eq!(view.total, 3);
        assert_eq!(view.remaining, 1);
        assert!(view.previous_enabled);
    }

    #[test]
    fn retreat_at_first_word_is_noop() {
        let (mut session, mut progress) = enter(3);
        assert_eq!(session.retreat_sub_item(&mut progress), SubItemStep::Ignored);
        assert_eq!(session.sub_item(), 1);
        assert_eq!(progress.current_attempt(LessonIndex::new(0)), 0);
    }

    #[test]
    fn retreat_steps_attempt_back() {
        let (mut session, mut progress) = enter(3);
        session.advance_sub_item(&mut progress);
        session.advance_sub_item(&mut progress);
        assert_eq!(progress.current_attempt(LessonIndex::new(0)), 2);

        assert_eq!(session.retreat_sub_item(&mut progress), SubItemStep::Show);
        assert_eq!(session.sub_item(), 2);
        assert_eq!(progress.current_attempt(LessonIndex::new(0)), 1);
        assert_eq!(session.remaining(), &[] as &[usize]);
    }

    #[test]
    fn passing_last_word_enters_pipeline_and_commits() {
        let (mut session, mut progress) = enter(3);
        session.advance_sub_item(&mut progress);
        session.advance_sub_item(&mut progress);
        assert_eq!(session.sub_item(), 3);

        let step = session.advance_sub_item(&mut progress);
        assert_eq!(step, SubItemStep::PipelineReady { new_best: Some(3) });
        assert_eq!(session.phase(), SessionPhase::MiniGamePipeline);
        assert_eq!(session.sub_item(), 3);
        assert_eq!(progress.best_saved(LessonIndex::new(0)), 3);
        assert!(session.sub_item_view().is_none());

        assert_eq!(session.advance_sub_item(&mut progress), SubItemStep::Ignored);
        assert_eq!(session.retreat_sub_item(&mut progress), SubItemStep::Ignored);
    }

    #[test]
    fn completion_does_not_lower_a_higher_best() {
        let (mut session, mut progress) = enter(1);
        progress.commit(LessonIndex::new(0), 5);
        let step = session.advance_sub_item(&mut progress);
        assert_eq!(step, SubItemStep::PipelineReady { new_best: None });
        assert_eq!(progress.best_saved(LessonIndex::new(0)), 5);
    }

    #[test]
    fn truncating_stage_replaces_visible_total() {
        let (mut session, _) = enter(4);
        session.mark_stage_dispatched(None);
        assert_eq!(session.total(), 4);
        session.mark_stage_dispatched(Some(2));
        assert_eq!(session.total(), 2);
        assert_eq!(session.pipeline_position(), 2);
    }
}
