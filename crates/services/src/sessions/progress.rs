use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use lang_core::model::{LessonIndex, ProgressRecord};

/// Per-lesson progress for the lifetime of a controller.
///
/// Records are created lazily and zeroed on first reference.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    records: HashMap<LessonIndex, ProgressRecord>,
}

impl ProgressTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record_mut(&mut self, lesson: LessonIndex) -> &mut ProgressRecord {
        self.records.entry(lesson).or_default()
    }

    #[must_use]
    pub fn record(&self, lesson: LessonIndex) -> ProgressRecord {
        self.records.get(&lesson).copied().unwrap_or_default()
    }

    /// Best saved progress for a lesson; 0 if never recorded.
    #[must_use]
    pub fn best_saved(&self, lesson: LessonIndex) -> u32 {
        self.record(lesson).best_saved()
    }

    #[must_use]
    pub fn current_attempt(&self, lesson: LessonIndex) -> u32 {
        self.record(lesson).current_attempt()
    }

    pub fn begin_attempt(&mut self, lesson: LessonIndex) {
        self.record_mut(lesson).reset_attempt();
    }

    pub fn increment_attempt(&mut self, lesson: LessonIndex) {
        self.record_mut(lesson).increment_attempt();
    }

    pub fn decrement_attempt(&mut self, lesson: LessonIndex) {
        self.record_mut(lesson).decrement_attempt();
    }

    /// Raise the best saved value to `attempt` if higher. Returns whether it moved.
    pub fn commit(&mut self, lesson: LessonIndex, attempt: u32) -> bool {
        let raised = self.record_mut(lesson).ratchet(attempt);
        if raised {
            tracing::debug!(%lesson, best = attempt, "saved progress raised");
        }
        raised
    }

    /// Commit the ongoing attempt; returns the new best when it was raised.
    pub fn commit_current(&mut self, lesson: LessonIndex) -> Option<u32> {
        let attempt = self.current_attempt(lesson);
        self.commit(lesson, attempt).then_some(attempt)
    }

    /// Merge a best value loaded from a host store.
    pub fn seed(&mut self, lesson: LessonIndex, best: u32) {
        match self.records.entry(lesson) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().ratchet(best);
            }
            Entry::Vacant(entry) => {
                entry.insert(ProgressRecord::from_persisted(best));
            }
        }
    }

    /// Best values of every lesson seen so far, ordered by index.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<LessonIndex, u32> {
        self.records
            .iter()
            .map(|(lesson, record)| (*lesson, record.best_saved()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_lessons_default_to_zero() {
        let tracker = ProgressTracker::new();
        assert_eq!(tracker.best_saved(LessonIndex::new(42)), 0);
        assert_eq!(tracker.current_attempt(LessonIndex::new(42)), 0);
        assert!(tracker.snapshot().is_empty());
    }

    #[test]
    fn best_saved_never_decreases() {
        let mut tracker = ProgressTracker::new();
        let lesson = LessonIndex::new(1);
        let mut previous = 0;
        for attempt in [3, 1, 0, 7, 7, 2, 9, 4, 0, 12, 5] {
            tracker.commit(lesson, attempt);
            let best = tracker.best_saved(lesson);
            assert!(best >= previous);
            assert!(best >= attempt);
            previous = best;
        }
        assert_eq!(tracker.best_saved(lesson), 12);
    }

    #[test]
    fn commit_current_reports_only_raises() {
        let mut tracker = ProgressTracker::new();
        let lesson = LessonIndex::new(0);
        tracker.begin_attempt(lesson);
        tracker.increment_attempt(lesson);
        tracker.increment_attempt(lesson);
        assert_eq!(tracker.commit_current(lesson), Some(2));

        tracker.begin_attempt(lesson);
        tracker.increment_attempt(lesson);
        assert_eq!(tracker.commit_current(lesson), None);
        assert_eq!(tracker.best_saved(lesson), 2);
    }

    #[test]
    fn attempts_are_per_lesson() {
        let mut tracker = ProgressTracker::new();
        tracker.increment_attempt(LessonIndex::new(0));
        tracker.decrement_attempt(LessonIndex::new(1));
        assert_eq!(tracker.current_attempt(LessonIndex::new(0)), 1);
        assert_eq!(tracker.current_attempt(LessonIndex::new(1)), 0);
    }

    #[test]
    fn seeding_uses_ratchet() {
        let mut tracker = ProgressTracker::new();
        tracker.commit(LessonIndex::new(0), 5);
        tracker.seed(LessonIndex::new(0), 3);
        tracker.seed(LessonIndex::new(1), 4);
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.get(&LessonIndex::new(0)), Some(&5));
        assert_eq!(snapshot.get(&LessonIndex::new(1)), Some(&4));
    }
}
