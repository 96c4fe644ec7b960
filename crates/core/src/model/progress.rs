/// Per-lesson progress counters.
///
/// `current_attempt` counts sub-items advanced through in the ongoing visit;
/// `best_saved` is the high-water mark and never goes down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressRecord {
    current_attempt: u32,
    best_saved: u32,
}

impl ProgressRecord {
    /// Rehydrate a record whose best value came from a host store.
    #[must_use]
    pub fn from_persisted(best_saved: u32) -> Self {
        Self {
            current_attempt: 0,
            best_saved,
        }
    }

    #[must_use]
    pub fn current_attempt(&self) -> u32 {
        self.current_attempt
    }

    #[must_use]
    pub fn best_saved(&self) -> u32 {
        self.best_saved
    }

    /// Start a fresh visit of the lesson.
    pub fn reset_attempt(&mut self) {
        self.current_attempt = 0;
    }

    pub fn increment_attempt(&mut self) {
        self.current_attempt = self.current_attempt.saturating_add(1);
    }

    /// Step the attempt back, stopping at zero.
    pub fn decrement_attempt(&mut self) {
        self.current_attempt = self.current_attempt.saturating_sub(1);
    }

    /// Raise `best_saved` to `attempt` if it is higher. Returns whether it moved.
    pub fn ratchet(&mut self, attempt: u32) -> bool {
        if attempt > self.best_saved {
            self.best_saved = attempt;
            true
        } else {
            false
        }
    }
}
