use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Source of word-queue shuffles, swappable for deterministic runs and tests.
#[derive(Debug, Clone, Default)]
pub enum Shuffler {
    #[default]
    Random,
    Seeded(StdRng),
    /// Keeps dataset order.
    Disabled,
}

impl Shuffler {
    /// Returns a shuffler backed by the thread-local generator.
    #[must_use]
    pub fn random() -> Self {
        Self::Random
    }

    /// Returns a shuffler that replays the same sequence for the same seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::Seeded(StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self::Disabled
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        match self {
            Shuffler::Random => items.shuffle(&mut rand::rng()),
            Shuffler::Seeded(rng) => items.shuffle(rng),
            Shuffler::Disabled => {}
        }
    }

    /// A shuffled copy of `items`.
    pub fn shuffled<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut copy = items.to_vec();
        self.shuffle(&mut copy);
        copy
    }
}
