use crate::log::trace;
use rand::{
    distr::uniform::{SampleRange, SampleUniform},
    rngs::StdRng,
    Rng,
    SeedableRng,
};

/// The single pseudorandom source owned by a cohort.
///
/// The generator is seeded from `base_seed` with `StdRng::seed_from_u64`, so two sources built
/// with the same seed produce exactly the same sequence of draws.
pub struct RandomSource {
    base_seed: u64,
    rng: StdRng,
}

impl RandomSource {
    pub fn with_seed(base_seed: u64) -> Self {
        trace!("initializing random source with base seed {base_seed}");
        RandomSource {
            base_seed,
            rng: StdRng::seed_from_u64(base_seed),
        }
    }

    /// Creates a source whose base seed is drawn from the operating system. The seed is
    /// still available from `base_seed()` so that the run can be replayed.
    pub fn from_entropy() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Gets a random sample by applying the specified sampler function to the generator.
    pub fn sample<T>(&mut self, sampler: impl FnOnce(&mut StdRng) -> T) -> T {
        sampler(&mut self.rng)
    }

    /// Gets a random sample within the range provided by `range`. Panics if the range is empty.
    pub fn sample_range<S, T>(&mut self, range: S) -> T
    where
        S: SampleRange<T>,
        T: SampleUniform,
    {
        self.sample(|rng| rng.random_range(range))
    }

    /// Gets a uniform sample from the half-open interval `[0, 1)`.
    pub fn sample_unit(&mut self) -> f64 {
        self.sample(|rng| rng.random::<f64>())
    }
}
