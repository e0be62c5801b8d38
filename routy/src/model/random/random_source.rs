use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Mutex;

/// source of randomness injected into the predictor and the policy trainer.
pub trait RandomSource: Send + Sync {
    /// real value uniformly distributed on [min, max). returns min when the
    /// interval is empty.
    fn uniform_real(&self, min: f64, max: f64) -> f64;

    /// integral value uniformly distributed on the closed interval [min, max].
    fn uniform_int(&self, min: i64, max: i64) -> i64;

    /// true with the given probability, clamped to [0, 1].
    fn is_hit(&self, probability: f64) -> bool;
}

/// [`StdRng`]-backed source. a fixed seed reproduces the same stream of draws,
/// advancing by one draw per call.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> SeededRandom {
        SeededRandom {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// source seeded from operating system entropy, for production use.
    pub fn from_entropy() -> SeededRandom {
        SeededRandom {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// seeded when a seed is configured, entropy-seeded otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> SeededRandom {
        match seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // a panic while holding the lock cannot leave the generator invalid
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }
}

impl RandomSource for SeededRandom {
    fn uniform_real(&self, min: f64, max: f64) -> f64 {
        if !(min < max) {
            return min;
        }
        self.with_rng(|rng| rng.random_range(min..max))
    }

    fn uniform_int(&self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        self.with_rng(|rng| rng.random_range(min..=max))
    }

    fn is_hit(&self, probability: f64) -> bool {
        let p = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        self.with_rng(|rng| rng.random_bool(p))
    }
}
