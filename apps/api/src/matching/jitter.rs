use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Where score jitter draws its randomness from.
///
/// Jitter spreads otherwise-identical percentages across near-ties, but it
/// has to be controllable: `Disabled` keeps ranking fully deterministic (used
/// by every test), `Seeded` reproduces a specific run, `Entropy` is the
/// production setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jitter {
    Disabled,
    Seeded(u64),
    Entropy,
}

impl Jitter {
    /// A fresh per-request sampler. Each request gets its own RNG so
    /// concurrent requests never contend on shared state.
    pub fn sampler(&self) -> JitterSampler {
        let rng = match self {
            Jitter::Disabled => None,
            Jitter::Seeded(seed) => Some(StdRng::seed_from_u64(*seed)),
            Jitter::Entropy => Some(StdRng::from_entropy()),
        };
        JitterSampler { rng }
    }
}

/// Per-request jitter source handed to the rankers.
pub struct JitterSampler {
    rng: Option<StdRng>,
}

impl JitterSampler {
    /// Uniform offset in `[-half_range, +half_range]`; 0.0 when disabled.
    pub fn symmetric(&mut self, half_range: f64) -> f64 {
        match &mut self.rng {
            Some(rng) => rng.gen_range(-half_range..=half_range),
            None => 0.0,
        }
    }

    /// Uniform value in `[0, max)`; 0.0 when disabled.
    pub fn uniform(&mut self, max: f64) -> f64 {
        match &mut self.rng {
            Some(rng) => rng.gen_range(0.0..max),
            None => 0.0,
        }
    }
}
