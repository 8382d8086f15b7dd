//! Probe sampling for tripped keys.

use rand::Rng;

/// Decides whether a call against a tripped key runs as a probe.
pub trait ProbeSampler: Send + Sync {
    /// Return true with the given probability.
    fn sample(&self, probability: f64) -> bool;
}

/// Uniform sampling from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSampler;

impl ProbeSampler for RandomSampler {
    fn sample(&self, probability: f64) -> bool {
        // NaN and non-positive values never sample; gen_bool panics outside [0, 1].
        if !(probability > 0.0) {
            return false;
        }
        rand::thread_rng().gen_bool(probability.min(1.0))
    }
}

impl<F> ProbeSampler for F
where
    F: Fn(f64) -> bool + Send + Sync,
{
    fn sample(&self, probability: f64) -> bool {
        self(probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_sampler_bounds() {
        let sampler = RandomSampler;
        assert!((0..100).all(|_| sampler.sample(1.0)));
        assert!((0..100).all(|_| !sampler.sample(0.0)));
        assert!(!sampler.sample(f64::NAN));
        assert!(sampler.sample(7.0));
    }

    #[test]
    fn test_random_sampler_rate() {
        let sampler = RandomSampler;
        let trials = 100_000;
        let hits = (0..trials).filter(|_| sampler.sample(0.01)).count();
        let rate = hits as f64 / trials as f64;
        assert!((0.007..0.013).contains(&rate), "rate {rate}");
    }

    #[test]
    fn test_closure_sampler() {
        let always = |_: f64| true;
        assert!(always.sample(0.0));
    }
}
