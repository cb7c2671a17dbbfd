//! Uniform random selection

use super::{LoadBalanceAlgorithm, no_instances};
use crate::{Result, ServiceInstance};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

/// Picks each candidate with probability 1/n
///
/// The default source is the per-thread generator, so concurrent callers
/// never contend. A seeded algorithm shares one generator behind a mutex.
#[derive(Debug, Default)]
pub struct RandomAlgorithm {
    seeded: Option<Mutex<StdRng>>,
}

impl RandomAlgorithm {
    /// Create an algorithm backed by the thread-local generator
    pub fn new() -> Self {
        Self { seeded: None }
    }

    /// Create an algorithm with a deterministic generator
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seeded: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    fn next_index(&self, len: usize) -> usize {
        match &self.seeded {
            Some(rng) => rng.lock().random_range(0..len),
            None => rand::rng().random_range(0..len),
        }
    }
}

impl LoadBalanceAlgorithm for RandomAlgorithm {
    fn choose<'a>(&self, instances: &'a [ServiceInstance]) -> Result<&'a ServiceInstance> {
        if instances.is_empty() {
            return Err(no_instances());
        }

        let index = self.next_index(instances.len());
        trace!("Random selection picked index {} of {}", index, instances.len());

        Ok(&instances[index])
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HostAndPort;
    use std::sync::Arc;

    fn instances(count: u16) -> Vec<ServiceInstance> {
        (1..=count)
            .map(|port| {
                ServiceInstance::new("Foo", HostAndPort::from_parts("server", port), None).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_empty_is_rejected() {
        let err = RandomAlgorithm::new().choose(&[]).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_single_instance() {
        let algorithm = RandomAlgorithm::new();
        let candidates = instances(1);
        for _ in 0..100 {
            assert_eq!(algorithm.choose(&candidates).unwrap(), &candidates[0]);
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let candidates = instances(10);
        let first = RandomAlgorithm::with_seed(42);
        let second = RandomAlgorithm::with_seed(42);

        for _ in 0..1_000 {
            assert_eq!(
                first.choose(&candidates).unwrap().port(),
                second.choose(&candidates).unwrap().port()
            );
        }
    }

    #[test]
    fn test_seeded_covers_all_candidates() {
        let algorithm = RandomAlgorithm::with_seed(7);
        let candidates = instances(5);
        let mut seen = [false; 5];

        for _ in 0..1_000 {
            let port = algorithm.choose(&candidates).unwrap().port();
            seen[usize::from(port) - 1] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_concurrent_choose() {
        let algorithm = Arc::new(RandomAlgorithm::new());
        let candidates = Arc::new(instances(10));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let algorithm = Arc::clone(&algorithm);
                let candidates = Arc::clone(&candidates);
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        let chosen = algorithm.choose(&candidates).unwrap();
                        assert!((1..=10).contains(&chosen.port()));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_name() {
        assert_eq!(RandomAlgorithm::new().name(), "random");
    }
}
