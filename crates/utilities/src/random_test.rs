use std::env;

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Runs the given test function for the requested number of iterations, each
/// with a generator seeded from a fresh random seed. Every seed is logged so
/// that a failing iteration can be replayed by setting the `FAVIS_TEST_SEED`
/// environment variable, which runs a single iteration with exactly that seed.
pub fn random_test<F>(iterations: usize, mut test: F)
where
    F: FnMut(&mut StdRng),
{
    if let Ok(value) = env::var("FAVIS_TEST_SEED") {
        let seed: u64 = value.parse().expect("FAVIS_TEST_SEED must be an unsigned integer");
        info!("Replaying iteration with seed {seed}");

        let mut rng = StdRng::seed_from_u64(seed);
        test(&mut rng);
        return;
    }

    for _ in 0..iterations {
        let seed: u64 = rand::random();
        info!("Iteration with seed {seed}");

        let mut rng = StdRng::seed_from_u64(seed);
        test(&mut rng);
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_runs_every_iteration() {
        if env::var("FAVIS_TEST_SEED").is_ok() {
            return;
        }

        let mut count = 0;
        random_test(5, |_| {
            count += 1;
        });

        assert_eq!(count, 5);
    }
}
