use rand_chacha::ChaChaRng;
use randomness::{SeedableRng, distr::uniform::SampleRange};

pub use randomness::Rng;

pub type TestRng = ChaChaRng;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Seed(pub u64);

impl Seed {
    #[must_use]
    pub fn from_entropy() -> Self {
        Seed(randomness::make_true_rng().random::<u64>())
    }
}

/// Creates a deterministic rng; the seed is printed so a failing test can be reproduced
#[must_use]
pub fn make_seedable_rng(seed: Seed) -> TestRng {
    println!("Test RNG seed: {}", seed.0);
    ChaChaRng::seed_from_u64(seed.0)
}

#[rstest::fixture]
pub fn random_seed() -> Seed {
    Seed::from_entropy()
}

pub fn gen_random_bytes(rng: &mut impl Rng, len_range: impl SampleRange<usize>) -> Vec<u8> {
    let len = rng.random_range(len_range);
    (0..len).map(|_| rng.random::<u8>()).collect()
}
