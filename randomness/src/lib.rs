pub use rand::{CryptoRng, Rng, RngCore, SeedableRng, distr, seq};

#[must_use]
pub fn make_true_rng() -> impl Rng + CryptoRng {
    rand::rng()
}
