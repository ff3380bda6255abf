//! Random streams.
//!
//! Every random-consuming operation takes an explicit `Option<u64>` seed and
//! builds its own stream here; nothing draws from process-global state except
//! the unseeded fallback, which seeds a fresh stream from the thread-local
//! entropy generator.

use crate::error::DomainError;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seed offset between consecutive policies of one experiment.
///
/// Policies `i` and `j` of experiments with base seeds `s` and `t` share a
/// stream whenever `s + 1000 * i == t + 1000 * j`, so base seeds closer than
/// 1000 apart collide once enough policies are compared.
pub const POLICY_SEED_STRIDE: u64 = 1000;

/// Random stream used by the simulator and the bootstrap.
pub type Stream = ChaCha8Rng;

/// Builds a stream from an optional seed.
///
/// `Some(seed)` is fully reproducible; `None` is not.
#[must_use]
pub fn stream(seed: Option<u64>) -> Stream {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    }
}

/// Seed of the policy at `index` in an experiment seeded with `base`.
///
/// Computes `base + 1000 * index`; an unseeded experiment stays unseeded.
///
/// # Errors
///
/// Returns [`DomainError::SeedOverflow`] when the sum does not fit in a `u64`.
pub fn policy_seed(base: Option<u64>, index: usize) -> Result<Option<u64>, DomainError> {
    let Some(base) = base else {
        return Ok(None);
    };
    u64::try_from(index)
        .ok()
        .and_then(|i| i.checked_mul(POLICY_SEED_STRIDE))
        .and_then(|offset| base.checked_add(offset))
        .map(Some)
        .ok_or(DomainError::SeedOverflow { base, index })
}
