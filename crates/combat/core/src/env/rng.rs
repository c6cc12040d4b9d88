//! Seeded randomness for damage rolls.
//!
//! Every roll is a pure function of its seed, so a cast replayed with the same
//! cast seed, nonce and target produces the same damage.
//!
//! # Determinism
//!
//! Implementations must not keep hidden state between calls: given the same
//! seed they return the same value. The engine derives one seed per roll with
//! [`compute_seed`] and never reuses it within a cast.

/// Deterministic random source.
///
/// Implementations must be deterministic and produce the same values given
/// the same seed. The trait is object safe; the engine reaches it through
/// `&dyn RngOracle` in the cast environment.
pub trait RngOracle: Send + Sync {
    /// Produces a pseudo-random value from `seed`.
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform value in `[min, max]` inclusive. Returns `min` when the range
    /// is empty or inverted.
    ///
    /// The span is computed in 64-bit arithmetic, so the full `i32` range is
    /// accepted without overflow.
    fn range(&self, seed: u64, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        let span = (i64::from(max) - i64::from(min) + 1) as u64;
        let offset = u64::from(self.next_u32(seed)) % span;
        (i64::from(min) + offset as i64) as i32
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// This is the PCG-XSH-RR variant: 64-bit LCG state, 32-bit permuted output.
/// Each call performs a single step from the given seed, so the generator
/// itself carries no state.
///
/// # Properties
///
/// - **Deterministic**: same seed, same output
/// - **Fast**: one multiply, one xorshift and one rotate
/// - **Stateless**: the seed is the whole state
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Advances the LCG state: `state' = state * MULTIPLIER + INCREMENT (mod 2^64)`.
    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation: xorshift the high bits, then rotate by the
    /// top five bits of the state.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Mixes the cast inputs into a roll seed.
///
/// Combines every input that distinguishes one roll from another, so two
/// creatures hit by the same area cast, or the same creature hit by two
/// casts, never share a seed.
///
/// # Arguments
///
/// * `cast_seed` - server seed for this resolution
/// * `nonce` - cast sequence number
/// * `subject` - creature the roll is for
/// * `context` - distinguishes several rolls for the same subject
///
/// # Context Values
///
/// The engine passes the index of the roll within the cast: `0` for the first
/// target rolled, `1` for the second, and so on.
pub fn compute_seed(cast_seed: u64, nonce: u64, subject: u32, context: u32) -> u64 {
    let mut hash = cast_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(subject).wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(context).wrapping_mul(0x85ebca6b);

    // avalanche
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}
