//! Seeded coefficient generation.
//!
//! Encoder and decoder derive identical coefficient vectors from a shared
//! seed, so only the seed has to cross the channel on the coded path. The
//! output is a pure function of `(seed, symbols, field)`:
//!
//! 1. start a [`DetRng`] at `mix_seed(seed)`;
//! 2. for each element, take the high 32 bits of the next draw, masked to the
//!    field's element width;
//! 3. if every element came out zero, draw the whole vector again from the
//!    same, continuing generator.
//!
//! Step 3 makes the all-zero vector impossible. It only ever triggers for
//! tiny windows (in GF(2) a single-symbol window has a 1 in 2 chance per
//! draw).

use crate::field::FiniteField;
use crate::util::DetRng;

/// Deterministic coefficient vector generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoefficientGenerator {
    seed: u64,
}

impl CoefficientGenerator {
    /// Creates a generator with the given seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Replaces the seed used by subsequent [`generate`](Self::generate) calls.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Returns the current seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Fills `out` with `symbols` packed coefficients of field `F`.
    ///
    /// Bytes of `out` past the packed length are left untouched; padding bits
    /// inside the last byte are zero.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than `F::elements_to_bytes(symbols)`.
    pub fn generate<F: FiniteField>(&self, out: &mut [u8], symbols: usize) {
        let bytes = F::elements_to_bytes(symbols);
        assert!(
            out.len() >= bytes,
            "coefficient buffer too small: {} < {bytes}",
            out.len()
        );
        let out = &mut out[..bytes];
        if symbols == 0 {
            return;
        }

        let mut rng = DetRng::from_seed(self.seed);
        loop {
            out.fill(0);
            let mut any_nonzero = false;
            for j in 0..symbols {
                let value = (rng.next_u64() >> 32) as u16 & F::MAX_VALUE;
                any_nonzero |= value != 0;
                F::set_value(out, j, value);
            }
            if any_nonzero {
                return;
            }
        }
    }
}
