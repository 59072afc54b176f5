//! Internal utilities.
//!
//! The RNG here defines the coefficient stream shared by encoders and
//! decoders, so its output must be identical on every platform and build.

pub mod det_rng;

pub use det_rng::{mix_seed, DetRng};
