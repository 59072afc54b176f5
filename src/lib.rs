//! slide-rlnc: sliding-window random linear network coding.
//!
//! # Overview
//!
//! An encoder and a decoder cooperate to move an unbounded stream of
//! fixed-size symbols across a lossy channel. The encoder emits random linear
//! combinations of the symbols inside a caller-chosen window (or plain source
//! symbols); the decoder runs incremental Gaussian elimination and recovers
//! source symbols as soon as enough independent combinations have arrived.
//!
//! Both sides hold a *stream* of symbol slots with monotonically increasing
//! indices. Callers push new symbols at the front, pop old ones at the back,
//! and select a *window* of the stream for every coding round.
//!
//! # Module Structure
//!
//! - [`field`]: GF(2), GF(16), GF(256) and GF(65536) arithmetic on packed buffers
//! - [`coefficients`]: seeded, deterministic coefficient generation
//! - [`stream`]: ring-backed stream of symbol slots and the coding window
//! - [`encoder`]: builds coded and systematic symbols from a window
//! - [`decoder`]: incremental elimination state over the decoder stream
//! - [`factory`]: configuration holders and runtime field dispatch
//! - [`config`]: codec configuration, validation and layered loading
//! - [`error`]: error types
//! - [`util`]: deterministic RNG
//!
//! # Example
//!
//! ```
//! use slide_rlnc::{DecoderFactory, EncoderFactory, Field};
//!
//! let source: Vec<Vec<u8>> = (0..4u8).map(|i| vec![i; 16]).collect();
//! let mut decoded = vec![vec![0u8; 16]; 4];
//!
//! let mut encoder = EncoderFactory::new(Field::Binary8, 16).build().unwrap();
//! let mut decoder = DecoderFactory::new(Field::Binary8, 16).build().unwrap();
//!
//! for (src, dst) in source.iter().zip(decoded.iter_mut()) {
//!     encoder.push_front_symbol(src);
//!     decoder.push_front_symbol(dst);
//! }
//! encoder.set_window(0, 4);
//! decoder.set_window(0, 4);
//!
//! let mut coefficients = vec![0u8; encoder.coefficient_vector_size()];
//! let mut symbol = vec![0u8; 16];
//! let mut seed = 0;
//! while !decoder.is_complete() {
//!     encoder.set_seed(seed);
//!     encoder.generate(&mut coefficients);
//!     encoder.write_symbol(&mut symbol, &coefficients);
//!     decoder.read_symbol(&mut symbol, &coefficients);
//!     seed += 1;
//! }
//! assert_eq!(decoder.symbols_decoded(), 4);
//! drop(decoder);
//! assert_eq!(decoded, source);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]

pub mod coefficients;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod factory;
pub mod field;
pub mod stream;
pub mod tracing_compat;
pub mod util;

#[cfg(test)]
pub(crate) mod test_utils;

pub use coefficients::CoefficientGenerator;
pub use config::{CodecConfig, ConfigError, ConfigLoader};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{Error, ErrorCategory, ErrorKind, Result};
pub use factory::{AnyDecoder, AnyEncoder, DecoderFactory, EncoderFactory};
pub use field::{Binary, Binary16, Binary4, Binary8, Field, FiniteField};
pub use stream::{Stream, Window};
