//! Encoder and decoder factories with runtime field dispatch.
//!
//! A factory is a configuration holder. [`EncoderFactory::build`] and
//! [`DecoderFactory::build`] validate the configuration and pick the
//! field-specific implementation once, returning an [`AnyEncoder`] /
//! [`AnyDecoder`] that forwards every operation. Callers that know the field
//! at compile time use `build_typed` and skip the dispatch entirely.
//!
//! Changing a factory only affects instances built afterwards.

use crate::config::CodecConfig;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{Error, ErrorKind, Result};
use crate::field::{Binary, Binary16, Binary4, Binary8, Field, FiniteField};
use crate::stream::Window;

/// Shared configuration accessors of both factories.
macro_rules! factory_accessors {
    ($factory:ident) => {
        impl $factory {
            /// Creates a factory for `field` and `symbol_size` with the default
            /// stream capacity.
            #[must_use]
            pub const fn new(field: Field, symbol_size: usize) -> Self {
                Self {
                    config: CodecConfig::new(field, symbol_size),
                }
            }

            /// Creates a factory from a complete configuration.
            #[must_use]
            pub const fn from_config(config: CodecConfig) -> Self {
                Self { config }
            }

            /// The configured finite field.
            #[must_use]
            pub const fn field(&self) -> Field {
                self.config.field
            }

            /// Sets the finite field for subsequently built instances.
            pub fn set_field(&mut self, field: Field) {
                self.config.field = field;
            }

            /// The configured symbol size in bytes.
            #[must_use]
            pub const fn symbol_size(&self) -> usize {
                self.config.symbol_size
            }

            /// Sets the symbol size for subsequently built instances.
            pub fn set_symbol_size(&mut self, symbol_size: usize) {
                self.config.symbol_size = symbol_size;
            }

            /// The configured stream capacity.
            #[must_use]
            pub const fn stream_capacity(&self) -> usize {
                self.config.stream_capacity
            }

            /// Sets the stream capacity for subsequently built instances.
            pub fn set_stream_capacity(&mut self, stream_capacity: usize) {
                self.config.stream_capacity = stream_capacity;
            }

            /// The full configuration.
            #[must_use]
            pub const fn config(&self) -> &CodecConfig {
                &self.config
            }

            fn check_field<F: FiniteField>(&self) -> Result<()> {
                self.config.validate()?;
                if F::FIELD == self.config.field {
                    Ok(())
                } else {
                    Err(Error::new(ErrorKind::FieldMismatch).with_message(format!(
                        "factory configured for {}, requested {}",
                        self.config.field,
                        F::FIELD
                    )))
                }
            }
        }
    };
}

/// Evaluates `$body` with `$inner` bound to the field-specific instance.
macro_rules! dispatch {
    ($any:expr, $inner:ident => $body:expr) => {
        match $any {
            Self::Binary($inner) => $body,
            Self::Binary4($inner) => $body,
            Self::Binary8($inner) => $body,
            Self::Binary16($inner) => $body,
        }
    };
}

/// Methods present with identical signatures on encoder and decoder.
macro_rules! common_forwarding {
    () => {
        /// The finite field of the wrapped instance.
        #[must_use]
        pub const fn field(&self) -> Field {
            dispatch!(self, inner => inner.field())
        }

        /// Size of every symbol in bytes.
        #[must_use]
        pub const fn symbol_size(&self) -> usize {
            dispatch!(self, inner => inner.symbol_size())
        }

        /// Number of symbols currently in the stream.
        #[must_use]
        pub const fn stream_symbols(&self) -> usize {
            dispatch!(self, inner => inner.stream_symbols())
        }

        /// Index of the oldest symbol in the stream.
        #[must_use]
        pub const fn stream_lower_bound(&self) -> u64 {
            dispatch!(self, inner => inner.stream_lower_bound())
        }

        /// Index the next pushed symbol will receive.
        #[must_use]
        pub const fn stream_upper_bound(&self) -> u64 {
            dispatch!(self, inner => inner.stream_upper_bound())
        }

        /// Maximum number of symbols the stream can hold.
        #[must_use]
        pub fn stream_capacity(&self) -> usize {
            dispatch!(self, inner => inner.stream_capacity())
        }

        /// Removes the oldest symbol from the stream and returns its index.
        pub fn pop_back_symbol(&mut self) -> u64 {
            dispatch!(self, inner => inner.pop_back_symbol())
        }

        /// Number of symbols in the window.
        #[must_use]
        pub const fn window_symbols(&self) -> usize {
            dispatch!(self, inner => inner.window_symbols())
        }

        /// First index of the window.
        #[must_use]
        pub const fn window_lower_bound(&self) -> u64 {
            dispatch!(self, inner => inner.window_lower_bound())
        }

        /// One past the last index of the window.
        #[must_use]
        pub const fn window_upper_bound(&self) -> u64 {
            dispatch!(self, inner => inner.window_upper_bound())
        }

        /// The current window.
        #[must_use]
        pub const fn window(&self) -> Window {
            dispatch!(self, inner => inner.window())
        }

        /// Selects the symbols taking part in the next coding operations.
        pub fn set_window(&mut self, lower_bound: u64, symbols: usize) {
            dispatch!(self, inner => inner.set_window(lower_bound, symbols));
        }

        /// Bytes needed for a coefficient vector over the current window.
        #[must_use]
        pub const fn coefficient_vector_size(&self) -> usize {
            dispatch!(self, inner => inner.coefficient_vector_size())
        }

        /// Sets the coefficient seed.
        pub fn set_seed(&mut self, seed: u64) {
            dispatch!(self, inner => inner.set_seed(seed));
        }

        /// The current coefficient seed.
        #[must_use]
        pub const fn seed(&self) -> u64 {
            dispatch!(self, inner => inner.seed())
        }

        /// Fills `coefficients` with the seeded vector for the current window.
        pub fn generate(&self, coefficients: &mut [u8]) {
            dispatch!(self, inner => inner.generate(coefficients));
        }
    };
}

// ============================================================================
// Encoder side
// ============================================================================

/// Builds encoders from a [`CodecConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncoderFactory {
    config: CodecConfig,
}

factory_accessors!(EncoderFactory);

impl EncoderFactory {
    /// Builds an encoder for the configured field.
    pub fn build<'a>(&self) -> Result<AnyEncoder<'a>> {
        self.config.validate()?;
        let CodecConfig {
            field,
            symbol_size,
            stream_capacity,
        } = self.config;
        Ok(match field {
            Field::Binary => AnyEncoder::Binary(Encoder::new(symbol_size, stream_capacity)),
            Field::Binary4 => AnyEncoder::Binary4(Encoder::new(symbol_size, stream_capacity)),
            Field::Binary8 => AnyEncoder::Binary8(Encoder::new(symbol_size, stream_capacity)),
            Field::Binary16 => AnyEncoder::Binary16(Encoder::new(symbol_size, stream_capacity)),
        })
    }

    /// Builds an encoder for field `F`, which must be the configured field.
    pub fn build_typed<'a, F: FiniteField>(&self) -> Result<Encoder<'a, F>> {
        self.check_field::<F>()?;
        Ok(Encoder::new(
            self.config.symbol_size,
            self.config.stream_capacity,
        ))
    }

    /// Resets `encoder` to a freshly built instance of this configuration,
    /// releasing every symbol it borrowed.
    ///
    /// On error `encoder` is left unchanged.
    pub fn initialize<'a>(&self, encoder: &mut AnyEncoder<'a>) -> Result<()> {
        *encoder = self.build()?;
        Ok(())
    }
}

/// An encoder over any supported field.
#[derive(Debug)]
pub enum AnyEncoder<'a> {
    /// GF(2) encoder.
    Binary(Encoder<'a, Binary>),
    /// GF(2^4) encoder.
    Binary4(Encoder<'a, Binary4>),
    /// GF(2^8) encoder.
    Binary8(Encoder<'a, Binary8>),
    /// GF(2^16) encoder.
    Binary16(Encoder<'a, Binary16>),
}

impl<'a> AnyEncoder<'a> {
    common_forwarding!();

    /// Adds a source symbol at the front of the stream and returns its index.
    pub fn push_front_symbol(&mut self, symbol: &'a [u8]) -> u64 {
        dispatch!(self, inner => inner.push_front_symbol(symbol))
    }

    /// Writes the linear combination of the window symbols into `symbol`.
    pub fn write_symbol(&self, symbol: &mut [u8], coefficients: &[u8]) {
        dispatch!(self, inner => inner.write_symbol(symbol, coefficients));
    }

    /// Copies the source symbol at `index` into `symbol`.
    pub fn write_source_symbol(&self, symbol: &mut [u8], index: u64) {
        dispatch!(self, inner => inner.write_source_symbol(symbol, index));
    }
}

// ============================================================================
// Decoder side
// ============================================================================

/// Builds decoders from a [`CodecConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderFactory {
    config: CodecConfig,
}

factory_accessors!(DecoderFactory);

impl DecoderFactory {
    /// Builds a decoder for the configured field.
    pub fn build<'a>(&self) -> Result<AnyDecoder<'a>> {
        self.config.validate()?;
        let CodecConfig {
            field,
            symbol_size,
            stream_capacity,
        } = self.config;
        Ok(match field {
            Field::Binary => AnyDecoder::Binary(Decoder::new(symbol_size, stream_capacity)),
            Field::Binary4 => AnyDecoder::Binary4(Decoder::new(symbol_size, stream_capacity)),
            Field::Binary8 => AnyDecoder::Binary8(Decoder::new(symbol_size, stream_capacity)),
            Field::Binary16 => AnyDecoder::Binary16(Decoder::new(symbol_size, stream_capacity)),
        })
    }

    /// Builds a decoder for field `F`, which must be the configured field.
    pub fn build_typed<'a, F: FiniteField>(&self) -> Result<Decoder<'a, F>> {
        self.check_field::<F>()?;
        Ok(Decoder::new(
            self.config.symbol_size,
            self.config.stream_capacity,
        ))
    }

    /// Resets `decoder` to a freshly built instance of this configuration,
    /// dropping all elimination state and releasing every borrowed buffer.
    ///
    /// On error `decoder` is left unchanged.
    pub fn initialize<'a>(&self, decoder: &mut AnyDecoder<'a>) -> Result<()> {
        *decoder = self.build()?;
        Ok(())
    }
}

/// A decoder over any supported field.
#[derive(Debug)]
pub enum AnyDecoder<'a> {
    /// GF(2) decoder.
    Binary(Decoder<'a, Binary>),
    /// GF(2^4) decoder.
    Binary4(Decoder<'a, Binary4>),
    /// GF(2^8) decoder.
    Binary8(Decoder<'a, Binary8>),
    /// GF(2^16) decoder.
    Binary16(Decoder<'a, Binary16>),
}

impl<'a> AnyDecoder<'a> {
    common_forwarding!();

    /// Adds a slot backed by `symbol` and returns its index.
    pub fn push_front_symbol(&mut self, symbol: &'a mut [u8]) -> u64 {
        dispatch!(self, inner => inner.push_front_symbol(symbol))
    }

    /// Applies a coded symbol whose coefficients refer to the current window.
    pub fn read_symbol(&mut self, symbol: &mut [u8], coefficients: &[u8]) {
        dispatch!(self, inner => inner.read_symbol(symbol, coefficients));
    }

    /// Applies the source symbol at `index`.
    pub fn read_source_symbol(&mut self, symbol: &mut [u8], index: u64) {
        dispatch!(self, inner => inner.read_source_symbol(symbol, index));
    }

    /// Number of pivots established.
    #[must_use]
    pub const fn rank(&self) -> usize {
        dispatch!(self, inner => inner.rank())
    }

    /// Number of slots holding their source symbol.
    #[must_use]
    pub const fn symbols_decoded(&self) -> usize {
        dispatch!(self, inner => inner.symbols_decoded())
    }

    /// Number of slots holding a row that still depends on other slots.
    #[must_use]
    pub const fn symbols_partially_decoded(&self) -> usize {
        dispatch!(self, inner => inner.symbols_partially_decoded())
    }

    /// Number of slots without a row.
    #[must_use]
    pub const fn symbols_missing(&self) -> usize {
        dispatch!(self, inner => inner.symbols_missing())
    }

    /// Returns true once every live slot holds its source symbol.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        dispatch!(self, inner => inner.is_complete())
    }

    /// Returns true if the slot at `index` holds its source symbol.
    #[must_use]
    pub fn is_symbol_decoded(&self, index: u64) -> bool {
        dispatch!(self, inner => inner.is_symbol_decoded(index))
    }

    /// Returns true if the slot at `index` holds a row.
    #[must_use]
    pub fn is_symbol_pivot(&self, index: u64) -> bool {
        dispatch!(self, inner => inner.is_symbol_pivot(index))
    }

    /// The payload currently stored in the slot at `index`.
    #[must_use]
    pub fn symbol(&self, index: u64) -> &[u8] {
        dispatch!(self, inner => inner.symbol(index))
    }
}

macro_rules! any_from_typed {
    ($any:ident, $typed:ident, $($variant:ident),+) => {
        $(
            impl<'a> From<$typed<'a, $variant>> for $any<'a> {
                fn from(inner: $typed<'a, $variant>) -> Self {
                    Self::$variant(inner)
                }
            }
        )+
    };
}

any_from_typed!(AnyEncoder, Encoder, Binary, Binary4, Binary8, Binary16);
any_from_typed!(AnyDecoder, Decoder, Binary, Binary4, Binary8, Binary16);
