//! Sliding-window encoder.
//!
//! The encoder borrows the caller's source symbols for as long as they are
//! in its stream and never copies them. Coding reads the stream through the
//! current window, so [`Encoder::generate`] and [`Encoder::write_symbol`]
//! take `&self` and can produce several coded symbols from one window
//! snapshot.

use crate::coefficients::CoefficientGenerator;
use crate::field::{Field, FiniteField};
use crate::stream::{Stream, Window};
use crate::tracing_compat::{debug, trace};
use core::marker::PhantomData;

/// Encoder over field `F` for symbols borrowed for `'a`.
#[derive(Debug)]
pub struct Encoder<'a, F: FiniteField> {
    stream: Stream<&'a [u8]>,
    generator: CoefficientGenerator,
    symbol_size: usize,
    _field: PhantomData<F>,
}

impl<'a, F: FiniteField> Encoder<'a, F> {
    /// Creates an encoder with an empty stream. Callers go through
    /// [`EncoderFactory`](crate::EncoderFactory), which validates the sizes.
    pub(crate) fn new(symbol_size: usize, stream_capacity: usize) -> Self {
        debug!(
            field = %F::FIELD,
            symbol_size,
            stream_capacity,
            "encoder built"
        );
        Self {
            stream: Stream::with_capacity(stream_capacity),
            generator: CoefficientGenerator::default(),
            symbol_size,
            _field: PhantomData,
        }
    }

    /// The finite field this encoder codes over.
    #[must_use]
    pub const fn field(&self) -> Field {
        F::FIELD
    }

    /// Size of every symbol in bytes.
    #[must_use]
    pub const fn symbol_size(&self) -> usize {
        self.symbol_size
    }

    /// Number of symbols currently in the stream.
    #[must_use]
    pub const fn stream_symbols(&self) -> usize {
        self.stream.len()
    }

    /// Index of the oldest symbol in the stream.
    #[must_use]
    pub const fn stream_lower_bound(&self) -> u64 {
        self.stream.lower_bound()
    }

    /// Index the next pushed symbol will receive.
    #[must_use]
    pub const fn stream_upper_bound(&self) -> u64 {
        self.stream.upper_bound()
    }

    /// Maximum number of symbols the stream can hold.
    #[must_use]
    pub fn stream_capacity(&self) -> usize {
        self.stream.capacity()
    }

    /// Adds a source symbol at the front of the stream and returns its index.
    ///
    /// # Panics
    ///
    /// Panics if `symbol` is not `symbol_size` bytes or the stream is full.
    pub fn push_front_symbol(&mut self, symbol: &'a [u8]) -> u64 {
        assert_eq!(symbol.len(), self.symbol_size, "source symbol size mismatch");
        let index = self.stream.push_front(symbol);
        trace!(index, "encoder pushed symbol");
        index
    }

    /// Removes the oldest symbol from the stream and returns its index.
    ///
    /// # Panics
    ///
    /// Panics if the stream is empty.
    pub fn pop_back_symbol(&mut self) -> u64 {
        let (index, _) = self.stream.pop_back();
        trace!(index, "encoder popped symbol");
        index
    }

    /// Number of symbols in the window.
    #[must_use]
    pub const fn window_symbols(&self) -> usize {
        self.stream.window().symbols()
    }

    /// First index of the window.
    #[must_use]
    pub const fn window_lower_bound(&self) -> u64 {
        self.stream.window().lower_bound()
    }

    /// One past the last index of the window.
    #[must_use]
    pub const fn window_upper_bound(&self) -> u64 {
        self.stream.window().upper_bound()
    }

    /// The current window.
    #[must_use]
    pub const fn window(&self) -> Window {
        self.stream.window()
    }

    /// Selects the symbols taking part in the next coding operations.
    ///
    /// # Panics
    ///
    /// Panics if the window does not lie inside the stream.
    pub fn set_window(&mut self, lower_bound: u64, symbols: usize) {
        self.stream.set_window(lower_bound, symbols);
    }

    /// Bytes needed for a coefficient vector over the current window.
    #[must_use]
    pub const fn coefficient_vector_size(&self) -> usize {
        F::FIELD.elements_to_bytes(self.window_symbols())
    }

    /// Sets the seed for [`generate`](Self::generate).
    pub fn set_seed(&mut self, seed: u64) {
        self.generator.set_seed(seed);
    }

    /// The current coefficient seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.generator.seed()
    }

    /// Fills `coefficients` with a vector for the current window, derived
    /// from the seed.
    ///
    /// # Panics
    ///
    /// Panics if `coefficients` is not `coefficient_vector_size()` bytes or
    /// the window no longer lies inside the stream.
    pub fn generate(&self, coefficients: &mut [u8]) {
        let window = self.stream.assert_window();
        assert_eq!(
            coefficients.len(),
            self.coefficient_vector_size(),
            "coefficient vector size mismatch"
        );
        self.generator.generate::<F>(coefficients, window.symbols());
    }

    /// Writes the linear combination of the window symbols weighted by
    /// `coefficients` into `symbol`.
    ///
    /// # Panics
    ///
    /// Panics on a size mismatch of either buffer or a stale window.
    pub fn write_symbol(&self, symbol: &mut [u8], coefficients: &[u8]) {
        let window = self.stream.assert_window();
        assert_eq!(symbol.len(), self.symbol_size, "coded symbol size mismatch");
        assert_eq!(
            coefficients.len(),
            self.coefficient_vector_size(),
            "coefficient vector size mismatch"
        );

        symbol.fill(0);
        for (j, index) in window.indices().enumerate() {
            let c = F::get_value(coefficients, j);
            if c == 0 {
                continue;
            }
            let source = self.source(index);
            F::vector_multiply_add(symbol, source, c);
        }
        trace!(window = %window, "encoder wrote coded symbol");
    }

    /// Copies the source symbol at `index` into `symbol` (systematic path).
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the stream or `symbol` has the wrong size.
    pub fn write_source_symbol(&self, symbol: &mut [u8], index: u64) {
        assert_eq!(symbol.len(), self.symbol_size, "source symbol size mismatch");
        symbol.copy_from_slice(self.source(index));
        trace!(index, "encoder wrote source symbol");
    }

    fn source(&self, index: u64) -> &'a [u8] {
        match self.stream.get(index) {
            Some(symbol) => *symbol,
            None => panic!(
                "symbol {index} outside stream [{}, {})",
                self.stream.lower_bound(),
                self.stream.upper_bound()
            ),
        }
    }
}
