//! Sliding-window decoder with incremental Gaussian elimination.
//!
//! Every stream slot borrows a caller buffer of `symbol_size` bytes and may
//! hold one coefficient row. Stored rows are kept in reduced row-echelon
//! form:
//!
//! - a row stored at slot `p` has coefficient 1 at column `p` and zero at
//!   every column below `p` (its *pivot* is its lowest nonzero column);
//! - every row is zero at every other row's pivot column.
//!
//! A slot is *decoded* when its row is the unit vector at its own index, at
//! which point its buffer holds the source symbol. Because a row never
//! reaches below its pivot, popping the oldest slot never leaves another row
//! referring to a column that no longer exists.
//!
//! # Row storage
//!
//! A row is stored relative to its pivot: entry `k` is the coefficient at
//! column `pivot + k`, entry 0 is always 1 and trailing zeros are trimmed,
//! so a decoded row has length 1.

use crate::coefficients::CoefficientGenerator;
use crate::field::{Field, FiniteField};
use crate::stream::{Stream, Window};
use crate::tracing_compat::{debug, trace};
use core::marker::PhantomData;

/// Normalised coefficient row, relative to its pivot column.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    coefficients: Vec<u16>,
}

impl Row {
    fn is_unit(&self) -> bool {
        self.coefficients.len() == 1
    }

    /// Coefficient at `column`, given the row's pivot.
    fn get(&self, pivot: u64, column: u64) -> u16 {
        column
            .checked_sub(pivot)
            .and_then(|offset| self.coefficients.get(offset as usize))
            .copied()
            .unwrap_or(0)
    }
}

fn trim(coefficients: &mut Vec<u16>) {
    while coefficients.len() > 1 && coefficients.last() == Some(&0) {
        coefficients.pop();
    }
}

/// `dst[offset + m] += c * src[m]`, growing `dst` as needed.
fn row_multiply_add<F: FiniteField>(dst: &mut Vec<u16>, offset: usize, src: &[u16], c: u16) {
    if dst.len() < offset + src.len() {
        dst.resize(offset + src.len(), 0);
    }
    for (d, s) in dst[offset..].iter_mut().zip(src) {
        *d = F::add(*d, F::multiply(c, *s));
    }
}

#[derive(Debug)]
struct Slot<'a> {
    data: &'a mut [u8],
    row: Option<Row>,
}

/// Decoder over field `F` writing into buffers borrowed for `'a`.
#[derive(Debug)]
pub struct Decoder<'a, F: FiniteField> {
    stream: Stream<Slot<'a>>,
    generator: CoefficientGenerator,
    symbol_size: usize,
    rank: usize,
    decoded: usize,
    _field: PhantomData<F>,
}

impl<'a, F: FiniteField> Decoder<'a, F> {
    /// Creates a decoder with an empty stream. Callers go through
    /// [`DecoderFactory`](crate::DecoderFactory), which validates the sizes.
    pub(crate) fn new(symbol_size: usize, stream_capacity: usize) -> Self {
        debug!(
            field = %F::FIELD,
            symbol_size,
            stream_capacity,
            "decoder built"
        );
        Self {
            stream: Stream::with_capacity(stream_capacity),
            generator: CoefficientGenerator::default(),
            symbol_size,
            rank: 0,
            decoded: 0,
            _field: PhantomData,
        }
    }

    /// The finite field this decoder works over.
    #[must_use]
    pub const fn field(&self) -> Field {
        F::FIELD
    }

    /// Size of every symbol in bytes.
    #[must_use]
    pub const fn symbol_size(&self) -> usize {
        self.symbol_size
    }

    /// Number of slots currently in the stream.
    #[must_use]
    pub const fn stream_symbols(&self) -> usize {
        self.stream.len()
    }

    /// Index of the oldest slot.
    #[must_use]
    pub const fn stream_lower_bound(&self) -> u64 {
        self.stream.lower_bound()
    }

    /// Index the next pushed slot will receive.
    #[must_use]
    pub const fn stream_upper_bound(&self) -> u64 {
        self.stream.upper_bound()
    }

    /// Maximum number of slots the stream can hold.
    #[must_use]
    pub fn stream_capacity(&self) -> usize {
        self.stream.capacity()
    }

    /// Adds a slot backed by `symbol` and returns its index.
    ///
    /// The buffer's contents are irrelevant until the slot receives a row;
    /// after that it holds the slot's (partially) decoded payload.
    ///
    /// # Panics
    ///
    /// Panics if `symbol` is not `symbol_size` bytes or the stream is full.
    pub fn push_front_symbol(&mut self, symbol: &'a mut [u8]) -> u64 {
        assert_eq!(symbol.len(), self.symbol_size, "symbol buffer size mismatch");
        let index = self.stream.push_front(Slot {
            data: symbol,
            row: None,
        });
        trace!(index, "decoder pushed slot");
        index
    }

    /// Removes the oldest slot and returns its index.
    ///
    /// A slot that was not fully decoded takes its partial information with
    /// it; rank drops accordingly.
    ///
    /// # Panics
    ///
    /// Panics if the stream is empty.
    pub fn pop_back_symbol(&mut self) -> u64 {
        let (index, slot) = self.stream.pop_back();
        match slot.row {
            Some(row) => {
                self.rank -= 1;
                if row.is_unit() {
                    self.decoded -= 1;
                } else {
                    debug!(index, rank = self.rank, "popped partially decoded symbol");
                }
            }
            None => {
                debug!(index, rank = self.rank, "popped missing symbol");
            }
        }
        index
    }

    /// Number of slots in the window.
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

    /// Selects the slots the next coded symbol's coefficients refer to.
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

    /// Regenerates the coefficient vector an encoder with the same seed and
    /// window produced.
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

    /// Applies a coded symbol whose coefficients refer to the current window.
    ///
    /// `symbol` is used as scratch space and is modified.
    ///
    /// # Panics
    ///
    /// Panics on a size mismatch of either buffer or a stale window.
    pub fn read_symbol(&mut self, symbol: &mut [u8], coefficients: &[u8]) {
        let window = self.stream.assert_window();
        assert_eq!(symbol.len(), self.symbol_size, "coded symbol size mismatch");
        assert_eq!(
            coefficients.len(),
            self.coefficient_vector_size(),
            "coefficient vector size mismatch"
        );
        let row: Vec<u16> = (0..window.symbols())
            .map(|j| F::get_value(coefficients, j))
            .collect();
        self.insert_row(window.lower_bound(), row, symbol);
    }

    /// Applies the source symbol at `index` (systematic path).
    ///
    /// Does nothing if the slot is already decoded. `symbol` is used as
    /// scratch space and is modified.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the stream or `symbol` has the wrong size.
    pub fn read_source_symbol(&mut self, symbol: &mut [u8], index: u64) {
        assert_eq!(symbol.len(), self.symbol_size, "source symbol size mismatch");
        if self.is_symbol_decoded(index) {
            trace!(index, "source symbol already decoded");
            return;
        }
        self.insert_row(index, vec![1], symbol);
    }

    /// Number of stored rows (pivots established).
    #[must_use]
    pub const fn rank(&self) -> usize {
        self.rank
    }

    /// Number of slots whose buffer holds the source symbol.
    #[must_use]
    pub const fn symbols_decoded(&self) -> usize {
        self.decoded
    }

    /// Number of slots holding a row that still depends on other slots.
    #[must_use]
    pub const fn symbols_partially_decoded(&self) -> usize {
        self.rank - self.decoded
    }

    /// Number of slots without a row.
    #[must_use]
    pub const fn symbols_missing(&self) -> usize {
        self.stream.len() - self.rank
    }

    /// Returns true once every live slot holds its source symbol.
    ///
    /// An empty stream is complete.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.decoded == self.stream.len()
    }

    /// Returns true if the slot at `index` holds its source symbol.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the stream.
    #[must_use]
    pub fn is_symbol_decoded(&self, index: u64) -> bool {
        self.slot(index).row.as_ref().is_some_and(Row::is_unit)
    }

    /// Returns true if the slot at `index` holds a row, decoded or not.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the stream.
    #[must_use]
    pub fn is_symbol_pivot(&self, index: u64) -> bool {
        self.slot(index).row.is_some()
    }

    /// The payload currently stored in the slot at `index`.
    ///
    /// Equals the source symbol once [`is_symbol_decoded`](Self::is_symbol_decoded)
    /// is true.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the stream.
    #[must_use]
    pub fn symbol(&self, index: u64) -> &[u8] {
        &self.slot(index).data[..]
    }

    fn slot(&self, index: u64) -> &Slot<'a> {
        match self.stream.get(index) {
            Some(slot) => slot,
            None => panic!(
                "symbol {index} outside stream [{}, {})",
                self.stream.lower_bound(),
                self.stream.upper_bound()
            ),
        }
    }

    /// Eliminates the row `coefficients` (starting at column `origin`) with
    /// payload `symbol` against the stored rows and stores what remains.
    ///
    /// Returns false if the row was linearly dependent.
    fn insert_row(&mut self, origin: u64, mut coefficients: Vec<u16>, symbol: &mut [u8]) -> bool {
        // Forward pass: clear every pivot column, lowest first. A pivot row
        // only reaches upwards, so later columns are still unvisited.
        let mut k = 0;
        while k < coefficients.len() {
            let c = coefficients[k];
            if c != 0 {
                let column = origin + k as u64;
                if let Some(Slot {
                    data,
                    row: Some(row),
                }) = self.stream.get(column)
                {
                    row_multiply_add::<F>(&mut coefficients, k, &row.coefficients, c);
                    F::vector_multiply_add(symbol, data, c);
                }
            }
            k += 1;
        }

        let Some(lead) = coefficients.iter().position(|c| *c != 0) else {
            trace!(origin, rank = self.rank, "redundant symbol discarded");
            return false;
        };

        let pivot = origin + lead as u64;
        let inverse = F::invert(coefficients[lead]);
        coefficients.drain(..lead);
        for c in &mut coefficients {
            *c = F::multiply(*c, inverse);
        }
        trim(&mut coefficients);
        F::vector_multiply(symbol, inverse);

        // Backward pass: remove the new pivot column from every older row.
        let mut newly_decoded = 0;
        for (index, slot) in self.stream.iter_mut() {
            if index >= pivot {
                break;
            }
            let Some(row) = slot.row.as_mut() else {
                continue;
            };
            let c = row.get(index, pivot);
            if c == 0 {
                continue;
            }
            let offset = (pivot - index) as usize;
            row_multiply_add::<F>(&mut row.coefficients, offset, &coefficients, c);
            trim(&mut row.coefficients);
            F::vector_multiply_add(slot.data, symbol, c);
            if row.is_unit() {
                newly_decoded += 1;
            }
        }

        let row = Row { coefficients };
        let is_unit = row.is_unit();
        let slot = self
            .stream
            .get_mut(pivot)
            .unwrap_or_else(|| unreachable!("pivot {pivot} outside stream"));
        debug_assert!(slot.row.is_none(), "pivot {pivot} already occupied");
        slot.data.copy_from_slice(symbol);
        slot.row = Some(row);

        self.rank += 1;
        self.decoded += newly_decoded + usize::from(is_unit);
        trace!(
            pivot,
            rank = self.rank,
            decoded = self.decoded,
            newly_decoded,
            "pivot established"
        );
        true
    }
}
