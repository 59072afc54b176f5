//! Stream of symbol slots and the coding window.
//!
//! A [`Stream`] is a logically unbounded sequence of slots with `u64`
//! indices. New slots are pushed at the front (`upper_bound`), old ones are
//! popped at the back (`lower_bound`). Physical storage is a ring of
//! `capacity` slots addressed by `index % capacity`, so sliding forward never
//! reallocates.
//!
//! The stream also owns the current [`Window`], the sub-range that takes part
//! in the next coding operation. The window is validated when it is set and
//! again whenever it is used, since pops may have moved the stream past it.

use core::fmt;
use core::ops::Range;

/// A contiguous range of stream indices: `[lower_bound, lower_bound + symbols)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Window {
    lower_bound: u64,
    symbols: usize,
}

impl Window {
    /// Creates a window covering `symbols` indices starting at `lower_bound`.
    #[must_use]
    pub const fn new(lower_bound: u64, symbols: usize) -> Self {
        Self {
            lower_bound,
            symbols,
        }
    }

    /// First index inside the window.
    #[must_use]
    pub const fn lower_bound(&self) -> u64 {
        self.lower_bound
    }

    /// Number of indices inside the window.
    #[must_use]
    pub const fn symbols(&self) -> usize {
        self.symbols
    }

    /// One past the last index inside the window.
    #[must_use]
    pub const fn upper_bound(&self) -> u64 {
        self.lower_bound + self.symbols as u64
    }

    /// Returns true if the window has no indices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.symbols == 0
    }

    /// Returns true if `index` lies inside the window.
    #[must_use]
    pub const fn contains(&self, index: u64) -> bool {
        index >= self.lower_bound && index < self.upper_bound()
    }

    /// Indices of the window in increasing order.
    #[must_use]
    pub const fn indices(&self) -> Range<u64> {
        self.lower_bound..self.upper_bound()
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.lower_bound, self.upper_bound())
    }
}

/// Ring-backed stream of slots holding values of type `T`.
#[derive(Debug)]
pub struct Stream<T> {
    slots: Vec<Option<T>>,
    lower_bound: u64,
    upper_bound: u64,
    window: Window,
}

impl<T> Stream<T> {
    /// Creates an empty stream able to hold `capacity` live slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "stream capacity must be non-zero");
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            lower_bound: 0,
            upper_bound: 0,
            window: Window::default(),
        }
    }

    /// Maximum number of live slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the oldest live slot.
    #[must_use]
    pub const fn lower_bound(&self) -> u64 {
        self.lower_bound
    }

    /// Index the next pushed slot will receive.
    #[must_use]
    pub const fn upper_bound(&self) -> u64 {
        self.upper_bound
    }

    /// Number of live slots.
    #[must_use]
    pub const fn len(&self) -> usize {
        (self.upper_bound - self.lower_bound) as usize
    }

    /// Returns true if no slot is live.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.upper_bound == self.lower_bound
    }

    /// Returns true if `index` names a live slot.
    #[must_use]
    pub const fn contains(&self, index: u64) -> bool {
        index >= self.lower_bound && index < self.upper_bound
    }

    fn position(&self, index: u64) -> usize {
        (index % self.slots.len() as u64) as usize
    }

    /// Appends a slot at `upper_bound` and returns its index.
    ///
    /// # Panics
    ///
    /// Panics if the stream is at capacity.
    pub fn push_front(&mut self, value: T) -> u64 {
        assert!(
            self.len() < self.capacity(),
            "stream is full ({} slots); pop before pushing",
            self.capacity()
        );
        let index = self.upper_bound;
        let position = self.position(index);
        self.slots[position] = Some(value);
        self.upper_bound += 1;
        index
    }

    /// Removes the slot at `lower_bound`, returning its index and value.
    ///
    /// # Panics
    ///
    /// Panics if the stream is empty.
    pub fn pop_back(&mut self) -> (u64, T) {
        assert!(!self.is_empty(), "cannot pop from an empty stream");
        let index = self.lower_bound;
        let position = self.position(index);
        let value = self.slots[position]
            .take()
            .unwrap_or_else(|| unreachable!("live slot {index} is vacant"));
        self.lower_bound += 1;
        (index, value)
    }

    /// Returns the slot at `index`, if live.
    #[must_use]
    pub fn get(&self, index: u64) -> Option<&T> {
        if !self.contains(index) {
            return None;
        }
        self.slots[self.position(index)].as_ref()
    }

    /// Returns the slot at `index` mutably, if live.
    pub fn get_mut(&mut self, index: u64) -> Option<&mut T> {
        if !self.contains(index) {
            return None;
        }
        let position = self.position(index);
        self.slots[position].as_mut()
    }

    /// Iterates `(index, slot)` over the live slots in increasing index order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &T)> + '_ {
        (self.lower_bound..self.upper_bound).filter_map(move |index| {
            self.slots[self.position(index)]
                .as_ref()
                .map(|value| (index, value))
        })
    }

    /// Iterates `(index, slot)` mutably over the live slots in index order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u64, &mut T)> + '_ {
        let capacity = self.slots.len() as u64;
        let (lower, upper) = (self.lower_bound, self.upper_bound);
        // Walk the ring starting at the lower bound's position.
        let start = (lower % capacity) as usize;
        let (tail, head) = self.slots.split_at_mut(start);
        head.iter_mut()
            .chain(tail.iter_mut())
            .zip(lower..upper)
            .filter_map(|(slot, index)| slot.as_mut().map(|value| (index, value)))
    }

    /// The current window.
    #[must_use]
    pub const fn window(&self) -> Window {
        self.window
    }

    /// Sets the window to `[lower_bound, lower_bound + symbols)`.
    ///
    /// # Panics
    ///
    /// Panics if the window does not lie inside the stream.
    pub fn set_window(&mut self, lower_bound: u64, symbols: usize) {
        let window = Window::new(lower_bound, symbols);
        self.check_window(window);
        self.window = window;
    }

    /// Returns the current window after checking it still lies inside the
    /// stream.
    ///
    /// # Panics
    ///
    /// Panics if a pop moved the stream past the window.
    #[must_use]
    pub fn assert_window(&self) -> Window {
        self.check_window(self.window);
        self.window
    }

    fn check_window(&self, window: Window) {
        let end = window.lower_bound().checked_add(window.symbols() as u64);
        assert!(
            window.lower_bound() >= self.lower_bound
                && end.is_some_and(|end| end <= self.upper_bound),
            "window of {} symbols at {} outside stream [{}, {})",
            window.symbols(),
            window.lower_bound(),
            self.lower_bound,
            self.upper_bound
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_test_logging;

    #[test]
    fn push_pop_bounds() {
        init_test_logging();
        crate::test_phase!("push_pop_bounds");
        let mut stream = Stream::with_capacity(3);
        assert!(stream.is_empty());
        assert_eq!(stream.push_front('a'), 0);
        assert_eq!(stream.push_front('b'), 1);
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.pop_back(), (0, 'a'));
        assert_eq!(stream.lower_bound(), 1);
        assert_eq!(stream.upper_bound(), 2);
        assert_eq!(stream.get(0), None);
        assert_eq!(stream.get(1), Some(&'b'));
        crate::test_complete!("push_pop_bounds");
    }

    #[test]
    fn ring_wraps_without_growing() {
        init_test_logging();
        let mut stream = Stream::with_capacity(4);
        for i in 0..4u64 {
            stream.push_front(i * 10);
        }
        for round in 4..20u64 {
            let (popped, value) = stream.pop_back();
            assert_eq!(popped, round - 4);
            assert_eq!(value, popped * 10);
            assert_eq!(stream.push_front(round * 10), round);
            assert_eq!(stream.capacity(), 4);
        }
        let collected: Vec<_> = stream.iter().map(|(i, v)| (i, *v)).collect();
        assert_eq!(collected, vec![(16, 160), (17, 170), (18, 180), (19, 190)]);
    }

    #[test]
    fn iter_mut_visits_in_index_order() {
        init_test_logging();
        let mut stream = Stream::with_capacity(3);
        for v in 0..3 {
            stream.push_front(v);
        }
        stream.pop_back();
        stream.push_front(3);
        // Physical order is [3, 1, 2]; logical order must be 1, 2, 3.
        let indices: Vec<u64> = stream
            .iter_mut()
            .map(|(i, v)| {
                *v += 100;
                i
            })
            .collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(stream.get(3), Some(&103));
        assert_eq!(stream.get_mut(1).copied(), Some(101));
    }

    #[test]
    #[should_panic(expected = "stream is full")]
    fn push_past_capacity_panics() {
        let mut stream = Stream::with_capacity(1);
        stream.push_front(());
        stream.push_front(());
    }

    #[test]
    #[should_panic(expected = "empty stream")]
    fn pop_empty_panics() {
        let mut stream: Stream<u8> = Stream::with_capacity(1);
        stream.pop_back();
    }

    #[test]
    fn window_inside_stream() {
        init_test_logging();
        let mut stream = Stream::with_capacity(8);
        for v in 0..5 {
            stream.push_front(v);
        }
        stream.set_window(1, 4);
        let window = stream.assert_window();
        assert_eq!(window.lower_bound(), 1);
        assert_eq!(window.upper_bound(), 5);
        assert!(window.contains(4));
        assert!(!window.contains(5));
        assert_eq!(window.indices().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(window.to_string(), "[1, 5)");

        stream.set_window(5, 0);
        assert!(stream.assert_window().is_empty());
    }

    #[test]
    #[should_panic(expected = "outside stream")]
    fn window_past_upper_bound_panics() {
        let mut stream = Stream::with_capacity(4);
        stream.push_front(0);
        stream.set_window(0, 2);
    }

    #[test]
    #[should_panic(expected = "outside stream")]
    fn window_end_overflow_panics() {
        let mut stream = Stream::with_capacity(4);
        stream.push_front(0);
        stream.push_front(1);
        stream.set_window(u64::MAX, 2);
    }

    #[test]
    #[should_panic(expected = "outside stream")]
    fn stale_window_panics_on_use() {
        let mut stream = Stream::with_capacity(4);
        stream.push_front(0);
        stream.push_front(1);
        stream.set_window(0, 2);
        stream.pop_back();
        let _ = stream.assert_window();
    }
}
