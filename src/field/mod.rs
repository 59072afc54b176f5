//! Finite field arithmetic over binary extension fields.
//!
//! Four fields are supported, all of characteristic 2 so that addition and
//! subtraction are both XOR:
//!
//! | Field | Type | Bits | Reduction polynomial |
//! |---|---|---|---|
//! | GF(2) | [`Binary`] | 1 | - |
//! | GF(2^4) | [`Binary4`] | 4 | x^4 + x + 1 (0x13) |
//! | GF(2^8) | [`Binary8`] | 8 | x^8 + x^4 + x^3 + x^2 + 1 (0x11D) |
//! | GF(2^16) | [`Binary16`] | 16 | x^16 + x^12 + x^3 + x + 1 (0x1100B) |
//!
//! # Representation
//!
//! Scalars are carried as `u16` values below `2^DEGREE`. Vectors (coefficient
//! vectors and symbol payloads) are packed byte buffers:
//!
//! - binary: element `i` is bit `i % 8` (LSB first) of byte `i / 8`
//! - binary4: element `i` is the low nibble of byte `i / 2` for even `i`,
//!   the high nibble for odd `i`
//! - binary8: element `i` is byte `i`
//! - binary16: element `i` is the little-endian `u16` at bytes `2i..2i + 2`
//!
//! # Determinism
//!
//! All tables are derived from the fixed polynomials above, so results are
//! bit-exact on every platform. An encoder and decoder that disagree on the
//! field silently corrupt each other's data, which is why the field is part of
//! the factory configuration rather than a per-call argument.

mod binary;
mod binary16;
mod binary4;
mod binary8;

pub use binary::Binary;
pub use binary16::Binary16;
pub use binary4::Binary4;
pub use binary8::Binary8;

use crate::error::Error;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Runtime identifier of a finite field.
///
/// The discriminants are the integer ids used across host boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum Field {
    /// GF(2): one bit per element.
    Binary = 0,
    /// GF(2^4): one nibble per element.
    Binary4 = 1,
    /// GF(2^8): one byte per element.
    #[default]
    Binary8 = 2,
    /// GF(2^16): two bytes per element.
    Binary16 = 3,
}

impl Field {
    /// All supported fields, in id order.
    pub const ALL: [Self; 4] = [Self::Binary, Self::Binary4, Self::Binary8, Self::Binary16];

    /// Integer id of this field.
    #[must_use]
    pub const fn id(self) -> i32 {
        self as i32
    }

    /// Number of bits per element.
    #[must_use]
    pub const fn degree(self) -> u32 {
        match self {
            Self::Binary => 1,
            Self::Binary4 => 4,
            Self::Binary8 => 8,
            Self::Binary16 => 16,
        }
    }

    /// Number of bytes needed to store `elements` packed elements.
    #[must_use]
    pub const fn elements_to_bytes(self, elements: usize) -> usize {
        match self {
            Self::Binary => elements.div_ceil(8),
            Self::Binary4 => elements.div_ceil(2),
            Self::Binary8 => elements,
            Self::Binary16 => elements * 2,
        }
    }

    /// Returns true if a buffer of `bytes` holds a whole number of elements.
    #[must_use]
    pub const fn is_aligned(self, bytes: usize) -> bool {
        match self {
            Self::Binary16 => bytes % 2 == 0,
            Self::Binary | Self::Binary4 | Self::Binary8 => true,
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Binary4 => "binary4",
            Self::Binary8 => "binary8",
            Self::Binary16 => "binary16",
        }
    }
}

impl TryFrom<i32> for Field {
    type Error = Error;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Self::Binary),
            1 => Ok(Self::Binary4),
            2 => Ok(Self::Binary8),
            3 => Ok(Self::Binary16),
            other => Err(Error::invalid_field(other)),
        }
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::new(crate::error::ErrorKind::InvalidField)
                    .with_message(format!("unknown finite field {s:?}"))
            })
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arithmetic of one binary extension field.
///
/// Implemented by zero-sized marker types so encoders and decoders are
/// monomorphised per field; runtime selection happens once, in the factories.
pub trait FiniteField: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Runtime identifier of this field.
    const FIELD: Field;

    /// Bits per element.
    const DEGREE: u32 = Self::FIELD.degree();

    /// Largest element value.
    const MAX_VALUE: u16 = ((1u32 << Self::DEGREE) - 1) as u16;

    /// Field addition (XOR).
    #[inline]
    #[must_use]
    fn add(a: u16, b: u16) -> u16 {
        a ^ b
    }

    /// Field subtraction (same as addition in characteristic 2).
    #[inline]
    #[must_use]
    fn subtract(a: u16, b: u16) -> u16 {
        Self::add(a, b)
    }

    /// Field multiplication.
    #[must_use]
    fn multiply(a: u16, b: u16) -> u16;

    /// Multiplicative inverse.
    ///
    /// # Panics
    ///
    /// Panics if `a` is zero.
    #[must_use]
    fn invert(a: u16) -> u16;

    /// Field division: `a / b`.
    ///
    /// # Panics
    ///
    /// Panics if `b` is zero.
    #[inline]
    #[must_use]
    fn divide(a: u16, b: u16) -> u16 {
        Self::multiply(a, Self::invert(b))
    }

    /// Bytes needed to store `elements` packed elements.
    #[inline]
    #[must_use]
    fn elements_to_bytes(elements: usize) -> usize {
        Self::FIELD.elements_to_bytes(elements)
    }

    /// Reads element `index` from a packed buffer.
    #[must_use]
    fn get_value(packed: &[u8], index: usize) -> u16;

    /// Writes element `index` of a packed buffer, leaving the others untouched.
    fn set_value(packed: &mut [u8], index: usize, value: u16);

    /// `dst[i] += src[i]` over packed buffers.
    ///
    /// # Panics
    ///
    /// Panics if `src.len() != dst.len()`.
    #[inline]
    fn vector_add(dst: &mut [u8], src: &[u8]) {
        add_slice(dst, src);
    }

    /// `dst[i] += c * src[i]` over packed buffers.
    ///
    /// # Panics
    ///
    /// Panics if `src.len() != dst.len()`.
    fn vector_multiply_add(dst: &mut [u8], src: &[u8], c: u16);

    /// `dst[i] = c * dst[i]` over a packed buffer.
    fn vector_multiply(dst: &mut [u8], c: u16);
}

// ============================================================================
// Shared bulk kernels
// ============================================================================

/// Minimum slice length to amortise building a 256-byte multiplication table.
pub(crate) const MUL_TABLE_THRESHOLD: usize = 64;

/// XOR `src` into `dst` element-wise: `dst[i] ^= src[i]`.
///
/// Uses 8-byte-wide XOR via `u64` for throughput on bulk data.
///
/// # Panics
///
/// Panics if `src.len() != dst.len()`.
#[inline]
pub(crate) fn add_slice(dst: &mut [u8], src: &[u8]) {
    assert_eq!(dst.len(), src.len(), "slice length mismatch");
    let mut d_chunks = dst.chunks_exact_mut(8);
    let mut s_chunks = src.chunks_exact(8);
    for (d_chunk, s_chunk) in d_chunks.by_ref().zip(s_chunks.by_ref()) {
        let d_arr: [u8; 8] = d_chunk.try_into().expect("8 bytes");
        let s_arr: [u8; 8] = s_chunk.try_into().expect("8 bytes");
        let result = u64::from_ne_bytes(d_arr) ^ u64::from_ne_bytes(s_arr);
        d_chunk.copy_from_slice(&result.to_ne_bytes());
    }
    for (d, s) in d_chunks
        .into_remainder()
        .iter_mut()
        .zip(s_chunks.remainder())
    {
        *d ^= s;
    }
}

/// Replace every byte of `dst` by its image in a 256-entry byte table,
/// 8 lookups per iteration.
pub(crate) fn mul_with_table_wide(dst: &mut [u8], table: &[u8; 256]) {
    let mut chunks = dst.chunks_exact_mut(8);
    for chunk in chunks.by_ref() {
        let t = [
            table[chunk[0] as usize],
            table[chunk[1] as usize],
            table[chunk[2] as usize],
            table[chunk[3] as usize],
            table[chunk[4] as usize],
            table[chunk[5] as usize],
            table[chunk[6] as usize],
            table[chunk[7] as usize],
        ];
        chunk.copy_from_slice(&t);
    }
    for d in chunks.into_remainder() {
        *d = table[*d as usize];
    }
}

/// XOR the table image of every byte of `src` into `dst`: batch 8 lookups,
/// then wide-XOR the results via `u64`.
pub(crate) fn addmul_with_table_wide(dst: &mut [u8], src: &[u8], table: &[u8; 256]) {
    let mut d_chunks = dst.chunks_exact_mut(8);
    let mut s_chunks = src.chunks_exact(8);
    for (d_chunk, s_chunk) in d_chunks.by_ref().zip(s_chunks.by_ref()) {
        let t = [
            table[s_chunk[0] as usize],
            table[s_chunk[1] as usize],
            table[s_chunk[2] as usize],
            table[s_chunk[3] as usize],
            table[s_chunk[4] as usize],
            table[s_chunk[5] as usize],
            table[s_chunk[6] as usize],
            table[s_chunk[7] as usize],
        ];
        let d_arr: [u8; 8] = <[u8; 8]>::try_from(&d_chunk[..]).expect("8 bytes");
        let result = u64::from_ne_bytes(d_arr) ^ u64::from_ne_bytes(t);
        d_chunk.copy_from_slice(&result.to_ne_bytes());
    }
    for (d, s) in d_chunks
        .into_remainder()
        .iter_mut()
        .zip(s_chunks.remainder())
    {
        *d ^= table[*s as usize];
    }
}
