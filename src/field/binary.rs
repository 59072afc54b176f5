//! GF(2): one bit per element.
//!
//! Multiplication is AND and the only invertible element is 1, so the bulk
//! kernels reduce to "skip" or "XOR".

use super::{add_slice, Field, FiniteField};

/// The binary field GF(2).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Binary;

impl FiniteField for Binary {
    const FIELD: Field = Field::Binary;

    #[inline]
    fn multiply(a: u16, b: u16) -> u16 {
        a & b & 1
    }

    #[inline]
    fn invert(a: u16) -> u16 {
        assert!(a & 1 != 0, "cannot invert zero in GF(2)");
        1
    }

    #[inline]
    fn get_value(packed: &[u8], index: usize) -> u16 {
        u16::from((packed[index / 8] >> (index % 8)) & 1)
    }

    #[inline]
    fn set_value(packed: &mut [u8], index: usize, value: u16) {
        let mask = 1u8 << (index % 8);
        let byte = &mut packed[index / 8];
        if value & 1 == 0 {
            *byte &= !mask;
        } else {
            *byte |= mask;
        }
    }

    #[inline]
    fn vector_multiply_add(dst: &mut [u8], src: &[u8], c: u16) {
        assert_eq!(dst.len(), src.len(), "slice length mismatch");
        if c & 1 != 0 {
            add_slice(dst, src);
        }
    }

    #[inline]
    fn vector_multiply(dst: &mut [u8], c: u16) {
        if c & 1 == 0 {
            dst.fill(0);
        }
    }
}
