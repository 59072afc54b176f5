//! GF(2^16) with the irreducible polynomial x^16 + x^12 + x^3 + x + 1
//! (0x1100B).
//!
//! Elements are little-endian `u16` pairs of bytes, so a packed buffer must
//! have even length. The log/exp tables are too large for a `const` and are
//! built once on first use.
//!
//! For long slices the scalar `c` is split into two 256-entry tables, one for
//! the low byte and one for the high byte of each element, since
//! `c * x = c * lo(x) + c * (hi(x) << 8)`.

use super::{Field, FiniteField, MUL_TABLE_THRESHOLD};
use std::sync::OnceLock;

/// Reduction polynomial including the x^16 term.
const POLY: u32 = 0x1100B;

/// Multiplicative group order.
const ORDER: usize = 65_535;

struct Tables {
    /// `log[a]` for nonzero `a`; `log[0]` is unused.
    log: Vec<u16>,
    /// `exp[i] = 2^i`, mirrored over two periods.
    exp: Vec<u16>,
}

static TABLES: OnceLock<Tables> = OnceLock::new();

fn tables() -> &'static Tables {
    TABLES.get_or_init(|| {
        let mut log = vec![0u16; ORDER + 1];
        let mut exp = vec![0u16; ORDER * 2];
        let mut val: u32 = 1;
        for i in 0..ORDER {
            exp[i] = val as u16;
            exp[i + ORDER] = val as u16;
            log[val as usize] = i as u16;
            val <<= 1;
            if val & 0x1_0000 != 0 {
                val ^= POLY;
            }
        }
        Tables { log, exp }
    })
}

/// Low-byte and high-byte product tables for a nonzero scalar.
fn build_split_tables(c: u16) -> ([u16; 256], [u16; 256]) {
    let mut low = [0u16; 256];
    let mut high = [0u16; 256];
    for x in 1..256u16 {
        low[x as usize] = Binary16::multiply(c, x);
        high[x as usize] = Binary16::multiply(c, x << 8);
    }
    (low, high)
}

#[inline]
fn read_element(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

/// The field GF(2^16).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Binary16;

impl FiniteField for Binary16 {
    const FIELD: Field = Field::Binary16;

    #[inline]
    fn multiply(a: u16, b: u16) -> u16 {
        if a == 0 || b == 0 {
            return 0;
        }
        let t = tables();
        t.exp[t.log[a as usize] as usize + t.log[b as usize] as usize]
    }

    #[inline]
    fn invert(a: u16) -> u16 {
        assert!(a != 0, "cannot invert zero in GF(65536)");
        let t = tables();
        t.exp[ORDER - t.log[a as usize] as usize]
    }

    #[inline]
    fn get_value(packed: &[u8], index: usize) -> u16 {
        read_element(&packed[index * 2..index * 2 + 2])
    }

    #[inline]
    fn set_value(packed: &mut [u8], index: usize, value: u16) {
        packed[index * 2..index * 2 + 2].copy_from_slice(&value.to_le_bytes());
    }

    fn vector_multiply_add(dst: &mut [u8], src: &[u8], c: u16) {
        assert_eq!(dst.len(), src.len(), "slice length mismatch");
        assert!(dst.len() % 2 == 0, "GF(65536) buffers must have even length");
        if c == 0 {
            return;
        }
        if c == 1 {
            Self::vector_add(dst, src);
            return;
        }
        if src.len() >= MUL_TABLE_THRESHOLD {
            let (low, high) = build_split_tables(c);
            for (d, s) in dst.chunks_exact_mut(2).zip(src.chunks_exact(2)) {
                let product = low[s[0] as usize] ^ high[s[1] as usize];
                let value = read_element(d) ^ product;
                d.copy_from_slice(&value.to_le_bytes());
            }
            return;
        }
        for (d, s) in dst.chunks_exact_mut(2).zip(src.chunks_exact(2)) {
            let value = read_element(d) ^ Self::multiply(c, read_element(s));
            d.copy_from_slice(&value.to_le_bytes());
        }
    }

    fn vector_multiply(dst: &mut [u8], c: u16) {
        assert!(dst.len() % 2 == 0, "GF(65536) buffers must have even length");
        if c == 0 {
            dst.fill(0);
            return;
        }
        if c == 1 {
            return;
        }
        if dst.len() >= MUL_TABLE_THRESHOLD {
            let (low, high) = build_split_tables(c);
            for d in dst.chunks_exact_mut(2) {
                let value = low[d[0] as usize] ^ high[d[1] as usize];
                d.copy_from_slice(&value.to_le_bytes());
            }
            return;
        }
        for d in dst.chunks_exact_mut(2) {
            let value = Self::multiply(c, read_element(d));
            d.copy_from_slice(&value.to_le_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Carry-less multiply with reduction, without tables.
    fn reference_multiply(a: u16, b: u16) -> u16 {
        let mut a = u32::from(a);
        let mut b = b;
        let mut product = 0u32;
        while b != 0 {
            if b & 1 != 0 {
                product ^= a;
            }
            a <<= 1;
            if a & 0x1_0000 != 0 {
                a ^= POLY;
            }
            b >>= 1;
        }
        product as u16
    }

    #[test]
    fn two_generates_the_whole_group() {
        let t = tables();
        let mut seen = vec![false; ORDER + 1];
        for i in 0..ORDER {
            let value = t.exp[i] as usize;
            assert!(value != 0);
            assert!(!seen[value], "2^{i} repeats");
            seen[value] = true;
        }
    }

    #[test]
    fn multiply_matches_reference_sampled() {
        let samples = [0u16, 1, 2, 3, 0x00FF, 0x0100, 0x1234, 0x8000, 0xABCD, 0xFFFF];
        for &a in &samples {
            for b in (0..=u16::MAX).step_by(257) {
                assert_eq!(Binary16::multiply(a, b), reference_multiply(a, b), "{a} * {b}");
            }
        }
    }

    #[test]
    fn inverse_sampled() {
        for a in (1..=u16::MAX).step_by(97) {
            assert_eq!(Binary16::multiply(a, Binary16::invert(a)), 1, "a={a}");
        }
        assert_eq!(Binary16::invert(1), 1);
    }

    #[test]
    #[should_panic(expected = "cannot invert zero")]
    fn inverse_of_zero_panics() {
        let _ = Binary16::invert(0);
    }

    #[test]
    fn little_endian_packing() {
        let mut packed = [0u8; 4];
        Binary16::set_value(&mut packed, 1, 0xBEEF);
        assert_eq!(packed, [0, 0, 0xEF, 0xBE]);
        assert_eq!(Binary16::get_value(&packed, 1), 0xBEEF);
        assert_eq!(Binary16::get_value(&packed, 0), 0);
    }

    #[test]
    fn multiply_add_both_paths() {
        for len in [6usize, MUL_TABLE_THRESHOLD + 10] {
            let src: Vec<u8> = (0..len).map(|i| (i.wrapping_mul(151) + 7) as u8).collect();
            let mut dst: Vec<u8> = (0..len).map(|i| (i * 11) as u8).collect();
            let original = dst.clone();
            let c = 0x4D21;
            Binary16::vector_multiply_add(&mut dst, &src, c);
            for i in 0..len / 2 {
                let expected = Binary16::get_value(&original, i)
                    ^ reference_multiply(c, Binary16::get_value(&src, i));
                assert_eq!(Binary16::get_value(&dst, i), expected, "len={len} element {i}");
            }
        }
    }

    #[test]
    fn multiply_both_paths() {
        for len in [4usize, MUL_TABLE_THRESHOLD + 2] {
            let original: Vec<u8> = (0..len).map(|i| (i.wrapping_mul(59) + 1) as u8).collect();
            let mut data = original.clone();
            Binary16::vector_multiply(&mut data, 0x9001);
            for i in 0..len / 2 {
                assert_eq!(
                    Binary16::get_value(&data, i),
                    reference_multiply(0x9001, Binary16::get_value(&original, i))
                );
            }
        }
    }
}
