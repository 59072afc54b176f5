//! GF(2^8) with the irreducible polynomial x^8 + x^4 + x^3 + x^2 + 1 (0x11D).
//!
//! Elements are bytes. Multiplication goes through log/exp tables built at
//! compile time with generator 2; bulk kernels switch to a single 256-entry
//! product table once the slice is long enough to amortise building it.

use super::{addmul_with_table_wide, mul_with_table_wide, Field, FiniteField, MUL_TABLE_THRESHOLD};

/// Reduction mask: the low 8 bits of 0x11D.
const POLY: u16 = 0x1D;

/// `LOG[a]` = discrete log base 2 of `a`. `LOG[0]` is unused.
static LOG: [u8; 256] = build_log_table();

/// `EXP[i]` = `2^i`, mirrored to 512 entries so `EXP[LOG[a] + LOG[b]]`
/// needs no modular reduction.
static EXP: [u8; 512] = build_exp_table();

// ============================================================================
// Table generation (const)
// ============================================================================

const fn build_exp_table() -> [u8; 512] {
    let mut table = [0u8; 512];
    let mut val: u16 = 1;
    let mut i = 0usize;
    while i < 255 {
        table[i] = val as u8;
        table[i + 255] = val as u8;
        val <<= 1;
        if val & 0x100 != 0 {
            val ^= 0x100 | POLY;
        }
        i += 1;
    }
    table[510] = 1;
    table
}

const fn build_log_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut val: u16 = 1;
    let mut i = 0u8;
    loop {
        table[val as usize] = i;
        val <<= 1;
        if val & 0x100 != 0 {
            val ^= 0x100 | POLY;
        }
        if i == 254 {
            break;
        }
        i += 1;
    }
    table
}

/// `table[x] = x * c` for a nonzero `c` given as `LOG[c]`.
fn build_product_table(log_c: usize) -> [u8; 256] {
    let mut table = [0u8; 256];
    for (x, entry) in table.iter_mut().enumerate().skip(1) {
        *entry = EXP[LOG[x] as usize + log_c];
    }
    table
}

/// The field GF(2^8).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Binary8;

impl FiniteField for Binary8 {
    const FIELD: Field = Field::Binary8;

    #[inline]
    fn multiply(a: u16, b: u16) -> u16 {
        let (a, b) = (a as u8, b as u8);
        if a == 0 || b == 0 {
            return 0;
        }
        u16::from(EXP[LOG[a as usize] as usize + LOG[b as usize] as usize])
    }

    #[inline]
    fn invert(a: u16) -> u16 {
        let a = a as u8;
        assert!(a != 0, "cannot invert zero in GF(256)");
        u16::from(EXP[255 - LOG[a as usize] as usize])
    }

    #[inline]
    fn get_value(packed: &[u8], index: usize) -> u16 {
        u16::from(packed[index])
    }

    #[inline]
    fn set_value(packed: &mut [u8], index: usize, value: u16) {
        packed[index] = value as u8;
    }

    fn vector_multiply_add(dst: &mut [u8], src: &[u8], c: u16) {
        assert_eq!(dst.len(), src.len(), "slice length mismatch");
        let c = c as u8;
        if c == 0 {
            return;
        }
        if c == 1 {
            Self::vector_add(dst, src);
            return;
        }
        let log_c = LOG[c as usize] as usize;
        if src.len() >= MUL_TABLE_THRESHOLD {
            addmul_with_table_wide(dst, src, &build_product_table(log_c));
            return;
        }
        for (d, s) in dst.iter_mut().zip(src.iter()) {
            if *s != 0 {
                *d ^= EXP[LOG[*s as usize] as usize + log_c];
            }
        }
    }

    fn vector_multiply(dst: &mut [u8], c: u16) {
        let c = c as u8;
        if c == 0 {
            dst.fill(0);
            return;
        }
        if c == 1 {
            return;
        }
        let log_c = LOG[c as usize] as usize;
        if dst.len() >= MUL_TABLE_THRESHOLD {
            mul_with_table_wide(dst, &build_product_table(log_c));
            return;
        }
        for d in dst.iter_mut() {
            if *d != 0 {
                *d = EXP[LOG[*d as usize] as usize + log_c];
            }
        }
    }
}
