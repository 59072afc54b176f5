//! GF(2^4) with the reduction polynomial x^4 + x + 1 (0x13).
//!
//! Elements are nibbles; a packed byte holds two of them (even index in the
//! low nibble). The full 16 x 16 product table and the inverse table are
//! `const`-evaluated at compile time. Bulk kernels expand a scalar into a
//! 256-entry byte table that multiplies both nibbles of a byte at once.

use super::{addmul_with_table_wide, mul_with_table_wide, Field, FiniteField, MUL_TABLE_THRESHOLD};

/// The irreducible polynomial x^4 + x + 1, without the x^4 term.
const POLY: u8 = 0x03;

/// `MUL[a][b] = a * b` in GF(16).
static MUL: [[u8; 16]; 16] = build_mul_table();

/// `INV[a] = a^-1` in GF(16); `INV[0]` is unused.
static INV: [u8; 16] = build_inv_table();

// ============================================================================
// Table generation (const)
// ============================================================================

/// Carry-less multiply with reduction, one bit of `b` at a time.
const fn slow_multiply(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    let mut i = 0;
    while i < 4 {
        if b & 1 != 0 {
            product ^= a;
        }
        let carry = a & 0x08 != 0;
        a = (a << 1) & 0x0F;
        if carry {
            a ^= POLY;
        }
        b >>= 1;
        i += 1;
    }
    product
}

const fn build_mul_table() -> [[u8; 16]; 16] {
    let mut table = [[0u8; 16]; 16];
    let mut a = 0;
    while a < 16 {
        let mut b = 0;
        while b < 16 {
            table[a][b] = slow_multiply(a as u8, b as u8);
            b += 1;
        }
        a += 1;
    }
    table
}

const fn build_inv_table() -> [u8; 16] {
    let mut table = [0u8; 16];
    let mut a = 1;
    while a < 16 {
        let mut b = 1;
        while b < 16 {
            if slow_multiply(a as u8, b as u8) == 1 {
                table[a] = b as u8;
            }
            b += 1;
        }
        a += 1;
    }
    table
}

/// Byte table multiplying both packed nibbles by `c`.
fn build_byte_table(c: u16) -> [u8; 256] {
    let row = &MUL[c as usize & 0x0F];
    let mut table = [0u8; 256];
    for (byte, entry) in table.iter_mut().enumerate() {
        *entry = row[byte & 0x0F] | (row[byte >> 4] << 4);
    }
    table
}

#[inline]
fn multiply_byte(row: &[u8; 16], byte: u8) -> u8 {
    row[(byte & 0x0F) as usize] | (row[(byte >> 4) as usize] << 4)
}

/// The field GF(2^4).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Binary4;

impl FiniteField for Binary4 {
    const FIELD: Field = Field::Binary4;

    #[inline]
    fn multiply(a: u16, b: u16) -> u16 {
        u16::from(MUL[a as usize & 0x0F][b as usize & 0x0F])
    }

    #[inline]
    fn invert(a: u16) -> u16 {
        assert!(a & 0x0F != 0, "cannot invert zero in GF(16)");
        u16::from(INV[a as usize & 0x0F])
    }

    #[inline]
    fn get_value(packed: &[u8], index: usize) -> u16 {
        let byte = packed[index / 2];
        if index % 2 == 0 {
            u16::from(byte & 0x0F)
        } else {
            u16::from(byte >> 4)
        }
    }

    #[inline]
    fn set_value(packed: &mut [u8], index: usize, value: u16) {
        let nibble = (value & 0x0F) as u8;
        let byte = &mut packed[index / 2];
        if index % 2 == 0 {
            *byte = (*byte & 0xF0) | nibble;
        } else {
            *byte = (*byte & 0x0F) | (nibble << 4);
        }
    }

    fn vector_multiply_add(dst: &mut [u8], src: &[u8], c: u16) {
        assert_eq!(dst.len(), src.len(), "slice length mismatch");
        let c = c & 0x0F;
        if c == 0 {
            return;
        }
        if c == 1 {
            Self::vector_add(dst, src);
            return;
        }
        if src.len() >= MUL_TABLE_THRESHOLD {
            addmul_with_table_wide(dst, src, &build_byte_table(c));
            return;
        }
        let row = &MUL[c as usize];
        for (d, s) in dst.iter_mut().zip(src.iter()) {
            *d ^= multiply_byte(row, *s);
        }
    }

    fn vector_multiply(dst: &mut [u8], c: u16) {
        let c = c & 0x0F;
        if c == 0 {
            dst.fill(0);
            return;
        }
        if c == 1 {
            return;
        }
        if dst.len() >= MUL_TABLE_THRESHOLD {
            mul_with_table_wide(dst, &build_byte_table(c));
            return;
        }
        let row = &MUL[c as usize];
        for d in dst.iter_mut() {
            *d = multiply_byte(row, *d);
        }
    }
}
