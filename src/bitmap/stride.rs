//! Stride-length selection table for choosing a bitmap's trie shape.
//!
//! Each row gives the `(s0, s1, s2)` stride lengths of the trie that
//! backs a bitmap whose `max_pos` falls in the row's bit-position
//! range: row `i` covers bitmaps needing `12 + i` bits of bit-position
//! addressing (`s0 + s1 + s2 + 5 == 12 + i`, the trailing `+5`
//! accounting for the 32-bit word each L2 leaf packs).

use crate::error::BitmapAllocError;

pub(crate) struct StrideLen {
    pub(crate) s0: u8,
    pub(crate) s1: u8,
    pub(crate) s2: u8,
}

/// Smallest bit-position width any table row covers.
pub(crate) const MIN_ADDRESSABLE_BITS: u32 = 12;
/// Largest bit-position width the table covers; `max_pos` values
/// needing more bits than this are rejected.
pub(crate) const MAX_ADDRESSABLE_BITS: u32 = 29;

pub(crate) static STRIDES: [StrideLen; 18] = [
    StrideLen { s0: 3, s1: 2, s2: 2 }, //  0: index  7 bits, bit-pos 12 bits
    StrideLen { s0: 4, s1: 2, s2: 2 }, //  1: index  8 bits, bit-pos 13 bits
    StrideLen { s0: 4, s1: 3, s2: 2 }, //  2: index  9 bits, bit-pos 14 bits
    StrideLen { s0: 4, s1: 3, s2: 3 }, //  3: index 10 bits, bit-pos 15 bits
    StrideLen { s0: 4, s1: 4, s2: 3 }, //  4: index 11 bits, bit-pos 16 bits
    StrideLen { s0: 5, s1: 4, s2: 3 }, //  5: index 12 bits, bit-pos 17 bits
    StrideLen { s0: 5, s1: 4, s2: 4 }, //  6: index 13 bits, bit-pos 18 bits
    StrideLen { s0: 5, s1: 5, s2: 4 }, //  7: index 14 bits, bit-pos 19 bits
    StrideLen { s0: 5, s1: 5, s2: 5 }, //  8: index 15 bits, bit-pos 20 bits
    StrideLen { s0: 6, s1: 5, s2: 5 }, //  9: index 16 bits, bit-pos 21 bits
    StrideLen { s0: 6, s1: 6, s2: 5 }, // 10: index 17 bits, bit-pos 22 bits
    StrideLen { s0: 6, s1: 6, s2: 6 }, // 11: index 18 bits, bit-pos 23 bits
    StrideLen { s0: 7, s1: 6, s2: 6 }, // 12: index 19 bits, bit-pos 24 bits
    StrideLen { s0: 7, s1: 7, s2: 6 }, // 13: index 20 bits, bit-pos 25 bits
    StrideLen { s0: 7, s1: 7, s2: 7 }, // 14: index 21 bits, bit-pos 26 bits
    StrideLen { s0: 8, s1: 7, s2: 7 }, // 15: index 22 bits, bit-pos 27 bits
    StrideLen { s0: 8, s1: 8, s2: 7 }, // 16: index 23 bits, bit-pos 28 bits
    StrideLen { s0: 8, s1: 8, s2: 8 }, // 17: index 24 bits, bit-pos 29 bits
];

/// Picks the smallest table row whose capacity covers `max_bit_pos`:
/// the smallest row `i` whose `2^(12+i) - 1` capacity is at least
/// `max_bit_pos`, consistent with the per-row comments above. See
/// DESIGN.md for the reasoning behind this exact bucket boundary.
pub(crate) fn choose_strides(max_bit_pos: u32) -> Result<(u8, u8, u8), BitmapAllocError> {
    if max_bit_pos >= (1u32 << MAX_ADDRESSABLE_BITS) {
        return Err(BitmapAllocError::MaxPosTooLarge {
            max_pos: max_bit_pos,
        });
    }
    let required_bits = if max_bit_pos == 0 {
        MIN_ADDRESSABLE_BITS
    } else {
        (32 - max_bit_pos.leading_zeros()).max(MIN_ADDRESSABLE_BITS)
    };
    let idx = ((required_bits - MIN_ADDRESSABLE_BITS) as usize).min(STRIDES.len() - 1);
    let row = &STRIDES[idx];
    Ok((row.s0, row.s1, row.s2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_smallest_covering_row() {
        let (s0, s1, s2) = choose_strides(0).unwrap();
        assert_eq!((s0, s1, s2), (3, 2, 2));

        let (s0, s1, s2) = choose_strides((1 << 12) - 1).unwrap();
        assert_eq!((s0, s1, s2), (3, 2, 2));

        let (s0, s1, s2) = choose_strides(1 << 12).unwrap();
        assert_eq!((s0, s1, s2), (4, 2, 2));
    }

    #[test]
    fn rejects_too_large() {
        assert!(choose_strides(1 << 29).is_err());
        assert!(choose_strides(u32::MAX).is_err());
    }
}
