//! The static table of 15 enumerated intra-block pixel-reuse patterns.
//!
//! Each entry packs two pieces of information about a 2x2 block's pixels,
//! addressed `0..4` in `[top-left, top-right, bottom-left, bottom-right]`
//! order:
//!
//! - `reuse`: a 4-bit field, bit `(3 - i)` set means pixel `i` is a fresh
//!   palette reference; clear means pixel `i` repeats an earlier pixel of
//!   the same block.
//! - `index_field`: 8 bits, two bits per pixel (pixel 0 at the high pair).
//!   For a pixel whose `reuse` bit is clear, the 2-bit group names which
//!   earlier pixel (0..3) to copy. For a fresh pixel the group is
//!   meaningless — the decoder never reads it — so this table stores zero
//!   there for a canonical, unambiguous representation.
//!
//! Pattern index 15 is not part of this table: it means "every pixel comes
//! from the extended palette" and is handled as a distinct case by both the
//! encoder and decoder (see `DESIGN.md` for why the fresh-bit canonicalization
//! makes patterns 1 and 5 bit-identical — a harmless duplicate, not a bug).

/// One entry of the pattern table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    /// 4-bit reuse bitmap, bit `(3 - i)` = pixel `i`.
    pub reuse: u8,
    /// 8-bit index field, two bits per pixel, pixel 0 at the high pair.
    /// Zero at every fresh-pixel position.
    pub index_field: u8,
}

/// Pattern index reserved for "no SP reference, all fresh pixels come from
/// the extended palette" (alpha keying, or fallback when no table entry
/// matches).
pub const ALL_EXTENDED: u8 = 15;

/// The 15 canonical patterns, indices `0..14`.
pub static TABLE: [Pattern; 15] = [
    Pattern { reuse: 0b1000, index_field: 0x00 }, // 0: AAAA
    Pattern { reuse: 0b1100, index_field: 0x05 }, // 1: A,B,B,B (both tail pixels reuse pixel 1)
    Pattern { reuse: 0b1100, index_field: 0x01 }, // 2: A,B,A,B
    Pattern { reuse: 0b1010, index_field: 0x00 }, // 3
    Pattern { reuse: 0b1001, index_field: 0x00 }, // 4
    Pattern { reuse: 0b1100, index_field: 0x05 }, // 5: bit-identical to 1, kept for table parity with source
    Pattern { reuse: 0b1010, index_field: 0x10 }, // 6
    Pattern { reuse: 0b1100, index_field: 0x04 }, // 7
    Pattern { reuse: 0b1101, index_field: 0x08 }, // 8
    Pattern { reuse: 0b1011, index_field: 0x10 }, // 9
    Pattern { reuse: 0b1110, index_field: 0x00 }, // 10
    Pattern { reuse: 0b1110, index_field: 0x01 }, // 11
    Pattern { reuse: 0b1110, index_field: 0x02 }, // 12
    Pattern { reuse: 0b1101, index_field: 0x04 }, // 13
    Pattern { reuse: 0b1111, index_field: 0x00 }, // 14: all four pixels fresh
];

/// Returns the per-pixel "is fresh" bit (`true` = fresh palette reference).
pub fn is_fresh(reuse: u8, pixel: usize) -> bool {
    (reuse >> (3 - pixel)) & 1 == 1
}

/// Sets or clears the fresh bit for `pixel` in `reuse`.
pub fn set_fresh(reuse: &mut u8, pixel: usize, fresh: bool) {
    let bit = 1u8 << (3 - pixel);
    if fresh {
        *reuse |= bit;
    } else {
        *reuse &= !bit;
    }
}

/// Reads the 2-bit group for `pixel` out of an index field.
pub fn index_group(index_field: u8, pixel: usize) -> u8 {
    (index_field >> ((3 - pixel) * 2)) & 0b11
}

/// Writes a 2-bit group for `pixel` into an index field.
pub fn set_index_group(index_field: &mut u8, pixel: usize, value: u8) {
    let shift = (3 - pixel) * 2;
    let mask = 0b11u8 << shift;
    *index_field = (*index_field & !mask) | ((value & 0b11) << shift);
}

/// Finds the smallest pattern index `0..14` whose `(reuse, index_field)`
/// matches, per the lookup contract: fresh-position bits in `index_field`
/// must already be zeroed by the caller (the encoder always does this), so
/// this is a plain equality scan.
pub fn find(reuse: u8, index_field: u8) -> Option<u8> {
    TABLE
        .iter()
        .position(|p| p.reuse == reuse && p.index_field == index_field)
        .map(|i| i as u8)
}

/// Looks up a pattern's `(reuse, index_field)` by index. Panics if
/// `pattern_index >= 15` — callers must special-case [`ALL_EXTENDED`]
/// themselves, since it has no table entry.
pub fn get(pattern_index: u8) -> Pattern {
    TABLE[pattern_index as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_fresh_bits_are_zeroed_in_table() {
        for p in TABLE.iter() {
            for pixel in 0..4 {
                if is_fresh(p.reuse, pixel) {
                    assert_eq!(index_group(p.index_field, pixel), 0);
                }
            }
        }
    }

    #[test]
    fn pixel_zero_is_always_fresh() {
        for p in TABLE.iter() {
            assert!(is_fresh(p.reuse, 0));
        }
    }

    #[test]
    fn patterns_one_and_five_are_the_only_duplicate() {
        let mut seen = std::collections::HashMap::new();
        let mut dup_count = 0;
        for (i, p) in TABLE.iter().enumerate() {
            if let Some(&first) = seen.get(&(p.reuse, p.index_field)) {
                assert_eq!((first, i), (1usize, 5usize));
                dup_count += 1;
            } else {
                seen.insert((p.reuse, p.index_field), i);
            }
        }
        assert_eq!(dup_count, 1);
    }

    #[test]
    fn find_prefers_smallest_index() {
        // Patterns 1 and 5 are identical; find() must return 1.
        assert_eq!(find(0b1100, 0x05), Some(1));
    }

    #[test]
    fn index_group_round_trips() {
        let mut field = 0u8;
        set_index_group(&mut field, 0, 0b10);
        set_index_group(&mut field, 3, 0b01);
        assert_eq!(index_group(field, 0), 0b10);
        assert_eq!(index_group(field, 3), 0b01);
        assert_eq!(index_group(field, 1), 0);
    }
}
