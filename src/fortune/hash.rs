//! FNV-1a (32-bit) over UTF-16 code units.
//!
//! Identifiers written to tags are hashed the same way a browser would hash a
//! JavaScript string: one step per UTF-16 code unit, not per UTF-8 byte. Two
//! implementations only agree on `hash("😀")` if they both walk the surrogate
//! pair, so [`fnv1a32`] goes through [`str::encode_utf16`].

/// FNV-1a 32-bit offset basis.
pub const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
/// FNV-1a 32-bit prime.
pub const FNV_PRIME: u32 = 16_777_619;

/// Hash a string with FNV-1a, one round per UTF-16 code unit.
///
/// # Examples
///
/// ```
/// use fortunecookie::fortune::hash::{fnv1a32, FNV_OFFSET_BASIS};
///
/// assert_eq!(fnv1a32(""), FNV_OFFSET_BASIS);
/// assert_eq!(fnv1a32("foobar"), 0xbf9c_f968);
/// ```
pub fn fnv1a32(s: &str) -> u32 {
    fnv1a32_units(s.encode_utf16())
}

/// Hash an already-encoded sequence of UTF-16 code units.
pub fn fnv1a32_units<I>(units: I) -> u32
where
    I: IntoIterator<Item = u16>,
{
    units.into_iter().fold(FNV_OFFSET_BASIS, |h, unit| {
        (h ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Shift-and-add form of the multiply; both must agree on every input.
    fn fnv1a32_shifts(s: &str) -> u32 {
        let mut h = FNV_OFFSET_BASIS;
        for unit in s.encode_utf16() {
            h ^= u32::from(unit);
            h = h
                .wrapping_add(h << 1)
                .wrapping_add(h << 4)
                .wrapping_add(h << 7)
                .wrapping_add(h << 8)
                .wrapping_add(h << 24);
        }
        h
    }

    #[test]
    fn empty_string_is_offset_basis() {
        assert_eq!(fnv1a32(""), 2_166_136_261);
    }

    #[test]
    fn known_vectors() {
        assert_eq!(fnv1a32("a"), 0xe40c_292c);
        assert_eq!(fnv1a32("foobar"), 0xbf9c_f968);
        assert_eq!(fnv1a32("X"), 0xdd0c_1e27);
        assert_eq!(fnv1a32("TAG123"), 3_831_842_269);
    }

    #[test]
    fn non_ascii_hashes_code_units() {
        // U+00E9 is a single code unit (0x00E9), not the two UTF-8 bytes.
        assert_eq!(fnv1a32("é"), 0x6c0b_6c44);
        // Astral characters hash as their surrogate pair.
        assert_eq!(fnv1a32("😀"), 0xcb31_c4b8);
        assert_eq!(fnv1a32("😀"), fnv1a32_units([0xD83D, 0xDE00]));
    }

    #[test]
    fn shift_form_matches_multiply() {
        for s in ["", "a", "TAG123", "NTAG-215-04A2B3C4D5", "é", "😀", "  spaced  "] {
            assert_eq!(fnv1a32(s), fnv1a32_shifts(s), "mismatch for {:?}", s);
        }
    }

    #[test]
    fn repeated_calls_agree() {
        let first = fnv1a32("NTAG-215-04A2B3C4D5");
        for _ in 0..10 {
            assert_eq!(fnv1a32("NTAG-215-04A2B3C4D5"), first);
        }
    }
}
