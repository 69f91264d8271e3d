//! Sign-bit reinterpretation for unsigned columns.
//!
//! The wire format only has signed integers. An unsigned value `v` of width `w` is persisted as
//! the signed value `v XOR signBit(w)`, and the column carries a bias of `signBit(w)` with scale
//! `1` so that schema-agnostic readers recover the unsigned value as `stored + bias`.
//!
//! There is exactly one pair of functions per width. They are used for ordinary values and for
//! NULL sentinels, and nowhere else.

/// Sign bit of an 8-bit integer.
pub const SIGN_BIT_8: u8 = 1 << 7;
/// Sign bit of a 16-bit integer.
pub const SIGN_BIT_16: u16 = 1 << 15;
/// Sign bit of a 32-bit integer.
pub const SIGN_BIT_32: u32 = 1 << 31;
/// Sign bit of a 64-bit integer.
pub const SIGN_BIT_64: u64 = 1 << 63;

/// Returns the sign bit for an integer of `byte_width` bytes, or `None` for other widths.
pub const fn sign_bit(byte_width: usize) -> Option<u64> {
    match byte_width {
        1 => Some(SIGN_BIT_8 as u64),
        2 => Some(SIGN_BIT_16 as u64),
        4 => Some(SIGN_BIT_32 as u64),
        8 => Some(SIGN_BIT_64),
        _ => None,
    }
}

/// `u8` to its stored `i8`.
#[allow(clippy::cast_possible_wrap)]
pub const fn u8_to_stored(value: u8) -> i8 {
    (value ^ SIGN_BIT_8) as i8
}

/// Stored `i8` back to `u8`.
#[allow(clippy::cast_sign_loss)]
pub const fn stored_to_u8(stored: i8) -> u8 {
    (stored as u8) ^ SIGN_BIT_8
}

/// `u16` to its stored `i16`.
#[allow(clippy::cast_possible_wrap)]
pub const fn u16_to_stored(value: u16) -> i16 {
    (value ^ SIGN_BIT_16) as i16
}

/// Stored `i16` back to `u16`.
#[allow(clippy::cast_sign_loss)]
pub const fn stored_to_u16(stored: i16) -> u16 {
    (stored as u16) ^ SIGN_BIT_16
}

/// `u32` to its stored `i32`.
#[allow(clippy::cast_possible_wrap)]
pub const fn u32_to_stored(value: u32) -> i32 {
    (value ^ SIGN_BIT_32) as i32
}

/// Stored `i32` back to `u32`.
#[allow(clippy::cast_sign_loss)]
pub const fn stored_to_u32(stored: i32) -> u32 {
    (stored as u32) ^ SIGN_BIT_32
}

/// `u64` to its stored `i64`.
#[allow(clippy::cast_possible_wrap)]
pub const fn u64_to_stored(value: u64) -> i64 {
    (value ^ SIGN_BIT_64) as i64
}

/// Stored `i64` back to `u64`.
#[allow(clippy::cast_sign_loss)]
pub const fn stored_to_u64(stored: i64) -> u64 {
    (stored as u64) ^ SIGN_BIT_64
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn spec_example_u32() {
        let stored = u32_to_stored(3_000_000_000);
        assert_eq!(stored as u32, 3_000_000_000 ^ 0x8000_0000);
        assert_eq!(stored, 852_516_352);
        assert_eq!(stored_to_u32(stored), 3_000_000_000);
    }

    #[test]
    fn stored_plus_bias_recovers_value() {
        // what a generic reader does with TZERO/TSCAL
        let stored = u16_to_stored(40_000);
        assert_eq!(i64::from(stored) + i64::from(SIGN_BIT_16), 40_000);
        let stored = u64_to_stored(u64::MAX);
        assert_eq!(i128::from(stored) + i128::from(SIGN_BIT_64), i128::from(u64::MAX));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(127)]
    #[case(128)]
    #[case(255)]
    fn u8_round_trip(#[case] v: u8) {
        assert_eq!(stored_to_u8(u8_to_stored(v)), v);
    }

    #[test]
    fn extremes_map_to_signed_extremes() {
        assert_eq!(u8_to_stored(0), i8::MIN);
        assert_eq!(u8_to_stored(u8::MAX), i8::MAX);
        assert_eq!(u16_to_stored(0), i16::MIN);
        assert_eq!(u32_to_stored(u32::MAX), i32::MAX);
        assert_eq!(u64_to_stored(0), i64::MIN);
        assert_eq!(stored_to_u64(i64::MAX), u64::MAX);
    }

    #[test]
    fn sign_bits() {
        assert_eq!(sign_bit(1), Some(128));
        assert_eq!(sign_bit(2), Some(32_768));
        assert_eq!(sign_bit(4), Some(2_147_483_648));
        assert_eq!(sign_bit(8), Some(9_223_372_036_854_775_808));
        assert_eq!(sign_bit(3), None);
    }
}
