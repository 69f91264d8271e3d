//! Fixed-width string columns.
//!
//! Each element occupies exactly `width` bytes. Short strings are right-padded with spaces. An
//! empty string is written as a leading zero byte, the column's NULL marker, with the rest of the
//! field zeroed. Decoding stops at the first zero byte and trims trailing spaces.

use bintab_dtype::NativeBuffer;
use bintab_error::BintabResult;

use crate::{native_slice, native_slice_mut};

/// Padding byte for short strings.
pub const PAD: u8 = b' ';
/// The NULL marker written for empty strings.
pub const NULL_MARKER: u8 = 0;

/// Decodes one fixed-width field.
pub fn decode_field(field: &[u8]) -> String {
    let end = field
        .iter()
        .position(|b| *b == NULL_MARKER)
        .unwrap_or(field.len());
    let trimmed = field[..end]
        .iter()
        .rposition(|b| *b != PAD)
        .map_or(0, |last| last + 1);
    String::from_utf8_lossy(&field[..trimmed]).into_owned()
}

/// Encodes one value into a fixed-width field, truncating anything beyond the field width.
pub fn encode_field(value: &str, field: &mut [u8]) {
    if value.is_empty() {
        field.fill(NULL_MARKER);
        return;
    }
    let bytes = value.as_bytes();
    let copied = bytes.len().min(field.len());
    field[..copied].copy_from_slice(&bytes[..copied]);
    field[copied..].fill(PAD);
}

pub(crate) fn decode(
    wire: &[u8],
    width: usize,
    out: &mut NativeBuffer,
    count: usize,
) -> BintabResult<()> {
    if width == 0 {
        return Ok(());
    }
    let dst = native_slice_mut::<String>(out)?;
    for (slot, field) in dst.iter_mut().zip(wire.chunks_exact(width)).take(count) {
        *slot = decode_field(field);
    }
    Ok(())
}

pub(crate) fn encode(
    values: &NativeBuffer,
    wire: &mut [u8],
    width: usize,
    count: usize,
) -> BintabResult<()> {
    if width == 0 {
        return Ok(());
    }
    let src = native_slice::<String>(values)?;
    for (value, field) in src.iter().take(count).zip(wire.chunks_exact_mut(width)) {
        encode_field(value, field);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn short_strings_are_space_padded() {
        let mut field = [0xffu8; 6];
        encode_field("ab", &mut field);
        assert_eq!(&field, b"ab    ");
        assert_eq!(decode_field(&field), "ab");
    }

    #[test]
    fn empty_string_is_null_marker() {
        let mut field = [0xffu8; 6];
        encode_field("", &mut field);
        assert_eq!(field[0], 0);
        assert_eq!(decode_field(&field), "");
    }

    #[test]
    fn long_strings_are_truncated() {
        let mut field = [0u8; 4];
        encode_field("abcdef", &mut field);
        assert_eq!(&field, b"abcd");
        assert_eq!(decode_field(&field), "abcd");
    }

    #[rstest]
    #[case(b"  ".as_slice(), "")]
    #[case(b" a ".as_slice(), " a")]
    #[case(b"ab\0zz".as_slice(), "ab")]
    #[case(b"a b\0".as_slice(), "a b")]
    fn decode_trims_and_terminates(#[case] field: &[u8], #[case] expected: &str) {
        assert_eq!(decode_field(field), expected);
    }

    #[test]
    fn vector_of_strings() {
        let values = NativeBuffer::String(vec!["x".into(), String::new(), "yz".into()]);
        let mut wire = vec![0u8; 9];
        encode(&values, &mut wire, 3, 3).unwrap();
        assert_eq!(&wire, b"x  \0\0\0yz ");

        let mut out = NativeBuffer::String(vec!["keep".into(); 4]);
        decode(&wire, 3, &mut out, 3).unwrap();
        assert_eq!(
            out,
            NativeBuffer::String(vec!["x".into(), String::new(), "yz".into(), "keep".into()])
        );
    }
}
