//! Logical columns: one byte per element.
//!
//! Encoding writes `T` or `F`. Decoding treats zero and `F` as false and every other byte as
//! true, which is deliberately more permissive than the encoder.

use bintab_dtype::{NativeBuffer, NativeValue};
use bintab_error::BintabResult;

use crate::scalar::Numeric;
use crate::{native_slice, native_slice_mut};

/// Byte written for `true`.
pub const TRUE: u8 = b'T';
/// Byte written for `false`.
pub const FALSE: u8 = b'F';

#[inline(always)]
fn is_true(byte: u8) -> bool {
    byte != 0 && byte != FALSE
}

#[inline(always)]
fn marker(value: bool) -> u8 {
    if value { TRUE } else { FALSE }
}

pub(crate) fn decode_bool(
    wire: &[u8],
    _width: usize,
    out: &mut NativeBuffer,
    count: usize,
) -> BintabResult<()> {
    let dst = native_slice_mut::<bool>(out)?;
    for (slot, byte) in dst.iter_mut().zip(wire).take(count) {
        *slot = is_true(*byte);
    }
    Ok(())
}

pub(crate) fn encode_bool(
    values: &NativeBuffer,
    wire: &mut [u8],
    _width: usize,
    count: usize,
) -> BintabResult<()> {
    let src = native_slice::<bool>(values)?;
    for (value, byte) in src.iter().take(count).zip(wire.iter_mut()) {
        *byte = marker(*value);
    }
    Ok(())
}

/// Integer locations read one for true and zero for false.
pub(crate) fn decode<N: Numeric + NativeValue>(
    wire: &[u8],
    _width: usize,
    out: &mut NativeBuffer,
    count: usize,
) -> BintabResult<()> {
    let dst = native_slice_mut::<N>(out)?;
    for (slot, byte) in dst.iter_mut().zip(wire).take(count) {
        *slot = if is_true(*byte) { N::one() } else { N::zero() };
    }
    Ok(())
}

/// Any nonzero integer is written as true.
pub(crate) fn encode<N: Numeric + NativeValue>(
    values: &NativeBuffer,
    wire: &mut [u8],
    _width: usize,
    count: usize,
) -> BintabResult<()> {
    let src = native_slice::<N>(values)?;
    for (value, byte) in src.iter().take(count).zip(wire.iter_mut()) {
        *byte = marker(!value.is_zero());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_is_permissive() {
        let wire = [b'T', b'F', 0, 1, b'x'];
        let mut out = NativeBuffer::Bool(vec![false; 5]);
        decode_bool(&wire, 1, &mut out, 5).unwrap();
        assert_eq!(out, NativeBuffer::Bool(vec![true, false, false, true, true]));
    }

    #[test]
    fn encode_writes_markers() {
        let mut wire = [0u8; 3];
        encode_bool(&NativeBuffer::Bool(vec![true, false, true]), &mut wire, 1, 3).unwrap();
        assert_eq!(&wire, b"TFT");
    }

    #[test]
    fn integers_through_logical() {
        let mut wire = [0u8; 3];
        encode::<i32>(&NativeBuffer::I32(vec![0, 7, -1]), &mut wire, 1, 3).unwrap();
        assert_eq!(&wire, b"FTT");

        let mut out = NativeBuffer::I32(vec![9; 3]);
        decode::<i32>(&wire, 1, &mut out, 3).unwrap();
        assert_eq!(out, NativeBuffer::I32(vec![0, 1, 1]));
    }
}
