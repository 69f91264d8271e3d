//! Numeric wire types against numeric and boolean native types.

use bintab_dtype::{NativeBuffer, NativeValue};
use bintab_error::BintabResult;
use num_traits::AsPrimitive;

use crate::scalar::{Numeric, WireScalar, convert};
use crate::{native_slice, native_slice_mut};

/// Decodes up to `count` wire elements into the leading elements of `out`.
///
/// With `CHECKED`, the whole run is converted before `out` is touched, so a range failure leaves
/// the location unchanged.
pub(crate) fn decode<W, N, const CHECKED: bool>(
    wire: &[u8],
    _width: usize,
    out: &mut NativeBuffer,
    count: usize,
) -> BintabResult<()>
where
    W: WireScalar + AsPrimitive<N>,
    N: Numeric + NativeValue,
{
    let dst = native_slice_mut::<N>(out)?;
    let elements = wire.chunks_exact(W::WIDTH).take(count);
    if CHECKED {
        let staged = elements
            .map(|chunk| convert::<W, N, true>(W::read_wire(chunk)))
            .collect::<BintabResult<Vec<N>>>()?;
        for (slot, value) in dst.iter_mut().zip(staged) {
            *slot = value;
        }
    } else {
        for (slot, chunk) in dst.iter_mut().zip(elements) {
            *slot = W::read_wire(chunk).as_();
        }
    }
    Ok(())
}

/// Encodes up to `count` leading elements of `values` into consecutive wire elements.
pub(crate) fn encode<W, N, const CHECKED: bool>(
    values: &NativeBuffer,
    wire: &mut [u8],
    _width: usize,
    count: usize,
) -> BintabResult<()>
where
    W: WireScalar,
    N: Numeric + NativeValue + AsPrimitive<W>,
{
    let src = native_slice::<N>(values)?;
    for (value, chunk) in src.iter().take(count).zip(wire.chunks_exact_mut(W::WIDTH)) {
        convert::<N, W, CHECKED>(*value)?.write_wire(chunk);
    }
    Ok(())
}

/// Any nonzero wire value reads as `true`.
pub(crate) fn decode_bool<W: WireScalar>(
    wire: &[u8],
    _width: usize,
    out: &mut NativeBuffer,
    count: usize,
) -> BintabResult<()> {
    let dst = native_slice_mut::<bool>(out)?;
    for (slot, chunk) in dst
        .iter_mut()
        .zip(wire.chunks_exact(W::WIDTH))
        .take(count)
    {
        *slot = !W::read_wire(chunk).is_zero();
    }
    Ok(())
}

/// `true` is written as one, `false` as zero.
pub(crate) fn encode_bool<W: WireScalar>(
    values: &NativeBuffer,
    wire: &mut [u8],
    _width: usize,
    count: usize,
) -> BintabResult<()> {
    let src = native_slice::<bool>(values)?;
    for (value, chunk) in src.iter().take(count).zip(wire.chunks_exact_mut(W::WIDTH)) {
        let scalar = if *value { W::one() } else { W::zero() };
        scalar.write_wire(chunk);
    }
    Ok(())
}

/// Writes the encoding of numeric zero into every element of `wire`.
pub(crate) fn encode_zero<W: WireScalar>(wire: &mut [u8]) {
    for chunk in wire.chunks_exact_mut(W::WIDTH) {
        W::zero().write_wire(chunk);
    }
}
