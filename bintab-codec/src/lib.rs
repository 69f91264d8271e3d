#![deny(missing_docs)]

//! The conversion matrix between bintab wire types and native Rust values.
//!
//! For every supported `(WireType, NativeType)` pair, [`resolve`] selects a monomorphic decode
//! and encode function once, typically when a caller binds a location to a column. The returned
//! [`CodecPair`] then loops over a column's elements with no further dispatch.
//!
//! # Overflow
//!
//! Conversions that can lose range are compiled with a range check. A value outside the
//! destination range fails with [`BintabError::Overflow`] before anything is written. Widening
//! conversions are compiled without the check and cannot fail.
//!
//! # Byte order
//!
//! Wire values are big-endian. See [`byteorder`].

use std::fmt::{Debug, Formatter};

use bintab_dtype::{
    NativeBuffer, NativeType, NativeValue, NumericNativeType, NumericWireType, WireType,
    match_each_integer_native_type, match_each_numeric_native_type, match_each_numeric_wire_type,
};
use bintab_error::{BintabError, BintabResult, bintab_bail, bintab_err};

pub mod byteorder;
mod logical;
pub mod null;
mod numeric;
mod scalar;
pub mod string;

pub use logical::{FALSE, TRUE};
pub use scalar::{Numeric, WireScalar, narrow, never_overflows};

/// Decodes `count` elements from wire bytes into a native location.
///
/// Arguments are the column's wire bytes, the byte width of one element, the destination and the
/// number of elements to convert.
pub type DecodeFn = fn(&[u8], usize, &mut NativeBuffer, usize) -> BintabResult<()>;

/// Encodes `count` elements from a native location into wire bytes.
///
/// Arguments are the source, the column's wire bytes, the byte width of one element and the
/// number of elements to convert.
pub type EncodeFn = fn(&NativeBuffer, &mut [u8], usize, usize) -> BintabResult<()>;

/// The decode and encode functions for one `(WireType, NativeType)` pair.
#[derive(Clone, Copy)]
pub struct CodecPair {
    wire: WireType,
    native: NativeType,
    decode: DecodeFn,
    encode: EncodeFn,
}

impl CodecPair {
    /// The wire side of the pair.
    pub fn wire_type(&self) -> WireType {
        self.wire
    }

    /// The native side of the pair.
    pub fn native_type(&self) -> NativeType {
        self.native
    }

    /// Decodes `count` elements of `wire` into the leading elements of `out`.
    ///
    /// Elements of `out` beyond `count` are left untouched. On error, `out` is unchanged.
    #[inline]
    pub fn decode(&self, wire: &[u8], out: &mut NativeBuffer, count: usize) -> BintabResult<()> {
        (self.decode)(wire, self.wire.byte_width(), out, count)
    }

    /// Encodes the leading `count` elements of `values` into `wire`.
    #[inline]
    pub fn encode(&self, values: &NativeBuffer, wire: &mut [u8], count: usize) -> BintabResult<()> {
        (self.encode)(values, wire, self.wire.byte_width(), count)
    }
}

impl Debug for CodecPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecPair")
            .field("wire", &self.wire)
            .field("native", &self.native)
            .finish()
    }
}

/// Resolves the codec pair for a wire type and a native type.
///
/// Fails with [`BintabError::SchemaMismatch`] when no conversion exists, e.g. between a string
/// column and a numeric location.
pub fn resolve(wire: WireType, native: NativeType) -> BintabResult<CodecPair> {
    let pair: Option<(DecodeFn, EncodeFn)> = match (wire, native) {
        (WireType::FixedString(_), NativeType::String) => {
            Some((string::decode as DecodeFn, string::encode as EncodeFn))
        }
        (WireType::Logical, NativeType::Bool) => Some((
            logical::decode_bool as DecodeFn,
            logical::encode_bool as EncodeFn,
        )),
        (WireType::Logical, n) => n.as_integer().map(|n| {
            match_each_integer_native_type!(n, |$N| {
                (logical::decode::<$N> as DecodeFn, logical::encode::<$N> as EncodeFn)
            })
        }),
        (w, NativeType::Bool) => w.as_numeric().map(|w| {
            match_each_numeric_wire_type!(w, |$W| {
                (numeric::decode_bool::<$W> as DecodeFn, numeric::encode_bool::<$W> as EncodeFn)
            })
        }),
        (w, n) => w
            .as_numeric()
            .zip(n.as_numeric())
            .map(|(w, n)| numeric_pair(w, n)),
    };
    let Some((decode, encode)) = pair else {
        bintab_bail!(
            SchemaMismatch: "no conversion between wire type {} and native type {}",
            wire,
            native
        )
    };
    Ok(CodecPair {
        wire,
        native,
        decode,
        encode,
    })
}

fn numeric_pair(wire: NumericWireType, native: NumericNativeType) -> (DecodeFn, EncodeFn) {
    match_each_numeric_wire_type!(wire, |$W| {
        match_each_numeric_native_type!(native, |$N| {
            let decode: DecodeFn = if never_overflows::<$W, $N>() {
                numeric::decode::<$W, $N, false>
            } else {
                numeric::decode::<$W, $N, true>
            };
            let encode: EncodeFn = if never_overflows::<$N, $W>() {
                numeric::encode::<$W, $N, false>
            } else {
                numeric::encode::<$W, $N, true>
            };
            (decode, encode)
        })
    })
}

/// Writes the encoding of a default native value into every element of a column's wire bytes.
///
/// Numeric columns get zero (for unsigned columns that is the biased pattern, not zero bytes).
/// Logical and string columns get zero bytes, which decode as `false` and the empty string.
pub fn encode_blank(wire_type: WireType, wire: &mut [u8]) {
    match wire_type.as_numeric() {
        Some(w) => match_each_numeric_wire_type!(w, |$W| numeric::encode_zero::<$W>(wire)),
        None => wire.fill(0),
    }
}

pub(crate) fn native_slice<T: NativeValue>(values: &NativeBuffer) -> BintabResult<&[T]> {
    values.as_slice::<T>().ok_or_else(|| location_mismatch::<T>(values))
}

pub(crate) fn native_slice_mut<T: NativeValue>(
    values: &mut NativeBuffer,
) -> BintabResult<&mut [T]> {
    let found = values.native_type();
    values.as_mut_slice::<T>().ok_or_else(|| {
        bintab_err!(
            SchemaMismatch: "expected a {} location, found {}",
            T::NATIVE,
            found
        )
    })
}

fn location_mismatch<T: NativeValue>(values: &NativeBuffer) -> BintabError {
    bintab_err!(
        SchemaMismatch: "expected a {} location, found {}",
        T::NATIVE,
        values.native_type()
    )
}

#[cfg(test)]
mod tests;
