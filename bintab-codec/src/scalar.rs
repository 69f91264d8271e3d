use std::any::type_name;
use std::fmt::Display;

use bintab_dtype::unsigned::{
    stored_to_u8, stored_to_u16, stored_to_u32, stored_to_u64, u8_to_stored, u16_to_stored,
    u32_to_stored, u64_to_stored,
};
use bintab_error::{BintabResult, bintab_err};
use num_traits::{AsPrimitive, Num, NumCast, ToPrimitive};

use crate::byteorder::{copy_from_wire, copy_to_wire};

/// A fixed-width number that takes part in numeric conversions.
pub trait Numeric: Copy + Display + PartialOrd + Num + NumCast + ToPrimitive + 'static {
    /// Whether this is an IEEE float.
    const IS_FLOAT: bool;
    /// Bytes per value.
    const WIDTH: usize;
    /// Smallest value, for integers.
    const MIN_INT: i128;
    /// Largest value, for integers.
    const MAX_INT: i128;
    /// Most negative finite value, for floats.
    const LOWEST: f64;
    /// Largest finite value, for floats.
    const HIGHEST: f64;
}

macro_rules! integer {
    ($T:ty) => {
        impl Numeric for $T {
            const IS_FLOAT: bool = false;
            const WIDTH: usize = size_of::<$T>();
            const MIN_INT: i128 = <$T>::MIN as i128;
            const MAX_INT: i128 = <$T>::MAX as i128;
            const LOWEST: f64 = <$T>::MIN as f64;
            const HIGHEST: f64 = <$T>::MAX as f64;
        }
    };
}

macro_rules! float {
    ($T:ty) => {
        impl Numeric for $T {
            const IS_FLOAT: bool = true;
            const WIDTH: usize = size_of::<$T>();
            const MIN_INT: i128 = 0;
            const MAX_INT: i128 = 0;
            const LOWEST: f64 = <$T>::MIN as f64;
            const HIGHEST: f64 = <$T>::MAX as f64;
        }
    };
}

integer!(i8);
integer!(u8);
integer!(i16);
integer!(u16);
integer!(i32);
integer!(u32);
integer!(i64);
integer!(u64);
float!(f32);
float!(f64);

/// A numeric value as carried on the wire.
///
/// Signed integers and floats are copied in wire byte order. Unsigned integers additionally pass
/// through the sign-bit reinterpretation of [`bintab_dtype::unsigned`].
pub trait WireScalar: Numeric {
    /// Reads one value from exactly [`Numeric::WIDTH`] wire bytes.
    fn read_wire(wire: &[u8]) -> Self;

    /// Writes one value into exactly [`Numeric::WIDTH`] wire bytes.
    fn write_wire(self, wire: &mut [u8]);
}

macro_rules! plain_wire_scalar {
    ($T:ty) => {
        impl WireScalar for $T {
            #[inline(always)]
            fn read_wire(wire: &[u8]) -> Self {
                let mut native = [0u8; size_of::<$T>()];
                copy_from_wire(&wire[..size_of::<$T>()], &mut native);
                <$T>::from_ne_bytes(native)
            }

            #[inline(always)]
            fn write_wire(self, wire: &mut [u8]) {
                copy_to_wire(&self.to_ne_bytes(), &mut wire[..size_of::<$T>()]);
            }
        }
    };
}

macro_rules! unsigned_wire_scalar {
    ($T:ty, $Stored:ty, $to_stored:ident, $from_stored:ident) => {
        impl WireScalar for $T {
            #[inline(always)]
            fn read_wire(wire: &[u8]) -> Self {
                $from_stored(<$Stored>::read_wire(wire))
            }

            #[inline(always)]
            fn write_wire(self, wire: &mut [u8]) {
                $to_stored(self).write_wire(wire)
            }
        }
    };
}

plain_wire_scalar!(i8);
plain_wire_scalar!(i16);
plain_wire_scalar!(i32);
plain_wire_scalar!(i64);
plain_wire_scalar!(f32);
plain_wire_scalar!(f64);
unsigned_wire_scalar!(u8, i8, u8_to_stored, stored_to_u8);
unsigned_wire_scalar!(u16, i16, u16_to_stored, stored_to_u16);
unsigned_wire_scalar!(u32, i32, u32_to_stored, stored_to_u32);
unsigned_wire_scalar!(u64, i64, u64_to_stored, stored_to_u64);

/// Whether every value of `S` is representable as a `D`, so the conversion needs no range check.
///
/// Integer to float counts as widening: precision may drop but the range always fits.
pub fn never_overflows<S: Numeric, D: Numeric>() -> bool {
    match (S::IS_FLOAT, D::IS_FLOAT) {
        (false, false) => D::MIN_INT <= S::MIN_INT && S::MAX_INT <= D::MAX_INT,
        (false, true) => true,
        (true, false) => false,
        (true, true) => S::WIDTH <= D::WIDTH,
    }
}

/// Range-checked conversion. Returns `None` when `value` falls below the minimum or above the
/// maximum of `D`, or has no integer value at all (NaN into an integer).
///
/// Float narrowing only rejects finite values outside the destination range; NaN and the
/// infinities pass through unchanged.
pub fn narrow<S: Numeric, D: Numeric>(value: S) -> Option<D> {
    if S::IS_FLOAT && D::IS_FLOAT {
        let wide = value.to_f64()?;
        if wide.is_finite() && (wide < D::LOWEST || wide > D::HIGHEST) {
            return None;
        }
    }
    <D as NumCast>::from(value)
}

/// Converts one value, checking the range only when `CHECKED` is set.
///
/// The unchecked form is selected when [`never_overflows`] holds and cannot fail.
#[inline(always)]
pub(crate) fn convert<S, D, const CHECKED: bool>(value: S) -> BintabResult<D>
where
    S: Numeric + AsPrimitive<D>,
    D: Numeric,
{
    if !CHECKED {
        return Ok(value.as_());
    }
    narrow(value).ok_or_else(|| {
        bintab_err!(
            Overflow: "value {} out of range for {}",
            value,
            type_name::<D>()
        )
    })
}
