//! NULL sentinels of integer columns.
//!
//! A sentinel is persisted as a plain signed integer attribute, the same bit pattern the column
//! itself stores. For unsigned columns that means the sentinel passes through the same sign-bit
//! reinterpretation as ordinary values. Float columns use NaN and string columns the zero-byte
//! marker; neither takes an explicit sentinel. Logical columns have no NULL.

use bintab_dtype::unsigned::{
    stored_to_u8, stored_to_u16, stored_to_u32, stored_to_u64, u8_to_stored, u16_to_stored,
    u32_to_stored, u64_to_stored,
};
use bintab_dtype::{NativeBuffer, WireType, match_each_numeric_native_type};
use bintab_error::{BintabResult, bintab_bail, bintab_err};

fn out_of_range(sentinel: i128, wire: WireType) -> bintab_error::BintabError {
    bintab_err!(Overflow: "NULL sentinel {} out of range for wire type {}", sentinel, wire)
}

/// Converts a caller's sentinel into the signed integer persisted in the column's NULL attribute.
pub fn encode_null_sentinel(wire: WireType, sentinel: i128) -> BintabResult<i64> {
    let err = || out_of_range(sentinel, wire);
    Ok(match wire {
        WireType::Int8 => i64::from(i8::try_from(sentinel).map_err(|_| err())?),
        WireType::Int16 => i64::from(i16::try_from(sentinel).map_err(|_| err())?),
        WireType::Int32 => i64::from(i32::try_from(sentinel).map_err(|_| err())?),
        WireType::Int64 => i64::try_from(sentinel).map_err(|_| err())?,
        WireType::UInt8 => i64::from(u8_to_stored(
            u8::try_from(sentinel).map_err(|_| err())?,
        )),
        WireType::UInt16 => i64::from(u16_to_stored(
            u16::try_from(sentinel).map_err(|_| err())?,
        )),
        WireType::UInt32 => i64::from(u32_to_stored(
            u32::try_from(sentinel).map_err(|_| err())?,
        )),
        WireType::UInt64 => u64_to_stored(u64::try_from(sentinel).map_err(|_| err())?),
        other => bintab_bail!(
            SchemaMismatch: "wire type {} does not take an explicit NULL sentinel",
            other
        ),
    })
}

/// Recovers the logical sentinel value from the persisted NULL attribute.
pub fn decode_null_sentinel(wire: WireType, stored: i64) -> BintabResult<i128> {
    let err = || out_of_range(i128::from(stored), wire);
    Ok(match wire {
        WireType::Int8 => i128::from(i8::try_from(stored).map_err(|_| err())?),
        WireType::Int16 => i128::from(i16::try_from(stored).map_err(|_| err())?),
        WireType::Int32 => i128::from(i32::try_from(stored).map_err(|_| err())?),
        WireType::Int64 => i128::from(stored),
        WireType::UInt8 => i128::from(stored_to_u8(
            i8::try_from(stored).map_err(|_| err())?,
        )),
        WireType::UInt16 => i128::from(stored_to_u16(
            i16::try_from(stored).map_err(|_| err())?,
        )),
        WireType::UInt32 => i128::from(stored_to_u32(
            i32::try_from(stored).map_err(|_| err())?,
        )),
        WireType::UInt64 => i128::from(stored_to_u64(stored)),
        other => bintab_bail!(
            SchemaMismatch: "wire type {} does not take an explicit NULL sentinel",
            other
        ),
    })
}

/// Stores a decoded sentinel into the first element of a caller's numeric location.
pub fn write_null_sentinel(sentinel: i128, out: &mut NativeBuffer) -> BintabResult<()> {
    let native = out.native_type();
    let Some(numeric) = native.as_numeric() else {
        bintab_bail!(
            SchemaMismatch: "NULL sentinel cannot be stored in a {} location",
            native
        )
    };
    match_each_numeric_native_type!(numeric, |$N| {
        let value = <$N as num_traits::NumCast>::from(sentinel).ok_or_else(|| {
            bintab_err!(Overflow: "NULL sentinel {} out of range for {}", sentinel, native)
        })?;
        if let Some(first) = out.as_mut_slice::<$N>().and_then(|values| values.first_mut()) {
            *first = value;
        }
    });
    Ok(())
}
