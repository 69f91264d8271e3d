use std::fmt::Debug;

use bintab_dtype::{NativeBuffer, NativeType, NativeValue, WireType};
use bintab_error::BintabError;
use rstest::rstest;

use crate::{encode_blank, resolve};

fn round_trip<T: NativeValue>(wire: WireType, values: Vec<T>) -> Vec<T> {
    let count = values.len();
    let codec = resolve(wire, T::NATIVE).unwrap();
    let mut bytes = vec![0u8; wire.byte_width() * count];
    codec
        .encode(&T::into_buffer(values), &mut bytes, count)
        .unwrap();
    let mut out = T::into_buffer(vec![T::default(); count]);
    codec.decode(&bytes, &mut out, count).unwrap();
    out.as_slice::<T>().unwrap().to_vec()
}

#[rstest]
#[case(WireType::Int8, vec![i8::MIN, -1, 0, i8::MAX])]
#[case(WireType::Int16, vec![i8::MIN, 0, 7])]
#[case(WireType::Int64, vec![-100i8, 100])]
#[case(WireType::Float32, vec![-128i8, 127])]
fn i8_round_trips(#[case] wire: WireType, #[case] values: Vec<i8>) {
    let expected = values.clone();
    assert_eq!(round_trip(wire, values), expected);
}

fn assert_round_trip<T: NativeValue + Debug>(wire: WireType, values: Vec<T>) {
    let expected = values.clone();
    assert_eq!(round_trip(wire, values), expected, "{wire} <-> {}", T::NATIVE);
}

#[rstest]
#[case(WireType::UInt8)]
#[case(WireType::Int16)]
#[case(WireType::UInt16)]
#[case(WireType::Int32)]
#[case(WireType::UInt32)]
#[case(WireType::Int64)]
#[case(WireType::UInt64)]
#[case(WireType::Float32)]
#[case(WireType::Float64)]
fn small_unsigned_values_round_trip_everywhere(#[case] wire: WireType) {
    assert_round_trip(wire, vec![0u8, 1, 100, 255]);
    assert_round_trip(wire, vec![0u16, 1, 255]);
    assert_round_trip(wire, vec![0i32, 1, 127]);
    assert_round_trip(wire, vec![0.0f64, 1.0, 255.0]);
    assert_round_trip(wire, vec![false, true]);
}

#[test]
fn full_width_round_trips() {
    assert_round_trip(WireType::UInt16, vec![0u16, 32_767, 32_768, u16::MAX]);
    assert_round_trip(WireType::Int32, vec![i32::MIN, -1, i32::MAX]);
    assert_round_trip(WireType::UInt32, vec![0u32, 3_000_000_000, u32::MAX]);
    assert_round_trip(WireType::Int64, vec![i64::MIN, i64::MAX]);
    assert_round_trip(WireType::UInt64, vec![0u64, 1 << 63, u64::MAX]);
    assert_round_trip(WireType::Float64, vec![f64::MIN, -0.5, f64::MAX]);
    assert_round_trip(WireType::Float32, vec![f32::MIN, 1.25, f32::MAX]);
    assert_round_trip(WireType::Float64, vec![1.25f32, f32::MAX]);
    assert_round_trip(WireType::Int64, vec![u32::MAX]);
    assert_round_trip(WireType::UInt64, vec![i64::MAX]);
}

#[test]
fn logical_and_string_round_trips() {
    assert_round_trip(WireType::Logical, vec![true, false, true]);
    assert_round_trip(WireType::Logical, vec![0u16, 1, 1]);
    assert_round_trip(
        WireType::FixedString(5),
        vec!["alpha".to_string(), String::new(), "b".to_string()],
    );
}

#[test]
fn unsigned_raw_wire_value() {
    let codec = resolve(WireType::UInt32, NativeType::U32).unwrap();
    let mut bytes = [0u8; 4];
    codec
        .encode(&NativeBuffer::U32(vec![3_000_000_000]), &mut bytes, 1)
        .unwrap();
    assert_eq!(i32::from_be_bytes(bytes) as u32, 3_000_000_000 ^ 0x8000_0000);
}

#[test]
fn overflow_on_narrowing_encode() {
    let codec = resolve(WireType::UInt8, NativeType::I32).unwrap();
    let mut bytes = [0xaau8; 2];
    let err = codec
        .encode(&NativeBuffer::I32(vec![300, 1]), &mut bytes, 2)
        .unwrap_err();
    assert!(matches!(err, BintabError::Overflow(..)));

    let err = codec
        .encode(&NativeBuffer::I32(vec![-1]), &mut bytes, 1)
        .unwrap_err();
    assert!(matches!(err, BintabError::Overflow(..)));
}

#[test]
fn overflow_on_narrowing_decode_leaves_location_untouched() {
    let encoder = resolve(WireType::Int32, NativeType::I32).unwrap();
    let mut bytes = [0u8; 8];
    encoder
        .encode(&NativeBuffer::I32(vec![5, 70_000]), &mut bytes, 2)
        .unwrap();

    let decoder = resolve(WireType::Int32, NativeType::I16).unwrap();
    let mut out = NativeBuffer::I16(vec![-1, -1]);
    let err = decoder.decode(&bytes, &mut out, 2).unwrap_err();
    assert!(matches!(err, BintabError::Overflow(..)));
    assert_eq!(out, NativeBuffer::I16(vec![-1, -1]));
}

#[test]
fn nan_survives_float_columns() {
    let out = round_trip(WireType::Float32, vec![f32::NAN]);
    assert!(out[0].is_nan());
    let out = round_trip(WireType::Float32, vec![f64::NAN]);
    assert!(out[0].is_nan());
}

#[test]
fn nan_into_integer_overflows() {
    let codec = resolve(WireType::Int32, NativeType::F64).unwrap();
    let mut bytes = [0u8; 4];
    let err = codec
        .encode(&NativeBuffer::F64(vec![f64::NAN]), &mut bytes, 1)
        .unwrap_err();
    assert!(matches!(err, BintabError::Overflow(..)));
}

#[test]
fn decode_fewer_elements_than_location() {
    let codec = resolve(WireType::Int16, NativeType::I16).unwrap();
    let mut bytes = [0u8; 4];
    codec
        .encode(&NativeBuffer::I16(vec![1, 2]), &mut bytes, 2)
        .unwrap();
    let mut out = NativeBuffer::I16(vec![9, 9, 9, 9]);
    codec.decode(&bytes, &mut out, 2).unwrap();
    assert_eq!(out, NativeBuffer::I16(vec![1, 2, 9, 9]));
}

#[rstest]
#[case(WireType::FixedString(3), NativeType::I32)]
#[case(WireType::Int32, NativeType::String)]
#[case(WireType::Logical, NativeType::F32)]
#[case(WireType::Float64, NativeType::String)]
#[case(WireType::FixedString(3), NativeType::Bool)]
#[case(WireType::Logical, NativeType::String)]
#[case(WireType::Logical, NativeType::F64)]
fn unsupported_pairs_are_rejected(#[case] wire: WireType, #[case] native: NativeType) {
    let err = resolve(wire, native).unwrap_err();
    assert!(matches!(err, BintabError::SchemaMismatch(..)));
}

#[test]
fn wrong_location_type_is_a_mismatch() {
    let codec = resolve(WireType::Int32, NativeType::I32).unwrap();
    let mut bytes = [0u8; 4];
    let err = codec
        .encode(&NativeBuffer::I64(vec![1]), &mut bytes, 1)
        .unwrap_err();
    assert!(matches!(err, BintabError::SchemaMismatch(..)));
}

#[test]
fn blank_encodings_decode_to_defaults() {
    let mut bytes = [0xffu8; 4];
    encode_blank(WireType::UInt16, &mut bytes);
    assert_eq!(bytes, [0x80, 0, 0x80, 0]);
    let mut out = NativeBuffer::U16(vec![7, 7]);
    resolve(WireType::UInt16, NativeType::U16)
        .unwrap()
        .decode(&bytes, &mut out, 2)
        .unwrap();
    assert_eq!(out, NativeBuffer::U16(vec![0, 0]));

    let mut bytes = [0xffu8; 3];
    encode_blank(WireType::FixedString(3), &mut bytes);
    assert_eq!(bytes, [0, 0, 0]);

    let mut bytes = [0xffu8; 8];
    encode_blank(WireType::Float64, &mut bytes);
    assert_eq!(bytes, [0; 8]);
}
