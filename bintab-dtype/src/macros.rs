/// Expands `$body` once per [`NumericNativeType`][crate::NumericNativeType], with `$T` bound to
/// the matching Rust type.
///
/// ```ignore
/// if let Some(numeric) = native.as_numeric() {
///     match_each_numeric_native_type!(numeric, |$T| size_of::<$T>())
/// }
/// ```
#[macro_export]
macro_rules! match_each_numeric_native_type {
    ($self:expr, | $_:tt $enc:ident | $($body:tt)*) => ({
        macro_rules! __with__ {( $_ $enc:ident ) => ( $($body)* )}
        use $crate::NumericNativeType;
        match $self {
            NumericNativeType::I8 => __with__! { i8 },
            NumericNativeType::U8 => __with__! { u8 },
            NumericNativeType::I16 => __with__! { i16 },
            NumericNativeType::U16 => __with__! { u16 },
            NumericNativeType::I32 => __with__! { i32 },
            NumericNativeType::U32 => __with__! { u32 },
            NumericNativeType::I64 => __with__! { i64 },
            NumericNativeType::U64 => __with__! { u64 },
            NumericNativeType::F32 => __with__! { f32 },
            NumericNativeType::F64 => __with__! { f64 },
        }
    })
}

/// Like [`match_each_numeric_native_type`] but over
/// [`IntegerNativeType`][crate::IntegerNativeType].
#[macro_export]
macro_rules! match_each_integer_native_type {
    ($self:expr, | $_:tt $enc:ident | $($body:tt)*) => ({
        macro_rules! __with__ {( $_ $enc:ident ) => ( $($body)* )}
        use $crate::IntegerNativeType;
        match $self {
            IntegerNativeType::I8 => __with__! { i8 },
            IntegerNativeType::U8 => __with__! { u8 },
            IntegerNativeType::I16 => __with__! { i16 },
            IntegerNativeType::U16 => __with__! { u16 },
            IntegerNativeType::I32 => __with__! { i32 },
            IntegerNativeType::U32 => __with__! { u32 },
            IntegerNativeType::I64 => __with__! { i64 },
            IntegerNativeType::U64 => __with__! { u64 },
        }
    })
}

/// Expands `$body` once per [`NumericWireType`][crate::NumericWireType], with `$W` bound to the
/// Rust type that carries the column's logical values.
///
/// Unsigned wire types bind to the unsigned Rust type; the sign-bit bias is applied by the codec
/// when the value crosses the wire.
#[macro_export]
macro_rules! match_each_numeric_wire_type {
    ($self:expr, | $_:tt $enc:ident | $($body:tt)*) => ({
        macro_rules! __with__ {( $_ $enc:ident ) => ( $($body)* )}
        use $crate::NumericWireType;
        match $self {
            NumericWireType::Int8 => __with__! { i8 },
            NumericWireType::UInt8 => __with__! { u8 },
            NumericWireType::Int16 => __with__! { i16 },
            NumericWireType::UInt16 => __with__! { u16 },
            NumericWireType::Int32 => __with__! { i32 },
            NumericWireType::UInt32 => __with__! { u32 },
            NumericWireType::Int64 => __with__! { i64 },
            NumericWireType::UInt64 => __with__! { u64 },
            NumericWireType::Float32 => __with__! { f32 },
            NumericWireType::Float64 => __with__! { f64 },
        }
    })
}

#[cfg(test)]
mod tests {
    use crate::{IntegerNativeType, NumericNativeType, NumericWireType, WireType};

    #[test]
    fn dispatch_binds_rust_types() {
        let width = match_each_numeric_native_type!(NumericNativeType::U16, |$T| size_of::<$T>());
        assert_eq!(width, 2);
        let width = match_each_integer_native_type!(IntegerNativeType::I64, |$T| size_of::<$T>());
        assert_eq!(width, 8);
        let width = match_each_numeric_wire_type!(NumericWireType::UInt32, |$W| size_of::<$W>());
        assert_eq!(width, WireType::UInt32.byte_width());
    }
}
