use std::fmt::{Debug, Display, Formatter};

use static_assertions::assert_eq_size;

/// The closed set of in-memory types a caller can bind to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NativeType {
    /// `bool`
    Bool,
    /// `i8`
    I8,
    /// `u8`
    U8,
    /// `i16`
    I16,
    /// `u16`
    U16,
    /// `i32`
    I32,
    /// `u32`
    U32,
    /// `i64`
    I64,
    /// `u64`
    U64,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `String`
    String,
}

assert_eq_size!(NativeType, u8);

impl NativeType {
    /// Whether this is a signed or unsigned integer type.
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::I8 | Self::U8 | Self::I16 | Self::U16 | Self::I32 | Self::U32 | Self::I64 | Self::U64
        )
    }

    /// Whether this is a floating point type.
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Whether this is an integer or floating point type.
    pub const fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// The numeric subset this type belongs to, `None` for `Bool` and `String`.
    pub const fn as_numeric(&self) -> Option<NumericNativeType> {
        Some(match self {
            Self::I8 => NumericNativeType::I8,
            Self::U8 => NumericNativeType::U8,
            Self::I16 => NumericNativeType::I16,
            Self::U16 => NumericNativeType::U16,
            Self::I32 => NumericNativeType::I32,
            Self::U32 => NumericNativeType::U32,
            Self::I64 => NumericNativeType::I64,
            Self::U64 => NumericNativeType::U64,
            Self::F32 => NumericNativeType::F32,
            Self::F64 => NumericNativeType::F64,
            Self::Bool | Self::String => return None,
        })
    }

    /// The integer subset this type belongs to, `None` for every non-integer type.
    pub const fn as_integer(&self) -> Option<IntegerNativeType> {
        Some(match self {
            Self::I8 => IntegerNativeType::I8,
            Self::U8 => IntegerNativeType::U8,
            Self::I16 => IntegerNativeType::I16,
            Self::U16 => IntegerNativeType::U16,
            Self::I32 => IntegerNativeType::I32,
            Self::U32 => IntegerNativeType::U32,
            Self::I64 => IntegerNativeType::I64,
            Self::U64 => IntegerNativeType::U64,
            Self::Bool | Self::F32 | Self::F64 | Self::String => return None,
        })
    }
}

/// The numeric native types, dispatched over by [`match_each_numeric_native_type`].
///
/// [`match_each_numeric_native_type`]: crate::match_each_numeric_native_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum NumericNativeType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

/// The integer native types, dispatched over by [`match_each_integer_native_type`].
///
/// [`match_each_integer_native_type`]: crate::match_each_integer_native_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum IntegerNativeType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
}

impl Display for NativeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::I8 => write!(f, "i8"),
            Self::U8 => write!(f, "u8"),
            Self::I16 => write!(f, "i16"),
            Self::U16 => write!(f, "u16"),
            Self::I32 => write!(f, "i32"),
            Self::U32 => write!(f, "u32"),
            Self::I64 => write!(f, "i64"),
            Self::U64 => write!(f, "u64"),
            Self::F32 => write!(f, "f32"),
            Self::F64 => write!(f, "f64"),
            Self::String => write!(f, "String"),
        }
    }
}

/// Owned storage for the values of one bound location, tagged by native type.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeBuffer {
    /// Values of a `bool` location.
    Bool(Vec<bool>),
    /// Values of an `i8` location.
    I8(Vec<i8>),
    /// Values of a `u8` location.
    U8(Vec<u8>),
    /// Values of an `i16` location.
    I16(Vec<i16>),
    /// Values of a `u16` location.
    U16(Vec<u16>),
    /// Values of an `i32` location.
    I32(Vec<i32>),
    /// Values of a `u32` location.
    U32(Vec<u32>),
    /// Values of an `i64` location.
    I64(Vec<i64>),
    /// Values of a `u64` location.
    U64(Vec<u64>),
    /// Values of an `f32` location.
    F32(Vec<f32>),
    /// Values of an `f64` location.
    F64(Vec<f64>),
    /// Values of a `String` location.
    String(Vec<String>),
}

impl NativeBuffer {
    /// A buffer of `len` default values (zero, `false` or empty).
    pub fn zeroed(native: NativeType, len: usize) -> Self {
        match native {
            NativeType::Bool => Self::Bool(vec![false; len]),
            NativeType::I8 => Self::I8(vec![0; len]),
            NativeType::U8 => Self::U8(vec![0; len]),
            NativeType::I16 => Self::I16(vec![0; len]),
            NativeType::U16 => Self::U16(vec![0; len]),
            NativeType::I32 => Self::I32(vec![0; len]),
            NativeType::U32 => Self::U32(vec![0; len]),
            NativeType::I64 => Self::I64(vec![0; len]),
            NativeType::U64 => Self::U64(vec![0; len]),
            NativeType::F32 => Self::F32(vec![0.0; len]),
            NativeType::F64 => Self::F64(vec![0.0; len]),
            NativeType::String => Self::String(vec![String::new(); len]),
        }
    }

    /// The native type of the values held.
    pub fn native_type(&self) -> NativeType {
        match self {
            Self::Bool(_) => NativeType::Bool,
            Self::I8(_) => NativeType::I8,
            Self::U8(_) => NativeType::U8,
            Self::I16(_) => NativeType::I16,
            Self::U16(_) => NativeType::U16,
            Self::I32(_) => NativeType::I32,
            Self::U32(_) => NativeType::U32,
            Self::I64(_) => NativeType::I64,
            Self::U64(_) => NativeType::U64,
            Self::F32(_) => NativeType::F32,
            Self::F64(_) => NativeType::F64,
            Self::String(_) => NativeType::String,
        }
    }

    /// Number of elements held.
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::I8(v) => v.len(),
            Self::U8(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::U32(v) => v.len(),
            Self::I64(v) => v.len(),
            Self::U64(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
            Self::String(v) => v.len(),
        }
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Typed view of the values, `None` if `T` is not the held type.
    pub fn as_slice<T: NativeValue>(&self) -> Option<&[T]> {
        T::as_slice(self)
    }

    /// Typed mutable view of the values, `None` if `T` is not the held type.
    pub fn as_mut_slice<T: NativeValue>(&mut self) -> Option<&mut [T]> {
        T::as_mut_slice(self)
    }
}

/// A Rust type that can be bound to a column.
///
/// Implemented for `bool`, the fixed-width integers, `f32`, `f64` and `String`.
pub trait NativeValue: Clone + Default + Debug + PartialEq + Send + Sync + 'static {
    /// The tag of this type.
    const NATIVE: NativeType;

    /// Borrows the values of `buffer` if it holds `Self`.
    fn as_slice(buffer: &NativeBuffer) -> Option<&[Self]>;

    /// Mutably borrows the values of `buffer` if it holds `Self`.
    fn as_mut_slice(buffer: &mut NativeBuffer) -> Option<&mut [Self]>;

    /// Wraps owned values into a tagged buffer.
    fn into_buffer(values: Vec<Self>) -> NativeBuffer;
}

macro_rules! native_value {
    ($T:ty, $variant:ident) => {
        impl NativeValue for $T {
            const NATIVE: NativeType = NativeType::$variant;

            #[inline]
            fn as_slice(buffer: &NativeBuffer) -> Option<&[Self]> {
                match buffer {
                    NativeBuffer::$variant(values) => Some(values.as_slice()),
                    _ => None,
                }
            }

            #[inline]
            fn as_mut_slice(buffer: &mut NativeBuffer) -> Option<&mut [Self]> {
                match buffer {
                    NativeBuffer::$variant(values) => Some(values.as_mut_slice()),
                    _ => None,
                }
            }

            fn into_buffer(values: Vec<Self>) -> NativeBuffer {
                NativeBuffer::$variant(values)
            }
        }
    };
}

native_value!(bool, Bool);
native_value!(i8, I8);
native_value!(u8, U8);
native_value!(i16, I16);
native_value!(u16, U16);
native_value!(i32, I32);
native_value!(u32, U32);
native_value!(i64, I64);
native_value!(u64, U64);
native_value!(f32, F32);
native_value!(f64, F64);
native_value!(String, String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_views() {
        let mut buffer = i32::into_buffer(vec![1, 2, 3]);
        assert_eq!(buffer.native_type(), NativeType::I32);
        assert_eq!(buffer.as_slice::<i32>(), Some([1, 2, 3].as_slice()));
        assert!(buffer.as_slice::<u32>().is_none());

        buffer.as_mut_slice::<i32>().unwrap()[1] = 20;
        assert_eq!(buffer, NativeBuffer::I32(vec![1, 20, 3]));
    }

    #[test]
    fn numeric_subsets() {
        assert_eq!(NativeType::F32.as_numeric(), Some(NumericNativeType::F32));
        assert_eq!(NativeType::F32.as_integer(), None);
        assert_eq!(NativeType::U64.as_integer(), Some(IntegerNativeType::U64));
        assert_eq!(NativeType::Bool.as_numeric(), None);
        assert_eq!(NativeType::String.as_numeric(), None);
    }

    #[test]
    fn zeroed_strings_are_empty() {
        let buffer = NativeBuffer::zeroed(NativeType::String, 2);
        assert_eq!(buffer.len(), 2);
        assert_eq!(
            buffer.as_slice::<String>().unwrap(),
            [String::new(), String::new()].as_slice()
        );
    }
}
