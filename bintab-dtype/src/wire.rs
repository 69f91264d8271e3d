use std::fmt::{Display, Formatter};

use crate::unsigned::sign_bit;
use crate::{NativeType, PhysicalType};

/// The logical wire type of a column.
///
/// Every wire type has a fixed width per element. Unsigned integers are carried by the signed
/// physical type of the same width; see [`crate::unsigned`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WireType {
    /// Boolean, one byte per element.
    Logical,
    /// Signed 8-bit integer.
    Int8,
    /// Unsigned 8-bit integer.
    UInt8,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 64-bit integer.
    UInt64,
    /// IEEE 754 single precision.
    Float32,
    /// IEEE 754 double precision.
    Float64,
    /// Fixed-width string of the given width in bytes.
    FixedString(usize),
}

impl WireType {
    /// Bytes occupied by one element on the wire.
    pub const fn byte_width(&self) -> usize {
        match self {
            Self::Logical | Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
            Self::FixedString(width) => *width,
        }
    }

    /// Whether this is a signed or unsigned integer type.
    pub const fn is_integer(&self) -> bool {
        self.is_signed_int() || self.is_unsigned_int()
    }

    /// Whether this is a signed integer type.
    pub const fn is_signed_int(&self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Whether this is an unsigned integer type, i.e. stored with a sign-bit bias.
    pub const fn is_unsigned_int(&self) -> bool {
        matches!(
            self,
            Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64
        )
    }

    /// Whether this is a floating point type.
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Whether the codec for this type is numeric, i.e. neither logical nor string.
    pub const fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// The numeric subset this type belongs to, `None` for logical and string columns.
    pub const fn as_numeric(&self) -> Option<NumericWireType> {
        Some(match self {
            Self::Int8 => NumericWireType::Int8,
            Self::UInt8 => NumericWireType::UInt8,
            Self::Int16 => NumericWireType::Int16,
            Self::UInt16 => NumericWireType::UInt16,
            Self::Int32 => NumericWireType::Int32,
            Self::UInt32 => NumericWireType::UInt32,
            Self::Int64 => NumericWireType::Int64,
            Self::UInt64 => NumericWireType::UInt64,
            Self::Float32 => NumericWireType::Float32,
            Self::Float64 => NumericWireType::Float64,
            Self::Logical | Self::FixedString(_) => return None,
        })
    }

    /// The bias recorded for unsigned columns, `None` for every other type.
    pub const fn unsigned_bias(&self) -> Option<u64> {
        if self.is_unsigned_int() {
            sign_bit(self.byte_width())
        } else {
            None
        }
    }

    /// The physical type the file uses to store this wire type.
    pub const fn physical(&self) -> PhysicalType {
        match self {
            Self::Logical => PhysicalType::Logical,
            Self::Int8 | Self::UInt8 => PhysicalType::Byte,
            Self::Int16 | Self::UInt16 => PhysicalType::Short,
            Self::Int32 | Self::UInt32 => PhysicalType::Int,
            Self::Int64 | Self::UInt64 => PhysicalType::Long,
            Self::Float32 => PhysicalType::Float,
            Self::Float64 => PhysicalType::Double,
            Self::FixedString(width) => PhysicalType::Text(*width),
        }
    }

    /// Recovers the wire type from a physical type and whether the column carries an unsigned
    /// bias. Returns `None` for physical types this crate cannot bind.
    pub const fn from_physical(physical: PhysicalType, unsigned: bool) -> Option<Self> {
        Some(match (physical, unsigned) {
            (PhysicalType::Logical, _) => Self::Logical,
            (PhysicalType::Byte, false) => Self::Int8,
            (PhysicalType::Byte, true) => Self::UInt8,
            (PhysicalType::Short, false) => Self::Int16,
            (PhysicalType::Short, true) => Self::UInt16,
            (PhysicalType::Int, false) => Self::Int32,
            (PhysicalType::Int, true) => Self::UInt32,
            (PhysicalType::Long, false) => Self::Int64,
            (PhysicalType::Long, true) => Self::UInt64,
            (PhysicalType::Float, _) => Self::Float32,
            (PhysicalType::Double, _) => Self::Float64,
            (PhysicalType::Text(width), _) => Self::FixedString(width),
            (PhysicalType::Unsupported { .. }, _) => return None,
        })
    }

    /// The wire type a writable table declares when a caller binds a native type to a column
    /// that does not exist yet.
    ///
    /// Strings take the provided width, which must be at least one byte.
    pub const fn for_native(native: NativeType, string_width: usize) -> Self {
        match native {
            NativeType::Bool => Self::Logical,
            NativeType::I8 => Self::Int8,
            NativeType::U8 => Self::UInt8,
            NativeType::I16 => Self::Int16,
            NativeType::U16 => Self::UInt16,
            NativeType::I32 => Self::Int32,
            NativeType::U32 => Self::UInt32,
            NativeType::I64 => Self::Int64,
            NativeType::U64 => Self::UInt64,
            NativeType::F32 => Self::Float32,
            NativeType::F64 => Self::Float64,
            NativeType::String => {
                Self::FixedString(if string_width == 0 { 1 } else { string_width })
            }
        }
    }

    /// The table-form code. Unsigned and signed-byte types use the extended codes understood by
    /// common readers (`S`, `U`, `V`, `W`).
    pub const fn code(&self) -> char {
        match self {
            Self::Logical => 'L',
            Self::Int8 => 'S',
            Self::UInt8 => 'B',
            Self::Int16 => 'I',
            Self::UInt16 => 'U',
            Self::Int32 => 'J',
            Self::UInt32 => 'V',
            Self::Int64 => 'K',
            Self::UInt64 => 'W',
            Self::Float32 => 'E',
            Self::Float64 => 'D',
            Self::FixedString(_) => 'A',
        }
    }
}

/// The numeric wire types, dispatched over by [`match_each_numeric_wire_type`].
///
/// [`match_each_numeric_wire_type`]: crate::match_each_numeric_wire_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum NumericWireType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
}

impl Display for WireType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FixedString(width) => write!(f, "{width}A"),
            other => write!(f, "{}", other.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(WireType::Logical, 1)]
    #[case(WireType::UInt8, 1)]
    #[case(WireType::Int16, 2)]
    #[case(WireType::UInt32, 4)]
    #[case(WireType::Float32, 4)]
    #[case(WireType::UInt64, 8)]
    #[case(WireType::Float64, 8)]
    #[case(WireType::FixedString(17), 17)]
    fn byte_widths(#[case] wire: WireType, #[case] width: usize) {
        assert_eq!(wire.byte_width(), width);
        assert_eq!(wire.physical().byte_width(), width);
    }

    #[rstest]
    #[case(WireType::Int8)]
    #[case(WireType::UInt8)]
    #[case(WireType::Int16)]
    #[case(WireType::UInt16)]
    #[case(WireType::Int32)]
    #[case(WireType::UInt32)]
    #[case(WireType::Int64)]
    #[case(WireType::UInt64)]
    #[case(WireType::Float64)]
    #[case(WireType::Logical)]
    #[case(WireType::FixedString(3))]
    fn physical_round_trip(#[case] wire: WireType) {
        assert_eq!(
            WireType::from_physical(wire.physical(), wire.is_unsigned_int()),
            Some(wire)
        );
    }

    #[test]
    fn unsupported_has_no_wire_type() {
        let complex = PhysicalType::Unsupported {
            code: 'C',
            byte_width: 8,
        };
        assert_eq!(WireType::from_physical(complex, false), None);
    }

    #[rstest]
    #[case(WireType::Logical, None)]
    #[case(WireType::FixedString(4), None)]
    #[case(WireType::UInt16, Some(NumericWireType::UInt16))]
    #[case(WireType::Float64, Some(NumericWireType::Float64))]
    fn numeric_subset(#[case] wire: WireType, #[case] numeric: Option<NumericWireType>) {
        assert_eq!(wire.as_numeric(), numeric);
        assert_eq!(wire.is_numeric(), numeric.is_some());
    }

    #[test]
    fn unsigned_bias() {
        assert_eq!(WireType::UInt8.unsigned_bias(), Some(0x80));
        assert_eq!(WireType::UInt32.unsigned_bias(), Some(0x8000_0000));
        assert_eq!(WireType::Int32.unsigned_bias(), None);
        assert_eq!(WireType::Float64.unsigned_bias(), None);
    }

    #[test]
    fn native_defaults() {
        assert_eq!(WireType::for_native(NativeType::U16, 0), WireType::UInt16);
        assert_eq!(
            WireType::for_native(NativeType::String, 0),
            WireType::FixedString(1)
        );
        assert_eq!(
            WireType::for_native(NativeType::String, 8),
            WireType::FixedString(8)
        );
    }
}
