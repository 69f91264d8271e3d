use std::fmt::{Display, Formatter};

/// The storage type of a column as recorded by the file itself.
///
/// The binary table format only knows signed integers; unsigned columns are stored in the signed
/// type of the same width and flagged through bias/scale attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhysicalType {
    /// One byte per element, holding `T`, `F` or zero.
    Logical,
    /// Signed 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Short,
    /// Signed 32-bit integer.
    Int,
    /// Signed 64-bit integer.
    Long,
    /// IEEE 754 single precision.
    Float,
    /// IEEE 754 double precision.
    Double,
    /// Fixed-width ASCII text of the given width in bytes.
    Text(usize),
    /// A column kind this crate cannot bind (bits, complex, heap descriptors, ...).
    ///
    /// It still occupies `byte_width` bytes per element of every row.
    Unsupported {
        /// The table-form code of the column.
        code: char,
        /// Bytes per element.
        byte_width: usize,
    },
}

impl PhysicalType {
    /// Bytes occupied by one element.
    pub const fn byte_width(&self) -> usize {
        match self {
            Self::Logical | Self::Byte => 1,
            Self::Short => 2,
            Self::Int | Self::Float => 4,
            Self::Long | Self::Double => 8,
            Self::Text(width) => *width,
            Self::Unsupported { byte_width, .. } => *byte_width,
        }
    }

    /// Whether the column stores signed integers, i.e. could carry an unsigned bias.
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::Byte | Self::Short | Self::Int | Self::Long)
    }

    /// The single-character table-form code.
    pub const fn code(&self) -> char {
        match self {
            Self::Logical => 'L',
            Self::Byte => 'S',
            Self::Short => 'I',
            Self::Int => 'J',
            Self::Long => 'K',
            Self::Float => 'E',
            Self::Double => 'D',
            Self::Text(_) => 'A',
            Self::Unsupported { code, .. } => *code,
        }
    }
}

impl Display for PhysicalType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(width) => write!(f, "{width}A"),
            other => write!(f, "{}", other.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(PhysicalType::Logical.byte_width(), 1);
        assert_eq!(PhysicalType::Long.byte_width(), 8);
        assert_eq!(PhysicalType::Text(12).byte_width(), 12);
        assert_eq!(
            PhysicalType::Unsupported {
                code: 'C',
                byte_width: 8
            }
            .byte_width(),
            8
        );
    }

    #[test]
    fn display() {
        assert_eq!(PhysicalType::Int.to_string(), "J");
        assert_eq!(PhysicalType::Text(6).to_string(), "6A");
    }
}
