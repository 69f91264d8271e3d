use bintab_codec::CodecPair;
use bintab_dtype::{NativeBuffer, NativeType};
use bintab_error::BintabResult;

use crate::schema::ColumnDescriptor;
use crate::slots::{SlotId, Slots};

/// An active association between a column and a caller's location.
#[derive(Debug, Clone)]
pub(crate) struct Binding {
    /// Position of the column in the schema.
    pub(crate) column: usize,
    pub(crate) slot: SlotId,
    pub(crate) native: NativeType,
    pub(crate) slot_len: usize,
    /// Elements converted per row: the smaller of the slot length and the column's count.
    pub(crate) count: usize,
    pub(crate) codec: CodecPair,
}

impl Binding {
    /// Encodes the bound values into the column's bytes of `row`.
    pub(crate) fn encode(
        &self,
        column: &ColumnDescriptor,
        slots: &Slots,
        row: &mut [u8],
    ) -> BintabResult<()> {
        let values = slots.buffer(self.slot)?;
        self.codec
            .encode(values, &mut row[column.byte_range()], self.count)
            .map_err(|e| e.in_column(column.name()))
    }

    /// Decodes the column's bytes of `row` into `out`, the bound location or a copy of it.
    ///
    /// Elements beyond the column's element count are left as they are.
    pub(crate) fn decode(
        &self,
        column: &ColumnDescriptor,
        row: &[u8],
        out: &mut NativeBuffer,
    ) -> BintabResult<()> {
        self.codec
            .decode(&row[column.byte_range()], out, self.count)
            .map_err(|e| e.in_column(column.name()))
    }
}

/// The first value of an integer location, as used for a NULL sentinel.
pub(crate) fn leading_integer(buffer: &NativeBuffer) -> Option<i128> {
    match buffer {
        NativeBuffer::I8(v) => v.first().map(|x| i128::from(*x)),
        NativeBuffer::U8(v) => v.first().map(|x| i128::from(*x)),
        NativeBuffer::I16(v) => v.first().map(|x| i128::from(*x)),
        NativeBuffer::U16(v) => v.first().map(|x| i128::from(*x)),
        NativeBuffer::I32(v) => v.first().map(|x| i128::from(*x)),
        NativeBuffer::U32(v) => v.first().map(|x| i128::from(*x)),
        NativeBuffer::I64(v) => v.first().map(|x| i128::from(*x)),
        NativeBuffer::U64(v) => v.first().map(|x| i128::from(*x)),
        NativeBuffer::Bool(_)
        | NativeBuffer::F32(_)
        | NativeBuffer::F64(_)
        | NativeBuffer::String(_) => None,
    }
}

/// Width of a string column declared for a location: its longest value, at least one byte.
pub(crate) fn string_width(buffer: &NativeBuffer) -> usize {
    match buffer {
        NativeBuffer::String(values) => values.iter().map(String::len).max().unwrap_or(0).max(1),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_candidates() {
        assert_eq!(leading_integer(&NativeBuffer::U16(vec![65535])), Some(65535));
        assert_eq!(leading_integer(&NativeBuffer::I64(vec![-1, 2])), Some(-1));
        assert_eq!(leading_integer(&NativeBuffer::I32(vec![])), None);
        assert_eq!(leading_integer(&NativeBuffer::F32(vec![1.0])), None);
    }

    #[test]
    fn declared_string_width() {
        let names = NativeBuffer::String(vec!["ab".into(), "abcd".into()]);
        assert_eq!(string_width(&names), 4);
        assert_eq!(string_width(&NativeBuffer::String(vec![String::new()])), 1);
        assert_eq!(string_width(&NativeBuffer::String(vec![])), 1);
    }
}
