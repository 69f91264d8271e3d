//! The file-handle side of a table: column structure and raw row bytes.

use bintab_dtype::PhysicalType;
use bintab_error::BintabResult;
use serde::{Deserialize, Serialize};

mod disk;
mod memory;

pub use disk::*;
pub use memory::*;

/// A column as the file records it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Storage type of one element.
    pub physical: PhysicalType,
    /// Elements per row.
    pub repeat: usize,
}

impl ColumnSpec {
    /// Creates a new column spec.
    pub fn new(name: impl Into<String>, physical: PhysicalType, repeat: usize) -> Self {
        Self {
            name: name.into(),
            physical,
            repeat,
        }
    }

    /// Bytes the column occupies in each row.
    pub fn byte_width(&self) -> usize {
        self.physical.byte_width() * self.repeat
    }
}

/// Total row length of a sequence of columns.
pub(crate) fn row_length(columns: &[ColumnSpec]) -> usize {
    columns.iter().map(ColumnSpec::byte_width).sum()
}

/// Total row length, `None` when it does not fit in a `usize`.
pub(crate) fn checked_row_length(columns: &[ColumnSpec]) -> Option<usize> {
    columns.iter().try_fold(0usize, |len, column| {
        column
            .physical
            .byte_width()
            .checked_mul(column.repeat)
            .and_then(|width| len.checked_add(width))
    })
}

/// Structural and raw-byte access to one table in a file.
///
/// Rows are addressed from zero here; the table engine exposes one-based row numbers. Every
/// failure is surfaced as an error and never retried.
pub trait FileStore {
    /// The columns of the table, in file order.
    fn columns(&self) -> BintabResult<Vec<ColumnSpec>>;

    /// Appends a column at the end of every row. Existing rows get `fill` (exactly one column's
    /// width of bytes) as the new column's value.
    fn add_column(&mut self, spec: ColumnSpec, fill: &[u8]) -> BintabResult<()>;

    /// Number of materialized rows.
    fn row_count(&self) -> BintabResult<u64>;

    /// Appends `count` zeroed rows.
    fn grow_rows(&mut self, count: u64) -> BintabResult<()>;

    /// Removes the last `count` rows.
    fn shrink_rows(&mut self, count: u64) -> BintabResult<()>;

    /// Reads row `index` into `buf`, which must be exactly one row long.
    fn read_row_bytes(&mut self, index: u64, buf: &mut [u8]) -> BintabResult<()>;

    /// Overwrites row `index` with `bytes`, which must be exactly one row long.
    fn write_row_bytes(&mut self, index: u64, bytes: &[u8]) -> BintabResult<()>;

    /// Persists any buffered metadata.
    fn flush(&mut self) -> BintabResult<()> {
        Ok(())
    }
}

impl<S: FileStore + ?Sized> FileStore for &mut S {
    fn columns(&self) -> BintabResult<Vec<ColumnSpec>> {
        (**self).columns()
    }

    fn add_column(&mut self, spec: ColumnSpec, fill: &[u8]) -> BintabResult<()> {
        (**self).add_column(spec, fill)
    }

    fn row_count(&self) -> BintabResult<u64> {
        (**self).row_count()
    }

    fn grow_rows(&mut self, count: u64) -> BintabResult<()> {
        (**self).grow_rows(count)
    }

    fn shrink_rows(&mut self, count: u64) -> BintabResult<()> {
        (**self).shrink_rows(count)
    }

    fn read_row_bytes(&mut self, index: u64, buf: &mut [u8]) -> BintabResult<()> {
        (**self).read_row_bytes(index, buf)
    }

    fn write_row_bytes(&mut self, index: u64, bytes: &[u8]) -> BintabResult<()> {
        (**self).write_row_bytes(index, bytes)
    }

    fn flush(&mut self) -> BintabResult<()> {
        (**self).flush()
    }
}

/// Rebuilds a block of rows so each row gains `fill` at its end.
pub(crate) fn widen_rows(data: &[u8], old_row_len: usize, rows: usize, fill: &[u8]) -> Vec<u8> {
    let mut widened = Vec::with_capacity(rows * (old_row_len + fill.len()));
    if old_row_len == 0 {
        for _ in 0..rows {
            widened.extend_from_slice(fill);
        }
        return widened;
    }
    for row in data.chunks_exact(old_row_len).take(rows) {
        widened.extend_from_slice(row);
        widened.extend_from_slice(fill);
    }
    widened
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widen_appends_fill_to_every_row() {
        let data = [1u8, 2, 3, 4];
        assert_eq!(widen_rows(&data, 2, 2, &[9]), vec![1, 2, 9, 3, 4, 9]);
        assert_eq!(widen_rows(&[], 0, 3, &[7, 7]), vec![7, 7, 7, 7, 7, 7]);
    }

    #[test]
    fn spec_width() {
        let spec = ColumnSpec::new("FLUX", PhysicalType::Float, 3);
        assert_eq!(spec.byte_width(), 12);
        let text = ColumnSpec::new("NAME", PhysicalType::Text(8), 1);
        assert_eq!(row_length(&[spec, text]), 20);
    }
}
