use bintab_error::{BintabResult, bintab_bail, bintab_err};

use crate::attribute::{Attribute, AttributeStore, Header};
use crate::store::{ColumnSpec, FileStore, row_length, widen_rows};

/// A table held entirely in memory.
///
/// Useful for tests and for staging rows before they are handed to a real file.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    columns: Vec<ColumnSpec>,
    header: Header,
    data: Vec<u8>,
    rows: u64,
}

impl MemoryStore {
    /// Creates an empty table with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table with the given columns.
    pub fn create(columns: Vec<ColumnSpec>) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    /// The attributes of the table.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// All materialized row bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes per row.
    pub fn row_length(&self) -> usize {
        row_length(&self.columns)
    }

    fn row_range(&self, index: u64, len: usize) -> BintabResult<std::ops::Range<usize>> {
        let row_len = self.row_length();
        if len != row_len {
            bintab_bail!("row buffer has {} bytes, rows are {} bytes", len, row_len);
        }
        if index >= self.rows {
            return Err(bintab_err!(
                OutOfBounds: usize::try_from(index)?,
                0,
                usize::try_from(self.rows)?
            ));
        }
        let start = usize::try_from(index)? * row_len;
        Ok(start..start + row_len)
    }
}

impl FileStore for MemoryStore {
    fn columns(&self) -> BintabResult<Vec<ColumnSpec>> {
        Ok(self.columns.clone())
    }

    fn add_column(&mut self, spec: ColumnSpec, fill: &[u8]) -> BintabResult<()> {
        if fill.len() != spec.byte_width() {
            bintab_bail!(
                "fill for column {} has {} bytes, expected {}",
                spec.name,
                fill.len(),
                spec.byte_width()
            );
        }
        let old_row_len = self.row_length();
        self.data = widen_rows(&self.data, old_row_len, usize::try_from(self.rows)?, fill);
        self.columns.push(spec);
        Ok(())
    }

    fn row_count(&self) -> BintabResult<u64> {
        Ok(self.rows)
    }

    fn grow_rows(&mut self, count: u64) -> BintabResult<()> {
        let rows = self.rows.checked_add(count);
        let added = usize::try_from(count)?
            .checked_mul(self.row_length())
            .and_then(|added| added.checked_add(self.data.len()));
        let (Some(rows), Some(len)) = (rows, added) else {
            bintab_bail!("cannot grow the table by {} rows", count);
        };
        self.data.resize(len, 0);
        self.rows = rows;
        Ok(())
    }

    fn shrink_rows(&mut self, count: u64) -> BintabResult<()> {
        let count = count.min(self.rows);
        self.rows -= count;
        self.data
            .truncate(usize::try_from(self.rows)? * self.row_length());
        Ok(())
    }

    fn read_row_bytes(&mut self, index: u64, buf: &mut [u8]) -> BintabResult<()> {
        let range = self.row_range(index, buf.len())?;
        buf.copy_from_slice(&self.data[range]);
        Ok(())
    }

    fn write_row_bytes(&mut self, index: u64, bytes: &[u8]) -> BintabResult<()> {
        let range = self.row_range(index, bytes.len())?;
        self.data[range].copy_from_slice(bytes);
        Ok(())
    }
}

impl AttributeStore for MemoryStore {
    fn get(&self, name: &str) -> BintabResult<Attribute> {
        self.header.get(name)
    }

    fn set(
        &mut self,
        name: &str,
        value: Attribute,
        comment: Option<&str>,
        unit: Option<&str>,
    ) -> BintabResult<()> {
        self.header.set(name, value, comment, unit)
    }
}

#[cfg(test)]
mod tests {
    use bintab_dtype::PhysicalType;

    use super::*;

    #[test]
    fn grow_write_read_shrink() {
        let mut store = MemoryStore::create(vec![
            ColumnSpec::new("A", PhysicalType::Short, 1),
            ColumnSpec::new("B", PhysicalType::Byte, 2),
        ]);
        assert_eq!(store.row_length(), 4);
        store.grow_rows(3).unwrap();
        store.write_row_bytes(1, &[1, 2, 3, 4]).unwrap();

        let mut buf = [0u8; 4];
        store.read_row_bytes(1, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
        store.read_row_bytes(2, &mut buf).unwrap();
        assert_eq!(buf, [0; 4]);

        store.shrink_rows(2).unwrap();
        assert_eq!(store.row_count().unwrap(), 1);
        assert_eq!(store.data().len(), 4);
        assert!(store.read_row_bytes(1, &mut buf).is_err());
    }

    #[test]
    fn wrong_row_length_is_rejected() {
        let mut store = MemoryStore::create(vec![ColumnSpec::new("A", PhysicalType::Int, 1)]);
        store.grow_rows(1).unwrap();
        assert!(store.write_row_bytes(0, &[0; 3]).is_err());
    }

    #[test]
    fn add_column_fills_existing_rows() {
        let mut store = MemoryStore::create(vec![ColumnSpec::new("A", PhysicalType::Byte, 1)]);
        store.grow_rows(2).unwrap();
        store.write_row_bytes(0, &[5]).unwrap();
        store
            .add_column(ColumnSpec::new("B", PhysicalType::Short, 1), &[0x80, 0])
            .unwrap();
        assert_eq!(store.data(), &[5, 0x80, 0, 0, 0x80, 0]);
        assert!(
            store
                .add_column(ColumnSpec::new("C", PhysicalType::Short, 1), &[0])
                .is_err()
        );
    }
}
