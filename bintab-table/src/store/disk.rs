use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use bintab_error::{BintabResult, bintab_bail, bintab_err};
use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, AttributeStore, Header};
use crate::store::{ColumnSpec, FileStore, checked_row_length, row_length, widen_rows};

/// Leading and trailing magic bytes of a table file.
pub const MAGIC_BYTES: [u8; 8] = *b"BINTAB01";
/// Version of the footer layout.
pub const VERSION: u16 = 1;
/// Trailing bytes after the footer: footer length (u64, big-endian) followed by the magic.
pub const EOF_SIZE: usize = 8 + MAGIC_BYTES.len();

const DATA_START: u64 = MAGIC_BYTES.len() as u64;

#[derive(Debug, Serialize, Deserialize)]
struct Footer {
    version: u16,
    columns: Vec<ColumnSpec>,
    header: Header,
    rows: u64,
}

/// A single table persisted in one file.
///
/// ```text
/// | MAGIC | row 0 | row 1 | ... | footer (JSON) | footer length (u64 BE) | MAGIC |
/// ```
///
/// The footer holds the columns, the attributes and the row count. While the store is open the
/// footer is kept in memory; it is rewritten after the last row by [`FileStore::flush`] and when
/// the store is dropped.
#[derive(Debug)]
pub struct DiskStore {
    path: PathBuf,
    file: File,
    columns: Vec<ColumnSpec>,
    header: Header,
    rows: u64,
    dirty: bool,
}

impl DiskStore {
    /// Creates (or truncates) a table file with the given columns and no rows.
    pub fn create(path: impl AsRef<Path>, columns: Vec<ColumnSpec>) -> BintabResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        let mut store = Self {
            path,
            file,
            columns,
            header: Header::default(),
            rows: 0,
            dirty: true,
        };
        store.file.write_all(&MAGIC_BYTES)?;
        store.flush()?;
        Ok(store)
    }

    /// Opens an existing table file for reading and writing.
    pub fn open(path: impl AsRef<Path>) -> BintabResult<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path.as_ref())?;
        Self::from_file(path.as_ref().to_path_buf(), file)
    }

    /// Opens an existing table file for reading only. Any mutation fails with an IO error.
    pub fn open_read_only(path: impl AsRef<Path>) -> BintabResult<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_file(path.as_ref().to_path_buf(), file)
    }

    /// The path the store was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The attributes of the table.
    pub fn header(&self) -> &Header {
        &self.header
    }

    fn from_file(path: PathBuf, mut file: File) -> BintabResult<Self> {
        let file_len = file.metadata()?.len();
        let minimum = DATA_START + EOF_SIZE as u64;
        if file_len < minimum {
            bintab_bail!(
                InvalidSerde: "{} is too short to be a table file ({} bytes)",
                path.display(),
                file_len
            );
        }

        let mut magic = [0u8; MAGIC_BYTES.len()];
        file.read_exact(&mut magic)?;
        let mut eof = [0u8; EOF_SIZE];
        file.seek(SeekFrom::End(-(EOF_SIZE as i64)))?;
        file.read_exact(&mut eof)?;
        if magic != MAGIC_BYTES || eof[8..] != MAGIC_BYTES {
            bintab_bail!(InvalidSerde: "{} is not a table file", path.display());
        }

        let footer_len = u64::from_be_bytes(eof[..8].try_into()?);
        let data_end = footer_len
            .checked_add(EOF_SIZE as u64)
            .and_then(|tail| file_len.checked_sub(tail))
            .filter(|end| *end >= DATA_START)
            .ok_or_else(|| bintab_err!(InvalidSerde: "footer length {} is corrupt", footer_len))?;
        let mut footer_bytes = vec![0u8; usize::try_from(footer_len)?];
        file.seek(SeekFrom::Start(data_end))?;
        file.read_exact(&mut footer_bytes)?;
        let footer: Footer = serde_json::from_slice(&footer_bytes)?;
        if footer.version != VERSION {
            bintab_bail!(InvalidSerde: "unsupported footer version {}", footer.version);
        }

        let expected = checked_row_length(&footer.columns)
            .and_then(|len| u64::try_from(len).ok())
            .and_then(|len| footer.rows.checked_mul(len))
            .ok_or_else(|| {
                bintab_err!(
                    InvalidSerde: "{} describes {} rows that cannot fit in a file",
                    path.display(),
                    footer.rows
                )
            })?;
        if data_end - DATA_START != expected {
            bintab_bail!(
                InvalidSerde: "{} holds {} row bytes, footer describes {}",
                path.display(),
                data_end - DATA_START,
                expected
            );
        }

        Ok(Self {
            path,
            file,
            columns: footer.columns,
            header: footer.header,
            rows: footer.rows,
            dirty: false,
        })
    }

    fn row_len(&self) -> u64 {
        row_length(&self.columns) as u64
    }

    fn data_end(&self) -> u64 {
        DATA_START + self.rows * self.row_len()
    }

    fn row_offset(&self, index: u64, len: usize) -> BintabResult<u64> {
        if len as u64 != self.row_len() {
            bintab_bail!("row buffer has {} bytes, rows are {} bytes", len, self.row_len());
        }
        if index >= self.rows {
            return Err(bintab_err!(
                OutOfBounds: usize::try_from(index)?,
                0,
                usize::try_from(self.rows)?
            ));
        }
        Ok(DATA_START + index * self.row_len())
    }

    fn write_footer(&mut self) -> BintabResult<()> {
        let footer = Footer {
            version: VERSION,
            columns: self.columns.clone(),
            header: self.header.clone(),
            rows: self.rows,
        };
        let bytes = serde_json::to_vec(&footer)?;
        let data_end = self.data_end();
        self.file.seek(SeekFrom::Start(data_end))?;
        self.file.write_all(&bytes)?;
        self.file.write_all(&(bytes.len() as u64).to_be_bytes())?;
        self.file.write_all(&MAGIC_BYTES)?;
        self.file
            .set_len(data_end + bytes.len() as u64 + EOF_SIZE as u64)?;
        self.file.flush()?;
        log::trace!(
            "wrote footer of {} ({} rows, {} footer bytes)",
            self.path.display(),
            self.rows,
            bytes.len()
        );
        Ok(())
    }
}

impl FileStore for DiskStore {
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
        let old_row_len = usize::try_from(self.row_len())?;
        let rows = usize::try_from(self.rows)?;
        let mut data = vec![0u8; rows * old_row_len];
        self.file.seek(SeekFrom::Start(DATA_START))?;
        self.file.read_exact(&mut data)?;

        let widened = widen_rows(&data, old_row_len, rows, fill);
        self.file.seek(SeekFrom::Start(DATA_START))?;
        self.file.write_all(&widened)?;
        self.columns.push(spec);
        self.dirty = true;
        Ok(())
    }

    fn row_count(&self) -> BintabResult<u64> {
        Ok(self.rows)
    }

    fn grow_rows(&mut self, count: u64) -> BintabResult<()> {
        let rows = self.rows.checked_add(count);
        let added = count.checked_mul(self.row_len());
        let (Some(rows), Some(added)) = (rows, added) else {
            bintab_bail!("cannot grow {} by {} rows", self.path.display(), count);
        };
        let zeros = vec![0u8; usize::try_from(added)?];
        let data_end = self.data_end();
        self.file.seek(SeekFrom::Start(data_end))?;
        self.file.write_all(&zeros)?;
        self.rows = rows;
        self.dirty = true;
        Ok(())
    }

    fn shrink_rows(&mut self, count: u64) -> BintabResult<()> {
        self.rows -= count.min(self.rows);
        self.dirty = true;
        Ok(())
    }

    fn read_row_bytes(&mut self, index: u64, buf: &mut [u8]) -> BintabResult<()> {
        let offset = self.row_offset(index, buf.len())?;
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(buf)?;
        Ok(())
    }

    fn write_row_bytes(&mut self, index: u64, bytes: &[u8]) -> BintabResult<()> {
        let offset = self.row_offset(index, bytes.len())?;
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(bytes)?;
        self.dirty = true;
        Ok(())
    }

    fn flush(&mut self) -> BintabResult<()> {
        if self.dirty {
            self.write_footer()?;
            self.dirty = false;
        }
        Ok(())
    }
}

impl AttributeStore for DiskStore {
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
        self.header.set(name, value, comment, unit)?;
        self.dirty = true;
        Ok(())
    }
}

impl Drop for DiskStore {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            log::warn!("failed to write footer of {}: {err}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use bintab_dtype::PhysicalType;
    use tempfile::tempdir;

    use super::*;

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("TIME", PhysicalType::Double, 1),
            ColumnSpec::new("PHA", PhysicalType::Short, 2),
        ]
    }

    #[test]
    fn rows_and_attributes_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.bt");
        {
            let mut store = DiskStore::create(&path, columns()).unwrap();
            store.grow_rows(3).unwrap();
            store.write_row_bytes(2, &[7u8; 12]).unwrap();
            store
                .set("TUNIT1", Attribute::Text("s".into()), Some("time unit"), None)
                .unwrap();
        }

        let mut store = DiskStore::open_read_only(&path).unwrap();
        assert_eq!(store.columns().unwrap(), columns());
        assert_eq!(store.row_count().unwrap(), 3);
        assert_eq!(store.get("TUNIT1").unwrap(), Attribute::Text("s".into()));
        let mut buf = [0u8; 12];
        store.read_row_bytes(2, &mut buf).unwrap();
        assert_eq!(buf, [7u8; 12]);
        store.read_row_bytes(0, &mut buf).unwrap();
        assert_eq!(buf, [0u8; 12]);
    }

    #[test]
    fn shrink_truncates_on_flush() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.bt");
        let mut store = DiskStore::create(&path, columns()).unwrap();
        store.grow_rows(10).unwrap();
        store.shrink_rows(7).unwrap();
        store.flush().unwrap();
        drop(store);

        let store = DiskStore::open(&path).unwrap();
        assert_eq!(store.row_count().unwrap(), 3);
    }

    #[test]
    fn add_column_rewrites_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.bt");
        let mut store =
            DiskStore::create(&path, vec![ColumnSpec::new("A", PhysicalType::Byte, 1)]).unwrap();
        store.grow_rows(2).unwrap();
        store.write_row_bytes(0, &[1]).unwrap();
        store.write_row_bytes(1, &[2]).unwrap();
        store
            .add_column(ColumnSpec::new("B", PhysicalType::Byte, 1), &[9])
            .unwrap();
        drop(store);

        let mut store = DiskStore::open(&path).unwrap();
        let mut buf = [0u8; 2];
        store.read_row_bytes(1, &mut buf).unwrap();
        assert_eq!(buf, [2, 9]);
    }

    #[test]
    fn rejects_impossible_row_counts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corrupt.bt");
        let footer = serde_json::to_vec(&Footer {
            version: VERSION,
            columns: vec![ColumnSpec::new("X", PhysicalType::Long, 4)],
            header: Header::default(),
            rows: u64::MAX,
        })
        .unwrap();
        let mut bytes = MAGIC_BYTES.to_vec();
        bytes.extend_from_slice(&footer);
        bytes.extend_from_slice(&u64::try_from(footer.len()).unwrap().to_be_bytes());
        bytes.extend_from_slice(&MAGIC_BYTES);
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(
            DiskStore::open(&path).unwrap_err(),
            bintab_error::BintabError::InvalidSerde(..)
        ));
    }

    #[test]
    fn growth_beyond_addressable_rows_fails() {
        let dir = tempdir().unwrap();
        let mut store = DiskStore::create(dir.path().join("grow.bt"), columns()).unwrap();
        store.grow_rows(2).unwrap();
        assert!(store.grow_rows(u64::MAX).is_err());
        assert_eq!(store.row_count().unwrap(), 2);
    }

    #[test]
    fn rejects_foreign_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("junk.bt");
        std::fs::write(&path, vec![0u8; 64]).unwrap();
        assert!(matches!(
            DiskStore::open(&path).unwrap_err(),
            bintab_error::BintabError::InvalidSerde(..)
        ));
        std::fs::write(&path, b"tiny").unwrap();
        assert!(DiskStore::open(&path).is_err());
    }
}
