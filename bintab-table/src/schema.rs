//! The column schema registry of one table.

use std::collections::HashMap;
use std::ops::Range;

use bintab_codec::encode_blank;
use bintab_codec::null::encode_null_sentinel;
use bintab_dtype::WireType;
use bintab_dtype::unsigned::sign_bit;
use bintab_error::{BintabResult, OptionalExt, bintab_bail};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, AttributeStore, keyword};
use crate::store::{ColumnSpec, FileStore};

/// Everything the engine knows about one bindable column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    name: String,
    wire_type: WireType,
    element_count: usize,
    byte_offset: usize,
    index: usize,
    unit: Option<String>,
    null: Option<i64>,
}

impl ColumnDescriptor {
    /// The column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wire type of each element.
    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    /// Elements per row; more than one makes this a vector column.
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Offset of the column's first byte within a row.
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Zero-based position of the column in the file, counting columns that cannot be bound.
    pub fn file_index(&self) -> usize {
        self.index
    }

    /// The physical unit, if the file records one.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// The NULL sentinel as stored in the file, i.e. before the unsigned reinterpretation.
    pub fn stored_null(&self) -> Option<i64> {
        self.null
    }

    /// Bytes the column occupies in each row.
    pub fn byte_width(&self) -> usize {
        self.wire_type.byte_width() * self.element_count
    }

    /// The byte range of the column within a row.
    pub fn byte_range(&self) -> Range<usize> {
        self.byte_offset..self.byte_offset + self.byte_width()
    }
}

/// A schema-agnostic snapshot of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// The column name.
    pub name: String,
    /// The wire type of each element.
    pub wire_type: WireType,
    /// Elements per row.
    pub element_count: usize,
}

/// Ordered column descriptors with their byte layout.
///
/// Byte offsets partition `[0, row_length)` in file order. Columns that cannot be bound have no
/// descriptor but still occupy their width.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    columns: Vec<ColumnDescriptor>,
    by_name: HashMap<String, usize>,
    row_length: usize,
    file_columns: usize,
}

impl Schema {
    /// Builds the schema from the columns a store already holds.
    ///
    /// Integer columns are unsigned when their bias attribute equals the sign bit of their
    /// width and their scale is one (or absent).
    pub fn discover<S: FileStore + AttributeStore>(store: &S) -> BintabResult<Self> {
        let mut schema = Self::default();
        for spec in store.columns()? {
            let index = schema.file_columns;
            let width = spec.byte_width();
            let offset = schema.row_length;
            schema.file_columns += 1;
            schema.row_length += width;

            if spec.repeat == 0 {
                log::debug!("column {} has no elements, skipping", spec.name);
                continue;
            }

            let unsigned = spec.physical.is_integer() && has_unsigned_bias(store, &spec, index)?;
            let Some(wire_type) = WireType::from_physical(spec.physical, unsigned) else {
                log::warn!(
                    "column {} has unsupported type {}, skipping",
                    spec.name,
                    spec.physical
                );
                continue;
            };
            if schema.by_name.contains_key(&spec.name) {
                log::warn!("duplicate column {}, keeping the first", spec.name);
                continue;
            }

            let unit = store
                .get(&keyword::unit(index))
                .optional()?
                .and_then(|a| a.as_str().map(str::to_owned));
            let null = if wire_type.is_integer() {
                store
                    .get(&keyword::null(index))
                    .optional()?
                    .and_then(|a| a.as_i64())
            } else {
                None
            };

            schema.push(ColumnDescriptor {
                name: spec.name,
                wire_type,
                element_count: spec.repeat,
                byte_offset: offset,
                index,
                unit,
                null,
            });
        }
        log::debug!(
            "discovered {} of {} columns ({}), row length {}",
            schema.columns.len(),
            schema.file_columns,
            schema.columns.iter().map(|c| c.name.as_str()).join(", "),
            schema.row_length
        );
        Ok(schema)
    }

    /// Appends a column to the store and to the schema.
    ///
    /// Existing rows get the blank encoding of the new column. The unsigned bias, unit and NULL
    /// sentinel are recorded as attributes of the new column.
    pub fn declare<S: FileStore + AttributeStore>(
        &mut self,
        store: &mut S,
        name: &str,
        wire_type: WireType,
        element_count: usize,
        unit: Option<&str>,
        null: Option<i128>,
    ) -> BintabResult<&ColumnDescriptor> {
        if self.by_name.contains_key(name) {
            bintab_bail!("column {} already exists", name);
        }
        if element_count == 0 {
            bintab_bail!("column {} must have at least one element", name);
        }
        if wire_type.byte_width() == 0 {
            bintab_bail!("string column {} must be at least one byte wide", name);
        }
        let stored_null = null
            .map(|sentinel| encode_null_sentinel(wire_type, sentinel))
            .transpose()
            .map_err(|e| e.in_column(name))?;

        let index = self.file_columns;
        let mut fill = vec![0u8; wire_type.byte_width() * element_count];
        encode_blank(wire_type, &mut fill);
        store.add_column(
            ColumnSpec::new(name, wire_type.physical(), element_count),
            &fill,
        )?;

        if let Some(bias) = wire_type.unsigned_bias() {
            store.set(
                &keyword::zero(index),
                Attribute::Unsigned(bias),
                Some("offset for unsigned integers"),
                None,
            )?;
            store.set(
                &keyword::scale(index),
                Attribute::Integer(1),
                Some("data are not scaled"),
                None,
            )?;
        }
        if let Some(unit) = unit {
            store.set(
                &keyword::unit(index),
                Attribute::Text(unit.to_owned()),
                Some("physical unit of field"),
                None,
            )?;
        }
        if let Some(stored) = stored_null {
            store.set(
                &keyword::null(index),
                Attribute::Integer(stored),
                Some("NULL value of field"),
                None,
            )?;
        }

        let offset = self.row_length;
        self.file_columns += 1;
        self.row_length += fill.len();
        log::debug!(
            "declared column {name} as {element_count} x {wire_type} at offset {offset}"
        );
        Ok(self.push(ColumnDescriptor {
            name: name.to_owned(),
            wire_type,
            element_count,
            byte_offset: offset,
            index,
            unit: unit.map(str::to_owned),
            null: stored_null,
        }))
    }

    fn push(&mut self, column: ColumnDescriptor) -> &ColumnDescriptor {
        let position = self.columns.len();
        self.by_name.insert(column.name.clone(), position);
        self.columns.push(column);
        &self.columns[position]
    }

    /// Position of a column among the descriptors.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// The descriptor of a column.
    pub fn lookup(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.position(name).map(|position| &self.columns[position])
    }

    /// The descriptor at a position.
    pub fn column(&self, position: usize) -> Option<&ColumnDescriptor> {
        self.columns.get(position)
    }

    /// All bindable columns in file order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// An ordered snapshot for callers that do not know the schema in advance.
    pub fn metadata(&self) -> Vec<ColumnInfo> {
        self.columns
            .iter()
            .map(|c| ColumnInfo {
                name: c.name.clone(),
                wire_type: c.wire_type,
                element_count: c.element_count,
            })
            .collect()
    }

    /// The unit of a column, empty when the column is unknown or has none.
    pub fn unit(&self, name: &str) -> &str {
        self.lookup(name).and_then(ColumnDescriptor::unit).unwrap_or("")
    }

    /// Bytes per row, including columns that cannot be bound.
    pub fn row_length(&self) -> usize {
        self.row_length
    }

    /// A row holding the blank encoding of every column.
    ///
    /// Unsigned columns get their bias so that they decode as zero. Columns without a
    /// descriptor are zero bytes.
    pub fn blank_row(&self) -> Vec<u8> {
        let mut row = vec![0u8; self.row_length];
        for column in &self.columns {
            encode_blank(column.wire_type, &mut row[column.byte_range()]);
        }
        row
    }
}

fn has_unsigned_bias<S: AttributeStore>(
    store: &S,
    spec: &ColumnSpec,
    index: usize,
) -> BintabResult<bool> {
    let Some(bias) = sign_bit(spec.physical.byte_width()) else {
        return Ok(false);
    };
    let zero = store.get(&keyword::zero(index)).optional()?;
    let scale = store.get(&keyword::scale(index)).optional()?;
    Ok(zero.and_then(|z| z.as_i128()) == Some(i128::from(bias))
        && scale.is_none_or(|s| s.as_i128() == Some(1)))
}
