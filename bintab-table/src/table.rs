use std::fmt::{Debug, Formatter};

use bintab_codec::null::{decode_null_sentinel, write_null_sentinel};
use bintab_codec::resolve;
use bintab_dtype::{NativeBuffer, NativeType, NativeValue, WireType};
use bintab_error::{BintabResult, bintab_bail, bintab_err};

use crate::attribute::AttributeStore;
use crate::binding::{Binding, leading_integer, string_width};
use crate::options::{Mode, TableOptions};
use crate::schema::{ColumnDescriptor, ColumnInfo, Schema};
use crate::slots::{Slot, SlotId, Slots};
use crate::store::FileStore;

/// Typed row access to one table.
///
/// Callers bind [`Slot`]s to columns and then move rows between the file and those slots with
/// [`Table::write_row`] and [`Table::read_row`]. Rows are numbered from one. The write and read
/// cursors move independently.
///
/// Dropping a writable table trims row capacity that was grown but never written, the same as
/// [`Table::close`] except that errors can only be logged.
pub struct Table<S: FileStore + AttributeStore> {
    store: S,
    mode: Mode,
    options: TableOptions,
    schema: Schema,
    bindings: Vec<Binding>,
    /// Zero-based index of the next row to write.
    write_cursor: u64,
    /// Zero-based index of the next row to read.
    read_cursor: u64,
    written_rows: u64,
    /// Rows materialized in the store, at least `written_rows`.
    capacity: u64,
    finished: bool,
}

impl<S: FileStore + AttributeStore> Debug for Table<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("mode", &self.mode)
            .field("schema", &self.schema)
            .field("bindings", &self.bindings)
            .field("write_cursor", &self.write_cursor)
            .field("read_cursor", &self.read_cursor)
            .field("written_rows", &self.written_rows)
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<S: FileStore + AttributeStore> Table<S> {
    /// Starts a new writable table in an empty store.
    pub fn create(store: S, options: TableOptions) -> BintabResult<Self> {
        let rows = store.row_count()?;
        if rows != 0 {
            bintab_bail!("cannot create a table in a store that already holds {rows} rows");
        }
        Self::open(store, Mode::Writable, options)
    }

    /// Opens the table a store holds, discovering its columns.
    pub fn open(store: S, mode: Mode, options: TableOptions) -> BintabResult<Self> {
        let schema = Schema::discover(&store)?;
        let rows = store.row_count()?;
        log::debug!(
            "opened {mode:?} table with {} columns and {rows} rows",
            schema.columns().len()
        );
        Ok(Self {
            store,
            mode,
            options,
            schema,
            bindings: Vec::new(),
            write_cursor: rows,
            read_cursor: 0,
            written_rows: rows,
            capacity: rows,
            finished: false,
        })
    }

    /// Opens a table for reading with default options.
    pub fn read_only(store: S) -> BintabResult<Self> {
        Self::open(store, Mode::ReadOnly, TableOptions::default())
    }

    /// Opens a table for appending and updating with default options.
    pub fn writable(store: S) -> BintabResult<Self> {
        Self::open(store, Mode::Writable, TableOptions::default())
    }

    /// Appends a column.
    ///
    /// Rows already in the table get the blank value of the new column: zero, `false` or the
    /// empty string. `null` is the column's NULL sentinel, for integer columns only.
    pub fn declare_column(
        &mut self,
        name: &str,
        wire_type: WireType,
        element_count: usize,
        unit: Option<&str>,
        null: Option<i128>,
    ) -> BintabResult<&ColumnDescriptor> {
        self.require_writable("declare a column")?;
        self.schema.declare(
            &mut self.store,
            name,
            wire_type,
            element_count,
            unit,
            null,
        )
    }

    /// Binds a location to a column.
    ///
    /// A writable table declares a missing column with the wire type implied by `T`; strings
    /// are as wide as the longest value in the slot. A read-only table ignores missing columns,
    /// and the slot keeps its value on every read.
    ///
    /// At most `min(slot.len(), element_count)` elements are converted per row. On read, slot
    /// elements beyond the column's element count are left untouched. Binding a name again
    /// replaces the earlier binding but keeps its position in bind order.
    pub fn bind<T: NativeValue>(
        &mut self,
        name: &str,
        slot: Slot<T>,
        slots: &mut Slots,
    ) -> BintabResult<()> {
        self.bind_id(name, slot.id(), T::NATIVE, slot.len(), None, slots)
    }

    /// Binds a location to a column and fetches the column's NULL sentinel.
    ///
    /// If the column records a NULL sentinel, it is decoded into the first element of
    /// `null_slot`. Without one, `null_slot` is left untouched. When a writable table declares
    /// the column, the first value of `null_slot` becomes its sentinel.
    pub fn bind_nullable<T: NativeValue>(
        &mut self,
        name: &str,
        slot: Slot<T>,
        null_slot: Slot<T>,
        slots: &mut Slots,
    ) -> BintabResult<()> {
        self.bind_id(
            name,
            slot.id(),
            T::NATIVE,
            slot.len(),
            Some(null_slot.id()),
            slots,
        )
    }

    fn bind_id(
        &mut self,
        name: &str,
        slot: SlotId,
        native: NativeType,
        slot_len: usize,
        null_slot: Option<SlotId>,
        slots: &mut Slots,
    ) -> BintabResult<()> {
        let values = slots.buffer(slot)?;
        let column = match self.schema.position(name) {
            Some(position) => position,
            None if self.mode == Mode::ReadOnly => {
                log::debug!("column {name} is not in the table, ignoring bind");
                return Ok(());
            }
            None => {
                let wire_type = WireType::for_native(native, string_width(values));
                let null = match null_slot {
                    Some(id) if wire_type.is_integer() => leading_integer(slots.buffer(id)?),
                    _ => None,
                };
                let element_count = slot_len.max(1);
                self.declare_column(name, wire_type, element_count, None, null)?;
                self.schema
                    .position(name)
                    .ok_or_else(|| bintab_err!(NotFound: "column {}", name))?
            }
        };
        let descriptor = self.descriptor(column)?;
        let codec = resolve(descriptor.wire_type(), native).map_err(|e| e.in_column(name))?;
        let count = slot_len.min(descriptor.element_count());

        if let (Some(id), Some(stored)) = (null_slot, descriptor.stored_null()) {
            let sentinel = decode_null_sentinel(descriptor.wire_type(), stored)
                .map_err(|e| e.in_column(name))?;
            write_null_sentinel(sentinel, slots.buffer_mut(id)?).map_err(|e| e.in_column(name))?;
        }

        let binding = Binding {
            column,
            slot,
            native,
            slot_len,
            count,
            codec,
        };
        match self.bindings.iter_mut().find(|b| b.column == column) {
            Some(existing) => *existing = binding,
            None => self.bindings.push(binding),
        }
        Ok(())
    }

    /// Points an existing binding at a new location.
    ///
    /// Does nothing if `name` was never bound. With strict rebinding (the default) the new
    /// location must have the native type and length of the original one.
    pub fn rebind<T: NativeValue>(&mut self, name: &str, slot: Slot<T>) -> BintabResult<()> {
        let Some(column) = self.schema.position(name) else {
            return Ok(());
        };
        let Some(index) = self.bindings.iter().position(|b| b.column == column) else {
            return Ok(());
        };
        let element_count = self.descriptor(column)?.element_count();
        let binding = &mut self.bindings[index];
        if binding.native != T::NATIVE || binding.slot_len != slot.len() {
            if self.options.strict_rebind() {
                bintab_bail!(
                    SchemaMismatch: "column {} is bound to {} x {}, cannot rebind to {} x {}",
                    name,
                    binding.slot_len,
                    binding.native,
                    slot.len(),
                    T::NATIVE
                );
            }
            binding.codec =
                resolve(binding.codec.wire_type(), T::NATIVE).map_err(|e| e.in_column(name))?;
            binding.native = T::NATIVE;
            binding.slot_len = slot.len();
            binding.count = slot.len().min(element_count);
        }
        binding.slot = slot.id();
        Ok(())
    }

    /// Writes the bound values to the row at the write cursor and advances it.
    ///
    /// Appending grows the store's row capacity ahead of need. Updating an earlier row starts
    /// from its stored bytes, so unbound columns keep their values, and afterwards loads the
    /// following row into the bound locations. If any value fails to convert, including a
    /// value of that following row, nothing is written and the cursors, the row count and the
    /// bound locations are unchanged.
    pub fn write_row(&mut self, slots: &mut Slots) -> BintabResult<()> {
        self.require_writable("write a row")?;
        let target = self.write_cursor;
        let updating = target < self.written_rows;
        let mut row = if updating {
            let mut row = vec![0u8; self.schema.row_length()];
            self.store.read_row_bytes(target, &mut row)?;
            row
        } else {
            self.schema.blank_row()
        };
        for binding in &self.bindings {
            binding.encode(self.descriptor(binding.column)?, slots, &mut row)?;
        }
        let next = if updating && target + 1 < self.written_rows {
            self.stage(target + 1, slots)?
        } else {
            Vec::new()
        };

        if target >= self.capacity {
            self.grow(target + 1)?;
        }
        self.store.write_row_bytes(target, &row)?;

        for (id, values) in next {
            *slots.buffer_mut(id)? = values;
        }
        if !updating {
            self.written_rows = target + 1;
        }
        self.write_cursor = target + 1;
        Ok(())
    }

    /// Reads a row into the bound locations.
    ///
    /// `row == 0` continues from the read cursor; any other value reads that row. Returns
    /// `false` past the last written row. On success the read cursor moves to the row after
    /// the one read.
    pub fn read_row(&mut self, row: u64, slots: &mut Slots) -> BintabResult<bool> {
        let target = match row {
            0 => self.read_cursor,
            row => row - 1,
        };
        if target >= self.written_rows {
            return Ok(false);
        }
        self.fetch(target, slots)?;
        self.read_cursor = target + 1;
        Ok(true)
    }

    /// Moves the read cursor to `row` without reading it.
    ///
    /// Returns `false`, leaving the cursor where it was, if `row` is zero or past the last
    /// written row.
    pub fn set_read_row(&mut self, row: u64) -> bool {
        if row == 0 || row > self.written_rows {
            return false;
        }
        self.read_cursor = row - 1;
        true
    }

    /// Moves the write cursor to `row`, which may be any written row or the next one to append.
    ///
    /// A written row is read into the bound locations first. Returns `false` without moving for
    /// any other row.
    pub fn prepare_write_row(&mut self, row: u64, slots: &mut Slots) -> BintabResult<bool> {
        self.require_writable("prepare a row")?;
        if row == 0 || row > self.written_rows + 1 {
            return Ok(false);
        }
        let target = row - 1;
        if target < self.written_rows {
            self.fetch(target, slots)?;
        }
        self.write_cursor = target;
        Ok(true)
    }

    /// Name, wire type and element count of every bindable column, in file order.
    pub fn column_metadata(&self) -> Vec<ColumnInfo> {
        self.schema.metadata()
    }

    /// The unit of a column, empty when the column is unknown or has none.
    pub fn column_unit(&self, name: &str) -> String {
        self.schema.unit(name).to_owned()
    }

    /// The column descriptors and row layout.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Rows written so far.
    pub fn row_count(&self) -> u64 {
        self.written_rows
    }

    /// The number of the row the next [`Table::write_row`] writes.
    pub fn write_row_number(&self) -> u64 {
        self.write_cursor + 1
    }

    /// The number of the row the next [`Table::read_row`] with `0` reads.
    pub fn read_row_number(&self) -> u64 {
        self.read_cursor + 1
    }

    /// Whether the table accepts writes.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Bytes per row.
    pub fn row_length(&self) -> usize {
        self.schema.row_length()
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Trims unwritten row capacity and flushes the store.
    pub fn close(mut self) -> BintabResult<()> {
        self.finish()
    }

    fn finish(&mut self) -> BintabResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        if self.mode == Mode::Writable {
            if self.capacity > self.written_rows {
                log::debug!(
                    "trimming {} unwritten rows",
                    self.capacity - self.written_rows
                );
                self.store.shrink_rows(self.capacity - self.written_rows)?;
                self.capacity = self.written_rows;
            }
            self.store.flush()?;
        }
        Ok(())
    }

    fn grow(&mut self, required: u64) -> BintabResult<()> {
        let capacity = self.options.next_capacity(self.capacity, required);
        log::debug!("growing row capacity from {} to {capacity}", self.capacity);
        self.store.grow_rows(capacity - self.capacity)?;
        self.capacity = capacity;
        Ok(())
    }

    /// Reads the row at a zero-based index into every bound location, in bind order.
    fn fetch(&mut self, index: u64, slots: &mut Slots) -> BintabResult<()> {
        let mut row = vec![0u8; self.schema.row_length()];
        self.store.read_row_bytes(index, &mut row)?;
        for binding in &self.bindings {
            let column = self.descriptor(binding.column)?;
            binding.decode(column, &row, slots.buffer_mut(binding.slot)?)?;
        }
        Ok(())
    }

    /// Like [`Table::fetch`], but decodes into copies of the bound locations so that nothing
    /// changes until the caller commits them.
    fn stage(&mut self, index: u64, slots: &Slots) -> BintabResult<Vec<(SlotId, NativeBuffer)>> {
        let mut row = vec![0u8; self.schema.row_length()];
        self.store.read_row_bytes(index, &mut row)?;
        let mut staged: Vec<(SlotId, NativeBuffer)> = Vec::with_capacity(self.bindings.len());
        for binding in &self.bindings {
            let position = match staged.iter().position(|(id, _)| *id == binding.slot) {
                Some(position) => position,
                None => {
                    staged.push((binding.slot, slots.buffer(binding.slot)?.clone()));
                    staged.len() - 1
                }
            };
            let column = self.descriptor(binding.column)?;
            binding.decode(column, &row, &mut staged[position].1)?;
        }
        Ok(staged)
    }

    fn descriptor(&self, column: usize) -> BintabResult<&ColumnDescriptor> {
        self.schema
            .column(column)
            .ok_or_else(|| bintab_err!(OutOfBounds: column, 0, self.schema.columns().len()))
    }

    fn require_writable(&self, action: &str) -> BintabResult<()> {
        if self.mode != Mode::Writable {
            bintab_bail!("cannot {action} in a read-only table");
        }
        Ok(())
    }
}

impl<S: FileStore + AttributeStore> Drop for Table<S> {
    fn drop(&mut self) {
        if let Err(err) = self.finish() {
            log::warn!("failed to close table: {err}");
        }
    }
}
