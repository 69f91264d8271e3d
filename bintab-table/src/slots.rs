use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use bintab_dtype::{NativeBuffer, NativeValue};
use bintab_error::{BintabResult, bintab_err};

static NEXT_REGISTRY: AtomicU64 = AtomicU64::new(1);

/// Caller-owned storage for the locations bound to table columns.
///
/// A table never holds references into caller memory. Binding a column records a [`Slot`], an
/// index into a `Slots` registry, and every row operation takes the registry explicitly. A slot
/// from another registry is rejected, so a bound location can never dangle.
pub struct Slots {
    id: u64,
    values: Vec<NativeBuffer>,
}

/// Typed handle to one location in a [`Slots`] registry.
pub struct Slot<T> {
    id: SlotId,
    len: usize,
    _marker: PhantomData<fn() -> T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SlotId {
    registry: u64,
    index: usize,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slot<T> {}

impl<T: NativeValue> Debug for Slot<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("native", &T::NATIVE)
            .field("index", &self.id.index)
            .field("len", &self.len)
            .finish()
    }
}

impl<T: NativeValue> Slot<T> {
    /// Number of elements at the location.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the location holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn id(&self) -> SlotId {
        self.id
    }
}

impl Default for Slots {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Slots {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slots")
            .field("id", &self.id)
            .field("len", &self.values.len())
            .finish()
    }
}

impl Slots {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            id: NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed),
            values: Vec::new(),
        }
    }

    /// Allocates a location of `len` default values.
    pub fn alloc<T: NativeValue>(&mut self, len: usize) -> Slot<T> {
        self.vector(vec![T::default(); len])
    }

    /// Allocates a single-element location.
    pub fn scalar<T: NativeValue>(&mut self, value: T) -> Slot<T> {
        self.vector(vec![value])
    }

    /// Allocates a location holding `values`.
    pub fn vector<T: NativeValue>(&mut self, values: Vec<T>) -> Slot<T> {
        let len = values.len();
        self.values.push(T::into_buffer(values));
        Slot {
            id: SlotId {
                registry: self.id,
                index: self.values.len() - 1,
            },
            len,
            _marker: PhantomData,
        }
    }

    /// All values at a location.
    pub fn get<T: NativeValue>(&self, slot: Slot<T>) -> BintabResult<&[T]> {
        self.buffer(slot.id)?
            .as_slice::<T>()
            .ok_or_else(|| bintab_err!(SchemaMismatch: "slot does not hold {}", T::NATIVE))
    }

    /// Mutable access to all values at a location.
    pub fn get_mut<T: NativeValue>(&mut self, slot: Slot<T>) -> BintabResult<&mut [T]> {
        self.buffer_mut(slot.id)?
            .as_mut_slice::<T>()
            .ok_or_else(|| bintab_err!(SchemaMismatch: "slot does not hold {}", T::NATIVE))
    }

    /// The first value at a location.
    pub fn value<T: NativeValue>(&self, slot: Slot<T>) -> BintabResult<T> {
        self.get(slot)?
            .first()
            .cloned()
            .ok_or_else(|| bintab_err!("slot is empty"))
    }

    /// Replaces the first value at a location.
    pub fn set<T: NativeValue>(&mut self, slot: Slot<T>, value: T) -> BintabResult<()> {
        let first = self
            .get_mut(slot)?
            .first_mut()
            .ok_or_else(|| bintab_err!("slot is empty"))?;
        *first = value;
        Ok(())
    }

    /// Replaces the leading values at a location with `values`.
    pub fn set_all<T: NativeValue>(&mut self, slot: Slot<T>, values: &[T]) -> BintabResult<()> {
        let dst = self.get_mut(slot)?;
        if values.len() > dst.len() {
            return Err(bintab_err!(OutOfBounds: values.len(), 0, dst.len()));
        }
        dst[..values.len()].clone_from_slice(values);
        Ok(())
    }

    pub(crate) fn buffer(&self, id: SlotId) -> BintabResult<&NativeBuffer> {
        self.check(id)?;
        self.values
            .get(id.index)
            .ok_or_else(|| bintab_err!(OutOfBounds: id.index, 0, self.values.len()))
    }

    pub(crate) fn buffer_mut(&mut self, id: SlotId) -> BintabResult<&mut NativeBuffer> {
        self.check(id)?;
        let len = self.values.len();
        self.values
            .get_mut(id.index)
            .ok_or_else(|| bintab_err!(OutOfBounds: id.index, 0, len))
    }

    fn check(&self, id: SlotId) -> BintabResult<()> {
        if id.registry != self.id {
            return Err(bintab_err!(
                "slot belongs to registry {}, not {}",
                id.registry,
                self.id
            ));
        }
        Ok(())
    }
}
