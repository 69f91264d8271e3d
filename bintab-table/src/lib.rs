#![deny(missing_docs)]

//! Typed row access for self-describing binary tables.
//!
//! A [`Table`] sits between caller-owned values and a [`FileStore`] holding packed, big-endian
//! rows. Callers allocate locations in a [`Slots`] registry, bind them to columns by name and
//! then write or read whole rows:
//!
//! ```
//! use bintab_table::{MemoryStore, Mode, Slots, Table, TableOptions};
//!
//! let mut store = MemoryStore::new();
//! let mut slots = Slots::new();
//! let x = slots.scalar(0i32);
//!
//! let mut table = Table::create(&mut store, TableOptions::default())?;
//! table.bind("X", x, &mut slots)?;
//! for value in [10, 20, 30] {
//!     slots.set(x, value)?;
//!     table.write_row(&mut slots)?;
//! }
//! table.close()?;
//!
//! let mut table = Table::open(&mut store, Mode::ReadOnly, TableOptions::default())?;
//! table.bind("X", x, &mut slots)?;
//! assert!(table.read_row(2, &mut slots)?);
//! assert_eq!(slots.value(x)?, 20);
//! # Ok::<(), bintab_error::BintabError>(())
//! ```
//!
//! Column types, unsigned columns and NULL sentinels are described by attributes in the
//! table's [`AttributeStore`], so files stay readable by tools that only know signed integers.

pub use attribute::*;
pub use options::*;
pub use schema::*;
pub use slots::*;
pub use store::*;
pub use table::*;

mod attribute;
mod binding;
mod options;
mod schema;
mod slots;
mod store;
mod table;
