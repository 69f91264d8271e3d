#![deny(missing_docs)]

//! Typed row access for self-describing binary tables.
//!
//! This crate re-exports the table engine at its root and every other bintab crate as a module.

pub use bintab_table::*;
pub use {
    bintab_codec as codec, bintab_dtype as dtype, bintab_error as error, bintab_table as table,
};
