#![deny(missing_docs)]

//! The column type domain for bintab.
//!
//! A binary table distinguishes three views of a column's type:
//!
//! * [`PhysicalType`]: what the file actually stores. The format only has signed integers, so
//!   this is all the file handle knows about.
//! * [`WireType`]: the logical wire type of a column, which adds unsigned integers on top of the
//!   physical types using a sign-bit bias (see [`unsigned`]).
//! * [`NativeType`]: the in-memory Rust type a caller binds to a column.

pub use native::*;
pub use physical::*;
pub use wire::*;

mod macros;
mod native;
mod physical;
pub mod unsigned;
mod wire;
