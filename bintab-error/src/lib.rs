#![deny(missing_docs)]

//! This crate defines the error and result types shared by every bintab crate.
//!
//! It also carries the `bintab_err!` family of macros used to build errors with a captured
//! backtrace.

mod ext;

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt::{Debug, Display, Formatter};
use std::num::TryFromIntError;
use std::ops::Deref;
use std::{env, fmt, io};

pub use ext::*;

/// A string that can be used as an error message.
#[derive(Debug)]
pub struct ErrString(Cow<'static, str>);

#[allow(clippy::fallible_impl_from)]
impl<T> From<T> for ErrString
where
    T: Into<Cow<'static, str>>,
{
    #[allow(clippy::panic)]
    fn from(msg: T) -> Self {
        if env::var("BINTAB_PANIC_ON_ERR").as_deref().unwrap_or("") == "1" {
            panic!("{}\nBacktrace:\n{}", msg.into(), Backtrace::capture());
        } else {
            Self(msg.into())
        }
    }
}

impl AsRef<str> for ErrString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ErrString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ErrString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<Infallible> for BintabError {
    fn from(_: Infallible) -> Self {
        unreachable!()
    }
}

// Spelled through an alias so `thiserror` does not treat these fields as `#[backtrace]` sources,
// which would require the unstable `error_generic_member_access` feature on stable toolchains.
type CapturedBacktrace = Backtrace;

/// The top-level error type for bintab.
#[derive(thiserror::Error)]
#[non_exhaustive]
pub enum BintabError {
    /// A bind, rebind or declaration disagrees with the column's schema.
    #[error("schema mismatch: {0}\nBacktrace:\n{1}")]
    SchemaMismatch(ErrString, CapturedBacktrace),
    /// A narrowing conversion found a value outside the destination range.
    #[error("overflow: {0}\nBacktrace:\n{1}")]
    Overflow(ErrString, CapturedBacktrace),
    /// A keyed lookup (attribute or column) found nothing.
    #[error("not found: {0}\nBacktrace:\n{1}")]
    NotFound(ErrString, CapturedBacktrace),
    /// An index is out of bounds.
    #[error("index {0} out of bounds from {1} to {2}\nBacktrace:\n{3}")]
    OutOfBounds(usize, usize, usize, CapturedBacktrace),
    /// An invalid argument was provided.
    #[error("{0}\nBacktrace:\n{1}")]
    InvalidArgument(ErrString, CapturedBacktrace),
    /// Persisted table metadata could not be decoded.
    #[error("{0}\nBacktrace:\n{1}")]
    InvalidSerde(ErrString, CapturedBacktrace),
    /// An assertion failed.
    #[error("{0}\nBacktrace:\n{1}")]
    AssertionFailed(ErrString, CapturedBacktrace),
    /// A wrapper for other errors, carrying additional context.
    #[error("{0}: {1}")]
    Context(ErrString, #[source] Box<BintabError>),
    /// A wrapper for IO errors.
    #[error("{0}\nBacktrace:\n{1}")]
    IOError(io::Error, CapturedBacktrace),
    /// A wrapper for errors from the standard library when converting a slice to an array.
    #[error("{0}\nBacktrace:\n{1}")]
    TryFromSliceError(std::array::TryFromSliceError, CapturedBacktrace),
    /// A wrapper for errors from the standard library when converting between integers.
    #[error("{0}\nBacktrace:\n{1}")]
    TryFromInt(TryFromIntError, CapturedBacktrace),
    /// A wrapper for JSON errors raised while encoding or decoding table metadata.
    #[cfg(feature = "serde")]
    #[error("{0}\nBacktrace:\n{1}")]
    JsonError(serde_json::Error, CapturedBacktrace),
}

impl BintabError {
    /// Adds additional context to an error.
    pub fn with_context<T: Into<ErrString>>(self, msg: T) -> Self {
        BintabError::Context(msg.into(), Box::new(self))
    }

    /// Attributes a conversion or schema error to the named column.
    ///
    /// `Overflow` and `SchemaMismatch` keep their variant so callers can still match on them;
    /// anything else is wrapped in [`BintabError::Context`].
    pub fn in_column(self, column: &str) -> Self {
        match self {
            BintabError::Overflow(msg, bt) => {
                BintabError::Overflow(format!("column {column}: {msg}").into(), bt)
            }
            BintabError::SchemaMismatch(msg, bt) => {
                BintabError::SchemaMismatch(format!("column {column}: {msg}").into(), bt)
            }
            other => other.with_context(format!("column {column}")),
        }
    }

    /// Returns true for [`BintabError::NotFound`], looking through any context wrappers.
    pub fn is_not_found(&self) -> bool {
        match self {
            BintabError::NotFound(..) => true,
            BintabError::Context(_, inner) => inner.is_not_found(),
            _ => false,
        }
    }
}

impl Debug for BintabError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// A type alias for Results that return BintabErrors as their error type.
pub type BintabResult<T> = Result<T, BintabError>;

/// A trait for expect-ing a BintabResult or an Option.
pub trait BintabExpect {
    /// The type of the value being expected.
    type Output;

    /// Returns the value of the result if it is Ok, otherwise panics with the error.
    /// Should be called only in contexts where the error condition represents a bug (programmer error).
    fn bintab_expect(self, msg: &str) -> Self::Output;
}

impl<T, E> BintabExpect for Result<T, E>
where
    E: Into<BintabError>,
{
    type Output = T;

    #[inline(always)]
    fn bintab_expect(self, msg: &str) -> Self::Output {
        self.map_err(|err| err.into())
            .unwrap_or_else(|e| bintab_panic!(e.with_context(msg.to_string())))
    }
}

impl<T> BintabExpect for Option<T> {
    type Output = T;

    #[inline(always)]
    fn bintab_expect(self, msg: &str) -> Self::Output {
        self.unwrap_or_else(|| {
            let err = BintabError::AssertionFailed(msg.to_string().into(), Backtrace::capture());
            bintab_panic!(err)
        })
    }
}

/// A convenient macro for creating a BintabError.
#[macro_export]
macro_rules! bintab_err {
    (OutOfBounds: $idx:expr, $start:expr, $stop:expr) => {{
        use std::backtrace::Backtrace;
        $crate::__private::must_use(
            $crate::BintabError::OutOfBounds($idx, $start, $stop, Backtrace::capture())
        )
    }};
    (Context: $msg:literal, $err:expr) => {{
        $crate::__private::must_use(
            $crate::BintabError::Context($msg.into(), Box::new($err))
        )
    }};
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {{
        use std::backtrace::Backtrace;
        $crate::__private::must_use(
            $crate::BintabError::$variant(format!($fmt, $($arg),*).into(), Backtrace::capture())
        )
    }};
    ($variant:ident: $err:expr $(,)?) => {
        $crate::__private::must_use(
            $crate::BintabError::$variant($err)
        )
    };
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::bintab_err!(InvalidArgument: $fmt, $($arg),*)
    };
}

/// A convenient macro for returning a BintabError.
#[macro_export]
macro_rules! bintab_bail {
    ($($tt:tt)+) => {
        return Err($crate::bintab_err!($($tt)+))
    };
}

/// A convenient macro for panicking with a BintabError in the presence of a programmer error
/// (e.g., an invariant has been violated).
#[macro_export]
macro_rules! bintab_panic {
    (OutOfBounds: $idx:expr, $start:expr, $stop:expr) => {{
        $crate::bintab_panic!($crate::bintab_err!(OutOfBounds: $idx, $start, $stop))
    }};
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::bintab_panic!($crate::bintab_err!($variant: $fmt, $($arg),*))
    };
    ($err:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        let err: $crate::BintabError = $err;
        panic!("{}", err.with_context(format!($fmt, $($arg),*)))
    }};
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::bintab_panic!($crate::bintab_err!($fmt, $($arg),*))
    };
    ($err:expr) => {{
        let err: $crate::BintabError = $err;
        panic!("{}", err)
    }};
}

impl From<io::Error> for BintabError {
    fn from(value: io::Error) -> Self {
        BintabError::IOError(value, Backtrace::capture())
    }
}

impl From<std::array::TryFromSliceError> for BintabError {
    fn from(value: std::array::TryFromSliceError) -> Self {
        BintabError::TryFromSliceError(value, Backtrace::capture())
    }
}

impl From<TryFromIntError> for BintabError {
    fn from(value: TryFromIntError) -> Self {
        BintabError::TryFromInt(value, Backtrace::capture())
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for BintabError {
    fn from(value: serde_json::Error) -> Self {
        BintabError::JsonError(value, Backtrace::capture())
    }
}

// Not public, referenced by macros only.
#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    #[inline]
    #[cold]
    #[must_use]
    pub const fn must_use(s: crate::BintabError) -> crate::BintabError {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_column_keeps_overflow_variant() {
        let err = bintab_err!(Overflow: "value {} does not fit in u8", 300).in_column("FLUX");
        assert!(matches!(err, BintabError::Overflow(..)));
        assert!(err.to_string().contains("column FLUX: value 300 does not fit in u8"));
    }

    #[test]
    fn in_column_wraps_other_errors() {
        let err = bintab_err!("bad row").in_column("TIME");
        assert!(matches!(err, BintabError::Context(..)));
        assert!(err.to_string().starts_with("column TIME: bad row"));
    }

    #[test]
    fn not_found_through_context() {
        let err = bintab_err!(NotFound: "TNULL3").with_context("reading sentinel");
        assert!(err.is_not_found());
        assert!(!bintab_err!("other").is_not_found());
    }

    #[test]
    #[should_panic(expected = "row buffer")]
    fn expect_none_panics() {
        let missing: Option<u8> = None;
        missing.bintab_expect("row buffer");
    }
}
