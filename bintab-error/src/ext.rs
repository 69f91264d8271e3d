use crate::BintabResult;

/// Extension trait for lookups where a missing key means "use the default".
pub trait OptionalExt<T>: private::Sealed {
    /// Converts a [`NotFound`][crate::BintabError::NotFound] error into `Ok(None)`, passing every
    /// other error through unchanged.
    fn optional(self) -> BintabResult<Option<T>>;
}

mod private {
    use crate::BintabResult;

    pub trait Sealed {}

    impl<T> Sealed for BintabResult<T> {}
}

impl<T> OptionalExt<T> for BintabResult<T> {
    fn optional(self) -> BintabResult<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{BintabResult, OptionalExt, bintab_err};

    #[test]
    fn absorbs_not_found_only() {
        let missing: BintabResult<i64> = Err(bintab_err!(NotFound: "TUNIT1"));
        assert!(missing.optional().unwrap().is_none());

        let present: BintabResult<i64> = Ok(7);
        assert_eq!(present.optional().unwrap(), Some(7));

        let broken: BintabResult<i64> = Err(bintab_err!("disk on fire"));
        assert!(broken.optional().is_err());
    }
}
