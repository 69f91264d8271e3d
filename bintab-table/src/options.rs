use serde::{Deserialize, Serialize};

/// Whether a table accepts structural changes and row writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Columns are discovered from the file; rows can only be read.
    ReadOnly,
    /// Columns can be declared and rows written, appended and updated.
    Writable,
}

/// Tuning knobs of the table engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    growth_factor: u64,
    max_growth_rows: u64,
    strict_rebind: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            growth_factor: 5,
            max_growth_rows: 10_000,
            strict_rebind: true,
        }
    }
}

impl TableOptions {
    /// Multiple of the current row capacity to grow to when a write runs past it.
    pub fn with_growth_factor(mut self, growth_factor: u64) -> Self {
        self.growth_factor = growth_factor.max(1);
        self
    }

    /// Upper bound on the rows added by one growth step.
    pub fn with_max_growth_rows(mut self, max_growth_rows: u64) -> Self {
        self.max_growth_rows = max_growth_rows.max(1);
        self
    }

    /// Whether `rebind` rejects a location whose native type or length differs from the
    /// original bind.
    pub fn with_strict_rebind(mut self, strict_rebind: bool) -> Self {
        self.strict_rebind = strict_rebind;
        self
    }

    /// See [`TableOptions::with_growth_factor`].
    pub fn growth_factor(&self) -> u64 {
        self.growth_factor
    }

    /// See [`TableOptions::with_max_growth_rows`].
    pub fn max_growth_rows(&self) -> u64 {
        self.max_growth_rows
    }

    /// See [`TableOptions::with_strict_rebind`].
    pub fn strict_rebind(&self) -> bool {
        self.strict_rebind
    }

    /// The row capacity to materialize when `required` rows are needed and `current` exist.
    ///
    /// Capacity is multiplied by the growth factor, but never by more than `max_growth_rows` in
    /// one step, and always reaches `required`.
    pub fn next_capacity(&self, current: u64, required: u64) -> u64 {
        let grown = current
            .saturating_mul(self.growth_factor)
            .min(current.saturating_add(self.max_growth_rows));
        grown.max(required)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, 1, 1)]
    #[case(1, 2, 5)]
    #[case(5, 6, 25)]
    #[case(25, 26, 125)]
    #[case(10_000, 10_001, 20_000)]
    #[case(3, 40, 40)]
    fn growth_is_biased_to_five_times(
        #[case] current: u64,
        #[case] required: u64,
        #[case] expected: u64,
    ) {
        assert_eq!(
            TableOptions::default().next_capacity(current, required),
            expected
        );
    }

    #[test]
    fn chunk_bound_applies() {
        let options = TableOptions::default().with_max_growth_rows(100);
        assert_eq!(options.next_capacity(1_000, 1_001), 1_100);
    }

    #[test]
    fn options_from_config() {
        let options: TableOptions =
            serde_json::from_str(r#"{"growth_factor": 2, "strict_rebind": false}"#).unwrap();
        assert_eq!(options.growth_factor(), 2);
        assert_eq!(options.max_growth_rows(), 10_000);
        assert!(!options.strict_rebind());
    }
}
