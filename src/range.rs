//! Record-range selection — clamp optional lower/upper bounds against the
//! actual record count.

/// The range of record indices selected for processing.  Stored half-open;
/// callers see the inclusive range `[low, high]` with `low = max(lower, 0)`
/// and `high = min(upper, record_count - 1)`.  An empty range is not an
/// error: callers process nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedRange {
    start: u64,
    end: u64,
}

impl SelectedRange {
    /// `lower` defaults to 0; `upper` defaults to "no bound" and is clamped
    /// to the last record.  Bounds arrive already validated (the CLI rejects
    /// negatives), so the only clamping left is against `record_count`.
    pub fn select(lower: Option<u64>, upper: Option<u64>, record_count: u64) -> Self {
        let start = lower.unwrap_or(0);
        let end = match upper {
            Some(upper) => upper.saturating_add(1).min(record_count),
            None => record_count,
        };
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of selected records.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Lowest selected index, if any.
    pub fn first(&self) -> Option<u64> {
        (!self.is_empty()).then_some(self.start)
    }

    /// Highest selected index, if any.
    pub fn last(&self) -> Option<u64> {
        (!self.is_empty()).then(|| self.end - 1)
    }

    /// Selected indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u64> {
        self.start..self.end.max(self.start)
    }
}
