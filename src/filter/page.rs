use std::collections::HashMap;

/// Records per page for every paginated listing.
pub const PAGE_SIZE: usize = 10;

/// A 1-based page over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self { number: 1 }
    }
}

impl Page {
    pub fn new(number: i64) -> Self {
        Self { number }
    }

    /// Read `page` from query parameters. Absent or non-numeric values fall back to page 1.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        params
            .get("page")
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map(Self::new)
            .unwrap_or_default()
    }

    /// Half-open index range `[start, end)` this page covers, or `None` for
    /// page numbers below 1.
    pub fn bounds(&self) -> Option<(usize, usize)> {
        if self.number < 1 {
            return None;
        }
        let start = usize::try_from(self.number - 1).ok()?.checked_mul(PAGE_SIZE)?;
        Some((start, start.saturating_add(PAGE_SIZE)))
    }

    /// Slice `records` down to this page.
    ///
    /// Pages past the end and pages below 1 are empty, never an error; the
    /// caller decides whether an empty page is a failure.
    pub fn slice<'a, T>(&self, records: &'a [T]) -> &'a [T] {
        match self.bounds() {
            Some((start, end)) if start < records.len() => &records[start..end.min(records.len())],
            _ => &[],
        }
    }

    /// Owned variant of [`Page::slice`] with each record mapped through `format`.
    pub fn paginate<T, U>(&self, records: &[T], format: impl Fn(&T) -> U) -> Vec<U> {
        self.slice(records).iter().map(format).collect()
    }
}
