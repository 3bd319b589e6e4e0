/// One page of a result set. Page numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: u64,
}

impl Page {
    pub const DEFAULT_SIZE: u64 = 20;

    /// Creates a page. A page number of 0 is treated as the first page and a
    /// size of 0 as the default size.
    pub fn new(number: u64, size: u64) -> Page {
        Page {
            number: number.max(1),
            size: if size == 0 { Self::DEFAULT_SIZE } else { size },
        }
    }

    /// Number of rows skipped before this page, saturating at `u64::MAX`.
    pub fn offset(&self) -> u64 {
        self.number.saturating_sub(1).saturating_mul(self.size)
    }

    pub fn limit(&self) -> u64 {
        self.size
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::new(1, Self::DEFAULT_SIZE)
    }
}
