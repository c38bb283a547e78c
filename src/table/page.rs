/// Fixed-size page windowing over a result of `total` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_size: usize,
    pub total: usize,
}

/// One page's slice bounds plus the pager control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl Pagination {
    pub fn new(page_size: usize, total: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            total,
        }
    }

    pub fn page_count(&self) -> usize {
        (self.total + self.page_size - 1) / self.page_size
    }

    /// Last valid page index; 0 for an empty result.
    pub fn max_index(&self) -> usize {
        self.page_count().saturating_sub(1)
    }

    pub fn clamp(&self, index: usize) -> usize {
        index.min(self.max_index())
    }

    pub fn window(&self, index: usize) -> PageWindow {
        let index = self.clamp(index);
        let start = (index * self.page_size).min(self.total);
        let end = (start + self.page_size).min(self.total);
        PageWindow {
            index,
            start,
            end,
            total: self.total,
            has_prev: index > 0,
            has_next: index < self.max_index(),
        }
    }
}

impl PageWindow {
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// "Showing 11–20 of 42 contracts"; empty for an empty result.
    pub fn status_line(&self) -> String {
        if self.total == 0 {
            return String::new();
        }
        format!("Showing {}–{} of {} contracts", self.start + 1, self.end, self.total)
    }
}
