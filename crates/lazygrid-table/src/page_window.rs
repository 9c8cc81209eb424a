//! Pagination window
//!
//! Tracks which slice of the remote collection is displayed and computes the
//! window of the next fetch. The window itself only moves once a fetch for it
//! has resolved; until then the grid keeps showing the previous page.

use lazygrid_core::{GridError, GridResult};
use serde::{Deserialize, Serialize};

/// Page sizes offered when nothing else is configured
pub const DEFAULT_PAGE_SIZES: &[usize] = &[5, 10, 20];

/// Default rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Offset and size of a page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchWindow {
    pub offset: usize,
    pub size: usize,
}

impl FetchWindow {
    pub fn new(offset: usize, size: usize) -> Self {
        Self { offset, size }
    }

    /// Largest valid page start for `total` records, aligned to `size`
    fn last_page_start(size: usize, total: usize) -> usize {
        if total == 0 {
            0
        } else {
            ((total - 1) / size) * size
        }
    }

    /// This window with its offset pulled back into `[0, total]`
    pub fn clamped_to(&self, total: usize) -> FetchWindow {
        FetchWindow {
            offset: self.offset.min(Self::last_page_start(self.size, total)),
            size: self.size,
        }
    }
}

/// Pagination state of a grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    offset: usize,
    size: usize,
    /// Authoritative count reported by the record source
    total: usize,
    available_page_sizes: Vec<usize>,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            offset: 0,
            size: DEFAULT_PAGE_SIZE,
            total: 0,
            available_page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
        }
    }
}

impl PageWindow {
    /// Create a window at the first page.
    ///
    /// An empty `available_page_sizes` falls back to [`DEFAULT_PAGE_SIZES`].
    pub fn new(size: usize, available_page_sizes: Vec<usize>) -> GridResult<Self> {
        let available_page_sizes = if available_page_sizes.is_empty() {
            DEFAULT_PAGE_SIZES.to_vec()
        } else {
            available_page_sizes
        };
        let window = Self {
            offset: 0,
            size,
            total: 0,
            available_page_sizes,
        };
        window.validate_size(size)?;
        Ok(window)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn available_page_sizes(&self) -> &[usize] {
        &self.available_page_sizes
    }

    pub fn current(&self) -> FetchWindow {
        FetchWindow::new(self.offset, self.size)
    }

    fn validate_size(&self, size: usize) -> GridResult<()> {
        if size == 0 || !self.available_page_sizes.contains(&size) {
            return Err(GridError::InvalidPageSize {
                size,
                allowed: self.available_page_sizes.clone(),
            });
        }
        Ok(())
    }

    /// Compute the window to fetch for a page-change request.
    ///
    /// The offset is aligned down to a multiple of `size` and clamped to the
    /// start of the last page of the known total.
    pub fn request(&self, offset: usize, size: usize) -> GridResult<FetchWindow> {
        self.validate_size(size)?;
        let aligned = FetchWindow::new(offset - offset % size, size);
        Ok(aligned.clamped_to(self.total))
    }

    /// Adopt a resolved fetch and the total reported by the source
    pub fn apply_response(&mut self, window: FetchWindow, total: usize) {
        self.offset = window.offset;
        self.size = window.size;
        self.total = total;
    }

    /// Zero-based index of the displayed page
    pub fn page_index(&self) -> usize {
        self.offset / self.size
    }

    /// Total number of pages, at least one
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.size).max(1)
    }

    pub fn can_go_next(&self) -> bool {
        self.offset + self.size < self.total
    }

    pub fn can_go_prev(&self) -> bool {
        self.offset > 0
    }

    pub fn next(&self) -> Option<FetchWindow> {
        self.can_go_next()
            .then(|| FetchWindow::new(self.offset + self.size, self.size))
    }

    pub fn prev(&self) -> Option<FetchWindow> {
        self.can_go_prev()
            .then(|| FetchWindow::new(self.offset.saturating_sub(self.size), self.size))
    }

    pub fn first(&self) -> FetchWindow {
        FetchWindow::new(0, self.size)
    }

    pub fn last(&self) -> FetchWindow {
        FetchWindow::new(FetchWindow::last_page_start(self.size, self.total), self.size)
    }

    /// Status line, e.g. "10 records in page 2 of 20 (200 total)"
    pub fn status_text(&self, records_in_page: usize) -> String {
        format!(
            "{} records in page {} of {} ({} total)",
            records_in_page,
            self.page_index() + 1,
            self.total_pages(),
            self.total
        )
    }
}
