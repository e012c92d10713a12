//! Page-number pagination shared by every feed.

use serde::{Deserialize, Serialize};

/// Number of posts on one feed page.
pub const PAGE_SIZE: u64 = 10;

/// A 1-based page number with a fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u64,
    pub size: u64,
}

impl PageRequest {
    pub fn new(number: u64) -> Self {
        Self {
            number,
            size: PAGE_SIZE,
        }
    }

    pub fn first() -> Self {
        Self::new(1)
    }

    /// Zero-based page index, as used by the repositories.
    pub fn index(&self) -> u64 {
        self.number.saturating_sub(1)
    }

    pub fn offset(&self) -> u64 {
        self.index().saturating_mul(self.size)
    }

    /// Whether a repository can address this page at all: 1-based, with
    /// every row number on it representable.
    pub fn is_addressable(&self) -> bool {
        self.number >= 1 && self.number.checked_mul(self.size).is_some()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// One page of results plus the totals needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub size: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            number: request.number,
            size: request.size,
            total_items,
        }
    }

    /// Computes the total number of pages needed to display `total_items`.
    /// An empty feed still has one (empty) page.
    pub fn total_pages(&self) -> u64 {
        if self.total_items == 0 {
            1
        } else {
            self.total_items.div_ceil(self.size)
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Whether the requested page exists at all.
    pub fn in_range(&self) -> bool {
        self.number >= 1 && self.number <= self.total_pages()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_items: self.total_items,
        }
    }
}
