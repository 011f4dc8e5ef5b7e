//! Pagination types for search results.
//!
//! Listings are offset based: a [`Page`] names a page size and a start
//! index, and every result carries a [`ResultMeta`] with counts taken from
//! the same backend execution.

use serde::{Deserialize, Serialize};

/// Page size used when the client does not ask for one.
///
/// Matches the default `index.max_result_window` of Elasticsearch.
pub const MAX_PAGE_SIZE: u32 = 10_000;

/// Pagination request for a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Requested page size; `None` means [`MAX_PAGE_SIZE`].
    pub size: Option<u32>,

    /// Start index; `None` means 0.
    pub from: Option<u32>,
}

impl Page {
    /// Creates a page request with explicit size and start index.
    pub fn new(size: u32, from: u32) -> Self {
        Self {
            size: Some(size),
            from: Some(from),
        }
    }

    /// A page covering everything up to the system maximum.
    pub fn all() -> Self {
        Self::default()
    }

    /// A single-hit page, used by identifier lookups.
    pub fn single() -> Self {
        Self::new(1, 0)
    }

    /// Returns the size to send to the backend.
    pub fn effective_size(&self) -> u32 {
        self.size.unwrap_or(MAX_PAGE_SIZE)
    }

    /// Returns the start index to send to the backend.
    pub fn effective_from(&self) -> u32 {
        self.from.unwrap_or(0)
    }

    /// Returns this page with its size limited to `max_size`.
    ///
    /// An absent size becomes explicit so the executed size is reported
    /// back in [`ResultMeta`].
    pub fn clamped(&self, max_size: u32) -> Self {
        Self {
            size: Some(self.effective_size().min(max_size)),
            from: self.from,
        }
    }

    /// Start index of the page after this one.
    pub fn next_from(&self) -> u64 {
        u64::from(self.effective_from()) + u64::from(self.effective_size())
    }

    /// Returns true if a page after this one still has matches.
    pub fn has_next(&self, total_results: u64) -> bool {
        self.next_from() < total_results
    }
}

/// Counts and paging details of one executed listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMeta {
    /// Page size that was executed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// Requested start index, echoed back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<u32>,

    /// Number of documents matching the query, ignoring pagination.
    pub total_results: u64,

    /// Number of entities returned in this page.
    pub result_count: u64,

    /// Link to the next page; set by the API layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
}

impl ResultMeta {
    /// Creates metadata for an executed page.
    pub fn new(page: &Page, total_results: u64, result_count: u64) -> Self {
        Self {
            page_size: page.size,
            from: page.from,
            total_results,
            result_count,
            next_page: None,
        }
    }

    /// Metadata for a listing whose collection does not exist.
    pub fn empty(page: &Page) -> Self {
        Self::new(page, 0, 0)
    }

    /// Returns true if a page after this one still has matches.
    pub fn has_next_page(&self) -> bool {
        Page {
            size: self.page_size,
            from: self.from,
        }
        .has_next(self.total_results)
    }

    /// Attaches a next-page link.
    pub fn with_next_page(mut self, link: impl Into<String>) -> Self {
        self.next_page = Some(link.into());
        self
    }
}

/// One page of entities with its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage<T> {
    /// The entities in sort order.
    pub items: Vec<T>,

    /// Counts for this page.
    pub meta: ResultMeta,
}

impl<T> SearchPage<T> {
    /// Creates a page from items and metadata.
    pub fn new(items: Vec<T>, meta: ResultMeta) -> Self {
        Self { items, meta }
    }

    /// An empty page for a missing collection.
    pub fn empty(page: &Page) -> Self {
        Self {
            items: Vec::new(),
            meta: ResultMeta::empty(page),
        }
    }

    /// Returns true if this page has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Maps the items, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> SearchPage<U> {
        SearchPage {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}
