//! Tests for offset pagination.
//!
//! Pages of size S at offsets 0, S, 2S, ... must cover every match exactly
//! once in a stable order.

mod common;

use std::collections::HashSet;

use codelist_persistence::search::SearchCriteria;
use codelist_persistence::types::{MAX_PAGE_SIZE, Page};

use common::*;

async fn collect_pages(size: u32) -> Vec<Vec<String>> {
    let repository = seeded_repository();
    let mut pages = Vec::new();
    let mut from = 0;

    loop {
        let page = Page::new(size, from);
        let result = repository
            .get_codes("interop", "numerot", &SearchCriteria::new(), &page)
            .await
            .unwrap();
        assert_eq!(result.meta.total_results, NUMBERED_CODES as u64);
        assert_eq!(result.meta.result_count, result.len() as u64);
        assert_eq!(result.meta.has_next_page(), page.has_next(NUMBERED_CODES as u64));

        let values: Vec<String> = result.items.into_iter().map(|c| c.code_value).collect();
        let more = result.meta.has_next_page();
        pages.push(values);
        if !more {
            break;
        }
        from += size;
    }
    pages
}

#[tokio::test]
async fn test_pages_form_disjoint_cover() {
    for size in [1, 5, 7, 23, 50] {
        let pages = collect_pages(size).await;
        let flattened: Vec<String> = pages.iter().flatten().cloned().collect();

        assert_eq!(flattened.len(), NUMBERED_CODES, "size {}", size);
        let unique: HashSet<_> = flattened.iter().collect();
        assert_eq!(unique.len(), NUMBERED_CODES, "size {}", size);

        let mut sorted = flattened.clone();
        sorted.sort();
        assert_eq!(flattened, sorted, "size {}", size);
    }
}

#[tokio::test]
async fn test_page_count_matches_size() {
    let pages = collect_pages(5).await;
    assert_eq!(pages.len(), 5);
    assert_eq!(pages.last().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_order_is_stable_between_calls() {
    assert_eq!(collect_pages(4).await, collect_pages(4).await);
}

#[tokio::test]
async fn test_default_page_returns_everything() {
    let repository = seeded_repository();
    let result = repository
        .get_codes("interop", "numerot", &SearchCriteria::new(), &Page::default())
        .await
        .unwrap();
    assert_eq!(result.len(), NUMBERED_CODES);
    assert_eq!(result.meta.page_size, Some(MAX_PAGE_SIZE));
    assert!(!result.meta.has_next_page());
    assert!(NUMBERED_CODES < MAX_PAGE_SIZE as usize);
}

#[tokio::test]
async fn test_offset_past_end_is_empty() {
    let repository = seeded_repository();
    let result = repository
        .get_codes(
            "interop",
            "numerot",
            &SearchCriteria::new(),
            &Page::new(10, 100),
        )
        .await
        .unwrap();
    assert!(result.is_empty());
    assert_eq!(result.meta.total_results, NUMBERED_CODES as u64);
    assert!(!result.meta.has_next_page());
}
