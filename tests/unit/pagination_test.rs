// Property-based tests for the pagination arithmetic.
//
// Covers the envelope invariants: total_pages is a ceiling division,
// has_next/has_prev follow the page position, data length never exceeds the
// limit, and the empty-set convention (total_pages == 0, both flags false).

use proptest::prelude::*;

use trailhub::core::pagination::{
    total_pages, PageRequest, PaginationResult, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};

proptest! {
    #[test]
    fn test_total_pages_is_ceiling_division(
        total in 0u64..1_000_000u64,
        limit in 1u32..=MAX_PAGE_SIZE
    ) {
        let pages = total_pages(total, limit);
        let limit = u64::from(limit);

        prop_assert_eq!(u64::from(pages), (total + limit - 1) / limit);
    }

    #[test]
    fn test_envelope_invariants(
        page in 1u32..500u32,
        limit in 1u32..=MAX_PAGE_SIZE,
        total in 0u64..10_000u64
    ) {
        let request = PageRequest::new(Some(page), Some(limit)).unwrap();

        // The store returns min(limit, remaining) rows for a consistent set
        let remaining = total.saturating_sub(request.offset());
        let expected_len = remaining.min(request.take());
        let data: Vec<u64> = (0..expected_len).collect();

        let result = PaginationResult::new(data, total, &request);

        prop_assert_eq!(result.data.len() as u64, expected_len);
        prop_assert_eq!(result.total, total);
        prop_assert!(result.data.len() as u64 <= u64::from(limit));
        prop_assert_eq!(result.has_next, page < result.total_pages);

        if total > 0 {
            prop_assert_eq!(result.has_prev, page > 1);
        } else {
            prop_assert_eq!(result.total_pages, 0);
            prop_assert!(!result.has_next);
            prop_assert!(!result.has_prev);
        }
    }

    #[test]
    fn test_oversized_limits_rejected(limit in (MAX_PAGE_SIZE + 1)..10_000u32) {
        prop_assert!(PageRequest::new(None, Some(limit)).is_err());
    }

    #[test]
    fn test_offset_is_page_minus_one_times_limit(
        page in 1u32..1_000u32,
        limit in 1u32..=MAX_PAGE_SIZE
    ) {
        let request = PageRequest::new(Some(page), Some(limit)).unwrap();
        prop_assert_eq!(request.offset(), u64::from(page - 1) * u64::from(limit));
        prop_assert_eq!(request.take(), u64::from(limit));
    }
}

#[test]
fn test_defaults_only_when_absent() {
    let request = PageRequest::new(None, None).unwrap();
    assert_eq!(request.page(), 1);
    assert_eq!(request.limit(), DEFAULT_PAGE_SIZE);

    // Present-but-invalid values are rejected, not defaulted or clamped
    assert!(PageRequest::new(Some(0), None).is_err());
    assert!(PageRequest::new(None, Some(0)).is_err());
    assert!(PageRequest::new(None, Some(MAX_PAGE_SIZE + 1)).is_err());
}

#[test]
fn test_twenty_five_rows_at_limit_ten() {
    let totals = 25u64;

    let page1 = PaginationResult::new(vec![0u8; 10], totals, &request(1, 10));
    assert_eq!(page1.total_pages, 3);
    assert!(page1.has_next);
    assert!(!page1.has_prev);

    let page2 = PaginationResult::new(vec![0u8; 10], totals, &request(2, 10));
    assert!(page2.has_next);
    assert!(page2.has_prev);

    let page3 = PaginationResult::new(vec![0u8; 5], totals, &request(3, 10));
    assert!(!page3.has_next);
    assert!(page3.has_prev);
}

#[test]
fn test_page_beyond_range_keeps_total() {
    let result = PaginationResult::new(Vec::<u8>::new(), 25, &request(9, 10));
    assert!(result.data.is_empty());
    assert_eq!(result.total, 25);
    assert_eq!(result.total_pages, 3);
    assert!(!result.has_next);
    assert!(result.has_prev);
}

fn request(page: u32, limit: u32) -> PageRequest {
    PageRequest::new(Some(page), Some(limit)).unwrap()
}
