//! Property tests for page link computation.

use corpus_gateway::compute_pages;
use proptest::prelude::*;

proptest! {
    #[test]
    fn single_page_has_no_links(batch in 1usize..500, total_frac in 0.0f64..=1.0, offset in 0usize..10_000) {
        let total = (batch as f64 * total_frac) as usize;
        prop_assert!(compute_pages(total, offset, batch).is_empty());
    }

    #[test]
    fn exactly_one_current_page(total in 1usize..10_000, batch in 1usize..200, offset in 0usize..20_000) {
        let pages = compute_pages(total, offset, batch);
        if total > batch {
            prop_assert_eq!(pages.iter().filter(|p| p.is_current).count(), 1);
            prop_assert_eq!(pages.len(), total.div_ceil(batch));
        }
    }

    #[test]
    fn offsets_are_batch_multiples(total in 1usize..10_000, batch in 1usize..200, offset in 0usize..10_000) {
        let pages = compute_pages(total, offset, batch);
        for (i, page) in pages.iter().enumerate() {
            prop_assert_eq!(page.offset, i * batch);
            prop_assert!(page.offset < total);
        }
    }

    #[test]
    fn offset_past_total_selects_last(total in 2usize..10_000, batch in 1usize..200, extra in 0usize..1000) {
        prop_assume!(total > batch);
        let pages = compute_pages(total, total + extra, batch);
        prop_assert!(!pages.is_empty());
        let last = pages.as_slice().last().copied().unwrap();
        prop_assert!(last.is_current);
    }

    #[test]
    fn current_page_contains_offset(total in 2usize..10_000, batch in 1usize..200, offset in 0usize..10_000) {
        prop_assume!(total > batch && offset < total);
        let current = compute_pages(total, offset, batch).current().unwrap();
        prop_assert!(current.offset <= offset && offset < current.offset + batch);
    }

    #[test]
    fn zero_batch_never_panics(total in 0usize..10_000, offset in 0usize..10_000) {
        prop_assert!(compute_pages(total, offset, 0).is_empty());
    }
}
