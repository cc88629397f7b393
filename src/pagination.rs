//! Result Pagination
//!
//! Derives page-link metadata from a result count. Pages start at multiples
//! of the batch size; the page containing the current offset is marked.

use serde::Serialize;

/// Start of one navigable page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub offset: usize,
    pub is_current: bool,
}

/// Ordered page links, never persisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageLinkSet(Vec<PageLink>);

impl PageLinkSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageLink> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[PageLink] {
        &self.0
    }

    pub fn current(&self) -> Option<PageLink> {
        self.0.iter().copied().find(|p| p.is_current)
    }

    /// Keep the first and last page plus `window` pages on either side of
    /// the current one. A window of 0 keeps everything.
    pub fn windowed(&self, window: usize) -> PageLinkSet {
        if window == 0 {
            return self.clone();
        }
        let Some(current) = self.0.iter().position(|p| p.is_current) else {
            return self.clone();
        };
        let last = self.0.len().saturating_sub(1);

        self.0
            .iter()
            .enumerate()
            .filter(|(i, _)| *i == 0 || *i == last || i.abs_diff(current) <= window)
            .map(|(_, p)| *p)
            .collect()
    }
}

impl FromIterator<PageLink> for PageLinkSet {
    fn from_iter<I: IntoIterator<Item = PageLink>>(iter: I) -> Self {
        PageLinkSet(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PageLinkSet {
    type Item = &'a PageLink;
    type IntoIter = std::slice::Iter<'a, PageLink>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Page links for `total` results shown `batch_size` at a time.
///
/// Empty when everything fits on one page. An offset at or beyond `total`
/// selects the last page.
pub fn compute_pages(total: usize, current_offset: usize, batch_size: usize) -> PageLinkSet {
    if batch_size == 0 || total <= batch_size {
        return PageLinkSet::default();
    }

    let n_pages = total.div_ceil(batch_size);
    let last = n_pages - 1;
    let current = (current_offset / batch_size).min(last);

    (0..n_pages)
        .map(|page| PageLink {
            offset: page * batch_size,
            is_current: page == current,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(pages: &PageLinkSet) -> Vec<usize> {
        pages.iter().map(|p| p.offset).collect()
    }

    #[test]
    fn test_zero_total() {
        assert!(compute_pages(0, 0, 20).is_empty());
    }

    #[test]
    fn test_single_page() {
        assert!(compute_pages(20, 0, 20).is_empty());
        assert!(compute_pages(7, 5, 20).is_empty());
    }

    #[test]
    fn test_zero_batch_does_not_panic() {
        assert!(compute_pages(100, 10, 0).is_empty());
    }

    #[test]
    fn test_boundaries_are_batch_multiples() {
        let pages = compute_pages(45, 0, 20);
        assert_eq!(offsets(&pages), vec![0, 20, 40]);
        assert_eq!(pages.current().map(|p| p.offset), Some(0));
    }

    #[test]
    fn test_offset_inside_page() {
        let pages = compute_pages(100, 47, 20);
        assert_eq!(pages.current().map(|p| p.offset), Some(40));
        assert_eq!(pages.iter().filter(|p| p.is_current).count(), 1);
    }

    #[test]
    fn test_offset_past_total_clamps_to_last() {
        let pages = compute_pages(45, 1000, 20);
        assert_eq!(pages.current().map(|p| p.offset), Some(40));
        assert_eq!(pages.as_slice().last().map(|p| p.is_current), Some(true));
    }

    #[test]
    fn test_windowed_keeps_ends_and_neighbourhood() {
        let pages = compute_pages(1000, 500, 10);
        assert_eq!(pages.len(), 100);

        let windowed = pages.windowed(2);
        assert_eq!(offsets(&windowed), vec![0, 480, 490, 500, 510, 520, 990]);
        assert_eq!(windowed.current().map(|p| p.offset), Some(500));
    }

    #[test]
    fn test_windowed_zero_keeps_all() {
        let pages = compute_pages(100, 0, 10);
        assert_eq!(pages.windowed(0), pages);
    }

    #[test]
    fn test_serializes_as_list() {
        let json = serde_json::to_value(compute_pages(30, 20, 20)).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"offset": 0, "is_current": false},
                {"offset": 20, "is_current": true}
            ])
        );
    }
}
