//! Server-provided listing pages and the pagination metadata that comes with them.

use serde::{Deserialize, Serialize};

use crate::filter::QueryParams;

/// Pagination metadata of one listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: usize,
    pub last_page: usize,
    pub per_page: usize,
    pub total: usize,
}

/// One entry of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(usize),
    Gap,
}

impl PageMeta {
    /// Builds the metadata for `total` items, clamping `requested` into
    /// `1..=last_page`.
    #[must_use]
    pub fn new(requested: usize, per_page: usize, total: usize) -> Self {
        let per_page = per_page.max(1);
        let last_page = total.div_ceil(per_page).max(1);
        Self {
            current_page: requested.clamp(1, last_page),
            last_page,
            per_page,
            total,
        }
    }

    /// Number of items to skip to reach the current page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.current_page - 1) * self.per_page
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    /// Page links to render: the first and last page, the current page and
    /// its direct neighbours, with skipped ranges collapsed into a gap.
    #[must_use]
    pub fn window(&self) -> Vec<PageLink> {
        let mut links = Vec::new();
        let mut previous = 0;
        for page in 1..=self.last_page {
            let near_current = page.abs_diff(self.current_page) <= 1;
            if page == 1 || page == self.last_page || near_current {
                if previous != 0 && page - previous > 1 {
                    links.push(PageLink::Gap);
                }
                links.push(PageLink::Page(page));
                previous = page;
            }
        }
        links
    }
}

impl Default for PageMeta {
    fn default() -> Self {
        Self::new(1, 1, 0)
    }
}

/// A page of listing items. Replaced wholesale on every response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingPage<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Default for ListingPage<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            meta: PageMeta::default(),
        }
    }
}

/// A listing page together with the filter params the server applied to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filtered<T> {
    pub listing: ListingPage<T>,
    pub applied: QueryParams,
}

impl<T> Default for Filtered<T> {
    fn default() -> Self {
        Self {
            listing: ListingPage::default(),
            applied: QueryParams::default(),
        }
    }
}

impl<T> Filtered<T> {
    /// The params that reproduce this exact page, `page` included when it is
    /// not the first.
    #[must_use]
    pub fn location_params(&self) -> QueryParams {
        let params = self.applied.clone();
        if self.listing.meta.current_page > 1 {
            params.with_page(self.listing.meta.current_page)
        } else {
            params
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_page_is_never_zero() {
        let meta = PageMeta::new(1, 9, 0);
        assert_eq!(meta.last_page, 1);
        assert_eq!(meta.current_page, 1);
        assert_eq!(meta.offset(), 0);
    }

    #[test]
    fn last_page_rounds_up() {
        assert_eq!(PageMeta::new(1, 9, 9).last_page, 1);
        assert_eq!(PageMeta::new(1, 9, 10).last_page, 2);
        assert_eq!(PageMeta::new(1, 9, 27).last_page, 3);
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let meta = PageMeta::new(12, 10, 35);
        assert_eq!(meta.current_page, 4);
        assert_eq!(meta.offset(), 30);
        assert_eq!(PageMeta::new(0, 10, 35).current_page, 1);
    }

    #[test]
    fn zero_per_page_does_not_divide_by_zero() {
        let meta = PageMeta::new(2, 0, 3);
        assert_eq!(meta.per_page, 1);
        assert_eq!(meta.last_page, 3);
    }

    #[test]
    fn window_collapses_distant_pages() {
        let meta = PageMeta::new(5, 1, 10);
        assert_eq!(
            meta.window(),
            vec![
                PageLink::Page(1),
                PageLink::Gap,
                PageLink::Page(4),
                PageLink::Page(5),
                PageLink::Page(6),
                PageLink::Gap,
                PageLink::Page(10),
            ]
        );
    }

    #[test]
    fn window_always_holds_first_last_and_current() {
        for total in 1..=12 {
            for current in 1..=total {
                let meta = PageMeta::new(current, 1, total);
                let window = meta.window();
                for page in [1, current, total] {
                    assert!(window.contains(&PageLink::Page(page)));
                }
                assert_ne!(window.first(), Some(&PageLink::Gap));
                assert_ne!(window.last(), Some(&PageLink::Gap));
            }
        }
    }

    #[test]
    fn small_windows_have_no_gaps() {
        let meta = PageMeta::new(2, 1, 3);
        assert_eq!(
            meta.window(),
            vec![PageLink::Page(1), PageLink::Page(2), PageLink::Page(3)]
        );
        assert!(meta.has_previous());
        assert!(meta.has_next());
    }

    #[test]
    fn location_params_skip_the_first_page() {
        let applied: QueryParams = [("tag", "rust")].into_iter().collect();
        let mut filtered = Filtered::<()> {
            listing: ListingPage::default(),
            applied,
        };
        assert_eq!(filtered.location_params().page(), None);

        filtered.listing.meta = PageMeta::new(2, 1, 4);
        let params = filtered.location_params();
        assert_eq!(params.page(), Some(2));
        assert_eq!(params.get("tag"), Some("rust"));
    }
}
