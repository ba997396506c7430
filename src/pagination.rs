// 📄 Pagination - Fixed-size pages over customer and transaction lists

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// 1-based
    pub current_page: usize,
    pub total_pages: usize,
    pub items: Vec<T>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    /// 1-based position of the first item on the page (0 when empty)
    pub start_index: usize,
    /// 1-based position of the last item on the page (0 when empty)
    pub end_index: usize,
    pub total_items: usize,
}

/// Slice out one page. Pages outside `1..=total_pages` are clamped.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let current_page = page.clamp(1, total_pages.max(1));

    let start = ((current_page - 1) * per_page).min(total_items);
    let end = (start + per_page).min(total_items);
    let page_items = items[start..end].to_vec();

    Page {
        current_page,
        total_pages,
        has_next_page: current_page < total_pages,
        has_previous_page: current_page > 1,
        start_index: if page_items.is_empty() { 0 } else { start + 1 },
        end_index: end,
        items: page_items,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_page() {
        let items: Vec<u32> = (1..=12).collect();
        let page = paginate(&items, 2, 5);

        assert_eq!(page.items, vec![6, 7, 8, 9, 10]);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next_page);
        assert!(page.has_previous_page);
        assert_eq!((page.start_index, page.end_index), (6, 10));
    }

    #[test]
    fn test_last_partial_page_and_clamping() {
        let items: Vec<u32> = (1..=12).collect();

        let last = paginate(&items, 3, 5);
        assert_eq!(last.items, vec![11, 12]);
        assert!(!last.has_next_page);
        assert_eq!(last.end_index, 12);

        assert_eq!(paginate(&items, 99, 5), last);
        assert_eq!(paginate(&items, 0, 5).current_page, 1);
    }

    #[test]
    fn test_empty() {
        let page = paginate::<u32>(&[], 1, 10);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
        assert_eq!((page.start_index, page.end_index), (0, 0));
        assert!(!page.has_next_page && !page.has_previous_page);
    }
}
