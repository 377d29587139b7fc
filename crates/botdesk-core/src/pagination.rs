//! Client-side paging over a fetched list.
//!
//! Pages are 1-based. Navigation is clamped to `[1, total_pages]`; an empty
//! list has zero pages, current page 0, and an empty page slice.

/// Rows per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct Paginator<T> {
    items: Vec<T>,
    page_size: usize,
    current: usize,
}

impl<T> Paginator<T> {
    /// A page size of 0 is treated as 1.
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        let mut pager = Self {
            items,
            page_size: page_size.max(1),
            current: 1,
        };
        pager.clamp();
        pager
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.page_size)
    }

    /// Current 1-based page, or 0 when there are no items.
    pub fn current_page(&self) -> usize {
        self.current
    }

    /// Items on the current page.
    pub fn page_items(&self) -> &[T] {
        if self.current == 0 {
            return &[];
        }
        let start = (self.current - 1) * self.page_size;
        let end = (start + self.page_size).min(self.items.len());
        &self.items[start..end]
    }

    /// Offset of the first item on the current page, for row numbering.
    pub fn page_offset(&self) -> usize {
        self.current.saturating_sub(1) * self.page_size
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn first(&mut self) -> usize {
        self.goto(1)
    }

    pub fn previous(&mut self) -> usize {
        self.goto(self.current.saturating_sub(1))
    }

    pub fn next(&mut self) -> usize {
        self.goto(self.current + 1)
    }

    pub fn last(&mut self) -> usize {
        self.goto(self.total_pages())
    }

    /// Jump to `page`, clamped into range. Returns the page landed on.
    pub fn goto(&mut self, page: usize) -> usize {
        self.current = page;
        self.clamp();
        self.current
    }

    /// Swap in a freshly fetched list, keeping the current page if it
    /// still exists.
    pub fn replace_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.clamp();
    }

    fn clamp(&mut self) {
        let total = self.total_pages();
        self.current = if total == 0 { 0 } else { self.current.clamp(1, total) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pager(n: usize) -> Paginator<usize> {
        Paginator::new((1..=n).collect(), DEFAULT_PAGE_SIZE)
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(pager(0).total_pages(), 0);
        assert_eq!(pager(1).total_pages(), 1);
        assert_eq!(pager(10).total_pages(), 1);
        assert_eq!(pager(11).total_pages(), 2);
        assert_eq!(pager(25).total_pages(), 3);
    }

    #[test]
    fn test_empty_list_has_no_current_page() {
        let mut p = pager(0);
        assert_eq!(p.current_page(), 0);
        assert!(p.page_items().is_empty());
        assert_eq!(p.next(), 0);
        assert_eq!(p.goto(3), 0);
        assert!(!p.has_next());
        assert!(!p.has_previous());
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut p = pager(25);
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.previous(), 1);
        assert_eq!(p.next(), 2);
        assert_eq!(p.last(), 3);
        assert_eq!(p.next(), 3);
        assert_eq!(p.goto(0), 1);
        assert_eq!(p.goto(99), 3);
        assert_eq!(p.first(), 1);
    }

    #[test]
    fn test_page_items() {
        let mut p = pager(25);
        assert_eq!(p.page_items(), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        p.last();
        assert_eq!(p.page_items(), &[21, 22, 23, 24, 25]);
        assert_eq!(p.page_offset(), 20);
    }

    #[test]
    fn test_replace_items_reclamps() {
        let mut p = pager(25);
        p.last();
        p.replace_items((1..=12).collect());
        assert_eq!(p.current_page(), 2);
        p.replace_items(Vec::new());
        assert_eq!(p.current_page(), 0);
    }

    #[test]
    fn test_zero_page_size_treated_as_one() {
        let p = Paginator::new(vec!['a', 'b'], 0);
        assert_eq!(p.total_pages(), 2);
    }
}
