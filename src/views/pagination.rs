//! Fixed-size pages over a filtered expense list.

use serde::Serialize;

use super::filter::{CategoryFilter, ExpenseFilter};
use crate::types::Expense;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of results. Pages are numbered from 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// 1-based index of the first item on this page, 0 when empty.
    pub fn first_item_number(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    pub fn last_item_number(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.first_item_number() + self.items.len() - 1
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1))
}

/// Slice out `page` (clamped to the valid range).
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_pages(total_items, page_size);
    let page = page.clamp(1, total_pages.max(1));

    let items = items
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    Page {
        items,
        page,
        page_size,
        total_items,
        total_pages,
    }
}

/// Filter and page state of the expense list.
///
/// Any change to a filter predicate sends the view back to page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseListView {
    filter: ExpenseFilter,
    page: usize,
    page_size: usize,
}

impl Default for ExpenseListView {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ExpenseListView {
    pub fn new(page_size: usize) -> Self {
        Self {
            filter: ExpenseFilter::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn filter(&self) -> &ExpenseFilter {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if search != self.filter.search {
            self.filter.search = search;
            self.page = 1;
        }
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        if category != self.filter.category {
            self.filter.category = category;
            self.page = 1;
        }
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        let date = date.into();
        if date != self.filter.date {
            self.filter.date = date;
            self.page = 1;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        self.page += 1;
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// The current page of `expenses` after filtering.
    pub fn render<'a>(&self, expenses: &'a [Expense]) -> Page<&'a Expense> {
        paginate(self.filter.apply(expenses), self.page, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::ExpenseStatus;

    fn expenses(n: usize) -> Vec<Expense> {
        (1..=n)
            .map(|i| Expense {
                id: i.to_string(),
                org_id: "org1".to_string(),
                merchant: format!("Merchant {}", i),
                date: "Aug 28, 2024".to_string(),
                category: if i % 2 == 0 { "Travel" } else { "Software" }.to_string(),
                amount: Decimal::from(i as i64),
                status: ExpenseStatus::Pending,
                receipt_url: None,
                description: None,
                user_id: "u1".to_string(),
                user_name: None,
            })
            .collect()
    }

    fn ids(page: &Page<&Expense>) -> Vec<String> {
        page.items.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn test_twenty_three_items() {
        let items = expenses(23);
        let mut view = ExpenseListView::default();

        let first = view.render(&items);
        assert_eq!(first.total_pages, 3);
        assert_eq!(ids(&first), (1..=10).map(|i| i.to_string()).collect::<Vec<_>>());

        view.set_page(3);
        let last = view.render(&items);
        assert_eq!(ids(&last), vec!["21", "22", "23"]);
        assert_eq!(last.first_item_number(), 21);
        assert_eq!(last.last_item_number(), 23);
        assert!(!last.has_next());
        assert!(last.has_previous());
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut view = ExpenseListView::default();

        view.set_page(3);
        view.set_search("Merchant");
        assert_eq!(view.page(), 1);

        view.set_page(2);
        view.set_category(CategoryFilter::Only("Travel".to_string()));
        assert_eq!(view.page(), 1);

        view.set_page(2);
        view.set_date("aug");
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_unchanged_filter_keeps_page() {
        let mut view = ExpenseListView::default();
        view.set_search("Merchant");
        view.set_page(2);
        view.set_search("Merchant");
        assert_eq!(view.page(), 2);
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let items = expenses(5);
        let mut view = ExpenseListView::default();
        view.set_page(9);
        let page = view.render(&items);
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 5);
    }

    #[test]
    fn test_empty() {
        let page = paginate(Vec::<u32>::new(), 1, 10);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.first_item_number(), 0);
        assert!(!page.has_next());
    }

    #[test]
    fn test_previous_page_stops_at_one() {
        let mut view = ExpenseListView::default();
        view.previous_page();
        assert_eq!(view.page(), 1);
        view.next_page();
        assert_eq!(view.page(), 2);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(23, 10), 3);
    }
}
