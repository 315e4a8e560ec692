//! Expense list filtering.
//!
//! Predicates are loose: search is a case-insensitive
//! substring match, and the date filter is a substring match against the
//! display date, not a calendar range.

use crate::types::Expense;

/// Label the category picker uses for "no category filter".
pub const ALL_CATEGORIES: &str = "All Categories";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Build from a picker label; [`ALL_CATEGORIES`] and blank mean no filter.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(label.to_string())
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpenseFilter {
    pub search: String,
    pub category: CategoryFilter,
    pub date: String,
}

impl ExpenseFilter {
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && self.category == CategoryFilter::All
            && self.date.trim().is_empty()
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        self.matches_search(expense)
            && self.category.matches(&expense.category)
            && contains_ignore_case(&expense.date, self.date.trim())
    }

    /// Search hits merchant, the amount as plain text ("853.2"), or the
    /// description.
    fn matches_search(&self, expense: &Expense) -> bool {
        let term = self.search.trim();
        if term.is_empty() {
            return true;
        }

        contains_ignore_case(&expense.merchant, term)
            || expense.amount.normalize().to_string().contains(term)
            || expense
                .description
                .as_deref()
                .is_some_and(|d| contains_ignore_case(d, term))
    }

    pub fn apply<'a>(&self, expenses: &'a [Expense]) -> Vec<&'a Expense> {
        expenses.iter().filter(|e| self.matches(e)).collect()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
