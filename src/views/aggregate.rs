//! Category and time rollups over the loaded expenses.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::Expense;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

/// One calendar month with at least one expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    /// e.g. "Aug 2024".
    pub label: String,
    pub amount: Decimal,
}

pub fn total_spend(expenses: &[Expense]) -> Decimal {
    expenses.iter().map(|e| e.amount).sum()
}

/// Sum per category, in order of first appearance. Categories with no
/// expenses do not appear.
pub fn category_breakdown(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for expense in expenses {
        match totals.iter_mut().find(|t| t.category == expense.category) {
            Some(total) => total.amount += expense.amount,
            None => totals.push(CategoryTotal {
                category: expense.category.clone(),
                amount: expense.amount,
            }),
        }
    }
    totals
}

/// Sum per calendar month, oldest first. Months without expenses are not
/// filled in. Expenses whose date cannot be parsed are left out.
pub fn monthly_trend(expenses: &[Expense]) -> Vec<MonthlyTotal> {
    let mut dated: Vec<(NaiveDate, Decimal)> = expenses
        .iter()
        .filter_map(|e| e.parsed_date().map(|d| (d, e.amount)))
        .collect();
    dated.sort_by_key(|(date, _)| *date);

    let mut trend: Vec<MonthlyTotal> = Vec::new();
    for (date, amount) in dated {
        match trend.last_mut() {
            Some(bucket) if bucket.year == date.year() && bucket.month == date.month() => {
                bucket.amount += amount;
            }
            _ => trend.push(MonthlyTotal {
                year: date.year(),
                month: date.month(),
                label: date.format("%b %Y").to_string(),
                amount,
            }),
        }
    }
    trend
}

/// The `limit` most recent expenses, newest first. Expenses with an
/// unparseable date sort last.
pub fn recent_transactions(expenses: &[Expense], limit: usize) -> Vec<&Expense> {
    let mut sorted: Vec<&Expense> = expenses.iter().collect();
    sorted.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));
    sorted.truncate(limit);
    sorted
}
