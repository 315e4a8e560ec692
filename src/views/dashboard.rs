use rust_decimal::Decimal;

use super::aggregate::{
    CategoryTotal, MonthlyTotal, category_breakdown, monthly_trend, recent_transactions,
    total_spend,
};
use crate::types::Expense;

/// Number of rows in the dashboard's recent transactions panel.
pub const RECENT_TRANSACTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary<'a> {
    pub total_spend: Decimal,
    pub expense_count: usize,
    pub recent: Vec<&'a Expense>,
    pub categories: Vec<CategoryTotal>,
    pub trend: Vec<MonthlyTotal>,
}

pub fn dashboard_summary(expenses: &[Expense]) -> DashboardSummary<'_> {
    DashboardSummary {
        total_spend: total_spend(expenses),
        expense_count: expenses.len(),
        recent: recent_transactions(expenses, RECENT_TRANSACTIONS),
        categories: category_breakdown(expenses),
        trend: monthly_trend(expenses),
    }
}
