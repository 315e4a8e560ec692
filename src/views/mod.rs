//! Derived views over the store's collections.
//!
//! Every function here is a pure function of the loaded records; nothing is
//! cached, so views are always consistent with the collections they read.

mod aggregate;
mod budget;
mod dashboard;
mod export;
mod filter;
mod format;
mod notifications;
mod pagination;

pub use aggregate::{
    CategoryTotal, MonthlyTotal, category_breakdown, monthly_trend, recent_transactions,
    total_spend,
};
pub use budget::{
    BudgetBand, BudgetSummary, BudgetUtilization, budget_summary, budget_utilization,
    budget_utilizations, category_spend,
};
pub use dashboard::{DashboardSummary, RECENT_TRANSACTIONS, dashboard_summary};
pub use export::{EXPENSE_CSV_HEADER, TREND_CSV_HEADER, expenses_csv, trend_csv};
pub use filter::{ALL_CATEGORIES, CategoryFilter, ExpenseFilter};
pub use format::{format_currency, format_percentage};
pub use notifications::{NotificationTab, notification_feed, unread_count};
pub use pagination::{DEFAULT_PAGE_SIZE, ExpenseListView, Page, paginate, total_pages};
