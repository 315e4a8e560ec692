//! Expenses command - list, add, review and export expenses.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use expenseflow::store::{BulkSummary, Store};
use expenseflow::types::{NewExpense, format_display_date};
use expenseflow::views::{
    CategoryFilter, ExpenseFilter, ExpenseListView, expenses_csv, format_currency, monthly_trend,
    trend_csv,
};

use super::{open, print_org_header};

#[derive(Args)]
pub struct ExpensesCmd {
    #[command(subcommand)]
    pub command: Option<ExpensesSubCmd>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Page to show (1-based)
    #[arg(long, short = 'p', default_value_t = 1)]
    pub page: usize,
}

#[derive(Args, Clone, Default)]
pub struct FilterArgs {
    /// Match merchant, amount or notes
    #[arg(long, short = 's', global = true)]
    pub search: Option<String>,

    /// Only this category
    #[arg(long, short = 'c', global = true)]
    pub category: Option<String>,

    /// Match the display date, e.g. "Aug" or "2024"
    #[arg(long, short = 'd', global = true)]
    pub date: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> ExpenseFilter {
        ExpenseFilter {
            search: self.search.clone().unwrap_or_default(),
            category: self
                .category
                .as_deref()
                .map(CategoryFilter::from_label)
                .unwrap_or_default(),
            date: self.date.clone().unwrap_or_default(),
        }
    }
}

#[derive(Subcommand)]
pub enum ExpensesSubCmd {
    /// Add an expense (created as Pending)
    Add(AddExpenseCmd),

    /// Approve expenses by id
    Approve { ids: Vec<String> },

    /// Reject expenses by id
    Reject { ids: Vec<String> },

    /// Delete expenses by id
    Delete { ids: Vec<String> },

    /// Export the filtered list (or the monthly trend) as CSV
    Export(ExportCmd),
}

#[derive(Args)]
pub struct AddExpenseCmd {
    pub merchant: String,

    pub amount: Decimal,

    #[arg(long, short = 'c')]
    pub category: String,

    /// Display date, e.g. "Aug 28, 2024" (default: today)
    #[arg(long)]
    pub on: Option<String>,

    #[arg(long, short = 'n')]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct ExportCmd {
    /// Export the monthly trend instead of individual expenses
    #[arg(long)]
    pub trend: bool,

    /// Write to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl ExpensesCmd {
    pub async fn run(&self, org: Option<&str>) -> Result<()> {
        let (config, store) = open(org).await?;

        match &self.command {
            None => {
                let mut view = ExpenseListView::new(config.page_size);
                let filter = self.filter.to_filter();
                view.set_search(filter.search);
                view.set_category(filter.category);
                view.set_date(filter.date);
                view.set_page(self.page);
                list(&store, &view);
            }
            Some(ExpensesSubCmd::Add(cmd)) => {
                let date = cmd
                    .on
                    .clone()
                    .unwrap_or_else(|| format_display_date(chrono::Local::now().date_naive()));
                let mut expense = NewExpense::new(&cmd.merchant, date, &cmd.category, cmd.amount);
                if let Some(notes) = &cmd.notes {
                    expense = expense.with_description(notes);
                }

                let created = store.create_expense(&expense).await?;
                let currency = store.with_state(|s| s.currency());
                println!(
                    "Added expense {}: {} {} ({})",
                    created.id,
                    created.merchant,
                    format_currency(created.amount, currency),
                    created.status
                );
            }
            Some(ExpensesSubCmd::Approve { ids }) => {
                print_bulk("Approved", &store.approve_expenses(ids).await?);
            }
            Some(ExpensesSubCmd::Reject { ids }) => {
                print_bulk("Rejected", &store.reject_expenses(ids).await?);
            }
            Some(ExpensesSubCmd::Delete { ids }) => {
                print_bulk("Deleted", &store.delete_expenses(ids).await?);
            }
            Some(ExpensesSubCmd::Export(cmd)) => {
                let filter = self.filter.to_filter();
                let csv = store.with_state(|s| {
                    let filtered = filter.apply(s.expenses.items());
                    if cmd.trend {
                        let owned: Vec<_> = filtered.into_iter().cloned().collect();
                        trend_csv(&monthly_trend(&owned))
                    } else {
                        expenses_csv(filtered)
                    }
                });

                match &cmd.output {
                    Some(path) => {
                        std::fs::write(path, csv)
                            .with_context(|| format!("Failed to write {}", path.display()))?;
                        println!("Exported to {}", path.display());
                    }
                    None => print!("{}", csv),
                }
            }
        }

        Ok(())
    }
}

fn list(store: &Store, view: &ExpenseListView) {
    print_org_header(store);

    store.with_state(|s| {
        let currency = s.currency();
        let page = view.render(s.expenses.items());

        if page.total_items == 0 {
            if view.filter().is_empty() {
                println!("No expenses yet. Add one with `ef expenses add`.");
            } else {
                println!("No expenses match the filter.");
            }
            return;
        }

        for e in &page.items {
            println!(
                "{:<4} {:<14} {:<20} {:<16} {:>12}  {}",
                e.id,
                e.date,
                e.merchant,
                e.category,
                format_currency(e.amount, currency),
                e.status
            );
        }
        println!();
        println!(
            "Showing {}-{} of {} (page {} of {})",
            page.first_item_number(),
            page.last_item_number(),
            page.total_items,
            page.page,
            page.total_pages
        );
    });
}

fn print_bulk(action: &str, summary: &BulkSummary) {
    for id in &summary.succeeded {
        println!("{} {}", action, id);
    }
    for id in &summary.skipped {
        println!("Skipped {} (not found)", id);
    }
    for (id, err) in &summary.failed {
        println!("Failed {}: {}", id, err);
    }
    println!("{}", summary);
}
