//! Dashboard command - spend totals, recent transactions and trends.

use anyhow::Result;
use clap::Args;

use expenseflow::views::{dashboard_summary, format_currency, unread_count};

use super::{open, print_org_header};

#[derive(Args)]
pub struct DashboardCmd;

impl DashboardCmd {
    pub async fn run(&self, org: Option<&str>) -> Result<()> {
        let (_config, store) = open(org).await?;
        print_org_header(&store);

        store.with_state(|s| {
            let currency = s.currency();
            let summary = dashboard_summary(s.expenses.items());

            println!(
                "Total spend:   {} across {} expenses",
                format_currency(summary.total_spend, currency),
                summary.expense_count
            );
            println!("Unread:        {}", unread_count(s.notifications.items()));

            println!();
            println!("Recent transactions:");
            if summary.recent.is_empty() {
                println!("  (none)");
            }
            for e in &summary.recent {
                println!(
                    "  {:<14} {:<20} {:>12}  {}",
                    e.date,
                    e.merchant,
                    format_currency(e.amount, currency),
                    e.status
                );
            }

            println!();
            println!("By category:");
            for c in &summary.categories {
                println!("  {:<20} {:>12}", c.category, format_currency(c.amount, currency));
            }

            println!();
            println!("Monthly trend:");
            for m in &summary.trend {
                println!("  {:<10} {:>12}", m.label, format_currency(m.amount, currency));
            }
        });

        Ok(())
    }
}
