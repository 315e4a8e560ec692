//! Budgets command - utilization per category and budget management.

use anyhow::Result;
use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use expenseflow::store::Store;
use expenseflow::types::{BudgetId, BudgetPeriod, BudgetUpdate, NewBudget};
use expenseflow::views::{budget_summary, budget_utilizations, format_currency};

use super::{open, print_org_header};

#[derive(Args)]
pub struct BudgetsCmd {
    #[command(subcommand)]
    pub command: Option<BudgetsSubCmd>,
}

#[derive(Subcommand)]
pub enum BudgetsSubCmd {
    /// Show utilization of every budget (default)
    List,

    /// Add a budget for a category
    Add {
        category: String,
        total: Decimal,
        #[arg(long, value_enum, default_value_t = BudgetPeriod::Monthly)]
        period: BudgetPeriod,
    },

    /// Change a budget's limit or period
    Update {
        id: BudgetId,
        #[arg(long)]
        total: Option<Decimal>,
        #[arg(long, value_enum)]
        period: Option<BudgetPeriod>,
    },

    /// Delete a budget
    Delete { id: BudgetId },
}

impl BudgetsCmd {
    pub async fn run(&self, org: Option<&str>) -> Result<()> {
        let (_config, store) = open(org).await?;

        match self.command.as_ref().unwrap_or(&BudgetsSubCmd::List) {
            BudgetsSubCmd::List => list(&store),
            BudgetsSubCmd::Add {
                category,
                total,
                period,
            } => {
                let created = store
                    .create_budget(&NewBudget::new(category, *total, *period))
                    .await?;
                println!("Added budget {} for {}.", created.id, created.category);
                list(&store);
            }
            BudgetsSubCmd::Update { id, total, period } => {
                let update = BudgetUpdate {
                    total: *total,
                    period: *period,
                    ..Default::default()
                };
                match store.update_budget(*id, &update).await? {
                    Some(_) => list(&store),
                    None => println!("No budget with id {}.", id),
                }
            }
            BudgetsSubCmd::Delete { id } => {
                store.delete_budget(*id).await?;
                println!("Deleted budget {}.", id);
            }
        }

        Ok(())
    }
}

fn list(store: &Store) {
    print_org_header(store);

    store.with_state(|s| {
        let currency = s.currency();
        let expenses = s.expenses.items();
        let budgets = s.budgets.items();

        if budgets.is_empty() {
            println!("No budgets yet. Add one with `ef budgets add`.");
            return;
        }

        for u in budget_utilizations(budgets, expenses) {
            println!(
                "{:<3} {:<16} {:<9} {:>12} / {:>12}  {:>7}  {:<11}  {}",
                u.budget.id,
                u.budget.category,
                u.budget.period.as_str(),
                format_currency(u.spent, currency),
                format_currency(u.budget.total, currency),
                u.percentage_text(),
                u.band.as_str(),
                u.status_text(currency)
            );
        }

        let summary = budget_summary(budgets, expenses);
        println!();
        println!("Total budget:  {}", format_currency(summary.total_budget, currency));
        println!("Total spent:   {}", format_currency(summary.total_spent, currency));
        println!("Remaining:     {}", format_currency(summary.remaining, currency));
    });
}
