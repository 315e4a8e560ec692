//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{
    BillingCmd, BudgetsCmd, ChatCmd, ConfigCmd, DashboardCmd, ExpensesCmd, NotificationsCmd,
    OrgsCmd, TeamCmd,
};

#[derive(Parser)]
#[command(name = "ef")]
#[command(about = "ExpenseFlow - expenses, budgets and teams per organization")]
#[command(version)]
pub struct Cli {
    /// Organization slug to act on (default: first organization)
    #[arg(long, global = true, env = "EF_ORG")]
    pub org: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List, create and configure organizations
    Orgs(OrgsCmd),

    /// List, filter, add, approve and export expenses
    Expenses(ExpensesCmd),

    /// Show budget utilization and manage budgets
    Budgets(BudgetsCmd),

    /// Show spend totals, recent transactions and trends
    Dashboard(DashboardCmd),

    /// Show and mark notifications
    Notifications(NotificationsCmd),

    /// Manage organization members
    Team(TeamCmd),

    /// Show plan, invoices and payment methods
    Billing(BillingCmd),

    /// Ask the assistant about your spending
    Chat(ChatCmd),

    /// Manage configuration (API key, model, etc.)
    Config(ConfigCmd),
}

impl Command {
    pub async fn execute(&self, org: Option<&str>) -> anyhow::Result<()> {
        match self {
            Command::Orgs(cmd) => cmd.run(org).await,
            Command::Expenses(cmd) => cmd.run(org).await,
            Command::Budgets(cmd) => cmd.run(org).await,
            Command::Dashboard(cmd) => cmd.run(org).await,
            Command::Notifications(cmd) => cmd.run(org).await,
            Command::Team(cmd) => cmd.run(org).await,
            Command::Billing(cmd) => cmd.run(org).await,
            Command::Chat(cmd) => cmd.run(org).await,
            Command::Config(cmd) => cmd.run().await,
        }
    }
}
