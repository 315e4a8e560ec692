//! Billing command - plan, invoices and payment methods.

use anyhow::Result;
use clap::{Args, Subcommand};

use expenseflow::types::Plan;
use expenseflow::views::format_currency;

use super::{open, print_org_header};

#[derive(Args)]
pub struct BillingCmd {
    #[command(subcommand)]
    pub command: Option<BillingSubCmd>,
}

#[derive(Subcommand)]
pub enum BillingSubCmd {
    /// Show invoices and payment methods (default)
    Show,

    /// Change the organization's plan
    Plan {
        #[arg(value_enum)]
        plan: Plan,
    },
}

impl BillingCmd {
    pub async fn run(&self, org: Option<&str>) -> Result<()> {
        let (_config, store) = open(org).await?;

        match self.command.as_ref().unwrap_or(&BillingSubCmd::Show) {
            BillingSubCmd::Show => {
                store.fetch_invoices().await?;
                store.fetch_payment_methods().await?;
                print_org_header(&store);

                store.with_state(|s| {
                    let currency = s.currency();

                    println!("Invoices:");
                    if s.invoices.is_empty() {
                        println!("  (none)");
                    }
                    for i in s.invoices.iter() {
                        println!(
                            "  {:<14} {:<14} {:>10}  {}",
                            i.id,
                            i.date,
                            format_currency(i.amount, currency),
                            i.status
                        );
                    }

                    println!();
                    println!("Payment methods:");
                    if s.payment_methods.is_empty() {
                        println!("  (none)");
                    }
                    for pm in s.payment_methods.iter() {
                        println!("  {} ending in {} (expires {})", pm.brand, pm.last4, pm.expiry);
                    }
                });
            }
            BillingSubCmd::Plan { plan } => {
                let org = store.change_plan(*plan).await?;
                println!("{} is now on the {} plan.", org.name, org.plan.as_str());
            }
        }

        Ok(())
    }
}
