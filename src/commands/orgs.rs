//! Orgs command - list, create and configure organizations.

use anyhow::Result;
use clap::{Args, Subcommand};

use expenseflow::types::{CurrencyCode, OrganizationUpdate};

use super::{open, print_org_header};

#[derive(Args)]
pub struct OrgsCmd {
    #[command(subcommand)]
    pub command: Option<OrgsSubCmd>,
}

#[derive(Subcommand)]
pub enum OrgsSubCmd {
    /// List your organizations (default)
    List,

    /// Create an organization and switch to it
    Create(CreateOrgCmd),

    /// Update settings of the selected organization
    Update(UpdateOrgCmd),

    /// Add an expense category
    AddCategory { name: String },

    /// Remove an expense category
    RemoveCategory { name: String },
}

#[derive(Args)]
pub struct CreateOrgCmd {
    pub name: String,

    /// URL slug (lowercase letters, digits and hyphens)
    pub slug: String,
}

#[derive(Args)]
pub struct UpdateOrgCmd {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub slug: Option<String>,

    #[arg(long, value_enum)]
    pub currency: Option<CurrencyCode>,

    #[arg(long)]
    pub billing_email: Option<String>,
}

impl OrgsCmd {
    pub async fn run(&self, org: Option<&str>) -> Result<()> {
        let (_config, store) = open(org).await?;

        match self.command.as_ref().unwrap_or(&OrgsSubCmd::List) {
            OrgsSubCmd::List => {
                let active = store.active_organization_id();
                let orgs = store.with_state(|s| s.orgs.organizations.items().to_vec());
                for o in &orgs {
                    let marker = if active.as_deref() == Some(o.id.as_str()) { "*" } else { " " };
                    println!(
                        "{} {:<20} {:<12} {:<11} {}",
                        marker,
                        o.name,
                        o.slug,
                        o.plan.as_str(),
                        o.currency.as_str()
                    );
                }
            }
            OrgsSubCmd::Create(cmd) => {
                let created = store.create_organization(&cmd.name, &cmd.slug).await?;
                println!("Created {} ({}) and switched to it.", created.name, created.slug);
            }
            OrgsSubCmd::Update(cmd) => {
                let update = OrganizationUpdate {
                    name: cmd.name.clone(),
                    slug: cmd.slug.clone(),
                    currency: cmd.currency,
                    billing_email: cmd.billing_email.clone(),
                    ..Default::default()
                };
                store.update_organization_settings(&update).await?;
                print_org_header(&store);
                println!("Settings updated.");
            }
            OrgsSubCmd::AddCategory { name } => {
                if store.add_category(name).await? {
                    println!("Added category '{}'.", name);
                } else {
                    println!("Category '{}' already exists.", name);
                }
            }
            OrgsSubCmd::RemoveCategory { name } => {
                if store.remove_category(name).await? {
                    println!("Removed category '{}'.", name);
                } else {
                    println!("No category '{}'.", name);
                }
            }
        }

        Ok(())
    }
}
