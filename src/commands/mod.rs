//! CLI command implementations.

mod billing;
mod budgets;
mod chat;
mod config;
mod dashboard;
mod expenses;
mod notifications;
mod orgs;
mod team;

pub use billing::BillingCmd;
pub use budgets::BudgetsCmd;
pub use chat::ChatCmd;
pub use config::ConfigCmd;
pub use dashboard::DashboardCmd;
pub use expenses::ExpensesCmd;
pub use notifications::NotificationsCmd;
pub use orgs::OrgsCmd;
pub use team::TeamCmd;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::debug;

use expenseflow::backend::{DEMO_EMAIL, MemoryBackend};
use expenseflow::config::Config;
use expenseflow::store::Store;

/// Sign in as the demo user against a freshly seeded backend and select the
/// organization with `org_slug` (or the first one).
pub(crate) async fn open_store(config: &Config, org_slug: Option<&str>) -> Result<Store> {
    let backend = MemoryBackend::seeded().with_latency(config.backend_latency());
    let store = Store::with_preferences(Arc::new(backend), config.preferences);

    store.login(DEMO_EMAIL).await.context("Failed to sign in")?;
    store.bootstrap().await.context("Failed to load organizations")?;

    if let Some(slug) = org_slug {
        let org_id = store.with_state(|state| {
            state
                .orgs
                .organizations
                .iter()
                .find(|o| o.slug == slug)
                .map(|o| o.id.clone())
        });

        let Some(org_id) = org_id else {
            bail!("No organization with slug '{}'. Run `ef orgs` to list them.", slug);
        };

        if store.active_organization_id().as_deref() != Some(org_id.as_str()) {
            store
                .switch_organization(&org_id)
                .await
                .with_context(|| format!("Failed to switch to '{}'", slug))?;
        }
    }

    debug!(org_id = ?store.active_organization_id(), "store ready");
    Ok(store)
}

/// Load config and open the store in one step.
pub(crate) async fn open(org_slug: Option<&str>) -> Result<(Config, Store)> {
    let config = Config::load()?;
    let store = open_store(&config, org_slug).await?;
    Ok((config, store))
}

/// Header line naming the organization a command acts on.
pub(crate) fn print_org_header(store: &Store) {
    if let Some(org) = store.active_organization() {
        println!("{} ({}) - {} plan", org.name, org.slug, org.plan.as_str());
        println!();
    }
}
