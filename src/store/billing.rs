//! Read-only billing records. Admin only.

use super::{FetchOutcome, INVOICES, PAYMENT_METHODS, Store, StoreResult};
use crate::access::Capability;
use crate::types::{Organization, OrganizationUpdate, Plan};

impl Store {
    pub async fn fetch_invoices(&self) -> StoreResult<FetchOutcome> {
        self.authorize_billing()?;

        let Some(org_id) = self.begin_fetch(INVOICES, |s| &mut s.invoices) else {
            return Ok(FetchOutcome::Skipped);
        };
        let result = self.backend.get_invoices(&org_id).await;
        self.settle_fetch(&org_id, INVOICES, |s| &mut s.invoices, result)
    }

    pub async fn fetch_payment_methods(&self) -> StoreResult<FetchOutcome> {
        self.authorize_billing()?;

        let Some(org_id) = self.begin_fetch(PAYMENT_METHODS, |s| &mut s.payment_methods) else {
            return Ok(FetchOutcome::Skipped);
        };
        let result = self.backend.get_payment_methods(&org_id).await;
        self.settle_fetch(&org_id, PAYMENT_METHODS, |s| &mut s.payment_methods, result)
    }

    /// Billing fetches with no active organization are skipped, not refused.
    fn authorize_billing(&self) -> StoreResult<()> {
        if self.require_active().is_err() {
            return Ok(());
        }
        self.authorize(Capability::ViewBilling)
    }

    pub async fn change_plan(&self, plan: Plan) -> StoreResult<Organization> {
        self.update_organization_settings(&OrganizationUpdate::plan(plan))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backend::MemoryBackend;
    use crate::store::StoreError;
    use crate::store::test_support::bootstrapped;
    use crate::types::CardBrand;

    #[tokio::test]
    async fn test_admin_sees_billing() {
        let (_, store) = bootstrapped().await;
        assert_eq!(store.fetch_invoices().await.unwrap(), FetchOutcome::Loaded(2));
        assert_eq!(
            store.fetch_payment_methods().await.unwrap(),
            FetchOutcome::Loaded(1)
        );

        store.with_state(|s| {
            assert_eq!(s.invoices.items()[0].id, "INV-2023-001");
            assert_eq!(s.payment_methods.items()[0].brand, CardBrand::Visa);
        });
    }

    #[tokio::test]
    async fn test_billing_without_active_org_is_skipped() {
        let store = Store::new(Arc::new(MemoryBackend::seeded()));
        assert_eq!(store.fetch_invoices().await.unwrap(), FetchOutcome::Skipped);
        assert_eq!(
            store.fetch_payment_methods().await.unwrap(),
            FetchOutcome::Skipped
        );
        store.with_state(|s| {
            assert!(s.invoices.is_empty());
            assert!(s.payment_methods.is_empty());
        });
    }

    #[tokio::test]
    async fn test_member_cannot_see_billing() {
        let (_, store) = bootstrapped().await;
        store.switch_organization("org2").await.unwrap();

        assert!(matches!(
            store.fetch_invoices().await,
            Err(StoreError::Forbidden(_))
        ));
        assert!(store.with_state(|s| s.invoices.is_empty()));
    }

    #[tokio::test]
    async fn test_change_plan() {
        let (_, store) = bootstrapped().await;
        let org = store.change_plan(Plan::Enterprise).await.unwrap();
        assert_eq!(org.plan, Plan::Enterprise);
        assert_eq!(store.active_organization().unwrap().plan, Plan::Enterprise);
    }
}
