use tracing::{debug, info, warn};

use super::{BUDGETS, FetchOutcome, Store, StoreResult};
use crate::types::{Budget, BudgetId, BudgetUpdate, NewBudget};

impl Store {
    pub async fn fetch_budgets(&self) -> StoreResult<FetchOutcome> {
        let Some(org_id) = self.begin_fetch(BUDGETS, |s| &mut s.budgets) else {
            return Ok(FetchOutcome::Skipped);
        };
        let result = self.backend.list_budgets(&org_id).await;
        self.settle_fetch(&org_id, BUDGETS, |s| &mut s.budgets, result)
    }

    /// Create a budget. New budgets go last.
    pub async fn create_budget(&self, budget: &NewBudget) -> StoreResult<Budget> {
        budget.validate()?;
        let org_id = self.require_active()?;

        let created = self
            .backend
            .create_budget(&org_id, budget)
            .await
            .inspect_err(|err| warn!(org_id = %org_id, error = %err, "create budget failed"))?;

        self.apply_if_active(&org_id, BUDGETS, |state| {
            state.budgets.append(created.clone());
        });
        info!(
            org_id = %org_id,
            budget_id = created.id,
            category = %created.category,
            "budget created"
        );
        Ok(created)
    }

    /// Returns `None` if the budget no longer exists.
    pub async fn update_budget(
        &self,
        id: BudgetId,
        update: &BudgetUpdate,
    ) -> StoreResult<Option<Budget>> {
        update.validate()?;
        let org_id = self.require_active()?;

        let updated = match self.backend.update_budget(&org_id, id, update).await {
            Ok(budget) => budget,
            Err(err) if err.is_not_found() => {
                debug!(org_id = %org_id, budget_id = id, "update skipped, budget not found");
                return Ok(None);
            }
            Err(err) => {
                warn!(org_id = %org_id, budget_id = id, error = %err, "update budget failed");
                return Err(err.into());
            }
        };

        self.apply_if_active(&org_id, BUDGETS, |state| {
            state.budgets.replace(updated.clone());
        });
        Ok(Some(updated))
    }

    pub async fn delete_budget(&self, id: BudgetId) -> StoreResult<()> {
        let org_id = self.require_active()?;

        match self.backend.delete_budget(&org_id, id).await {
            Ok(_) => {}
            Err(err) if err.is_not_found() => {
                debug!(org_id = %org_id, budget_id = id, "budget already deleted");
            }
            Err(err) => {
                warn!(org_id = %org_id, budget_id = id, error = %err, "delete budget failed");
                return Err(err.into());
            }
        }

        self.apply_if_active(&org_id, BUDGETS, |state| {
            state.budgets.remove(&id);
        });
        Ok(())
    }
}
