//! Expense collection: fetch, point mutations and best-effort bulk actions.

use futures::future::join_all;
use tracing::{debug, info, warn};

use super::{BulkSummary, EXPENSES, FetchOutcome, Store, StoreResult};
use crate::types::{Expense, ExpenseStatus, ExpenseUpdate, NewExpense};

impl Store {
    pub async fn fetch_expenses(&self) -> StoreResult<FetchOutcome> {
        let Some(org_id) = self.begin_fetch(EXPENSES, |s| &mut s.expenses) else {
            return Ok(FetchOutcome::Skipped);
        };
        let result = self.backend.list_expenses(&org_id).await;
        self.settle_fetch(&org_id, EXPENSES, |s| &mut s.expenses, result)
    }

    /// Create an expense. New expenses are shown first.
    pub async fn create_expense(&self, expense: &NewExpense) -> StoreResult<Expense> {
        expense.validate()?;
        let org_id = self.require_active()?;

        let created = self
            .backend
            .create_expense(&org_id, expense)
            .await
            .inspect_err(|err| warn!(org_id = %org_id, error = %err, "create expense failed"))?;

        self.apply_if_active(&org_id, EXPENSES, |state| {
            state.expenses.prepend(created.clone());
        });
        info!(org_id = %org_id, expense_id = %created.id, "expense created");
        Ok(created)
    }

    /// Update an expense in place.
    ///
    /// Returns `None` if the expense no longer exists; it may have been
    /// deleted concurrently.
    pub async fn update_expense(
        &self,
        id: &str,
        update: &ExpenseUpdate,
    ) -> StoreResult<Option<Expense>> {
        update.validate()?;
        let org_id = self.require_active()?;

        let updated = match self.backend.update_expense(&org_id, id, update).await {
            Ok(expense) => expense,
            Err(err) if err.is_not_found() => {
                debug!(org_id = %org_id, expense_id = id, "update skipped, expense not found");
                return Ok(None);
            }
            Err(err) => {
                warn!(org_id = %org_id, expense_id = id, error = %err, "update expense failed");
                return Err(err.into());
            }
        };

        self.apply_if_active(&org_id, EXPENSES, |state| {
            state.expenses.replace(updated.clone());
        });
        Ok(Some(updated))
    }

    /// Delete an expense. Deleting one that is already gone succeeds.
    pub async fn delete_expense(&self, id: &str) -> StoreResult<()> {
        let org_id = self.require_active()?;

        match self.backend.delete_expense(&org_id, id).await {
            Ok(_) => {}
            Err(err) if err.is_not_found() => {
                debug!(org_id = %org_id, expense_id = id, "expense already deleted");
            }
            Err(err) => {
                warn!(org_id = %org_id, expense_id = id, error = %err, "delete expense failed");
                return Err(err.into());
            }
        }

        self.apply_if_active(&org_id, EXPENSES, |state| {
            state.expenses.remove(id);
        });
        Ok(())
    }

    pub async fn approve_expenses(&self, ids: &[String]) -> StoreResult<BulkSummary> {
        self.set_expense_statuses(ids, ExpenseStatus::Approved).await
    }

    pub async fn reject_expenses(&self, ids: &[String]) -> StoreResult<BulkSummary> {
        self.set_expense_statuses(ids, ExpenseStatus::Rejected).await
    }

    async fn set_expense_statuses(
        &self,
        ids: &[String],
        status: ExpenseStatus,
    ) -> StoreResult<BulkSummary> {
        self.require_active()?;
        let update = ExpenseUpdate::status(status);

        let results = join_all(ids.iter().map(|id| self.update_expense(id, &update))).await;

        let mut summary = BulkSummary::default();
        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(Some(_)) => summary.succeeded.push(id.clone()),
                Ok(None) => summary.skipped.push(id.clone()),
                Err(err) => summary.failed.push((id.clone(), err)),
            }
        }

        log_bulk("status", status.as_str(), &summary);
        Ok(summary)
    }

    /// Delete every expense in `ids` independently.
    pub async fn delete_expenses(&self, ids: &[String]) -> StoreResult<BulkSummary> {
        self.require_active()?;

        let results = join_all(ids.iter().map(|id| self.delete_expense(id))).await;

        let mut summary = BulkSummary::default();
        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(()) => summary.succeeded.push(id.clone()),
                Err(err) => summary.failed.push((id.clone(), err)),
            }
        }

        log_bulk("delete", "deleted", &summary);
        Ok(summary)
    }
}

fn log_bulk(action: &str, target: &str, summary: &BulkSummary) {
    if summary.has_failures() {
        warn!(
            action,
            target,
            succeeded = summary.succeeded.len(),
            skipped = summary.skipped.len(),
            failed = summary.failed.len(),
            "bulk expense update partially failed"
        );
    } else {
        info!(
            action,
            target,
            succeeded = summary.succeeded.len(),
            skipped = summary.skipped.len(),
            "bulk expense update finished"
        );
    }
}

/// Ids of `expenses`, in order. Convenience for bulk actions.
pub fn expense_ids(expenses: &[Expense]) -> Vec<String> {
    expenses.iter().map(|e| e.id.clone()).collect()
}
