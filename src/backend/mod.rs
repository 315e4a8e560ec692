//! Boundary to the remote data service.
//!
//! Every organization-scoped call takes the organization id explicitly; the
//! service never infers it. The store is the only caller and always passes
//! the id the request was issued for.
//!
//! # Example
//!
//! ```ignore
//! use expenseflow::backend::{DataService, MemoryBackend};
//!
//! let backend = MemoryBackend::seeded();
//! let expenses = backend.list_expenses("org1").await?;
//! ```

mod error;
mod memory;

pub use error::BackendError;
pub use memory::{DEMO_EMAIL, MemoryBackend};

use async_trait::async_trait;

use crate::types::{
    AppNotification, Budget, BudgetId, BudgetUpdate, Expense, ExpenseId, ExpenseUpdate, Invoice,
    LoginResponse, NewBudget, NewExpense, NotificationId, OrgMember, OrgRole, Organization,
    OrganizationUpdate, PaymentMethod, UserId, UserProfile, UserUpdate,
};

pub type BackendResult<T> = Result<T, BackendError>;

/// One async call per remote operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataService: Send + Sync {
    // ==================== Auth ====================

    async fn login(&self, email: &str) -> BackendResult<LoginResponse>;

    async fn logout(&self) -> BackendResult<()>;

    // ==================== Organizations ====================

    /// Organizations the current user is a member of, in service order.
    async fn list_my_organizations(&self) -> BackendResult<Vec<Organization>>;

    /// Create an organization with the current user as its admin.
    async fn create_organization(&self, name: &str, slug: &str) -> BackendResult<Organization>;

    async fn get_members(&self, org_id: &str) -> BackendResult<Vec<OrgMember>>;

    async fn invite_member(
        &self,
        org_id: &str,
        email: &str,
        role: OrgRole,
    ) -> BackendResult<OrgMember>;

    /// Remove a member. Fails with [`BackendError::SelfRemoval`] for the
    /// current user.
    async fn remove_member(&self, org_id: &str, user_id: &str) -> BackendResult<UserId>;

    async fn update_member_role(
        &self,
        org_id: &str,
        user_id: &str,
        role: OrgRole,
    ) -> BackendResult<OrgMember>;

    async fn update_organization(
        &self,
        org_id: &str,
        update: &OrganizationUpdate,
    ) -> BackendResult<Organization>;

    async fn add_category(&self, org_id: &str, name: &str) -> BackendResult<String>;

    async fn remove_category(&self, org_id: &str, name: &str) -> BackendResult<String>;

    // ==================== Expenses ====================

    async fn list_expenses(&self, org_id: &str) -> BackendResult<Vec<Expense>>;

    async fn create_expense(&self, org_id: &str, expense: &NewExpense) -> BackendResult<Expense>;

    async fn update_expense(
        &self,
        org_id: &str,
        id: &str,
        update: &ExpenseUpdate,
    ) -> BackendResult<Expense>;

    async fn delete_expense(&self, org_id: &str, id: &str) -> BackendResult<ExpenseId>;

    // ==================== Budgets ====================

    async fn list_budgets(&self, org_id: &str) -> BackendResult<Vec<Budget>>;

    async fn create_budget(&self, org_id: &str, budget: &NewBudget) -> BackendResult<Budget>;

    async fn update_budget(
        &self,
        org_id: &str,
        id: BudgetId,
        update: &BudgetUpdate,
    ) -> BackendResult<Budget>;

    async fn delete_budget(&self, org_id: &str, id: BudgetId) -> BackendResult<BudgetId>;

    // ==================== Notifications ====================

    async fn list_notifications(&self, org_id: &str) -> BackendResult<Vec<AppNotification>>;

    async fn mark_notification_read(
        &self,
        org_id: &str,
        id: &str,
    ) -> BackendResult<NotificationId>;

    async fn mark_all_notifications_read(&self, org_id: &str) -> BackendResult<bool>;

    // ==================== User ====================

    async fn get_user(&self) -> BackendResult<UserProfile>;

    async fn update_user(&self, update: &UserUpdate) -> BackendResult<UserProfile>;

    // ==================== Billing ====================

    async fn get_invoices(&self, org_id: &str) -> BackendResult<Vec<Invoice>>;

    async fn get_payment_methods(&self, org_id: &str) -> BackendResult<Vec<PaymentMethod>>;
}
