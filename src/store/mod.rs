//! Organization-scoped client state.
//!
//! [`Store`] owns a single [`AppState`] and is the only writer to it. All
//! organization-scoped fetches and mutations are bound to the active
//! organization id at the moment they are issued. When a result arrives the
//! store checks that the same organization is still active before writing it;
//! results for an organization that is no longer active are dropped.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use expenseflow::backend::{MemoryBackend, DEMO_EMAIL};
//! use expenseflow::store::Store;
//!
//! let store = Store::new(Arc::new(MemoryBackend::seeded()));
//! store.login(DEMO_EMAIL).await?;
//! store.bootstrap().await?;
//! let expenses = store.with_state(|s| s.expenses.len());
//! ```

mod billing;
mod budgets;
mod collection;
mod error;
mod expenses;
mod notifications;
mod org;
mod session;

pub use collection::{Collection, Keyed, LoadStatus};
pub use error::{StoreError, StoreResult};

use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use secrecy::SecretString;
use tracing::{debug, warn};

use crate::access::{self, Capability};
use crate::backend::{BackendResult, DataService};
use crate::config::Preferences;
use crate::types::{
    AppNotification, Budget, CurrencyCode, Expense, Invoice, OrgId, OrgMember, OrgRole,
    Organization, PaymentMethod, UserProfile,
};

// Collection names used in log fields.
const ORGANIZATIONS: &str = "organizations";
const MEMBERS: &str = "members";
const EXPENSES: &str = "expenses";
const BUDGETS: &str = "budgets";
const NOTIFICATIONS: &str = "notifications";
const INVOICES: &str = "invoices";
const PAYMENT_METHODS: &str = "payment_methods";

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub authenticated: bool,
    pub user: Option<UserProfile>,
}

/// Organization context.
///
/// The active organization is addressed by id into `organizations`; there is
/// no second copy of it to keep in sync.
#[derive(Debug, Clone, Default)]
pub struct OrgState {
    pub active_organization_id: Option<OrgId>,
    pub organizations: Collection<Organization>,
    /// Roster of the active organization only.
    pub members: Collection<OrgMember>,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub session: SessionState,
    pub orgs: OrgState,
    pub expenses: Collection<Expense>,
    pub budgets: Collection<Budget>,
    pub notifications: Collection<AppNotification>,
    pub invoices: Collection<Invoice>,
    pub payment_methods: Collection<PaymentMethod>,
    pub preferences: Preferences,
}

impl AppState {
    pub fn active_organization(&self) -> Option<&Organization> {
        self.orgs
            .active_organization_id
            .as_deref()
            .and_then(|id| self.orgs.organizations.get(id))
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.session.user.as_ref()
    }

    pub fn current_user_id(&self) -> Option<&str> {
        self.session.user.as_ref().map(|u| u.id.as_str())
    }

    /// Role of the current user in the active organization, resolved from
    /// the loaded roster.
    pub fn current_role(&self) -> OrgRole {
        access::resolve_role(self.orgs.members.items(), self.current_user_id())
    }

    pub fn can(&self, capability: Capability) -> bool {
        access::can(self.current_role(), capability)
    }

    pub fn currency(&self) -> CurrencyCode {
        self.preferences.currency
    }

    /// Clear everything that belongs to a single organization.
    fn reset_scoped(&mut self) {
        self.orgs.members.reset();
        self.expenses.reset();
        self.budgets.reset();
        self.notifications.reset();
        self.invoices.reset();
        self.payment_methods.reset();
    }
}

/// What happened to a fetch's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Written to the store.
    Loaded(usize),
    /// Not issued: no active organization. The collection is left empty.
    Skipped,
    /// Dropped because another organization became active while in flight.
    Discarded { issued_for: OrgId },
}

impl FetchOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, FetchOutcome::Loaded(_))
    }
}

/// Per-item results of a best-effort bulk operation.
///
/// Items are independent: a failure never rolls back the others.
#[derive(Debug, Default)]
pub struct BulkSummary {
    pub succeeded: Vec<String>,
    /// Items the data service no longer knows about.
    pub skipped: Vec<String>,
    pub failed: Vec<(String, StoreError)>,
}

impl BulkSummary {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.skipped.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

impl std::fmt::Display for BulkSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} succeeded, {} skipped, {} failed",
            self.succeeded.len(),
            self.skipped.len(),
            self.failed.len()
        )
    }
}

// ============================================================================
// Store
// ============================================================================

pub struct Store {
    backend: Arc<dyn DataService>,
    state: RwLock<AppState>,
    token: Mutex<Option<SecretString>>,
}

impl Store {
    pub fn new(backend: Arc<dyn DataService>) -> Self {
        Self::with_preferences(backend, Preferences::default())
    }

    pub fn with_preferences(backend: Arc<dyn DataService>, preferences: Preferences) -> Self {
        Self {
            backend,
            state: RwLock::new(AppState {
                preferences,
                ..Default::default()
            }),
            token: Mutex::new(None),
        }
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> AppState {
        self.read().clone()
    }

    /// Run `f` against the current state without copying it.
    pub fn with_state<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&*self.read())
    }

    pub fn active_organization_id(&self) -> Option<OrgId> {
        self.read().orgs.active_organization_id.clone()
    }

    pub fn active_organization(&self) -> Option<Organization> {
        self.read().active_organization().cloned()
    }

    pub fn current_role(&self) -> OrgRole {
        self.read().current_role()
    }

    pub fn preferences(&self) -> Preferences {
        self.read().preferences
    }

    pub fn toggle_theme(&self) -> bool {
        let mut state = self.write();
        state.preferences.dark_mode = !state.preferences.dark_mode;
        state.preferences.dark_mode
    }

    pub fn toggle_sidebar(&self) -> bool {
        let mut state = self.write();
        state.preferences.sidebar_open = !state.preferences.sidebar_open;
        state.preferences.sidebar_open
    }

    pub fn set_currency(&self, currency: CurrencyCode) {
        self.write().preferences.currency = currency;
    }

    // Guards are never held across an await.
    fn read(&self) -> RwLockReadGuard<'_, AppState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AppState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The active organization's id, provided it is still in the loaded list.
    fn require_active(&self) -> StoreResult<OrgId> {
        self.read()
            .active_organization()
            .map(|org| org.id.clone())
            .ok_or(StoreError::NoActiveOrganization)
    }

    fn authorize(&self, capability: Capability) -> StoreResult<()> {
        let role = self.current_role();
        access::authorize(role, capability).map_err(|err| {
            warn!(capability = %capability, role = %role, "operation not permitted");
            StoreError::Forbidden(err)
        })
    }

    /// Mark a collection as loading and return the organization the fetch is
    /// issued for. With no active organization the collection is emptied
    /// and nothing is issued.
    fn begin_fetch<T, S>(&self, kind: &'static str, select: S) -> Option<OrgId>
    where
        T: Keyed,
        S: FnOnce(&mut AppState) -> &mut Collection<T>,
    {
        let mut guard = self.write();
        let state = &mut *guard;

        let Some(org_id) = state.active_organization().map(|org| org.id.clone()) else {
            select(state).finish_load(Vec::new());
            debug!(kind, "no active organization, fetch skipped");
            return None;
        };

        select(state).begin_load();
        debug!(org_id = %org_id, kind, "fetch issued");
        Some(org_id)
    }

    /// Write a fetch result, unless the organization it was issued for is no
    /// longer active.
    fn settle_fetch<T, S>(
        &self,
        issued_for: &str,
        kind: &'static str,
        select: S,
        result: BackendResult<Vec<T>>,
    ) -> StoreResult<FetchOutcome>
    where
        T: Keyed,
        S: FnOnce(&mut AppState) -> &mut Collection<T>,
    {
        let mut guard = self.write();
        let state = &mut *guard;

        if state.orgs.active_organization_id.as_deref() != Some(issued_for) {
            debug!(
                kind,
                issued_for,
                active = ?state.orgs.active_organization_id,
                "discarding stale fetch result"
            );
            return Ok(FetchOutcome::Discarded {
                issued_for: issued_for.to_string(),
            });
        }

        let collection = select(state);
        match result {
            Ok(items) => {
                let count = items.len();
                collection.finish_load(items);
                debug!(org_id = issued_for, kind, count, "fetch applied");
                Ok(FetchOutcome::Loaded(count))
            }
            Err(err) => {
                collection.fail_load(&err);
                warn!(org_id = issued_for, kind, error = %err, "fetch failed");
                Err(err.into())
            }
        }
    }

    /// Apply a mutation result if `issued_for` is still the active
    /// organization. Returns whether it was applied.
    fn apply_if_active(
        &self,
        issued_for: &str,
        kind: &'static str,
        apply: impl FnOnce(&mut AppState),
    ) -> bool {
        let mut guard = self.write();

        if guard.orgs.active_organization_id.as_deref() != Some(issued_for) {
            debug!(
                kind,
                issued_for,
                active = ?guard.orgs.active_organization_id,
                "discarding stale mutation result"
            );
            return false;
        }

        apply(&mut *guard);
        true
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::Store;
    use crate::backend::{DEMO_EMAIL, DataService, MemoryBackend};

    /// A store signed in against a fresh seeded backend, with org1 active.
    pub async fn bootstrapped() -> (Arc<MemoryBackend>, Store) {
        let backend = Arc::new(MemoryBackend::seeded());
        let store = Store::new(backend.clone() as Arc<dyn DataService>);
        store.login(DEMO_EMAIL).await.unwrap();
        store.bootstrap().await.unwrap();
        (backend, store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    #[test]
    fn test_default_state() {
        let store = Store::new(Arc::new(MemoryBackend::seeded()));
        let state = store.snapshot();
        assert!(!state.session.authenticated);
        assert!(state.active_organization().is_none());
        assert_eq!(state.expenses.status(), LoadStatus::Idle);
        assert_eq!(state.current_role(), OrgRole::Member);
        assert!(state.preferences.dark_mode);
    }

    #[test]
    fn test_preference_toggles() {
        let store = Store::new(Arc::new(MemoryBackend::seeded()));
        assert!(!store.toggle_theme());
        assert!(store.toggle_sidebar());
        store.set_currency(CurrencyCode::Gbp);

        let prefs = store.preferences();
        assert!(!prefs.dark_mode);
        assert!(prefs.sidebar_open);
        assert_eq!(prefs.currency, CurrencyCode::Gbp);
    }

    #[tokio::test]
    async fn test_fetch_without_active_org_is_empty() {
        let store = Store::new(Arc::new(MemoryBackend::seeded()));
        let outcome = store.fetch_expenses().await.unwrap();
        assert_eq!(outcome, FetchOutcome::Skipped);
        store.with_state(|s| {
            assert!(s.expenses.is_empty());
            assert_eq!(s.expenses.status(), LoadStatus::Succeeded);
        });
    }

    #[test]
    fn test_bulk_summary_display() {
        let summary = BulkSummary {
            succeeded: vec!["1".to_string(), "2".to_string()],
            skipped: vec!["9".to_string()],
            failed: vec![("3".to_string(), StoreError::NoActiveOrganization)],
        };
        assert_eq!(summary.total(), 4);
        assert!(summary.has_failures());
        assert_eq!(summary.to_string(), "2 succeeded, 1 skipped, 1 failed");
    }
}
