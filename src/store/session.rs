//! Sign-in, the user profile, and (re)loading an organization's data.

use std::sync::PoisonError;

use secrecy::SecretString;
use tracing::{info, warn};

use super::{AppState, Store, StoreError, StoreResult};
use crate::types::{UserProfile, UserUpdate};

impl Store {
    pub async fn login(&self, email: &str) -> StoreResult<()> {
        crate::types::require("email", email)?;

        let response = self
            .backend
            .login(email.trim())
            .await
            .inspect_err(|err| warn!(error = %err, "login failed"))?;

        *self.token.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(SecretString::from(response.token));
        self.write().session.authenticated = true;

        info!("signed in");
        Ok(())
    }

    /// Sign out and drop all tenant data. Preferences survive.
    pub async fn logout(&self) -> StoreResult<()> {
        let result = self.backend.logout().await;

        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        {
            let mut state = self.write();
            let preferences = state.preferences;
            *state = AppState {
                preferences,
                ..Default::default()
            };
        }

        info!("signed out");
        result.map_err(StoreError::from)
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().session.authenticated
    }

    pub fn has_token(&self) -> bool {
        self.with_token(|token| token.is_some())
    }

    /// Run `f` with the session token, if signed in.
    pub fn with_token<R>(&self, f: impl FnOnce(Option<&SecretString>) -> R) -> R {
        let token = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        f(token.as_ref())
    }

    pub async fn fetch_user(&self) -> StoreResult<UserProfile> {
        let user = self.backend.get_user().await?;
        self.write().session.user = Some(user.clone());
        Ok(user)
    }

    pub async fn update_user(&self, update: &UserUpdate) -> StoreResult<UserProfile> {
        update.validate()?;

        let user = self
            .backend
            .update_user(update)
            .await
            .inspect_err(|err| warn!(error = %err, "profile update failed"))?;

        self.write().session.user = Some(user.clone());
        info!(user_id = %user.id, "profile updated");
        Ok(user)
    }

    /// Load the user, their organizations, and the active organization's
    /// data.
    pub async fn bootstrap(&self) -> StoreResult<()> {
        if !self.is_authenticated() {
            return Err(StoreError::NotAuthenticated);
        }

        self.fetch_user().await?;
        self.load_my_organizations().await?;
        self.refresh_organization_data().await
    }

    /// Activate another organization and load its data.
    pub async fn switch_organization(&self, org_id: &str) -> StoreResult<()> {
        self.set_active_organization(org_id)?;
        self.refresh_organization_data().await
    }

    /// Refetch expenses, budgets, notifications and the roster concurrently.
    ///
    /// Every fetch runs to completion; the first error, if any, is returned.
    pub async fn refresh_organization_data(&self) -> StoreResult<()> {
        let (expenses, budgets, notifications, members) = tokio::join!(
            self.fetch_expenses(),
            self.fetch_budgets(),
            self.fetch_notifications(),
            self.fetch_members(),
        );

        expenses?;
        budgets?;
        notifications?;
        members?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use secrecy::ExposeSecret;

    use super::*;
    use crate::backend::{BackendError, DEMO_EMAIL, MemoryBackend};
    use crate::store::LoadStatus;
    use crate::store::test_support::bootstrapped;
    use crate::types::CurrencyCode;

    #[tokio::test]
    async fn test_login_stores_token() {
        let store = Store::new(Arc::new(MemoryBackend::seeded()));
        assert!(!store.has_token());

        store.login(DEMO_EMAIL).await.unwrap();
        assert!(store.is_authenticated());
        let token = store.with_token(|t| t.map(|t| t.expose_secret().to_string()));
        assert!(token.unwrap().starts_with("mock-jwt-token-"));
    }

    #[tokio::test]
    async fn test_login_rejects_unknown_email() {
        let store = Store::new(Arc::new(MemoryBackend::seeded()));
        let err = store.login("nobody@nowhere.com").await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(BackendError::InvalidCredentials)));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_bootstrap_requires_login() {
        let store = Store::new(Arc::new(MemoryBackend::seeded()));
        assert!(matches!(
            store.bootstrap().await,
            Err(StoreError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_bootstrap_loads_everything() {
        let (_, store) = bootstrapped().await;
        let state = store.snapshot();

        assert_eq!(state.current_user().unwrap().name, "Eleanor Pena");
        assert_eq!(state.expenses.len(), 3);
        assert_eq!(state.budgets.len(), 2);
        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.orgs.members.len(), 2);
        assert_eq!(state.expenses.status(), LoadStatus::Succeeded);
    }

    #[tokio::test]
    async fn test_switch_organization_refetches() {
        let (_, store) = bootstrapped().await;
        store.switch_organization("org2").await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.active_organization().unwrap().slug, "blueberry");
        assert_eq!(state.currency(), CurrencyCode::Eur);
        assert_eq!(state.expenses.len(), 1);
        assert!(state.expenses.iter().all(|e| e.org_id == "org2"));
        assert!(state.budgets.iter().all(|b| b.org_id == "org2"));
        assert!(state.notifications.is_empty());
        assert_eq!(state.orgs.members.len(), 1);
    }

    #[tokio::test]
    async fn test_logout_keeps_preferences() {
        let (_, store) = bootstrapped().await;
        store.toggle_sidebar();

        store.logout().await.unwrap();

        let state = store.snapshot();
        assert!(!state.session.authenticated);
        assert!(state.session.user.is_none());
        assert!(state.orgs.organizations.is_empty());
        assert!(state.expenses.is_empty());
        assert!(state.preferences.sidebar_open);
        assert!(!store.has_token());
    }

    #[tokio::test]
    async fn test_update_user_validates_before_dispatch() {
        let (_, store) = bootstrapped().await;

        let bad = UserUpdate {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            store.update_user(&bad).await,
            Err(StoreError::Validation(_))
        ));

        let good = UserUpdate {
            location: Some("Austin, TX".to_string()),
            ..Default::default()
        };
        let user = store.update_user(&good).await.unwrap();
        assert_eq!(user.location.as_deref(), Some("Austin, TX"));
        assert_eq!(
            store.with_state(|s| s.current_user().and_then(|u| u.location.clone())),
            Some("Austin, TX".to_string())
        );
    }

    #[tokio::test]
    async fn test_refresh_reports_failure_and_keeps_data() {
        let (backend, store) = bootstrapped().await;
        backend.set_unavailable(true);

        assert!(store.refresh_organization_data().await.is_err());

        let state = store.snapshot();
        assert_eq!(state.expenses.len(), 3);
        assert_eq!(state.expenses.status(), LoadStatus::Failed);
        assert!(state.expenses.error().is_some());
    }
}
