use tracing::{debug, info};

use super::{FetchOutcome, NOTIFICATIONS, Store, StoreResult};

impl Store {
    pub async fn fetch_notifications(&self) -> StoreResult<FetchOutcome> {
        let Some(org_id) = self.begin_fetch(NOTIFICATIONS, |s| &mut s.notifications) else {
            return Ok(FetchOutcome::Skipped);
        };
        let result = self.backend.list_notifications(&org_id).await;
        self.settle_fetch(&org_id, NOTIFICATIONS, |s| &mut s.notifications, result)
    }

    /// Mark one notification read.
    ///
    /// Returns `false` without contacting the data service if it is already
    /// read, and `false` if it no longer exists.
    pub async fn mark_notification_read(&self, id: &str) -> StoreResult<bool> {
        let org_id = self.require_active()?;

        let already_read = self.with_state(|s| s.notifications.get(id).is_some_and(|n| n.read));
        if already_read {
            debug!(org_id = %org_id, notification_id = id, "already read");
            return Ok(false);
        }

        match self.backend.mark_notification_read(&org_id, id).await {
            Ok(_) => {}
            Err(err) if err.is_not_found() => return Ok(false),
            Err(err) => return Err(err.into()),
        }

        let mut changed = false;
        self.apply_if_active(&org_id, NOTIFICATIONS, |state| {
            if let Some(notification) = state.notifications.get_mut(id) {
                changed = !notification.read;
                notification.read = true;
            }
        });
        Ok(changed)
    }

    /// Mark every notification of the active organization read. Returns how
    /// many were unread.
    pub async fn mark_all_notifications_read(&self) -> StoreResult<usize> {
        let org_id = self.require_active()?;

        self.backend.mark_all_notifications_read(&org_id).await?;

        let mut changed = 0;
        self.apply_if_active(&org_id, NOTIFICATIONS, |state| {
            for notification in state.notifications.iter_mut() {
                if !notification.read {
                    notification.read = true;
                    changed += 1;
                }
            }
        });
        info!(org_id = %org_id, count = changed, "notifications marked read");
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use super::*;
    use crate::backend::MockDataService;
    use crate::store::StoreError;
    use crate::store::test_support::bootstrapped;
    use crate::types::{AppNotification, CurrencyCode, NotificationKind, Organization, Plan};
    use crate::views::unread_count;

    fn org() -> Organization {
        Organization {
            id: "org1".to_string(),
            name: "Acme Corp".to_string(),
            slug: "acme".to_string(),
            plan: Plan::Pro,
            currency: CurrencyCode::Usd,
            logo: None,
            billing_email: None,
            categories: Vec::new(),
        }
    }

    fn notifications() -> Vec<AppNotification> {
        (0..5)
            .map(|i| AppNotification {
                id: format!("n{}", i),
                org_id: "org1".to_string(),
                title: format!("Notification {}", i),
                description: String::new(),
                timestamp: Utc::now() - Duration::hours(i),
                kind: NotificationKind::Info,
                read: i >= 3,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_mark_all_then_mark_one_is_noop() {
        let mut mock = MockDataService::new();
        mock.expect_list_my_organizations()
            .returning(|| Ok(vec![org()]));
        mock.expect_list_notifications()
            .returning(|_| Ok(notifications()));
        mock.expect_mark_all_notifications_read()
            .times(1)
            .returning(|_| Ok(true));
        mock.expect_mark_notification_read().never();

        let store = Store::new(Arc::new(mock));
        store.load_my_organizations().await.unwrap();
        store.fetch_notifications().await.unwrap();
        assert_eq!(store.with_state(|s| unread_count(s.notifications.items())), 3);

        assert_eq!(store.mark_all_notifications_read().await.unwrap(), 3);
        assert_eq!(store.with_state(|s| unread_count(s.notifications.items())), 0);

        assert!(!store.mark_notification_read("n1").await.unwrap());
        assert_eq!(store.with_state(|s| s.notifications.len()), 5);
    }

    #[tokio::test]
    async fn test_mark_one_read() {
        let (_, store) = bootstrapped().await;
        assert!(store.mark_notification_read("1").await.unwrap());
        assert!(!store.mark_notification_read("1").await.unwrap());
        assert!(!store.mark_notification_read("missing").await.unwrap());
        assert!(store.with_state(|s| s.notifications.get("1").unwrap().read));
    }

    #[tokio::test]
    async fn test_mark_read_without_active_org() {
        let store = Store::new(Arc::new(MockDataService::new()));
        assert!(matches!(
            store.mark_all_notifications_read().await,
            Err(StoreError::NoActiveOrganization)
        ));
    }
}
