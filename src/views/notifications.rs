use crate::types::AppNotification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationTab {
    #[default]
    All,
    Unread,
}

impl NotificationTab {
    pub fn includes(&self, notification: &AppNotification) -> bool {
        match self {
            NotificationTab::All => true,
            NotificationTab::Unread => !notification.read,
        }
    }
}

pub fn unread_count(notifications: &[AppNotification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}

/// Notifications on `tab`, newest first.
pub fn notification_feed(
    notifications: &[AppNotification],
    tab: NotificationTab,
) -> Vec<&AppNotification> {
    let mut feed: Vec<&AppNotification> =
        notifications.iter().filter(|n| tab.includes(n)).collect();
    feed.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    feed
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::types::NotificationKind;

    fn notification(id: &str, hours_ago: i64, read: bool) -> AppNotification {
        let now = Utc.with_ymd_and_hms(2024, 8, 28, 12, 0, 0).unwrap();
        AppNotification {
            id: id.to_string(),
            org_id: "org1".to_string(),
            title: format!("Notification {}", id),
            description: String::new(),
            timestamp: now - Duration::hours(hours_ago),
            kind: NotificationKind::Info,
            read,
        }
    }

    fn ids(feed: &[&AppNotification]) -> Vec<String> {
        feed.iter().map(|n| n.id.clone()).collect()
    }

    #[test]
    fn test_unread_count() {
        let notifications = vec![
            notification("a", 1, false),
            notification("b", 2, true),
            notification("c", 3, false),
        ];
        assert_eq!(unread_count(&notifications), 2);
        assert_eq!(unread_count(&[]), 0);
    }

    #[test]
    fn test_feed_is_newest_first() {
        let notifications = vec![
            notification("old", 48, false),
            notification("new", 1, true),
            notification("mid", 5, false),
        ];
        let feed = notification_feed(&notifications, NotificationTab::All);
        assert_eq!(ids(&feed), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_unread_tab() {
        let notifications = vec![
            notification("old", 48, false),
            notification("new", 1, true),
            notification("mid", 5, false),
        ];
        let feed = notification_feed(&notifications, NotificationTab::Unread);
        assert_eq!(ids(&feed), vec!["mid", "old"]);
    }
}
