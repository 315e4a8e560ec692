//! Notifications command - show and mark notifications.

use anyhow::Result;
use clap::{Args, Subcommand};

use expenseflow::views::{NotificationTab, notification_feed, unread_count};

use super::open;

#[derive(Args)]
pub struct NotificationsCmd {
    #[command(subcommand)]
    pub command: Option<NotificationsSubCmd>,

    /// Only unread notifications
    #[arg(long, short = 'u')]
    pub unread: bool,
}

#[derive(Subcommand)]
pub enum NotificationsSubCmd {
    /// Mark one notification as read
    Read { id: String },

    /// Mark every notification as read
    ReadAll,
}

impl NotificationsCmd {
    pub async fn run(&self, org: Option<&str>) -> Result<()> {
        let (_config, store) = open(org).await?;

        match &self.command {
            None => {
                let tab = if self.unread {
                    NotificationTab::Unread
                } else {
                    NotificationTab::All
                };

                store.with_state(|s| {
                    let notifications = s.notifications.items();
                    println!("{} unread", unread_count(notifications));
                    println!();
                    for n in notification_feed(notifications, tab) {
                        let marker = if n.read { " " } else { "*" };
                        println!(
                            "{} {:<4} {:<8} {}  {}",
                            marker,
                            n.id,
                            n.kind.as_str(),
                            n.timestamp.format("%b %d, %Y %H:%M"),
                            n.title
                        );
                        if !n.description.is_empty() {
                            println!("         {}", n.description);
                        }
                    }
                });
            }
            Some(NotificationsSubCmd::Read { id }) => {
                if store.mark_notification_read(id).await? {
                    println!("Marked {} as read.", id);
                } else {
                    println!("{} was already read.", id);
                }
            }
            Some(NotificationsSubCmd::ReadAll) => {
                let changed = store.mark_all_notifications_read().await?;
                println!("Marked {} notifications as read.", changed);
            }
        }

        Ok(())
    }
}
