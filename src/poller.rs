//! Notification bell and the background unread-count poller.
//!
//! SYSTEM CONTEXT
//! ==============
//! The header bell shows an unread badge that refreshes on a fixed interval
//! (30 s by default) and a dropdown of the most recent notifications. The
//! poller is a spawned task publishing the count on a `watch` channel; the
//! bell holds the dropdown state and the mark-read actions. A bell driven
//! by its own timer calls [`NotificationBell::poll`] each tick, which also
//! reloads the list while the dropdown is open.
//!
//! ERROR HANDLING
//! ==============
//! A failed poll keeps the last known count; the next tick tries again.
//! Mark-read failures are returned to the caller and leave local state
//! unchanged.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::net::notifications::NotificationQuery;
use crate::net::types::Notification;
use crate::net::{ApiClient, ApiError};

/// How many notifications the dropdown shows.
pub const RECENT_LIMIT: u32 = 8;

// =============================================================================
// POLLER
// =============================================================================

/// Background task refreshing the unread count. Stops when dropped.
pub struct UnreadPoller {
    count: watch::Receiver<u64>,
    task: JoinHandle<()>,
}

impl UnreadPoller {
    /// Start polling. The first poll runs immediately.
    #[must_use]
    pub fn spawn(api: ApiClient, every: Duration) -> Self {
        let (tx, count) = watch::channel(0);
        let task = tokio::spawn(poll_loop(api, every, tx));
        Self { count, task }
    }

    /// Last count the server reported.
    #[must_use]
    pub fn unread(&self) -> u64 {
        *self.count.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.count.clone()
    }

    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for UnreadPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn poll_loop(api: ApiClient, every: Duration, tx: watch::Sender<u64>) {
    let mut ticker = interval(every.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        match api.unread_count().await {
            Ok(n) => {
                tx.send_if_modified(|current| {
                    let changed = *current != n;
                    *current = n;
                    changed
                });
            }
            Err(e) => debug!(error = %e, "poller: unread count failed"),
        }
        if tx.is_closed() {
            debug!("poller: no subscribers left");
            break;
        }
    }
}

// =============================================================================
// BELL
// =============================================================================

/// Dropdown state for the notification bell.
pub struct NotificationBell {
    api: ApiClient,
    unread: u64,
    recent: Vec<Notification>,
    open: bool,
    loading: bool,
}

impl NotificationBell {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api, unread: 0, recent: Vec::new(), open: false, loading: false }
    }

    #[must_use]
    pub fn unread(&self) -> u64 {
        self.unread
    }

    #[must_use]
    pub fn recent(&self) -> &[Notification] {
        &self.recent
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Take a count published by [`UnreadPoller`].
    pub fn set_unread(&mut self, count: u64) {
        self.unread = count;
    }

    /// Re-read the unread count. Failures keep the old count.
    pub async fn refresh_count(&mut self) {
        match self.api.unread_count().await {
            Ok(n) => self.unread = n,
            Err(e) => debug!(error = %e, "bell: unread count failed"),
        }
    }

    /// One interval tick for a bell that polls on its own: re-read the
    /// count and, while the dropdown is open, the list. Failures keep what
    /// is shown.
    pub async fn poll(&mut self) {
        if !self.open {
            self.refresh_count().await;
            return;
        }
        // The list reply carries the unread count as well.
        if let Err(e) = self.load_recent().await {
            debug!(error = %e, "bell: recent notifications failed");
            self.refresh_count().await;
        }
    }

    /// Open or close the dropdown; opening loads the latest notifications.
    ///
    /// # Errors
    ///
    /// Returns the server error if the list cannot be loaded; the dropdown
    /// stays open with whatever it showed before.
    pub async fn toggle(&mut self) -> Result<(), ApiError> {
        self.open = !self.open;
        if self.open {
            self.load_recent().await
        } else {
            Ok(())
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// # Errors
    ///
    /// Returns the server error; previous rows are kept.
    pub async fn load_recent(&mut self) -> Result<(), ApiError> {
        self.loading = true;
        let query = NotificationQuery { limit: Some(RECENT_LIMIT), ..NotificationQuery::default() };
        let result = self.api.list_notifications(&query).await;
        self.loading = false;
        let env = result?;
        if let Some(n) = env.payload.unread_count {
            self.unread = n;
        }
        self.recent = env.payload.notifications;
        Ok(())
    }

    /// Mark one notification read and drop the badge by one.
    ///
    /// # Errors
    ///
    /// Returns the server error; nothing changes locally.
    pub async fn mark_read(&mut self, id: &str) -> Result<(), ApiError> {
        self.api.mark_notification_read(id).await?;
        if let Some(n) = self.recent.iter_mut().find(|n| n.id == id) {
            n.is_read = true;
        }
        self.unread = self.unread.saturating_sub(1);
        Ok(())
    }

    /// Mark everything read. Repeating it is harmless.
    ///
    /// # Errors
    ///
    /// Returns the server error; nothing changes locally.
    pub async fn mark_all_read(&mut self) -> Result<(), ApiError> {
        self.api.mark_all_notifications_read().await?;
        for n in &mut self.recent {
            n.is_read = true;
        }
        self.unread = 0;
        info!("bell: all notifications marked read");
        Ok(())
    }
}

#[cfg(test)]
#[path = "poller_test.rs"]
mod tests;
