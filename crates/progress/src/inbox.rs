//! Notification inbox.

use tracing::debug;
use vocalboost_core::{Notification, NotificationId, UserId};
use vocalboost_storage::Storage;
use crate::error::{ProgressError, ServiceError};

/// A learner-facing view over stored notifications.
pub struct NotificationInbox<'a, S: Storage + ?Sized> {
    storage: &'a mut S,
}

impl<'a, S: Storage + ?Sized> NotificationInbox<'a, S> {
    /// Create an inbox over `storage`.
    pub fn new(storage: &'a mut S) -> Self {
        Self { storage }
    }

    /// Deliver a notification.
    pub async fn push(&mut self, notification: Notification) -> Result<NotificationId, ServiceError> {
        let id = notification.id;
        self.storage.save_notification(&notification).await?;
        debug!(user = %notification.user_id, notification = %id, kind = notification.kind.as_str(), "Delivered notification");
        Ok(id)
    }

    /// All of a learner's notifications, newest first.
    pub async fn list(&self, user: &UserId) -> Result<Vec<Notification>, ServiceError> {
        Ok(self.storage.list_notifications(user).await?)
    }

    /// Unread notifications, newest first.
    pub async fn unread(&self, user: &UserId) -> Result<Vec<Notification>, ServiceError> {
        Ok(self
            .list(user)
            .await?
            .into_iter()
            .filter(|n| !n.is_read)
            .collect())
    }

    /// Number of unread notifications.
    pub async fn unread_count(&self, user: &UserId) -> Result<usize, ServiceError> {
        Ok(self.unread(user).await?.len())
    }

    /// Mark one notification read. Marking twice is harmless.
    pub async fn mark_read(&mut self, id: NotificationId) -> Result<Notification, ServiceError> {
        let mut notification = self
            .storage
            .load_notification(id)
            .await?
            .ok_or_else(|| ProgressError::not_found("notification", id))?;

        if !notification.is_read {
            notification.is_read = true;
            self.storage.save_notification(&notification).await?;
        }
        Ok(notification)
    }

    /// Mark everything read. Returns how many changed.
    pub async fn mark_all_read(&mut self, user: &UserId) -> Result<usize, ServiceError> {
        let unread = self.unread(user).await?;
        for mut notification in unread.iter().cloned() {
            notification.is_read = true;
            self.storage.save_notification(&notification).await?;
        }
        debug!(%user, changed = unread.len(), "Marked all notifications read");
        Ok(unread.len())
    }
}
