use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use uuid::Uuid;

use crate::{
    domain::Notification,
    error::{AppError, Result},
    repository::NotificationRepository,
};

/// Read model behind the notification bell: per-recipient listing,
/// derived unread count, read-state mutations, and live-feed
/// subscription tracking.
pub struct NotificationService {
    repo: Arc<dyn NotificationRepository>,
    subscriptions: Arc<Mutex<HashMap<Uuid, usize>>>,
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self {
            repo,
            subscriptions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn list(&self, recipient_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Notification>> {
        self.repo.list_for_recipient(recipient_id, limit, offset).await
    }

    pub async fn unread_count(&self, recipient_id: Uuid) -> Result<i64> {
        self.repo.unread_count(recipient_id).await
    }

    /// Marks one notification read. Already-read rows are a no-op; a
    /// missing row or one owned by someone else is NotFound.
    pub async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> Result<Notification> {
        let notification = self.owned(recipient_id, id).await?;

        if notification.read {
            return Ok(notification);
        }

        self.repo.mark_read(id).await?;

        self.owned(recipient_id, id).await
    }

    /// Marks every unread notification read; returns rows affected, so
    /// a second call in a row reports zero.
    pub async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64> {
        self.repo.mark_all_read(recipient_id).await
    }

    pub async fn delete(&self, recipient_id: Uuid, id: Uuid) -> Result<()> {
        self.owned(recipient_id, id).await?;
        self.repo.delete(id).await?;
        Ok(())
    }

    /// Removes all read notifications for the recipient; unread rows
    /// are untouched. Returns the number deleted.
    pub async fn clear_read(&self, recipient_id: Uuid) -> Result<u64> {
        self.repo.clear_read(recipient_id).await
    }

    /// Registers a live-feed subscription for the recipient. The
    /// returned guard owns the connected state: the feed reports
    /// connected while at least one guard is alive and disconnected
    /// once the last one drops.
    pub fn subscribe(&self, recipient_id: Uuid) -> FeedSubscription {
        {
            let mut subs = self.subscriptions.lock().unwrap_or_else(|e| e.into_inner());
            *subs.entry(recipient_id).or_insert(0) += 1;
        }

        FeedSubscription {
            recipient_id,
            subscriptions: self.subscriptions.clone(),
        }
    }

    pub fn is_connected(&self, recipient_id: Uuid) -> bool {
        let subs = self.subscriptions.lock().unwrap_or_else(|e| e.into_inner());
        subs.get(&recipient_id).copied().unwrap_or(0) > 0
    }

    async fn owned(&self, recipient_id: Uuid, id: Uuid) -> Result<Notification> {
        let notification = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

        // Other recipients' notifications are invisible, not forbidden.
        if notification.recipient_id != recipient_id {
            return Err(AppError::NotFound("Notification not found".to_string()));
        }

        Ok(notification)
    }
}

/// RAII guard for one live-feed connection; disconnects on drop.
pub struct FeedSubscription {
    recipient_id: Uuid,
    subscriptions: Arc<Mutex<HashMap<Uuid, usize>>>,
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        let mut subs = self.subscriptions.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(count) = subs.get_mut(&self.recipient_id) {
            *count -= 1;
            if *count == 0 {
                subs.remove(&self.recipient_id);
            }
        }
    }
}
