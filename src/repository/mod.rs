use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::*;
use crate::error::Result;

pub mod activity_log_repository;
pub mod announcement_repository;
pub mod notification_repository;
pub mod recipient_repository;

pub use activity_log_repository::SqliteActivityLogRepository;
pub use announcement_repository::SqliteAnnouncementRepository;
pub use notification_repository::SqliteNotificationRepository;
pub use recipient_repository::SqliteRecipientRepository;

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create(&self, announcement: Announcement) -> Result<Announcement>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Announcement>>;
    /// Scheduled announcements whose scheduled_at has elapsed.
    async fn list_due(&self, now: DateTime<Utc>) -> Result<Vec<Announcement>>;
    /// Writes the editable fields (title, content, type, audience).
    /// Status and transition stamps are only touched by the mark_*
    /// methods below.
    async fn update_content(&self, id: Uuid, announcement: &Announcement) -> Result<u64>;
    /// Conditional transition draft -> scheduled. Returns rows affected;
    /// zero means the record was not in draft.
    async fn mark_scheduled(&self, id: Uuid, scheduled_at: DateTime<Utc>) -> Result<u64>;
    /// Conditional transition {draft, scheduled} -> published. Returns
    /// rows affected; zero means the record was already past that point,
    /// which is how a double-publish race loser finds out.
    async fn mark_published(&self, id: Uuid, published_at: DateTime<Utc>) -> Result<u64>;
    /// Conditional transition to archived from any non-archived status.
    async fn mark_archived(&self, id: Uuid, archived_at: DateTime<Utc>) -> Result<u64>;
    async fn delete(&self, id: Uuid) -> Result<u64>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: Notification) -> Result<Notification>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>>;
    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>>;
    async fn unread_count(&self, recipient_id: Uuid) -> Result<i64>;
    async fn mark_read(&self, id: Uuid) -> Result<u64>;
    async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64>;
    async fn delete(&self, id: Uuid) -> Result<u64>;
    async fn clear_read(&self, recipient_id: Uuid) -> Result<u64>;
}

#[async_trait]
pub trait RecipientRepository: Send + Sync {
    async fn create(&self, request: CreateRecipientRequest) -> Result<Recipient>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipient>>;
    async fn list_active_by_role(&self, role: RecipientRole) -> Result<Vec<Recipient>>;
}

#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    async fn record(&self, entry: ActivityLogEntry) -> Result<()>;
    /// Newest-first page plus the total matching count.
    async fn list(&self, query: &ActivityQuery) -> Result<(Vec<ActivityLogEntry>, i64)>;
}
