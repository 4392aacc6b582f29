use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::{
        summarize, Announcement, Audience, EntityRef, Notification, NotificationType, Recipient,
        RecipientRole,
    },
    error::Result,
    repository::{NotificationRepository, RecipientRepository},
};

/// Fans a published announcement out into one notification row per
/// resolved recipient.
pub struct DispatchService {
    recipients: Arc<dyn RecipientRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl DispatchService {
    pub fn new(
        recipients: Arc<dyn RecipientRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            recipients,
            notifications,
        }
    }

    /// Maps an audience segment to the set of active recipients it
    /// targets. An empty set is valid and yields zero notifications.
    pub async fn resolve_audience(&self, audience: Audience) -> Result<Vec<Recipient>> {
        match audience {
            Audience::All => {
                let mut recipients = self
                    .recipients
                    .list_active_by_role(RecipientRole::Client)
                    .await?;
                recipients.extend(
                    self.recipients
                        .list_active_by_role(RecipientRole::Talent)
                        .await?,
                );
                Ok(recipients)
            }
            Audience::Clients => {
                self.recipients
                    .list_active_by_role(RecipientRole::Client)
                    .await
            }
            Audience::Talents => {
                self.recipients
                    .list_active_by_role(RecipientRole::Talent)
                    .await
            }
        }
    }

    /// Creates one notification per audience member. Individual insert
    /// failures are logged and skipped; the feed is a convenience, not
    /// a transactional guarantee, so partial dispatch is acceptable.
    /// Returns the number of notifications created.
    pub async fn dispatch(&self, announcement: &Announcement) -> Result<usize> {
        let recipients = self.resolve_audience(announcement.audience).await?;
        let message = summarize(&announcement.content);
        let mut created = 0usize;

        for recipient in &recipients {
            let notification = Notification {
                id: Uuid::new_v4(),
                recipient_id: recipient.id,
                notification_type: NotificationType::System,
                title: announcement.title.clone(),
                message: message.clone(),
                entity: Some(EntityRef {
                    entity_type: "announcement".to_string(),
                    entity_id: announcement.id,
                }),
                read: false,
                created_at: Utc::now(),
            };

            match self.notifications.create(notification).await {
                Ok(_) => created += 1,
                Err(e) => {
                    tracing::error!(
                        "Failed to deliver notification to recipient {}: {}",
                        recipient.id,
                        e
                    );
                }
            }
        }

        tracing::info!(
            "Dispatched announcement {} to {}/{} recipients",
            announcement.id,
            created,
            recipients.len()
        );

        Ok(created)
    }
}
