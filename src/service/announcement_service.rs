use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    domain::{
        Announcement, AnnouncementStatus, AnnouncementType, Audience, Recipient,
    },
    error::{AppError, Result},
    repository::AnnouncementRepository,
    service::{ActivityService, DispatchService},
};

#[derive(Debug, Clone)]
pub struct CreateDraft {
    pub title: String,
    pub content: String,
    pub announcement_type: AnnouncementType,
    pub audience: Audience,
}

/// Partial edit; None leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct EditAnnouncement {
    pub title: Option<String>,
    pub content: Option<String>,
    pub announcement_type: Option<AnnouncementType>,
    pub audience: Option<Audience>,
}

/// Enforces the announcement state machine:
/// draft -> {scheduled, published, archived},
/// scheduled -> {published, archived},
/// published -> {archived},
/// archived -> archived (no-op).
pub struct AnnouncementService {
    repo: Arc<dyn AnnouncementRepository>,
    dispatcher: Arc<DispatchService>,
    activity: Arc<ActivityService>,
}

impl AnnouncementService {
    pub fn new(
        repo: Arc<dyn AnnouncementRepository>,
        dispatcher: Arc<DispatchService>,
        activity: Arc<ActivityService>,
    ) -> Self {
        Self {
            repo,
            dispatcher,
            activity,
        }
    }

    pub async fn create_draft(
        &self,
        author: &Recipient,
        request: CreateDraft,
    ) -> Result<Announcement> {
        let title = request.title.trim().to_string();
        let content = request.content.trim().to_string();

        if title.is_empty() {
            return Err(AppError::Validation("Title must not be empty".to_string()));
        }
        if content.is_empty() {
            return Err(AppError::Validation("Content must not be empty".to_string()));
        }

        let announcement = Announcement {
            id: Uuid::new_v4(),
            title,
            content,
            announcement_type: request.announcement_type,
            audience: request.audience,
            status: AnnouncementStatus::Draft,
            scheduled_at: None,
            published_at: None,
            archived_at: None,
            created_by: author.id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let created = self.repo.create(announcement).await?;

        self.activity
            .record(
                Some(author),
                "announcement.created",
                "announcement",
                Some(created.id),
                Some(created.title.clone()),
            )
            .await;

        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<Announcement> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Announcement>> {
        self.repo.list(limit, offset).await
    }

    pub async fn edit(
        &self,
        id: Uuid,
        actor: &Recipient,
        edit: EditAnnouncement,
    ) -> Result<Announcement> {
        let mut announcement = self.get(id).await?;

        match announcement.status {
            AnnouncementStatus::Draft | AnnouncementStatus::Scheduled => {}
            AnnouncementStatus::Published | AnnouncementStatus::Archived => {
                return Err(AppError::ReadOnly(format!(
                    "Cannot edit a {} announcement",
                    announcement.status.as_str()
                )));
            }
        }

        if let Some(title) = edit.title {
            announcement.title = title.trim().to_string();
        }
        if let Some(content) = edit.content {
            announcement.content = content.trim().to_string();
        }
        if let Some(announcement_type) = edit.announcement_type {
            announcement.announcement_type = announcement_type;
        }
        if let Some(audience) = edit.audience {
            announcement.audience = audience;
        }

        if announcement.title.is_empty() {
            return Err(AppError::Validation("Title must not be empty".to_string()));
        }
        if announcement.content.is_empty() {
            return Err(AppError::Validation("Content must not be empty".to_string()));
        }

        self.repo.update_content(id, &announcement).await?;

        self.activity
            .record(
                Some(actor),
                "announcement.updated",
                "announcement",
                Some(id),
                Some(announcement.title.clone()),
            )
            .await;

        self.get(id).await
    }

    pub async fn schedule(
        &self,
        id: Uuid,
        actor: &Recipient,
        scheduled_at: DateTime<Utc>,
    ) -> Result<Announcement> {
        let announcement = self.get(id).await?;

        match announcement.status {
            AnnouncementStatus::Draft => {}
            AnnouncementStatus::Scheduled
            | AnnouncementStatus::Published
            | AnnouncementStatus::Archived => {
                return Err(AppError::InvalidTransition(format!(
                    "Only a draft can be scheduled; announcement is {}",
                    announcement.status.as_str()
                )));
            }
        }

        if scheduled_at <= Utc::now() {
            return Err(AppError::Validation(
                "Scheduled time must be in the future".to_string(),
            ));
        }

        let affected = self.repo.mark_scheduled(id, scheduled_at).await?;
        if affected == 0 {
            return Err(AppError::InvalidTransition(
                "Announcement is no longer a draft".to_string(),
            ));
        }

        self.activity
            .record(
                Some(actor),
                "announcement.scheduled",
                "announcement",
                Some(id),
                Some(format!("scheduled for {}", scheduled_at.to_rfc3339())),
            )
            .await;

        self.get(id).await
    }

    /// Publishes immediately, from draft or scheduled. The repository
    /// write is guarded on the current status, so of two concurrent
    /// publishers exactly one wins; the loser gets InvalidTransition.
    /// Dispatch and audit failures are logged but never fail a publish
    /// whose status transition has committed.
    pub async fn publish_now(&self, id: Uuid, actor: Option<&Recipient>) -> Result<Announcement> {
        let announcement = self.get(id).await?;

        match announcement.status {
            AnnouncementStatus::Draft | AnnouncementStatus::Scheduled => {}
            AnnouncementStatus::Published => {
                return Err(AppError::InvalidTransition(
                    "Announcement is already published".to_string(),
                ));
            }
            AnnouncementStatus::Archived => {
                return Err(AppError::InvalidTransition(
                    "Cannot publish an archived announcement".to_string(),
                ));
            }
        }

        let affected = self.repo.mark_published(id, Utc::now()).await?;
        if affected == 0 {
            return Err(AppError::InvalidTransition(
                "Announcement was published or archived concurrently".to_string(),
            ));
        }

        let published = self.get(id).await?;

        if let Err(e) = self.dispatcher.dispatch(&published).await {
            tracing::error!(
                "Notification dispatch failed for announcement {}: {}",
                published.id,
                e
            );
        }

        self.activity
            .record(
                actor,
                "announcement.published",
                "announcement",
                Some(id),
                Some(published.title.clone()),
            )
            .await;

        Ok(published)
    }

    /// Publishes every scheduled announcement whose scheduled_at has
    /// elapsed. Records already published by an explicit action are
    /// skipped by the status guard. Returns the announcements that were
    /// published by this pass.
    pub async fn publish_due(&self, now: DateTime<Utc>) -> Result<Vec<Announcement>> {
        let due = self.repo.list_due(now).await?;
        let mut published = Vec::new();

        for announcement in due {
            match self.publish_now(announcement.id, None).await {
                Ok(a) => published.push(a),
                // Lost the race to an explicit publish; nothing to do.
                Err(AppError::InvalidTransition(_)) => {}
                Err(e) => {
                    tracing::error!(
                        "Failed to publish scheduled announcement {}: {}",
                        announcement.id,
                        e
                    );
                }
            }
        }

        Ok(published)
    }

    /// Archives from any status. Archiving an already-archived record
    /// is a no-op success.
    pub async fn archive(&self, id: Uuid, actor: &Recipient) -> Result<Announcement> {
        let announcement = self.get(id).await?;

        if announcement.status == AnnouncementStatus::Archived {
            return Ok(announcement);
        }

        let affected = self.repo.mark_archived(id, Utc::now()).await?;
        if affected == 0 {
            // Archived concurrently; still a success.
            return self.get(id).await;
        }

        self.activity
            .record(
                Some(actor),
                "announcement.archived",
                "announcement",
                Some(id),
                Some(announcement.title.clone()),
            )
            .await;

        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid, actor: &Recipient) -> Result<()> {
        let announcement = self.get(id).await?;

        let affected = self.repo.delete(id).await?;
        if affected == 0 {
            return Err(AppError::NotFound("Announcement not found".to_string()));
        }

        self.activity
            .record(
                Some(actor),
                "announcement.deleted",
                "announcement",
                Some(id),
                Some(announcement.title.clone()),
            )
            .await;

        Ok(())
    }
}
