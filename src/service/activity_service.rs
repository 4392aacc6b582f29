use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::{ActivityLogEntry, ActivityPage, ActivityQuery, Recipient},
    error::Result,
    repository::ActivityLogRepository,
};

/// Actor name recorded for actions taken by the scheduler rather than
/// a logged-in admin.
pub const SYSTEM_ACTOR: &str = "system";

pub struct ActivityService {
    repo: Arc<dyn ActivityLogRepository>,
}

impl ActivityService {
    pub fn new(repo: Arc<dyn ActivityLogRepository>) -> Self {
        Self { repo }
    }

    /// Appends an audit entry. A failed write is logged and swallowed:
    /// the audit trail is best-effort and must never fail the operation
    /// it describes.
    pub async fn record(
        &self,
        actor: Option<&Recipient>,
        action: &str,
        entity_type: &str,
        entity_id: Option<Uuid>,
        detail: Option<String>,
    ) {
        let entry = ActivityLogEntry {
            id: Uuid::new_v4(),
            actor_id: actor.map(|r| r.id),
            actor_name: actor
                .map(|r| r.full_name.clone())
                .unwrap_or_else(|| SYSTEM_ACTOR.to_string()),
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            entity_id,
            detail,
            created_at: Utc::now(),
        };

        if let Err(e) = self.repo.record(entry).await {
            tracing::warn!("Failed to record activity entry for {}: {}", action, e);
        }
    }

    pub async fn list(&self, query: &ActivityQuery) -> Result<ActivityPage> {
        let (data, total) = self.repo.list(query).await?;

        Ok(ActivityPage {
            data,
            total,
            page: query.page.max(1),
            page_size: query.page_size.clamp(1, 100),
        })
    }
}
