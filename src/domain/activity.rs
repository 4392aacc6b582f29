use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only audit record. Rows are written once and never mutated;
/// actor_id is None for actions taken by the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub actor_name: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Filters for the admin activity feed. All filters are optional and
/// combine with AND.
#[derive(Debug, Clone, Default)]
pub struct ActivityQuery {
    pub page: i64,
    pub page_size: i64,
    pub search: Option<String>,
    pub group: Option<String>,
    pub actor: Option<Uuid>,
}

/// Pagination envelope returned by the activity endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityPage {
    pub data: Vec<ActivityLogEntry>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}
