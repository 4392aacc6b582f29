use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Announcement, AnnouncementStatus, AnnouncementType, Audience},
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

#[derive(FromRow)]
struct AnnouncementRow {
    id: String,
    title: String,
    content: String,
    announcement_type: String,
    audience: String,
    status: String,
    scheduled_at: Option<NaiveDateTime>,
    published_at: Option<NaiveDateTime>,
    archived_at: Option<NaiveDateTime>,
    created_by: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteAnnouncementRepository {
    pool: SqlitePool,
}

impl SqliteAnnouncementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_announcement(row: AnnouncementRow) -> Result<Announcement> {
        Ok(Announcement {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            content: row.content,
            announcement_type: AnnouncementType::parse(&row.announcement_type).ok_or_else(
                || AppError::Database(format!("Invalid announcement type: {}", row.announcement_type)),
            )?,
            audience: Audience::parse(&row.audience)
                .ok_or_else(|| AppError::Database(format!("Invalid audience: {}", row.audience)))?,
            status: AnnouncementStatus::parse(&row.status)
                .ok_or_else(|| AppError::Database(format!("Invalid status: {}", row.status)))?,
            scheduled_at: row.scheduled_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            published_at: row.published_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            archived_at: row.archived_at.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            created_by: Uuid::parse_str(&row.created_by)
                .map_err(|e| AppError::Database(e.to_string()))?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, title, content, announcement_type, audience, status,
           scheduled_at, published_at, archived_at, created_by, created_at, updated_at
    FROM announcements
"#;

#[async_trait]
impl AnnouncementRepository for SqliteAnnouncementRepository {
    async fn create(&self, announcement: Announcement) -> Result<Announcement> {
        let id_str = announcement.id.to_string();
        let created_by_str = announcement.created_by.to_string();
        let scheduled_at_naive = announcement.scheduled_at.map(|dt| dt.naive_utc());
        let published_at_naive = announcement.published_at.map(|dt| dt.naive_utc());
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO announcements (
                id, title, content, announcement_type, audience, status,
                scheduled_at, published_at, archived_at, created_by, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, NULL, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&announcement.title)
        .bind(&announcement.content)
        .bind(announcement.announcement_type.as_str())
        .bind(announcement.audience.as_str())
        .bind(announcement.status.as_str())
        .bind(scheduled_at_naive)
        .bind(published_at_naive)
        .bind(&created_by_str)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(announcement.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created announcement".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, AnnouncementRow>(
            &format!("{} WHERE id = ?", SELECT_COLUMNS),
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_announcement(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Announcement>> {
        let rows = sqlx::query_as::<_, AnnouncementRow>(
            &format!("{} ORDER BY created_at DESC LIMIT ? OFFSET ?", SELECT_COLUMNS),
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_announcement).collect()
    }

    async fn list_due(&self, now: DateTime<Utc>) -> Result<Vec<Announcement>> {
        let rows = sqlx::query_as::<_, AnnouncementRow>(
            &format!(
                "{} WHERE status = 'scheduled' AND scheduled_at <= ? ORDER BY scheduled_at ASC",
                SELECT_COLUMNS
            ),
        )
        .bind(now.naive_utc())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_announcement).collect()
    }

    async fn update_content(&self, id: Uuid, announcement: &Announcement) -> Result<u64> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE announcements
            SET title = ?, content = ?, announcement_type = ?, audience = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&announcement.title)
        .bind(&announcement.content)
        .bind(announcement.announcement_type.as_str())
        .bind(announcement.audience.as_str())
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn mark_scheduled(&self, id: Uuid, scheduled_at: DateTime<Utc>) -> Result<u64> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE announcements
            SET status = 'scheduled', scheduled_at = ?, updated_at = ?
            WHERE id = ? AND status = 'draft'
            "#,
        )
        .bind(scheduled_at.naive_utc())
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn mark_published(&self, id: Uuid, published_at: DateTime<Utc>) -> Result<u64> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        // The status guard makes concurrent publishers race safely: the
        // loser sees zero rows affected.
        let result = sqlx::query(
            r#"
            UPDATE announcements
            SET status = 'published', published_at = ?, updated_at = ?
            WHERE id = ? AND status IN ('draft', 'scheduled')
            "#,
        )
        .bind(published_at.naive_utc())
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn mark_archived(&self, id: Uuid, archived_at: DateTime<Utc>) -> Result<u64> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE announcements
            SET status = 'archived', archived_at = ?, updated_at = ?
            WHERE id = ? AND status != 'archived'
            "#,
        )
        .bind(archived_at.naive_utc())
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> Result<u64> {
        let id_str = id.to_string();
        let result = sqlx::query("DELETE FROM announcements WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
