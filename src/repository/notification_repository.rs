use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{EntityRef, Notification, NotificationType},
    error::{AppError, Result},
    repository::NotificationRepository,
};

#[derive(FromRow)]
struct NotificationRow {
    id: String,
    recipient_id: String,
    notification_type: String,
    title: String,
    message: String,
    entity_type: Option<String>,
    entity_id: Option<String>,
    read: i32,
    created_at: NaiveDateTime,
}

pub struct SqliteNotificationRepository {
    pool: SqlitePool,
}

impl SqliteNotificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_notification(row: NotificationRow) -> Result<Notification> {
        let entity = match (row.entity_type, row.entity_id) {
            (Some(entity_type), Some(entity_id)) => Some(EntityRef {
                entity_type,
                entity_id: Uuid::parse_str(&entity_id)
                    .map_err(|e| AppError::Database(e.to_string()))?,
            }),
            _ => None,
        };

        Ok(Notification {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            recipient_id: Uuid::parse_str(&row.recipient_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            notification_type: NotificationType::parse(&row.notification_type).ok_or_else(
                || AppError::Database(format!("Invalid notification type: {}", row.notification_type)),
            )?,
            title: row.title,
            message: row.message,
            entity,
            read: row.read != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl NotificationRepository for SqliteNotificationRepository {
    async fn create(&self, notification: Notification) -> Result<Notification> {
        let id_str = notification.id.to_string();
        let recipient_id_str = notification.recipient_id.to_string();
        let entity_type = notification.entity.as_ref().map(|e| e.entity_type.clone());
        let entity_id = notification.entity.as_ref().map(|e| e.entity_id.to_string());
        let read_int = if notification.read { 1i32 } else { 0i32 };

        sqlx::query(
            r#"
            INSERT INTO notifications (
                id, recipient_id, notification_type, title, message,
                entity_type, entity_id, read, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&recipient_id_str)
        .bind(notification.notification_type.as_str())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(entity_type)
        .bind(entity_id)
        .bind(read_int)
        .bind(notification.created_at.naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(notification)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, recipient_id, notification_type, title, message,
                   entity_type, entity_id, read, created_at
            FROM notifications
            WHERE id = ?
            "#,
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_notification(r)?)),
            None => Ok(None),
        }
    }

    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>> {
        let recipient_id_str = recipient_id.to_string();
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, recipient_id, notification_type, title, message,
                   entity_type, entity_id, read, created_at
            FROM notifications
            WHERE recipient_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(recipient_id_str)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_notification).collect()
    }

    async fn unread_count(&self, recipient_id: Uuid) -> Result<i64> {
        let recipient_id_str = recipient_id.to_string();
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = ? AND read = 0",
        )
        .bind(recipient_id_str)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count.0)
    }

    async fn mark_read(&self, id: Uuid) -> Result<u64> {
        let id_str = id.to_string();
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE id = ? AND read = 0")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> Result<u64> {
        let recipient_id_str = recipient_id.to_string();
        let result =
            sqlx::query("UPDATE notifications SET read = 1 WHERE recipient_id = ? AND read = 0")
                .bind(&recipient_id_str)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> Result<u64> {
        let id_str = id.to_string();
        let result = sqlx::query("DELETE FROM notifications WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn clear_read(&self, recipient_id: Uuid) -> Result<u64> {
        let recipient_id_str = recipient_id.to_string();
        let result =
            sqlx::query("DELETE FROM notifications WHERE recipient_id = ? AND read = 1")
                .bind(&recipient_id_str)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
