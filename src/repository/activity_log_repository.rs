use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{ActivityLogEntry, ActivityQuery},
    error::{AppError, Result},
    repository::ActivityLogRepository,
};

#[derive(FromRow)]
struct ActivityRow {
    id: String,
    actor_id: Option<String>,
    actor_name: String,
    action: String,
    entity_type: String,
    entity_id: Option<String>,
    detail: Option<String>,
    created_at: NaiveDateTime,
}

pub struct SqliteActivityLogRepository {
    pool: SqlitePool,
}

impl SqliteActivityLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_entry(row: ActivityRow) -> Result<ActivityLogEntry> {
        let actor_id = match row.actor_id {
            Some(s) => Some(Uuid::parse_str(&s).map_err(|e| AppError::Database(e.to_string()))?),
            None => None,
        };
        let entity_id = match row.entity_id {
            Some(s) => Some(Uuid::parse_str(&s).map_err(|e| AppError::Database(e.to_string()))?),
            None => None,
        };

        Ok(ActivityLogEntry {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            actor_id,
            actor_name: row.actor_name,
            action: row.action,
            entity_type: row.entity_type,
            entity_id,
            detail: row.detail,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }

    /// Builds the WHERE clause shared by the page and count queries.
    /// Filters combine with AND; search matches action, detail and
    /// actor name.
    fn filter_sql(query: &ActivityQuery) -> String {
        let mut sql = String::from(" WHERE 1 = 1");
        if query.actor.is_some() {
            sql.push_str(" AND actor_id = ?");
        }
        if query.group.is_some() {
            sql.push_str(" AND entity_type = ?");
        }
        if query.search.is_some() {
            sql.push_str(" AND (action LIKE ? OR detail LIKE ? OR actor_name LIKE ?)");
        }
        sql
    }
}

#[async_trait]
impl ActivityLogRepository for SqliteActivityLogRepository {
    async fn record(&self, entry: ActivityLogEntry) -> Result<()> {
        let id_str = entry.id.to_string();
        let actor_id_str = entry.actor_id.map(|id| id.to_string());
        let entity_id_str = entry.entity_id.map(|id| id.to_string());

        sqlx::query(
            r#"
            INSERT INTO activity_log (
                id, actor_id, actor_name, action, entity_type, entity_id, detail, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(actor_id_str)
        .bind(&entry.actor_name)
        .bind(&entry.action)
        .bind(&entry.entity_type)
        .bind(entity_id_str)
        .bind(&entry.detail)
        .bind(entry.created_at.naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn list(&self, query: &ActivityQuery) -> Result<(Vec<ActivityLogEntry>, i64)> {
        let filter = Self::filter_sql(query);
        let search_pattern = query.search.as_ref().map(|s| format!("%{}%", s));

        let count_sql = format!("SELECT COUNT(*) FROM activity_log{}", filter);
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
        if let Some(actor) = query.actor {
            count_query = count_query.bind(actor.to_string());
        }
        if let Some(ref group) = query.group {
            count_query = count_query.bind(group.clone());
        }
        if let Some(ref pattern) = search_pattern {
            count_query = count_query
                .bind(pattern.clone())
                .bind(pattern.clone())
                .bind(pattern.clone());
        }
        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .0;

        let page = query.page.max(1);
        let page_size = query.page_size.clamp(1, 100);
        let offset = (page - 1) * page_size;

        let page_sql = format!(
            r#"
            SELECT id, actor_id, actor_name, action, entity_type, entity_id, detail, created_at
            FROM activity_log{}
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
            filter
        );
        let mut page_query = sqlx::query_as::<_, ActivityRow>(&page_sql);
        if let Some(actor) = query.actor {
            page_query = page_query.bind(actor.to_string());
        }
        if let Some(ref group) = query.group {
            page_query = page_query.bind(group.clone());
        }
        if let Some(ref pattern) = search_pattern {
            page_query = page_query
                .bind(pattern.clone())
                .bind(pattern.clone())
                .bind(pattern.clone());
        }
        let rows = page_query
            .bind(page_size)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let entries = rows
            .into_iter()
            .map(Self::row_to_entry)
            .collect::<Result<Vec<_>>>()?;

        Ok((entries, total))
    }
}
