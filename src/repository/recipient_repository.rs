use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateRecipientRequest, Recipient, RecipientRole},
    error::{AppError, Result},
    repository::RecipientRepository,
};

#[derive(FromRow)]
struct RecipientRow {
    id: String,
    full_name: String,
    email: String,
    role: String,
    active: i32,
    created_at: NaiveDateTime,
}

pub struct SqliteRecipientRepository {
    pool: SqlitePool,
}

impl SqliteRecipientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_recipient(row: RecipientRow) -> Result<Recipient> {
        Ok(Recipient {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            full_name: row.full_name,
            email: row.email,
            role: RecipientRole::parse(&row.role)
                .ok_or_else(|| AppError::Database(format!("Invalid recipient role: {}", row.role)))?,
            active: row.active != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl RecipientRepository for SqliteRecipientRepository {
    async fn create(&self, request: CreateRecipientRequest) -> Result<Recipient> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO recipients (id, full_name, email, role, active, created_at)
            VALUES (?, ?, ?, ?, 1, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&request.full_name)
        .bind(&request.email)
        .bind(request.role.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created recipient".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Recipient>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, RecipientRow>(
            "SELECT id, full_name, email, role, active, created_at FROM recipients WHERE id = ?",
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_recipient(r)?)),
            None => Ok(None),
        }
    }

    async fn list_active_by_role(&self, role: RecipientRole) -> Result<Vec<Recipient>> {
        let rows = sqlx::query_as::<_, RecipientRow>(
            r#"
            SELECT id, full_name, email, role, active, created_at
            FROM recipients
            WHERE role = ? AND active = 1
            ORDER BY created_at ASC
            "#,
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_recipient).collect()
    }
}
