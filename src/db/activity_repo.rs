// src/db/activity_repo.rs

use serde_json::Value;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::activity::{ActivityAction, ActivityEntity, ActivityLog},
};

#[derive(Clone, Default)]
pub struct ActivityRepository;

impl ActivityRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn append<'e, E>(
        &self,
        executor: E,
        entity_type: ActivityEntity,
        entity_id: Uuid,
        action: ActivityAction,
        data: &Value,
        user_id: Option<&str>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO activity_logs (entity_type, entity_id, action, data, user_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entity_type)
        .bind(entity_id)
        .bind(action)
        .bind(data)
        .bind(user_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn list_recent<'e, E>(&self, executor: E, limit: i64) -> Result<Vec<ActivityLog>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let logs = sqlx::query_as::<_, ActivityLog>(
            r#"
            SELECT id, entity_type, entity_id, action, data, user_id, timestamp
            FROM activity_logs
            ORDER BY timestamp DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(executor)
        .await?;

        Ok(logs)
    }
}
