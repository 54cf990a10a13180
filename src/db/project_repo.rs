// src/db/project_repo.rs

use sqlx::{types::Json, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{currency::Currency, error::AppError},
    models::project::{Project, ProjectPayload, ProjectStatus, Resource},
};

const PROJECT_COLUMNS: &str = r#"
    id, title, client_id, description, services, status, start_date, end_date,
    currency, total_amount, paid_amount, remaining_amount, actual_received_amount,
    notes, resources, created_at, updated_at
"#;

#[derive(Clone, Default)]
pub struct ProjectRepository;

impl ProjectRepository {
    pub fn new() -> Self {
        Self
    }

    /// Filtros de igualdade ficam no SQL; busca textual e ordenação são feitas em memória.
    pub async fn list<'e, E>(
        &self,
        executor: E,
        client_id: Option<Uuid>,
        status: Option<ProjectStatus>,
    ) -> Result<Vec<Project>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {PROJECT_COLUMNS}
            FROM projects
            WHERE ($1::uuid IS NULL OR client_id = $1)
              AND ($2::project_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#
        );

        let projects = sqlx::query_as::<_, Project>(&sql)
            .bind(client_id)
            .bind(status)
            .fetch_all(executor)
            .await?;

        Ok(projects)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Project>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");
        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(project)
    }

    /// Versão com FOR UPDATE, para alterar a lista de recursos dentro de uma transação.
    pub async fn find_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Project>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 FOR UPDATE");
        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(project)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        payload: &ProjectPayload,
        currency: Currency,
    ) -> Result<Project, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO projects (
                title, client_id, description, services, status, start_date, end_date,
                currency, total_amount, paid_amount, actual_received_amount, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {PROJECT_COLUMNS}
            "#
        );

        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(&payload.title)
            .bind(payload.client_id)
            .bind(&payload.description)
            .bind(&payload.services)
            .bind(payload.status)
            .bind(payload.start_date)
            .bind(payload.end_date)
            .bind(currency)
            .bind(payload.total_amount)
            .bind(payload.paid_amount)
            .bind(payload.actual_received_amount)
            .bind(&payload.notes)
            .fetch_one(executor)
            .await?;

        Ok(project)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &ProjectPayload,
        currency: Currency,
    ) -> Result<Option<Project>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE projects SET
                title = $2,
                client_id = $3,
                description = $4,
                services = $5,
                status = $6,
                start_date = $7,
                end_date = $8,
                currency = $9,
                total_amount = $10,
                paid_amount = $11,
                actual_received_amount = $12,
                notes = $13,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "#
        );

        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .bind(&payload.title)
            .bind(payload.client_id)
            .bind(&payload.description)
            .bind(&payload.services)
            .bind(payload.status)
            .bind(payload.start_date)
            .bind(payload.end_date)
            .bind(currency)
            .bind(payload.total_amount)
            .bind(payload.paid_amount)
            .bind(payload.actual_received_amount)
            .bind(&payload.notes)
            .fetch_optional(executor)
            .await?;

        Ok(project)
    }

    pub async fn set_resources<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        resources: &[Resource],
    ) -> Result<Project, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE projects SET resources = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "#
        );

        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .bind(Json(resources))
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::ProjectNotFound)?;

        Ok(project)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects")
            .fetch_one(executor)
            .await?;
        Ok(count)
    }
}
