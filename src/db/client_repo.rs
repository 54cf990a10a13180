// src/db/client_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::client::{Client, ClientPayload},
};

const CLIENT_COLUMNS: &str = r#"
    id, name, company, email, company_email, phone, country,
    payment_mode, notes, created_at, updated_at
"#;

#[derive(Clone, Default)]
pub struct ClientRepository;

impl ClientRepository {
    pub fn new() -> Self {
        Self
    }

    /// Todos os clientes, mais recentes primeiro.
    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients ORDER BY created_at DESC");
        let clients = sqlx::query_as::<_, Client>(&sql).fetch_all(executor).await?;
        Ok(clients)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1");
        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(client)
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &ClientPayload) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO clients (
                name, company, email, company_email, phone, country, payment_mode, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {CLIENT_COLUMNS}
            "#
        );

        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(&payload.name)
            .bind(&payload.company)
            .bind(&payload.email)
            .bind(&payload.company_email)
            .bind(&payload.phone)
            .bind(&payload.country)
            .bind(&payload.payment_mode)
            .bind(&payload.notes)
            .fetch_one(executor)
            .await?;

        Ok(client)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &ClientPayload,
    ) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE clients SET
                name = $2,
                company = $3,
                email = $4,
                company_email = $5,
                phone = $6,
                country = $7,
                payment_mode = $8,
                notes = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CLIENT_COLUMNS}
            "#
        );

        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(id)
            .bind(&payload.name)
            .bind(&payload.company)
            .bind(&payload.email)
            .bind(&payload.company_email)
            .bind(&payload.phone)
            .bind(&payload.country)
            .bind(&payload.payment_mode)
            .bind(&payload.notes)
            .fetch_optional(executor)
            .await?;

        Ok(client)
    }

    /// Retorna false se o cliente não existia. Projetos e faturas caem junto (CASCADE).
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clients")
            .fetch_one(executor)
            .await?;
        Ok(count)
    }
}
