// src/db/invoice_repo.rs

use sqlx::{types::Json, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::invoice::{Invoice, InvoiceStatus, NewInvoice},
};

// Sempre com o título do projeto e o nome do cliente
const INVOICE_SELECT: &str = r#"
    SELECT
        i.id, i.project_id, i.client_id, i.invoice_number, i.invoice_type,
        i.invoice_date, i.due_date, i.amount, i.currency, i.description,
        i.services, i.status, i.payment_method, i.payment_terms, i.notes,
        p.title AS project_title,
        c.name AS client_name,
        i.created_at, i.updated_at
"#;

const INVOICE_JOINS: &str = r#"
    LEFT JOIN projects p ON p.id = i.project_id
    LEFT JOIN clients c ON c.id = i.client_id
"#;

// Número repetido bate no UNIQUE de invoices.invoice_number
fn write_error(err: sqlx::Error, invoice_number: Option<&str>) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::InvoiceNumberTaken(invoice_number.unwrap_or_default().to_string())
        }
        _ => AppError::DatabaseError(err),
    }
}

#[derive(Clone, Default)]
pub struct InvoiceRepository;

impl InvoiceRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E, project_id: Option<Uuid>) -> Result<Vec<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            {INVOICE_SELECT}
            FROM invoices i
            {INVOICE_JOINS}
            WHERE ($1::uuid IS NULL OR i.project_id = $1)
            ORDER BY i.created_at DESC
            "#
        );

        let invoices = sqlx::query_as::<_, Invoice>(&sql)
            .bind(project_id)
            .fetch_all(executor)
            .await?;

        Ok(invoices)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{INVOICE_SELECT} FROM invoices i {INVOICE_JOINS} WHERE i.id = $1");
        let invoice = sqlx::query_as::<_, Invoice>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(invoice)
    }

    /// Sem número informado, o banco gera o próximo INV-AAAA-NNNN.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
        client_id: Uuid,
        invoice: &NewInvoice,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            WITH i AS (
                INSERT INTO invoices (
                    project_id, client_id, invoice_number, invoice_type, invoice_date,
                    due_date, amount, currency, description, services, status,
                    payment_method, payment_terms, notes
                )
                VALUES (
                    $1, $2, COALESCE($3, next_invoice_number()), $4, $5,
                    $6, $7, $8, $9, $10, $11,
                    $12, $13, $14
                )
                RETURNING *
            )
            {INVOICE_SELECT}
            FROM i
            {INVOICE_JOINS}
            "#
        );

        let created = sqlx::query_as::<_, Invoice>(&sql)
            .bind(project_id)
            .bind(client_id)
            .bind(&invoice.invoice_number)
            .bind(invoice.invoice_type)
            .bind(invoice.invoice_date)
            .bind(invoice.due_date)
            .bind(invoice.amount)
            .bind(invoice.currency)
            .bind(&invoice.description)
            .bind(Json(&invoice.services))
            .bind(invoice.status)
            .bind(&invoice.payment_method)
            .bind(&invoice.payment_terms)
            .bind(&invoice.notes)
            .fetch_one(executor)
            .await
            .map_err(|e| write_error(e, invoice.invoice_number.as_deref()))?;

        Ok(created)
    }

    /// Número vazio no payload mantém o atual.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        invoice: &NewInvoice,
    ) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            WITH i AS (
                UPDATE invoices SET
                    invoice_number = COALESCE($2, invoice_number),
                    invoice_type = $3,
                    invoice_date = $4,
                    due_date = $5,
                    amount = $6,
                    currency = $7,
                    description = $8,
                    services = $9,
                    status = $10,
                    payment_method = $11,
                    payment_terms = $12,
                    notes = $13,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            {INVOICE_SELECT}
            FROM i
            {INVOICE_JOINS}
            "#
        );

        let updated = sqlx::query_as::<_, Invoice>(&sql)
            .bind(id)
            .bind(&invoice.invoice_number)
            .bind(invoice.invoice_type)
            .bind(invoice.invoice_date)
            .bind(invoice.due_date)
            .bind(invoice.amount)
            .bind(invoice.currency)
            .bind(&invoice.description)
            .bind(Json(&invoice.services))
            .bind(invoice.status)
            .bind(&invoice.payment_method)
            .bind(&invoice.payment_terms)
            .bind(&invoice.notes)
            .fetch_optional(executor)
            .await
            .map_err(|e| write_error(e, invoice.invoice_number.as_deref()))?;

        Ok(updated)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: InvoiceStatus,
    ) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            WITH i AS (
                UPDATE invoices SET status = $2, updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            {INVOICE_SELECT}
            FROM i
            {INVOICE_JOINS}
            "#
        );

        let updated = sqlx::query_as::<_, Invoice>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(executor)
            .await?;

        Ok(updated)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM invoices")
            .fetch_one(executor)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{borrow::Cow, error::Error as StdError, fmt};

    use sqlx::error::{DatabaseError, ErrorKind};

    #[derive(Debug)]
    struct DuplicateKey;

    impl fmt::Display for DuplicateKey {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("duplicate key value violates unique constraint")
        }
    }

    impl StdError for DuplicateKey {}

    impl DatabaseError for DuplicateKey {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"invoices_invoice_number_key\""
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed("23505"))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn duplicate_number_becomes_conflict() {
        let err = write_error(sqlx::Error::Database(Box::new(DuplicateKey)), Some("INV-2024-0001"));
        assert!(matches!(&err, AppError::InvoiceNumberTaken(n) if n == "INV-2024-0001"));
        assert_eq!(err.status(), axum::http::StatusCode::CONFLICT);
    }

    #[test]
    fn other_database_errors_stay_internal() {
        let err = write_error(sqlx::Error::RowNotFound, Some("INV-2024-0001"));
        assert!(matches!(err, AppError::DatabaseError(_)));
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
