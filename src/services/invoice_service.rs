// src/services/invoice_service.rs

use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InvoiceRepository, ProjectRepository},
    models::{
        activity::{ActivityAction, ActivityEntity},
        invoice::{Invoice, InvoicePayload, InvoiceStatus},
        project::Project,
    },
    services::activity_service::ActivityService,
};

#[derive(Clone)]
pub struct InvoiceService {
    repo: InvoiceRepository,
    project_repo: ProjectRepository,
    activity: ActivityService,
    pool: PgPool,
}

impl InvoiceService {
    pub fn new(
        repo: InvoiceRepository,
        project_repo: ProjectRepository,
        activity: ActivityService,
        pool: PgPool,
    ) -> Self {
        Self { repo, project_repo, activity, pool }
    }

    async fn project(&self, project_id: Uuid) -> Result<Project, AppError> {
        self.project_repo
            .find_by_id(&self.pool, project_id)
            .await?
            .ok_or(AppError::ProjectNotFound)
    }

    /// Todas as faturas, mais recentes primeiro.
    pub async fn list_all(&self) -> Result<Vec<Invoice>, AppError> {
        self.repo.list(&self.pool, None).await
    }

    pub async fn list_for_project(&self, project_id: Uuid) -> Result<Vec<Invoice>, AppError> {
        self.project(project_id).await?;
        self.repo.list(&self.pool, Some(project_id)).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Invoice, AppError> {
        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::InvoiceNotFound)
    }

    pub async fn create(
        &self,
        project_id: Uuid,
        payload: InvoicePayload,
        actor: &str,
    ) -> Result<Invoice, AppError> {
        // O cliente da fatura é sempre o do projeto
        let project = self.project(project_id).await?;
        let new_invoice = payload.into_new_invoice(Utc::now().date_naive())?;

        let invoice = self
            .repo
            .create(&self.pool, project.id, project.client_id, &new_invoice)
            .await?;

        tracing::info!("🧾 Fatura {} criada para o projeto {}", invoice.invoice_number, project.id);

        self.activity
            .record(
                ActivityEntity::Invoice,
                invoice.id,
                ActivityAction::Created,
                json!({
                    "invoiceNumber": invoice.invoice_number,
                    "projectId": project.id,
                    "amount": invoice.amount,
                    "currency": invoice.currency,
                }),
                actor,
            )
            .await;

        Ok(invoice)
    }

    pub async fn update(&self, id: Uuid, payload: InvoicePayload, actor: &str) -> Result<Invoice, AppError> {
        let current = self.get(id).await?;
        let new_invoice = payload.into_new_invoice(current.invoice_date)?;

        let invoice = self
            .repo
            .update(&self.pool, id, &new_invoice)
            .await?
            .ok_or(AppError::InvoiceNotFound)?;

        self.activity
            .record(
                ActivityEntity::Invoice,
                invoice.id,
                ActivityAction::Updated,
                json!({ "invoiceNumber": invoice.invoice_number, "amount": invoice.amount }),
                actor,
            )
            .await;

        Ok(invoice)
    }

    pub async fn update_status(&self, id: Uuid, status: InvoiceStatus, actor: &str) -> Result<Invoice, AppError> {
        let invoice = self
            .repo
            .update_status(&self.pool, id, status)
            .await?
            .ok_or(AppError::InvoiceNotFound)?;

        self.activity
            .record(
                ActivityEntity::Invoice,
                invoice.id,
                ActivityAction::StatusChanged,
                json!({ "invoiceNumber": invoice.invoice_number, "status": invoice.status }),
                actor,
            )
            .await;

        Ok(invoice)
    }

    pub async fn delete(&self, id: Uuid, actor: &str) -> Result<(), AppError> {
        let invoice = self.get(id).await?;

        if !self.repo.delete(&self.pool, id).await? {
            return Err(AppError::InvoiceNotFound);
        }

        self.activity
            .record(
                ActivityEntity::Invoice,
                id,
                ActivityAction::Deleted,
                json!({ "invoiceNumber": invoice.invoice_number }),
                actor,
            )
            .await;

        Ok(())
    }
}
