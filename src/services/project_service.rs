// src/services/project_service.rs

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        currency::Currency,
        error::AppError,
        resource_path::{check_upload, folder_path, guess_content_type, object_path, unique_file_name},
    },
    db::{ClientRepository, InvoiceRepository, ProjectRepository},
    models::{
        activity::{ActivityAction, ActivityEntity},
        client::Client,
        project::{
            filter_and_sort_projects, uploaded_paths, LinkResourcePayload, Project, ProjectDetail,
            ProjectFile, ProjectListQuery, ProjectPayload, Resource, ResourceKind,
        },
    },
    services::activity_service::ActivityService,
    storage::{remove_objects, ObjectStorage},
};

/// Arquivo recebido via multipart, já lido para memória.
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct ProjectService {
    repo: ProjectRepository,
    client_repo: ClientRepository,
    invoice_repo: InvoiceRepository,
    activity: ActivityService,
    storage: Arc<dyn ObjectStorage>,
    pool: PgPool,
    default_currency: Currency,
}

impl ProjectService {
    pub fn new(
        repo: ProjectRepository,
        client_repo: ClientRepository,
        invoice_repo: InvoiceRepository,
        activity: ActivityService,
        storage: Arc<dyn ObjectStorage>,
        pool: PgPool,
        default_currency: Currency,
    ) -> Self {
        Self { repo, client_repo, invoice_repo, activity, storage, pool, default_currency }
    }

    // =========================================================================
    //  CRUD
    // =========================================================================

    pub async fn list(&self, query: &ProjectListQuery) -> Result<Vec<Project>, AppError> {
        let projects = self.repo.list(&self.pool, query.client_id, query.status).await?;
        Ok(filter_and_sort_projects(projects, query))
    }

    pub async fn get(&self, id: Uuid) -> Result<Project, AppError> {
        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::ProjectNotFound)
    }

    async fn client_of(&self, project: &Project) -> Result<Client, AppError> {
        self.client_repo
            .find_by_id(&self.pool, project.client_id)
            .await?
            .ok_or(AppError::ClientNotFound)
    }

    /// Projeto + cliente + resumo de pagamento + faturas do projeto.
    pub async fn detail(&self, id: Uuid) -> Result<ProjectDetail, AppError> {
        let project = self.get(id).await?;
        let (client, invoices) = tokio::try_join!(
            self.client_of(&project),
            self.invoice_repo.list(&self.pool, Some(id)),
        )?;

        Ok(ProjectDetail {
            payment: project.payment_summary(),
            project,
            client,
            invoices,
        })
    }

    async fn ensure_client(&self, client_id: Uuid) -> Result<(), AppError> {
        self.client_repo
            .find_by_id(&self.pool, client_id)
            .await?
            .map(|_| ())
            .ok_or(AppError::ClientNotFound)
    }

    pub async fn create(&self, payload: &ProjectPayload, actor: &str) -> Result<Project, AppError> {
        self.ensure_client(payload.client_id).await?;

        let currency = payload.currency.unwrap_or(self.default_currency);
        let project = self.repo.create(&self.pool, payload, currency).await?;

        self.activity
            .record(
                ActivityEntity::Project,
                project.id,
                ActivityAction::Created,
                json!({ "title": project.title, "clientId": project.client_id }),
                actor,
            )
            .await;

        Ok(project)
    }

    pub async fn update(&self, id: Uuid, payload: &ProjectPayload, actor: &str) -> Result<Project, AppError> {
        self.ensure_client(payload.client_id).await?;

        let currency = payload.currency.unwrap_or(self.default_currency);
        let project = self
            .repo
            .update(&self.pool, id, payload, currency)
            .await?
            .ok_or(AppError::ProjectNotFound)?;

        self.activity
            .record(
                ActivityEntity::Project,
                project.id,
                ActivityAction::Updated,
                json!({ "title": project.title, "status": project.status }),
                actor,
            )
            .await;

        Ok(project)
    }

    pub async fn delete(&self, id: Uuid, actor: &str) -> Result<(), AppError> {
        let project = self.get(id).await?;

        if !self.repo.delete(&self.pool, id).await? {
            return Err(AppError::ProjectNotFound);
        }

        // Os uploads ficariam órfãos no bucket
        remove_objects(self.storage.as_ref(), &uploaded_paths(std::slice::from_ref(&project))).await;

        self.activity
            .record(
                ActivityEntity::Project,
                id,
                ActivityAction::Deleted,
                json!({ "title": project.title }),
                actor,
            )
            .await;

        Ok(())
    }

    // =========================================================================
    //  RECURSOS (links e arquivos)
    // =========================================================================

    /// Anexa um recurso dentro de uma transação (FOR UPDATE evita perder entradas concorrentes).
    async fn push_resource(&self, id: Uuid, resource: Resource) -> Result<Project, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut project = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::ProjectNotFound)?;

        project.resources.push(resource);
        let project = self.repo.set_resources(&mut *tx, id, &project.resources).await?;

        tx.commit().await?;
        Ok(project)
    }

    pub async fn add_link(
        &self,
        id: Uuid,
        payload: LinkResourcePayload,
        actor: &str,
    ) -> Result<Project, AppError> {
        let resource = Resource::link(payload.title, payload.url, payload.note);
        let resource_id = resource.id;
        let data = json!({
            "resourceId": resource_id,
            "title": resource.title,
            "type": resource.kind,
            "linkKind": resource.link_kind(),
        });

        let project = self.push_resource(id, resource).await?;

        self.activity
            .record(ActivityEntity::Project, id, ActivityAction::AddedResource, data, actor)
            .await;

        Ok(project)
    }

    pub async fn upload_file(
        &self,
        id: Uuid,
        title: Option<String>,
        file: UploadedFile,
        actor: &str,
    ) -> Result<Project, AppError> {
        check_upload(&file.file_name, file.bytes.len())?;

        let project = self.get(id).await?;
        let client = self.client_of(&project).await?;

        let folder = folder_path(&project.services, &client.name, project.start_date);
        let now = Utc::now();
        let path = object_path(&folder, &unique_file_name(now.timestamp_millis(), &file.file_name));
        let content_type = file
            .content_type
            .unwrap_or_else(|| guess_content_type(&file.file_name).to_string());

        self.storage.upload(&path, &file.bytes, &content_type).await?;

        let resource = Resource {
            id: Uuid::new_v4(),
            title: title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| file.file_name.clone()),
            url: self.storage.public_url(&path),
            kind: ResourceKind::Uploaded,
            note: String::new(),
            uploaded_file_path: Some(path.clone()),
            size: Some(file.bytes.len() as u64),
            content_type: Some(content_type),
            uploaded_at: Some(now),
        };
        let data = json!({
            "resourceId": resource.id,
            "title": resource.title,
            "type": resource.kind,
            "path": path,
        });

        let project = match self.push_resource(id, resource).await {
            Ok(project) => project,
            Err(e) => {
                // Não deixa o arquivo solto no bucket
                self.remove_object(&path).await;
                return Err(e);
            }
        };

        self.activity
            .record(ActivityEntity::Project, id, ActivityAction::AddedResource, data, actor)
            .await;

        Ok(project)
    }

    pub async fn remove_resource(&self, id: Uuid, resource_id: Uuid, actor: &str) -> Result<Project, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut project = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::ProjectNotFound)?;

        let position = project
            .resources
            .iter()
            .position(|r| r.id == resource_id)
            .ok_or(AppError::ResourceNotFound)?;
        let removed = project.resources.remove(position);

        let project = self.repo.set_resources(&mut *tx, id, &project.resources).await?;
        tx.commit().await?;

        if let Some(path) = removed.uploaded_file_path.as_deref() {
            self.remove_object(path).await;
        }

        self.activity
            .record(
                ActivityEntity::Project,
                id,
                ActivityAction::RemovedResource,
                json!({ "resourceId": removed.id, "title": removed.title, "type": removed.kind }),
                actor,
            )
            .await;

        Ok(project)
    }

    /// Arquivos presentes na pasta do projeto no bucket.
    pub async fn list_files(&self, id: Uuid) -> Result<Vec<ProjectFile>, AppError> {
        let project = self.get(id).await?;
        let client = self.client_of(&project).await?;
        let folder = folder_path(&project.services, &client.name, project.start_date);

        let files = self
            .storage
            .list(&folder)
            .await?
            .into_iter()
            .map(|object| ProjectFile {
                public_url: self.storage.public_url(&object.path),
                name: object.name,
                path: object.path,
                size: object.size,
                updated_at: object.updated_at,
            })
            .collect();

        Ok(files)
    }

    async fn remove_object(&self, path: &str) {
        remove_objects(self.storage.as_ref(), &[path.to_string()]).await;
    }
}
