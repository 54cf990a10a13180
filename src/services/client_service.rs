// src/services/client_service.rs

use std::sync::Arc;

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClientRepository, ProjectRepository},
    models::{
        activity::{ActivityAction, ActivityEntity},
        client::{filter_and_sort_clients, Client, ClientDetail, ClientListQuery, ClientPayload, ClientStats},
        project::uploaded_paths,
    },
    services::activity_service::ActivityService,
    storage::{remove_objects, ObjectStorage},
};

#[derive(Clone)]
pub struct ClientService {
    repo: ClientRepository,
    project_repo: ProjectRepository,
    activity: ActivityService,
    storage: Arc<dyn ObjectStorage>,
    pool: PgPool,
}

impl ClientService {
    pub fn new(
        repo: ClientRepository,
        project_repo: ProjectRepository,
        activity: ActivityService,
        storage: Arc<dyn ObjectStorage>,
        pool: PgPool,
    ) -> Self {
        Self { repo, project_repo, activity, storage, pool }
    }

    pub async fn list(&self, query: &ClientListQuery) -> Result<Vec<Client>, AppError> {
        let clients = self.repo.list(&self.pool).await?;
        Ok(filter_and_sort_clients(clients, query))
    }

    pub async fn get(&self, id: Uuid) -> Result<Client, AppError> {
        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::ClientNotFound)
    }

    /// Cliente + projetos + estatísticas agregadas.
    pub async fn detail(&self, id: Uuid) -> Result<ClientDetail, AppError> {
        let client = self.get(id).await?;
        let projects = self.project_repo.list(&self.pool, Some(id), None).await?;
        let stats = ClientStats::from_projects(&projects);

        Ok(ClientDetail { client, projects, stats })
    }

    pub async fn create(&self, payload: &ClientPayload, actor: &str) -> Result<Client, AppError> {
        let client = self.repo.create(&self.pool, payload).await?;

        self.activity
            .record(
                ActivityEntity::Client,
                client.id,
                ActivityAction::Created,
                json!({ "name": client.name, "email": client.email }),
                actor,
            )
            .await;

        Ok(client)
    }

    pub async fn update(&self, id: Uuid, payload: &ClientPayload, actor: &str) -> Result<Client, AppError> {
        let client = self
            .repo
            .update(&self.pool, id, payload)
            .await?
            .ok_or(AppError::ClientNotFound)?;

        self.activity
            .record(
                ActivityEntity::Client,
                client.id,
                ActivityAction::Updated,
                json!({ "name": client.name }),
                actor,
            )
            .await;

        Ok(client)
    }

    pub async fn delete(&self, id: Uuid, actor: &str) -> Result<(), AppError> {
        let client = self.get(id).await?;
        // O CASCADE leva os projetos, mas não os arquivos deles
        let projects = self.project_repo.list(&self.pool, Some(id), None).await?;

        if !self.repo.delete(&self.pool, id).await? {
            return Err(AppError::ClientNotFound);
        }

        remove_objects(self.storage.as_ref(), &uploaded_paths(&projects)).await;

        self.activity
            .record(
                ActivityEntity::Client,
                id,
                ActivityAction::Deleted,
                json!({ "name": client.name }),
                actor,
            )
            .await;

        Ok(())
    }
}
