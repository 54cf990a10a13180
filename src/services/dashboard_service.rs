// src/services/dashboard_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{ActivityRepository, ClientRepository, ProjectRepository},
    models::{activity::DEFAULT_ACTIVITY_LIMIT, dashboard::DashboardSummary},
};

#[derive(Clone)]
pub struct DashboardService {
    client_repo: ClientRepository,
    project_repo: ProjectRepository,
    activity_repo: ActivityRepository,
    pool: PgPool,
}

impl DashboardService {
    pub fn new(
        client_repo: ClientRepository,
        project_repo: ProjectRepository,
        activity_repo: ActivityRepository,
        pool: PgPool,
    ) -> Self {
        Self { client_repo, project_repo, activity_repo, pool }
    }

    /// As três leituras são independentes, então rodam em paralelo.
    pub async fn get_summary(&self) -> Result<DashboardSummary, AppError> {
        let (clients, projects, recent) = tokio::try_join!(
            self.client_repo.list(&self.pool),
            self.project_repo.list(&self.pool, None, None),
            self.activity_repo.list_recent(&self.pool, DEFAULT_ACTIVITY_LIMIT),
        )?;

        Ok(DashboardSummary::from_records(&clients, &projects, recent))
    }
}
