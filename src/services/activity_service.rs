// src/services/activity_service.rs

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ActivityRepository,
    models::activity::{ActivityAction, ActivityEntity, ActivityLog},
};

#[derive(Clone)]
pub struct ActivityService {
    repo: ActivityRepository,
    pool: PgPool,
}

impl ActivityService {
    pub fn new(repo: ActivityRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    /// Registra a ação depois que a mutação já foi gravada.
    /// Falhas aqui não desfazem nada: só vão para o log.
    pub async fn record(
        &self,
        entity_type: ActivityEntity,
        entity_id: Uuid,
        action: ActivityAction,
        data: Value,
        actor: &str,
    ) {
        if let Err(e) = self
            .repo
            .append(&self.pool, entity_type, entity_id, action, &data, Some(actor))
            .await
        {
            tracing::warn!(
                "⚠️ Falha ao registrar atividade {:?}/{:?} de {}: {:?}",
                entity_type,
                action,
                entity_id,
                e
            );
        }
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<ActivityLog>, AppError> {
        self.repo.list_recent(&self.pool, limit).await
    }
}
