// src/services/settings_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::SettingsRepository,
    models::settings::{AppSettings, UpdateSettingsRequest},
};

#[derive(Clone)]
pub struct SettingsService {
    repo: SettingsRepository,
    pool: PgPool,
}

impl SettingsService {
    pub fn new(repo: SettingsRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn get(&self) -> Result<AppSettings, AppError> {
        self.repo.get_settings(&self.pool).await
    }

    pub async fn update(&self, input: &UpdateSettingsRequest) -> Result<AppSettings, AppError> {
        let settings = self.repo.update_settings(&self.pool, input).await?;
        tracing::info!("⚙️ Configurações atualizadas");
        Ok(settings)
    }
}
