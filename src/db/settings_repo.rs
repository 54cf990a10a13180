// src/db/settings_repo.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    models::settings::{AppSettings, UpdateSettingsRequest},
};

const SETTINGS_COLUMNS: &str = r#"
    service_list, payment_modes, business_name, tagline, email, phone,
    website, address, upi_id, updated_at
"#;

#[derive(Clone, Default)]
pub struct SettingsRepository;

impl SettingsRepository {
    pub fn new() -> Self {
        Self
    }

    /// Sem linha gravada, devolve os padrões.
    pub async fn get_settings<'e, E>(&self, executor: E) -> Result<AppSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {SETTINGS_COLUMNS} FROM settings WHERE id = TRUE");
        let settings = sqlx::query_as::<_, AppSettings>(&sql)
            .fetch_optional(executor)
            .await?;

        Ok(settings.unwrap_or_default())
    }

    pub async fn update_settings<'e, E>(
        &self,
        executor: E,
        input: &UpdateSettingsRequest,
    ) -> Result<AppSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // UPSERT (Insert or Update) na linha única
        let sql = format!(
            r#"
            INSERT INTO settings (
                id, service_list, payment_modes, business_name, tagline,
                email, phone, website, address, upi_id
            )
            VALUES (TRUE, $1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id)
            DO UPDATE SET
                service_list = EXCLUDED.service_list,
                payment_modes = EXCLUDED.payment_modes,
                business_name = EXCLUDED.business_name,
                tagline = EXCLUDED.tagline,
                email = EXCLUDED.email,
                phone = EXCLUDED.phone,
                website = EXCLUDED.website,
                address = EXCLUDED.address,
                upi_id = EXCLUDED.upi_id,
                updated_at = NOW()
            RETURNING {SETTINGS_COLUMNS}
            "#
        );

        let settings = sqlx::query_as::<_, AppSettings>(&sql)
            .bind(&input.service_list)
            .bind(&input.payment_modes)
            .bind(&input.business_name)
            .bind(&input.tagline)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.website)
            .bind(&input.address)
            .bind(&input.upi_id)
            .fetch_one(executor)
            .await?;

        Ok(settings)
    }
}
