// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{anyhow, Context};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::{currency::Currency, i18n::I18nStore},
    db::{ActivityRepository, ClientRepository, InvoiceRepository, ProjectRepository, SettingsRepository},
    models::auth::Operator,
    services::{
        activity_service::ActivityService, auth::AuthService, client_service::ClientService,
        dashboard_service::DashboardService, database_service::DatabaseService,
        document_service::DocumentService, invoice_service::InvoiceService,
        project_service::ProjectService, settings_service::SettingsService,
    },
    storage::{LocalBucket, ObjectStorage},
};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub operator_email: String,
    pub operator_password_hash: String,
    pub operator_name: String,
    pub bind_addr: String,
    pub storage_root: PathBuf,
    pub storage_bucket: String,
    pub storage_public_url: String,
    pub fonts_dir: PathBuf,
    pub pdf_font_family: String,
    pub default_currency: Currency,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de qualquer fonte chave -> valor.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("{} deve ser definida", key))
        };
        let optional = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let default_currency = optional("DEFAULT_CURRENCY", "INR")
            .parse::<Currency>()
            .context("DEFAULT_CURRENCY inválida")?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            operator_email: required("OPERATOR_EMAIL")?,
            operator_password_hash: required("OPERATOR_PASSWORD_HASH")?,
            operator_name: optional("OPERATOR_NAME", "Operator"),
            bind_addr: optional("BIND_ADDR", "0.0.0.0:3000"),
            storage_root: optional("STORAGE_ROOT", "./storage").into(),
            storage_bucket: optional("STORAGE_BUCKET", "project-resources"),
            storage_public_url: optional("STORAGE_PUBLIC_URL", "http://localhost:3000/files"),
            fonts_dir: optional("FONTS_DIR", "./fonts").into(),
            pdf_font_family: optional("PDF_FONT_FAMILY", "Roboto"),
            default_currency,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: I18nStore,
    pub storage: Arc<dyn ObjectStorage>,
    pub auth_service: AuthService,
    pub activity_service: ActivityService,
    pub client_service: ClientService,
    pub project_service: ProjectService,
    pub invoice_service: InvoiceService,
    pub document_service: DocumentService,
    pub dashboard_service: DashboardService,
    pub settings_service: SettingsService,
    pub database_service: DatabaseService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let storage: Arc<dyn ObjectStorage> = Arc::new(LocalBucket::new(
            &config.storage_root,
            &config.storage_bucket,
            &config.storage_public_url,
        ));

        // --- Monta o gráfico de dependências ---
        let client_repo = ClientRepository::new();
        let project_repo = ProjectRepository::new();
        let invoice_repo = InvoiceRepository::new();
        let activity_repo = ActivityRepository::new();
        let settings_repo = SettingsRepository::new();

        let auth_service = AuthService::new(
            Operator { email: config.operator_email.clone(), name: config.operator_name.clone() },
            config.operator_password_hash.clone(),
            config.jwt_secret.clone(),
        );
        let activity_service = ActivityService::new(activity_repo.clone(), db_pool.clone());

        let client_service = ClientService::new(
            client_repo.clone(),
            project_repo.clone(),
            activity_service.clone(),
            storage.clone(),
            db_pool.clone(),
        );
        let project_service = ProjectService::new(
            project_repo.clone(),
            client_repo.clone(),
            invoice_repo.clone(),
            activity_service.clone(),
            storage.clone(),
            db_pool.clone(),
            config.default_currency,
        );
        let invoice_service = InvoiceService::new(
            invoice_repo.clone(),
            project_repo.clone(),
            activity_service.clone(),
            db_pool.clone(),
        );
        let document_service = DocumentService::new(
            invoice_repo.clone(),
            project_repo.clone(),
            client_repo.clone(),
            settings_repo.clone(),
            db_pool.clone(),
            config.fonts_dir.clone(),
            config.pdf_font_family.clone(),
        );
        let dashboard_service = DashboardService::new(
            client_repo.clone(),
            project_repo.clone(),
            activity_repo,
            db_pool.clone(),
        );
        let settings_service = SettingsService::new(settings_repo, db_pool.clone());
        let database_service = DatabaseService::new(client_repo, project_repo, invoice_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            i18n_store: I18nStore::new(),
            storage,
            auth_service,
            activity_service,
            client_service,
            project_service,
            invoice_service,
            document_service,
            dashboard_service,
            settings_service,
            database_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("DATABASE_URL", "postgres://localhost/backoffice"),
        ("JWT_SECRET", "secret"),
        ("OPERATOR_EMAIL", "me@studio.dev"),
        ("OPERATOR_PASSWORD_HASH", "$2b$04$abc"),
    ];

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.storage_bucket, "project-resources");
        assert_eq!(config.default_currency, Currency::Inr);
        assert_eq!(config.pdf_font_family, "Roboto");
    }

    #[test]
    fn missing_required_names_the_variable() {
        let err = Config::from_lookup(lookup(&REQUIRED[..3])).unwrap_err();
        assert!(err.to_string().contains("OPERATOR_PASSWORD_HASH"));
    }

    #[test]
    fn invalid_currency_is_an_error() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DEFAULT_CURRENCY", "XYZ"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DEFAULT_CURRENCY", "usd"));
        assert_eq!(Config::from_lookup(lookup(&pairs)).unwrap().default_currency, Currency::Usd);
    }
}
