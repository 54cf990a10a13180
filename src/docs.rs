// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::common;
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Dashboard / Atividade ---
        handlers::dashboard::get_summary,
        handlers::activity::list_activity,

        // --- Clients ---
        handlers::clients::create_client,
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,

        // --- Projects ---
        handlers::projects::create_project,
        handlers::projects::list_projects,
        handlers::projects::get_project,
        handlers::projects::update_project,
        handlers::projects::delete_project,

        // --- Resources ---
        handlers::projects::add_link_resource,
        handlers::projects::upload_file_resource,
        handlers::projects::delete_resource,
        handlers::projects::list_project_files,

        // --- Invoices ---
        handlers::invoices::create_invoice,
        handlers::invoices::list_project_invoices,
        handlers::invoices::list_invoices,
        handlers::invoices::get_invoice,
        handlers::invoices::update_invoice,
        handlers::invoices::update_invoice_status,
        handlers::invoices::delete_invoice,
        handlers::documents::download_invoice_pdf,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,
        handlers::currencies::list_currencies,

        // --- Database ---
        handlers::database::list_tables,
        handlers::database::browse_table,
        handlers::database::export_table,
    ),
    components(
        schemas(
            // --- Comum ---
            common::currency::Currency,
            common::currency::CurrencyInfo,
            common::listing::SortDirection,
            common::payments::PaymentSummary,
            common::data_table::Column,

            // --- Auth ---
            models::auth::Operator,
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Dashboard / Atividade ---
            models::dashboard::DashboardSummary,
            models::activity::ActivityEntity,
            models::activity::ActivityAction,
            models::activity::ActivityLog,

            // --- Clients ---
            models::client::Client,
            models::client::ClientPayload,
            models::client::ClientSortKey,
            models::client::ClientStats,
            models::client::ClientDetail,

            // --- Projects ---
            models::project::ProjectStatus,
            models::project::ResourceKind,
            models::project::Resource,
            models::project::Project,
            models::project::ProjectPayload,
            models::project::LinkResourcePayload,
            models::project::ProjectSortKey,
            models::project::ProjectDetail,
            models::project::ProjectFile,

            // --- Invoices ---
            models::invoice::InvoiceType,
            models::invoice::InvoiceStatus,
            models::invoice::InvoiceLineItem,
            models::invoice::Invoice,
            models::invoice::InvoicePayload,
            models::invoice::InvoiceStatusPayload,

            // --- Settings ---
            models::settings::AppSettings,
            models::settings::UpdateSettingsRequest,

            // --- Database ---
            services::database_service::TableCount,
            services::database_service::TableView,
        )
    ),
    tags(
        (name = "Auth", description = "Login do operador"),
        (name = "Dashboard", description = "Indicadores do painel"),
        (name = "Activity", description = "Histórico de alterações"),
        (name = "Clients", description = "Gestão de Clientes"),
        (name = "Projects", description = "Projetos e pagamentos"),
        (name = "Resources", description = "Links e arquivos anexados aos projetos"),
        (name = "Invoices", description = "Faturas por projeto"),
        (name = "Documents", description = "Geração de PDFs"),
        (name = "Settings", description = "Dados do negócio e listas configuráveis"),
        (name = "Currencies", description = "Moedas suportadas"),
        (name = "Database", description = "Navegador de tabelas e exportação CSV")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
