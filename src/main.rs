//src/main.rs

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;
mod storage;

use crate::common::resource_path::MAX_UPLOAD_BYTES;
use crate::config::{AppState, Config};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

// Folga para os outros campos do multipart além do arquivo
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas
    let public_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/auth/login", post(handlers::auth::login));

    // Tudo abaixo exige o token do operador
    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::auth::get_me))
        .route("/dashboard", get(handlers::dashboard::get_summary))
        .route("/activity", get(handlers::activity::list_activity))
        .route("/currencies", get(handlers::currencies::list_currencies))
        .route(
            "/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        // Clientes
        .route(
            "/clients",
            post(handlers::clients::create_client).get(handlers::clients::list_clients),
        )
        .route(
            "/clients/{id}",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        )
        // Projetos e recursos
        .route(
            "/projects",
            post(handlers::projects::create_project).get(handlers::projects::list_projects),
        )
        .route(
            "/projects/{id}",
            get(handlers::projects::get_project)
                .put(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        )
        .route(
            "/projects/{id}/resources/links",
            post(handlers::projects::add_link_resource),
        )
        .route(
            "/projects/{id}/resources/files",
            post(handlers::projects::upload_file_resource)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/projects/{id}/resources/{resource_id}",
            delete(handlers::projects::delete_resource),
        )
        .route("/projects/{id}/files", get(handlers::projects::list_project_files))
        // Faturas
        .route(
            "/projects/{id}/invoices",
            post(handlers::invoices::create_invoice).get(handlers::invoices::list_project_invoices),
        )
        .route("/invoices", get(handlers::invoices::list_invoices))
        .route(
            "/invoices/{id}",
            get(handlers::invoices::get_invoice)
                .put(handlers::invoices::update_invoice)
                .delete(handlers::invoices::delete_invoice),
        )
        .route("/invoices/{id}/status", patch(handlers::invoices::update_invoice_status))
        .route("/invoices/{id}/pdf", get(handlers::documents::download_invoice_pdf))
        // Navegador do banco
        .route("/database", get(handlers::database::list_tables))
        .route("/database/{table}", get(handlers::database::browse_table))
        .route("/database/{table}/export", get(handlers::database::export_table))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .route("/files/{*path}", get(handlers::files::serve_file))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
