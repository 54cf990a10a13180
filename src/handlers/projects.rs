// src/handlers/projects.rs

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        resource_path::MAX_UPLOAD_BYTES,
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::project::{
        LinkResourcePayload, Project, ProjectDetail, ProjectFile, ProjectListQuery, ProjectPayload,
    },
    services::project_service::UploadedFile,
};

// =============================================================================
//  ÁREA 1: PROJETOS
// =============================================================================

// POST /api/projects
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Projects",
    request_body = ProjectPayload,
    responses(
        (status = 201, description = "Projeto criado", body = Project),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_project(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(operator): AuthenticatedUser,
    Json(payload): Json<ProjectPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate_all()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let project = app_state
        .project_service
        .create(&payload, &operator.email)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(project)))
}

// GET /api/projects
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Projects",
    params(
        ("client_id" = Option<Uuid>, Query, description = "Filtra por cliente"),
        ("status" = Option<String>, Query, description = "planned | in_progress | completed | on_hold | cancelled"),
        ("search" = Option<String>, Query, description = "Título ou descrição"),
        ("sort" = Option<String>, Query, description = "created_at | start_date | end_date | total_amount | paid_amount | remaining_amount | title"),
        ("direction" = Option<String>, Query, description = "asc | desc")
    ),
    responses(
        (status = 200, description = "Lista de projetos", body = Vec<Project>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_projects(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ProjectListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let projects = app_state
        .project_service
        .list(&query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(projects)))
}

// GET /api/projects/{id}
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 200, description = "Projeto com cliente, pagamentos e faturas", body = ProjectDetail),
        (status = 404, description = "Projeto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_project(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .project_service
        .detail(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

// PUT /api/projects/{id}
#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "ID do projeto")),
    request_body = ProjectPayload,
    responses(
        (status = 200, description = "Projeto atualizado", body = Project),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Projeto ou cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_project(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(operator): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProjectPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate_all()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let project = app_state
        .project_service
        .update(id, &payload, &operator.email)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(project)))
}

// DELETE /api/projects/{id}
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 204, description = "Projeto removido"),
        (status = 404, description = "Projeto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_project(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(operator): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .project_service
        .delete(id, &operator.email)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 2: RECURSOS
// =============================================================================

// POST /api/projects/{id}/resources/links
#[utoipa::path(
    post,
    path = "/api/projects/{id}/resources/links",
    tag = "Resources",
    params(("id" = Uuid, Path, description = "ID do projeto")),
    request_body = LinkResourcePayload,
    responses(
        (status = 201, description = "Link anexado", body = Project),
        (status = 400, description = "URL inválida"),
        (status = 404, description = "Projeto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_link_resource(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(operator): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<LinkResourcePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let project = app_state
        .project_service
        .add_link(id, payload, &operator.email)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(project)))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge(MAX_UPLOAD_BYTES + 1)
    } else {
        AppError::InvalidUpload(e.body_text())
    }
}

// Descarta qualquer diretório que o navegador mande junto do nome
fn base_file_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Lê os campos "file" e "title" do multipart.
async fn read_upload(mut multipart: Multipart) -> Result<(Option<String>, UploadedFile), AppError> {
    let mut title = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("title") => {
                title = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(|n| base_file_name(n).to_string())
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| AppError::InvalidUpload("arquivo sem nome".into()))?;
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?.to_vec();

                file = Some(UploadedFile { file_name, content_type, bytes });
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::InvalidUpload("campo 'file' ausente".into()))?;
    Ok((title, file))
}

// POST /api/projects/{id}/resources/files
#[utoipa::path(
    post,
    path = "/api/projects/{id}/resources/files",
    tag = "Resources",
    params(("id" = Uuid, Path, description = "ID do projeto")),
    request_body(content_type = "multipart/form-data", description = "Campos: file (obrigatório), title (opcional)"),
    responses(
        (status = 201, description = "Arquivo enviado e anexado", body = Project),
        (status = 400, description = "Tipo de arquivo não permitido"),
        (status = 409, description = "Arquivo já existe"),
        (status = 413, description = "Arquivo maior que 10MB")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_file_resource(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(operator): AuthenticatedUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (title, file) = read_upload(multipart)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let project = app_state
        .project_service
        .upload_file(id, title, file, &operator.email)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(project)))
}

// DELETE /api/projects/{id}/resources/{resource_id}
#[utoipa::path(
    delete,
    path = "/api/projects/{id}/resources/{resource_id}",
    tag = "Resources",
    params(
        ("id" = Uuid, Path, description = "ID do projeto"),
        ("resource_id" = Uuid, Path, description = "ID do recurso")
    ),
    responses(
        (status = 200, description = "Recurso removido", body = Project),
        (status = 404, description = "Projeto ou recurso não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_resource(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(operator): AuthenticatedUser,
    Path((id, resource_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let project = app_state
        .project_service
        .remove_resource(id, resource_id, &operator.email)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(project)))
}

// GET /api/projects/{id}/files
#[utoipa::path(
    get,
    path = "/api/projects/{id}/files",
    tag = "Resources",
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 200, description = "Arquivos da pasta do projeto no bucket", body = Vec<ProjectFile>),
        (status = 404, description = "Projeto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_project_files(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let files = app_state
        .project_service
        .list_files(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(files)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::FromRequest, http::Request};

    const BOUNDARY: &str = "XBOUNDARY";

    // Monta um multipart/form-data a partir de (cabeçalho Content-Disposition, content-type, corpo)
    async fn multipart(parts: &[(&str, Option<&str>, &str)]) -> Multipart {
        let mut body = String::new();
        for (disposition, content_type, value) in parts {
            body.push_str(&format!("--{}\r\nContent-Disposition: form-data; {}\r\n", BOUNDARY, disposition));
            if let Some(ct) = content_type {
                body.push_str(&format!("Content-Type: {}\r\n", ct));
            }
            body.push_str(&format!("\r\n{}\r\n", value));
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));

        let request = Request::builder()
            .method("POST")
            .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY))
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn reads_title_and_file() {
        let form = multipart(&[
            (r#"name="title""#, None, "Briefing"),
            (r#"name="file"; filename="brief.pdf""#, Some("application/pdf"), "%PDF-1.4"),
        ])
        .await;

        let (title, file) = read_upload(form).await.unwrap();
        assert_eq!(title.as_deref(), Some("Briefing"));
        assert_eq!(file.file_name, "brief.pdf");
        assert_eq!(file.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(file.bytes, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn title_is_optional() {
        let form = multipart(&[(r#"name="file"; filename="notes.txt""#, None, "oi")]).await;

        let (title, file) = read_upload(form).await.unwrap();
        assert!(title.is_none());
        assert_eq!(file.file_name, "notes.txt");
        assert!(file.content_type.is_none());
    }

    #[tokio::test]
    async fn missing_file_field_is_rejected() {
        let form = multipart(&[(r#"name="title""#, None, "Só o título")]).await;

        let err = read_upload(form).await.err().unwrap();
        assert!(matches!(err, AppError::InvalidUpload(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn file_without_name_is_rejected() {
        let form = multipart(&[(r#"name="file""#, Some("application/pdf"), "%PDF-1.4")]).await;

        let err = read_upload(form).await.err().unwrap();
        assert!(matches!(err, AppError::InvalidUpload(msg) if msg == "arquivo sem nome"));
    }

    #[test]
    fn strips_client_side_directories() {
        assert_eq!(base_file_name("C:\\Users\\me\\brief.pdf"), "brief.pdf");
        assert_eq!(base_file_name("docs/brief.pdf"), "brief.pdf");
        assert_eq!(base_file_name("brief.pdf"), "brief.pdf");
    }
}
