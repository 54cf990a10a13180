// src/models/project.rs

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    common::{
        currency::Currency,
        listing::{any_contains_ci, cmp_ci, SortDirection},
        payments::PaymentSummary,
    },
    models::{client::Client, invoice::Invoice},
};

// --- ENUMS ---

// Mapeia o CREATE TYPE project_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    OnHold,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Uploaded,
    Link,
}

// --- RECURSOS (guardados como JSONB dentro do projeto) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: Uuid,

    #[schema(example = "Contrato assinado")]
    pub title: String,

    #[schema(example = "https://drive.google.com/file/d/abc")]
    pub url: String,

    #[serde(rename = "type")]
    pub kind: ResourceKind,

    #[serde(default)]
    pub note: String,

    // Só para uploads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl Resource {
    pub fn link(title: String, url: String, note: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            url,
            kind: ResourceKind::Link,
            note: note.unwrap_or_default(),
            uploaded_file_path: None,
            size: None,
            content_type: None,
            uploaded_at: None,
        }
    }

    /// De onde vem o link, só para exibição.
    pub fn link_kind(&self) -> &'static str {
        link_kind(&self.url)
    }
}

pub fn link_kind(url: &str) -> &'static str {
    let url = url.to_lowercase();
    if url.contains("drive.google.com") {
        "Google Drive"
    } else if url.contains("dropbox.com") {
        "Dropbox"
    } else if url.contains("onedrive.live.com") {
        "OneDrive"
    } else if url.contains("github.com") {
        "GitHub"
    } else {
        "External Link"
    }
}

// --- PROJETO ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,

    #[schema(example = "Site institucional")]
    pub title: String,

    pub client_id: Uuid,

    pub description: Option<String>,

    #[schema(example = json!(["Website development", "SEO optimisation"]))]
    pub services: Vec<String>,

    pub status: ProjectStatus,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    pub currency: Currency,

    #[schema(value_type = f64, example = 50000.0)]
    pub total_amount: Decimal,

    #[schema(value_type = f64, example = 20000.0)]
    pub paid_amount: Decimal,

    // Coluna gerada pelo banco: GREATEST(total - pago, 0)
    #[schema(value_type = f64, example = 30000.0)]
    pub remaining_amount: Decimal,

    // Valor efetivamente recebido, convertido para INR
    #[schema(value_type = Option<f64>)]
    pub actual_received_amount: Option<Decimal>,

    pub notes: Option<String>,

    #[sqlx(json)]
    pub resources: Vec<Resource>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn payment_summary(&self) -> PaymentSummary {
        PaymentSummary::new(self.total_amount, self.paid_amount)
    }

    /// Busca livre sobre título e descrição.
    pub fn matches(&self, term: &str) -> bool {
        any_contains_ci(&[Some(self.title.as_str()), self.description.as_deref()], term)
    }
}

/// Caminhos no bucket dos arquivos enviados. Links ficam de fora.
pub fn uploaded_paths(projects: &[Project]) -> Vec<String> {
    projects
        .iter()
        .flat_map(|p| p.resources.iter())
        .filter(|r| r.kind == ResourceKind::Uploaded)
        .filter_map(|r| r.uploaded_file_path.clone())
        .collect()
}

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    #[schema(example = "Site institucional")]
    pub title: String,

    pub client_id: Uuid,

    pub description: Option<String>,

    #[serde(default)]
    pub services: Vec<String>,

    #[serde(default)]
    pub status: ProjectStatus,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    pub currency: Option<Currency>,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    #[schema(value_type = f64, example = 50000.0)]
    pub total_amount: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    #[schema(value_type = f64, example = 20000.0)]
    pub paid_amount: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = Option<f64>)]
    pub actual_received_amount: Option<Decimal>,

    pub notes: Option<String>,
}

impl ProjectPayload {
    /// A data final não pode vir antes da inicial.
    pub fn validate_dates(&self) -> Result<(), ValidationError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                let mut err = ValidationError::new("date_order");
                err.message = Some("A data final deve ser posterior à inicial.".into());
                return Err(err);
            }
        }
        Ok(())
    }

    /// Validação dos campos + ordem das datas.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        self.validate_dates().map_err(|err| {
            let mut errors = ValidationErrors::new();
            errors.add("endDate", err);
            errors
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkResourcePayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    #[schema(example = "Figma")]
    pub title: String,

    #[validate(url(message = "Informe uma URL válida."))]
    #[schema(example = "https://www.figma.com/file/xyz")]
    pub url: String,

    pub note: Option<String>,
}

// --- LISTAGEM ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSortKey {
    #[default]
    CreatedAt,
    StartDate,
    EndDate,
    TotalAmount,
    PaidAmount,
    RemainingAmount,
    Title,
}

impl ProjectSortKey {
    pub fn compare(self, a: &Project, b: &Project) -> Ordering {
        match self {
            ProjectSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            // None < Some: projetos sem data vêm primeiro no ascendente
            ProjectSortKey::StartDate => a.start_date.cmp(&b.start_date),
            ProjectSortKey::EndDate => a.end_date.cmp(&b.end_date),
            ProjectSortKey::TotalAmount => a.total_amount.cmp(&b.total_amount),
            ProjectSortKey::PaidAmount => a.paid_amount.cmp(&b.paid_amount),
            ProjectSortKey::RemainingAmount => a.remaining_amount.cmp(&b.remaining_amount),
            ProjectSortKey::Title => cmp_ci(&a.title, &b.title),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListQuery {
    #[serde(alias = "client_id")]
    pub client_id: Option<Uuid>,
    pub status: Option<ProjectStatus>,
    pub search: Option<String>,
    pub sort: Option<ProjectSortKey>,
    pub direction: Option<SortDirection>,
}

pub fn filter_and_sort_projects(mut projects: Vec<Project>, query: &ProjectListQuery) -> Vec<Project> {
    if let Some(term) = query.search.as_deref() {
        projects.retain(|p| p.matches(term));
    }

    let (key, direction) = match (query.sort, query.direction) {
        (None, None) => (ProjectSortKey::CreatedAt, SortDirection::Desc),
        (key, direction) => (key.unwrap_or_default(), direction.unwrap_or_default()),
    };
    projects.sort_by(|a, b| direction.apply(key.compare(a, b)));
    projects
}

// --- DETALHE ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub project: Project,
    pub client: Client,
    pub payment: PaymentSummary,
    pub invoices: Vec<Invoice>,
}

/// Arquivo listado diretamente do bucket
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub updated_at: Option<DateTime<Utc>>,
    pub public_url: String,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn sample_project(title: &str, total: i64, paid: i64) -> Project {
        let total = Decimal::from(total);
        let paid = Decimal::from(paid);
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        Project {
            id: Uuid::new_v4(),
            title: title.into(),
            client_id: Uuid::nil(),
            description: None,
            services: vec!["Website development".into()],
            status: ProjectStatus::Planned,
            start_date: None,
            end_date: None,
            currency: Currency::Inr,
            total_amount: total,
            paid_amount: paid,
            remaining_amount: crate::common::payments::remaining_amount(total, paid),
            actual_received_amount: None,
            notes: None,
            resources: Vec::new(),
            created_at: at,
            updated_at: at,
        }
    }

    pub(crate) fn uploaded(title: &str, path: &str) -> Resource {
        Resource {
            kind: ResourceKind::Uploaded,
            uploaded_file_path: Some(path.into()),
            ..Resource::link(title.into(), format!("http://localhost:3000/files/{}", path), None)
        }
    }

    #[test]
    fn uploaded_paths_skip_links() {
        let mut site = sample_project("Site", 1, 0);
        site.resources = vec![
            uploaded("Brief", "website_acme_2024_03_01/1_brief.pdf"),
            Resource::link("Repo".into(), "https://github.com/a/b".into(), None),
        ];
        let mut logo = sample_project("Logo", 1, 0);
        logo.resources = vec![uploaded("Logo", "ui_ux_design_acme_2024_03_02/2_logo.png")];

        assert_eq!(
            uploaded_paths(&[site, logo]),
            vec![
                "website_acme_2024_03_01/1_brief.pdf".to_string(),
                "ui_ux_design_acme_2024_03_02/2_logo.png".to_string()
            ]
        );
        assert!(uploaded_paths(&[sample_project("Vazio", 1, 0)]).is_empty());
    }

    #[test]
    fn detects_link_kind() {
        assert_eq!(link_kind("https://drive.google.com/file/d/1"), "Google Drive");
        assert_eq!(link_kind("https://www.Dropbox.com/s/x"), "Dropbox");
        assert_eq!(link_kind("https://github.com/acme/site"), "GitHub");
        assert_eq!(link_kind("https://figma.com/file/1"), "External Link");
    }

    #[test]
    fn resource_serializes_type_field() {
        let r = Resource::link("Repo".into(), "https://github.com/a/b".into(), None);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["type"], "link");
        assert_eq!(json["note"], "");
        assert!(json.get("uploadedFilePath").is_none());
    }

    #[test]
    fn search_uses_title_and_description() {
        let mut p = sample_project("Loja virtual", 1, 0);
        p.description = Some("Checkout com UPI".into());
        assert!(p.matches("LOJA"));
        assert!(p.matches("upi"));
        assert!(!p.matches("logo"));
    }

    #[test]
    fn sorts_by_remaining_amount() {
        let list = vec![
            sample_project("a", 1000, 100),
            sample_project("b", 1000, 900),
            sample_project("c", 1000, 500),
        ];
        let query = ProjectListQuery {
            sort: Some(ProjectSortKey::RemainingAmount),
            direction: Some(SortDirection::Desc),
            ..Default::default()
        };
        let titles: Vec<_> = filter_and_sort_projects(list, &query).into_iter().map(|p| p.title).collect();
        assert_eq!(titles, ["a", "c", "b"]);
    }

    #[test]
    fn undated_projects_sort_first_ascending() {
        let mut dated = sample_project("dated", 1, 0);
        dated.start_date = NaiveDate::from_ymd_opt(2024, 2, 1);
        let undated = sample_project("undated", 1, 0);

        let query = ProjectListQuery { sort: Some(ProjectSortKey::StartDate), ..Default::default() };
        let sorted = filter_and_sort_projects(vec![dated, undated], &query);
        assert_eq!(sorted[0].title, "undated");
    }

    #[test]
    fn end_before_start_is_rejected() {
        let payload = ProjectPayload {
            title: "x".into(),
            client_id: Uuid::nil(),
            description: None,
            services: vec![],
            status: ProjectStatus::Planned,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 10),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            currency: None,
            total_amount: Decimal::ZERO,
            paid_amount: Decimal::ZERO,
            actual_received_amount: None,
            notes: None,
        };
        assert!(payload.validate_dates().is_err());
        let errors = payload.validate_all().unwrap_err();
        assert!(errors.field_errors().contains_key("endDate"));
    }

    #[test]
    fn negative_amount_fails_validation() {
        let payload: ProjectPayload = serde_json::from_value(serde_json::json!({
            "title": "x",
            "clientId": Uuid::nil(),
            "totalAmount": -5.0
        }))
        .unwrap();
        assert!(payload.validate().is_err());
    }
}
