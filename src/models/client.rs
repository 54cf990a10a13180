// src/models/client.rs

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::listing::{any_contains_ci, cmp_ci, SortDirection},
    models::project::{Project, ProjectStatus},
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,

    #[schema(example = "Priya Sharma")]
    pub name: String,

    #[schema(example = "Sharma Textiles")]
    pub company: Option<String>,

    #[schema(example = "priya@sharmatextiles.in")]
    pub email: String,

    #[schema(example = "accounts@sharmatextiles.in")]
    pub company_email: Option<String>,

    #[schema(example = "+91 98765 43210")]
    pub phone: Option<String>,

    #[schema(example = "India")]
    pub country: Option<String>,

    #[schema(example = "UPI")]
    pub payment_mode: Option<String>,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Busca livre sobre nome, e-mail, empresa e telefone.
    pub fn matches(&self, term: &str) -> bool {
        any_contains_ci(
            &[
                Some(self.name.as_str()),
                Some(self.email.as_str()),
                self.company.as_deref(),
                self.phone.as_deref(),
            ],
            term,
        )
    }
}

// Payload de criação/edição (o formulário manda tudo de uma vez)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Priya Sharma")]
    pub name: String,

    pub company: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "priya@sharmatextiles.in")]
    pub email: String,

    #[validate(email(message = "O e-mail da empresa é inválido."))]
    pub company_email: Option<String>,

    pub phone: Option<String>,
    pub country: Option<String>,
    pub payment_mode: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClientSortKey {
    Name,
    #[default]
    CreatedAt,
}

impl ClientSortKey {
    pub fn compare(self, a: &Client, b: &Client) -> Ordering {
        match self {
            ClientSortKey::Name => cmp_ci(&a.name, &b.name),
            ClientSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientListQuery {
    pub search: Option<String>,
    pub sort: Option<ClientSortKey>,
    pub direction: Option<SortDirection>,
}

/// Filtra e ordena em memória. A ordenação é estável.
pub fn filter_and_sort_clients(mut clients: Vec<Client>, query: &ClientListQuery) -> Vec<Client> {
    if let Some(term) = query.search.as_deref() {
        clients.retain(|c| c.matches(term));
    }

    // Padrão: mais recentes primeiro
    let (key, direction) = match (query.sort, query.direction) {
        (None, None) => (ClientSortKey::CreatedAt, SortDirection::Desc),
        (key, direction) => (key.unwrap_or_default(), direction.unwrap_or_default()),
    };
    clients.sort_by(|a, b| direction.apply(key.compare(a, b)));
    clients
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientStats {
    pub total_projects: usize,
    pub completed_projects: usize,
    pub active_projects: usize,
    #[schema(value_type = f64)]
    pub total_revenue: Decimal,
    #[schema(value_type = f64)]
    pub total_paid: Decimal,
    #[schema(value_type = f64)]
    pub total_remaining: Decimal,
}

impl ClientStats {
    pub fn from_projects(projects: &[Project]) -> Self {
        let count = |status: ProjectStatus| projects.iter().filter(|p| p.status == status).count();

        Self {
            total_projects: projects.len(),
            completed_projects: count(ProjectStatus::Completed),
            active_projects: count(ProjectStatus::InProgress),
            total_revenue: projects.iter().map(|p| p.total_amount).sum(),
            total_paid: projects.iter().map(|p| p.paid_amount).sum(),
            total_remaining: projects.iter().map(|p| p.remaining_amount).sum(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetail {
    pub client: Client,
    pub projects: Vec<Project>,
    pub stats: ClientStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::tests::sample_project;
    use chrono::TimeZone;

    fn client(name: &str, email: &str, company: Option<&str>, day: u32) -> Client {
        let at = Utc.with_ymd_and_hms(2024, 1, day, 10, 0, 0).unwrap();
        Client {
            id: Uuid::new_v4(),
            name: name.into(),
            company: company.map(Into::into),
            email: email.into(),
            company_email: None,
            phone: Some("+91 90000 00000".into()),
            country: Some("India".into()),
            payment_mode: Some("UPI".into()),
            notes: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn search_covers_company_and_phone() {
        let c = client("Ravi", "ravi@mail.com", Some("Kite Labs"), 1);
        assert!(c.matches("kite"));
        assert!(c.matches("90000"));
        assert!(!c.matches("globex"));
    }

    #[test]
    fn default_order_is_newest_first() {
        let list = vec![
            client("A", "a@x.io", None, 1),
            client("B", "b@x.io", None, 3),
            client("C", "c@x.io", None, 2),
        ];
        let sorted = filter_and_sort_clients(list, &ClientListQuery::default());
        let names: Vec<_> = sorted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["B", "C", "A"]);
    }

    #[test]
    fn sorts_by_name_ignoring_case() {
        let list = vec![client("zeta", "z@x.io", None, 1), client("Alpha", "a@x.io", None, 2)];
        let query = ClientListQuery { search: None, sort: Some(ClientSortKey::Name), direction: None };
        let sorted = filter_and_sort_clients(list, &query);
        assert_eq!(sorted[0].name, "Alpha");
    }

    #[test]
    fn stats_sum_project_amounts() {
        let mut done = sample_project("Site", 1000, 1000);
        done.status = ProjectStatus::Completed;
        let mut running = sample_project("App", 4000, 1000);
        running.status = ProjectStatus::InProgress;
        let planned = sample_project("Logo", 500, 0);

        let stats = ClientStats::from_projects(&[done, running, planned]);
        assert_eq!(stats.total_projects, 3);
        assert_eq!(stats.completed_projects, 1);
        assert_eq!(stats.active_projects, 1);
        assert_eq!(stats.total_revenue, Decimal::from(5500));
        assert_eq!(stats.total_paid, Decimal::from(2000));
        assert_eq!(stats.total_remaining, Decimal::from(3500));
    }
}
