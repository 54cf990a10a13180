// src/services/database_service.rs
//
// Visão de "banco de dados" do painel: tabelas cruas com busca, ordenação e CSV.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::{
        data_table::{self, Column, TableSpec, ALL_TABLES},
        error::AppError,
        listing::SortDirection,
    },
    db::{ClientRepository, InvoiceRepository, ProjectRepository},
};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TableQuery {
    /// Termo buscado em qualquer coluna
    pub search: Option<String>,
    /// Chave da coluna (ex.: totalAmount)
    pub sort: Option<String>,
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableCount {
    pub name: String,
    pub title: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub name: String,
    pub title: String,
    pub columns: Vec<Column>,
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<Value>,
}

/// Aplica busca e ordenação. O CSV exporta exatamente este resultado.
pub fn visible_rows(spec: &TableSpec, rows: Vec<Value>, query: &TableQuery) -> Vec<Value> {
    let mut rows = data_table::filter_rows(spec.columns, rows, query.search.as_deref().unwrap_or(""));
    data_table::sort_rows(&mut rows, query.sort.as_deref(), query.direction.unwrap_or_default());
    rows
}

#[derive(Clone)]
pub struct DatabaseService {
    client_repo: ClientRepository,
    project_repo: ProjectRepository,
    invoice_repo: InvoiceRepository,
    pool: PgPool,
}

impl DatabaseService {
    pub fn new(
        client_repo: ClientRepository,
        project_repo: ProjectRepository,
        invoice_repo: InvoiceRepository,
        pool: PgPool,
    ) -> Self {
        Self { client_repo, project_repo, invoice_repo, pool }
    }

    pub async fn counts(&self) -> Result<Vec<TableCount>, AppError> {
        let (clients, projects, invoices) = tokio::try_join!(
            self.client_repo.count(&self.pool),
            self.project_repo.count(&self.pool),
            self.invoice_repo.count(&self.pool),
        )?;

        Ok(ALL_TABLES
            .iter()
            .zip([clients, projects, invoices])
            .map(|(spec, count)| TableCount {
                name: spec.name.to_string(),
                title: spec.title.to_string(),
                count,
            })
            .collect())
    }

    async fn raw_rows(&self, spec: &TableSpec) -> Result<Vec<Value>, AppError> {
        let rows = match spec.name {
            "clients" => to_rows(self.client_repo.list(&self.pool).await?)?,
            "projects" => {
                let (projects, clients) = tokio::try_join!(
                    self.project_repo.list(&self.pool, None, None),
                    self.client_repo.list(&self.pool),
                )?;
                let names: HashMap<Uuid, String> = clients.into_iter().map(|c| (c.id, c.name)).collect();

                let mut rows = Vec::with_capacity(projects.len());
                for project in projects {
                    let client_name = names.get(&project.client_id).cloned();
                    let mut row = serde_json::to_value(project).map_err(anyhow::Error::from)?;
                    row["clientName"] = client_name.map(Value::String).unwrap_or(Value::Null);
                    rows.push(row);
                }
                rows
            }
            "invoices" => to_rows(self.invoice_repo.list(&self.pool, None).await?)?,
            other => return Err(AppError::UnsupportedTable(other.to_string())),
        };
        Ok(rows)
    }

    pub async fn browse(&self, table: &str, query: &TableQuery) -> Result<TableView, AppError> {
        let spec = data_table::table_spec(table)?;
        let rows = visible_rows(&spec, self.raw_rows(&spec).await?, query);

        Ok(TableView {
            name: spec.name.to_string(),
            title: spec.title.to_string(),
            columns: spec.columns.to_vec(),
            rows,
        })
    }

    /// (nome do arquivo, conteúdo CSV)
    pub async fn export_csv(&self, table: &str, query: &TableQuery) -> Result<(String, String), AppError> {
        let spec = data_table::table_spec(table)?;
        let rows = visible_rows(&spec, self.raw_rows(&spec).await?, query);

        tracing::info!("📤 Exportando {} linhas de {}", rows.len(), spec.name);
        Ok((data_table::export_file_name(&spec), data_table::to_csv(spec.columns, &rows)))
    }
}

fn to_rows<T: Serialize>(records: Vec<T>) -> Result<Vec<Value>, AppError> {
    records
        .into_iter()
        .map(|r| serde_json::to_value(r).map_err(|e| AppError::from(anyhow::Error::from(e))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::data_table::CLIENTS;
    use serde_json::json;

    fn clients() -> Vec<Value> {
        vec![
            json!({"id": "1", "name": "zara", "company": "Kite", "email": "z@k.io"}),
            json!({"id": "2", "name": "Arjun", "company": null, "email": "a@mail.in"}),
            json!({"id": "3", "name": "Meera", "company": "Kite Labs", "email": "m@k.io"}),
        ]
    }

    #[test]
    fn search_then_sort() {
        let query = TableQuery {
            search: Some("kite".into()),
            sort: Some("name".into()),
            direction: Some(SortDirection::Asc),
        };
        let rows = visible_rows(&CLIENTS, clients(), &query);
        let ids: Vec<_> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["3", "1"]);
    }

    #[test]
    fn no_query_keeps_everything_in_order() {
        let rows = visible_rows(&CLIENTS, clients(), &TableQuery::default());
        assert_eq!(rows, clients());
    }
}
