// src/common/data_table.rs
//
// Navegador de tabelas: busca, ordenação e exportação CSV sobre linhas JSON.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::common::{
    error::AppError,
    listing::{cmp_ci, contains_ci, SortDirection},
};

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct Column {
    #[schema(value_type = String, example = "totalAmount")]
    pub key: &'static str,
    #[schema(value_type = String, example = "Total Amount")]
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub name: &'static str,
    pub title: &'static str,
    pub columns: &'static [Column],
}

const fn col(key: &'static str, label: &'static str) -> Column {
    Column { key, label }
}

pub const CLIENTS: TableSpec = TableSpec {
    name: "clients",
    title: "Clients",
    columns: &[
        col("id", "ID"),
        col("name", "Name"),
        col("company", "Company"),
        col("phone", "Phone"),
        col("email", "Email"),
        col("country", "Country"),
    ],
};

pub const PROJECTS: TableSpec = TableSpec {
    name: "projects",
    title: "Projects",
    columns: &[
        col("id", "Project ID"),
        col("title", "Project Title"),
        col("services", "Services"),
        col("status", "Status"),
        col("totalAmount", "Total Amount"),
        col("paidAmount", "Paid Amount"),
        col("remainingAmount", "Remaining Amount"),
        col("clientName", "Client Name"),
    ],
};

pub const INVOICES: TableSpec = TableSpec {
    name: "invoices",
    title: "Invoices",
    columns: &[
        col("id", "Invoice ID"),
        col("projectId", "Project ID"),
        col("clientId", "Client ID"),
        col("invoiceNumber", "Invoice Number"),
        col("amount", "Amount"),
        col("status", "Status"),
        col("currency", "Currency"),
    ],
};

pub const ALL_TABLES: [TableSpec; 3] = [CLIENTS, PROJECTS, INVOICES];

pub fn table_spec(name: &str) -> Result<TableSpec, AppError> {
    ALL_TABLES
        .into_iter()
        .find(|t| t.name == name)
        .ok_or_else(|| AppError::UnsupportedTable(name.to_string()))
}

/// Texto exibido de uma célula. Listas viram "a, b".
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

fn cell<'a>(row: &'a Value, key: &str) -> &'a Value {
    row.get(key).unwrap_or(&Value::Null)
}

/// Mantém as linhas em que alguma coluna contém o termo.
pub fn filter_rows(columns: &[Column], rows: Vec<Value>, search: &str) -> Vec<Value> {
    let term = search.trim();
    if term.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|row| columns.iter().any(|c| contains_ci(&display_value(cell(row, c.key)), term)))
        .collect()
}

fn compare_cells(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => cmp_ci(&display_value(a), &display_value(b)),
    }
}

/// Ordenação estável pela coluna pedida. Sem coluna, a ordem é mantida.
pub fn sort_rows(rows: &mut [Value], key: Option<&str>, direction: SortDirection) {
    let Some(key) = key else { return };
    rows.sort_by(|a, b| direction.apply(compare_cells(cell(a, key), cell(b, key))));
}

fn csv_quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Cabeçalho com os rótulos + exatamente as linhas recebidas, na mesma ordem.
pub fn to_csv(columns: &[Column], rows: &[Value]) -> String {
    let header = columns.iter().map(|c| c.label).collect::<Vec<_>>().join(",");

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(header);
    for row in rows {
        let line = columns
            .iter()
            .map(|c| csv_quote(&display_value(cell(row, c.key))))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }
    lines.join("\n")
}

pub fn export_file_name(spec: &TableSpec) -> String {
    format!("{}-export.csv", spec.title.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn projects() -> Vec<Value> {
        vec![
            json!({"id": "p1", "title": "Landing page", "services": ["Landing page"], "status": "planned",
                   "totalAmount": 15000.0, "paidAmount": 5000.0, "remainingAmount": 10000.0, "clientName": "Acme"}),
            json!({"id": "p2", "title": "Shop \"v2\"", "services": ["Website development", "SEO optimisation"],
                   "status": "in_progress", "totalAmount": 90000.0, "paidAmount": 0.0, "remainingAmount": 90000.0,
                   "clientName": "Globex"}),
            json!({"id": "p3", "title": "Brand refresh", "services": [], "status": "completed",
                   "totalAmount": 2500.5, "paidAmount": 2500.5, "remainingAmount": 0.0, "clientName": null}),
        ]
    }

    #[test]
    fn unknown_table_is_rejected() {
        assert!(table_spec("users").is_err());
        assert_eq!(table_spec("invoices").unwrap().columns.len(), 7);
    }

    #[test]
    fn display_values() {
        assert_eq!(display_value(&json!(null)), "");
        assert_eq!(display_value(&json!(15000.0)), "15000");
        assert_eq!(display_value(&json!(2500.5)), "2500.5");
        assert_eq!(display_value(&json!(["a", "b"])), "a, b");
    }

    #[test]
    fn filter_matches_any_column() {
        let rows = filter_rows(PROJECTS.columns, projects(), "seo");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "p2");

        let rows = filter_rows(PROJECTS.columns, projects(), "ACME");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "p1");
    }

    #[test]
    fn numeric_columns_sort_numerically() {
        let mut rows = projects();
        sort_rows(&mut rows, Some("totalAmount"), SortDirection::Desc);
        let ids: Vec<_> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["p2", "p1", "p3"]);
    }

    #[test]
    fn text_columns_sort_without_case() {
        let mut rows = projects();
        sort_rows(&mut rows, Some("title"), SortDirection::Asc);
        let ids: Vec<_> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["p3", "p1", "p2"]);
    }

    #[test]
    fn csv_contains_exactly_the_visible_rows_in_order() {
        let mut rows = filter_rows(PROJECTS.columns, projects(), "a");
        sort_rows(&mut rows, Some("remainingAmount"), SortDirection::Asc);

        let csv = to_csv(PROJECTS.columns, &rows);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Project ID,Project Title,Services,Status,Total Amount,Paid Amount,Remaining Amount,Client Name"
        );
        assert_eq!(lines.len(), rows.len() + 1);
        for (line, row) in lines[1..].iter().zip(&rows) {
            let id = row["id"].as_str().unwrap();
            assert!(line.starts_with(&format!("\"{}\"", id)));
        }
    }

    #[test]
    fn csv_escapes_quotes() {
        let rows = vec![projects().remove(1)];
        let csv = to_csv(PROJECTS.columns, &rows);
        assert!(csv.contains("\"Shop \"\"v2\"\"\""));
        assert!(csv.contains("\"Website development, SEO optimisation\""));
    }

    #[test]
    fn export_name_uses_title() {
        assert_eq!(export_file_name(&CLIENTS), "clients-export.csv");
    }
}
