// src/models/invoice.rs

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::{currency::Currency, error::AppError};

pub const DEFAULT_PAYMENT_METHOD: &str = "UPI";
pub const DEFAULT_PAYMENT_TERMS: &str = "15 days from invoice date";
pub const DEFAULT_DUE_DAYS: i64 = 15;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceType {
    #[default]
    Advance,
    Final,
    Partial,
}

impl InvoiceType {
    pub fn label(&self) -> &'static str {
        match self {
            InvoiceType::Advance => "ADVANCE",
            InvoiceType::Final => "FINAL",
            InvoiceType::Partial => "PARTIAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "PENDING",
            InvoiceStatus::Sent => "SENT",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Overdue => "OVERDUE",
            InvoiceStatus::Cancelled => "CANCELLED",
        }
    }
}

// --- ITENS ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineItem {
    #[schema(example = "Landing page design")]
    pub description: String,

    #[schema(value_type = f64, example = 1.0)]
    pub quantity: Decimal,

    #[schema(value_type = f64, example = 15000.0)]
    pub rate: Decimal,

    #[serde(default)]
    #[schema(value_type = f64, example = 15000.0)]
    pub amount: Decimal,
}

/// Descarta linhas sem descrição ou sem valor e recalcula qtd × valor.
pub fn normalize_line_items(items: Vec<InvoiceLineItem>) -> Vec<InvoiceLineItem> {
    items
        .into_iter()
        .filter(|item| !item.description.trim().is_empty() && !item.rate.is_zero())
        .map(|mut item| {
            item.amount = (item.quantity * item.rate)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            item
        })
        .collect()
}

/// Soma das linhas quando positiva; senão o valor informado é obrigatório.
pub fn resolve_amount(items: &[InvoiceLineItem], given: Option<Decimal>) -> Result<Decimal, AppError> {
    let lines_total: Decimal = items.iter().map(|i| i.amount).sum();
    if lines_total > Decimal::ZERO {
        return Ok(lines_total);
    }
    match given {
        Some(amount) if amount > Decimal::ZERO => Ok(amount),
        _ => Err(AppError::InvoiceAmountRequired),
    }
}

// --- FATURA ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub project_id: Uuid,
    pub client_id: Uuid,

    #[schema(example = "INV-2024-0007")]
    pub invoice_number: String,

    pub invoice_type: InvoiceType,

    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,

    #[schema(value_type = f64, example = 15000.0)]
    pub amount: Decimal,

    pub currency: Currency,

    pub description: Option<String>,

    #[sqlx(json)]
    pub services: Vec<InvoiceLineItem>,

    pub status: InvoiceStatus,

    #[schema(example = "UPI")]
    pub payment_method: String,

    pub payment_terms: Option<String>,
    pub notes: Option<String>,

    // Vêm do JOIN com projects/clients
    pub project_title: Option<String>,
    pub client_name: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayload {
    // Se vier vazio o banco gera (INV-AAAA-NNNN)
    #[validate(length(min = 1, max = 64, message = "Número de fatura inválido."))]
    pub invoice_number: Option<String>,

    #[serde(default)]
    pub invoice_type: InvoiceType,

    pub invoice_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,

    #[schema(value_type = Option<f64>)]
    pub amount: Option<Decimal>,

    pub currency: Option<Currency>,

    pub description: Option<String>,

    #[serde(default)]
    pub services: Vec<InvoiceLineItem>,

    pub status: Option<InvoiceStatus>,

    pub payment_method: Option<String>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
}

/// Fatura pronta para gravar, já com os padrões aplicados.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub invoice_number: Option<String>,
    pub invoice_type: InvoiceType,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub currency: Currency,
    pub description: Option<String>,
    pub services: Vec<InvoiceLineItem>,
    pub status: InvoiceStatus,
    pub payment_method: String,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
}

impl InvoicePayload {
    pub fn into_new_invoice(self, today: NaiveDate) -> Result<NewInvoice, AppError> {
        let services = normalize_line_items(self.services);
        let amount = resolve_amount(&services, self.amount)?;
        let invoice_date = self.invoice_date.unwrap_or(today);

        Ok(NewInvoice {
            invoice_number: self.invoice_number.filter(|n| !n.trim().is_empty()),
            invoice_type: self.invoice_type,
            invoice_date,
            due_date: self
                .due_date
                .unwrap_or(invoice_date + Duration::days(DEFAULT_DUE_DAYS)),
            amount,
            currency: self.currency.unwrap_or_default(),
            description: self.description,
            services,
            status: self.status.unwrap_or_default(),
            payment_method: self
                .payment_method
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
            payment_terms: Some(
                self.payment_terms
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_PAYMENT_TERMS.to_string()),
            ),
            notes: self.notes,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InvoiceStatusPayload {
    pub status: InvoiceStatus,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    pub(crate) fn line(description: &str, quantity: &str, rate: &str) -> InvoiceLineItem {
        InvoiceLineItem {
            description: description.into(),
            quantity: dec(quantity),
            rate: dec(rate),
            amount: Decimal::ZERO,
        }
    }

    fn empty_payload() -> InvoicePayload {
        serde_json::from_value(serde_json::json!({})).unwrap()
    }

    #[test]
    fn drops_incomplete_lines_and_recomputes_amounts() {
        let items = normalize_line_items(vec![
            line("Design", "2", "1500.255"),
            line("", "1", "100"),
            line("Hosting", "1", "0"),
        ]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].amount, dec("3000.51"));
    }

    #[test]
    fn line_total_wins_over_given_amount() {
        let items = normalize_line_items(vec![line("Dev", "3", "1000")]);
        assert_eq!(resolve_amount(&items, Some(dec("1"))).unwrap(), dec("3000"));
    }

    #[test]
    fn amount_required_without_lines() {
        assert!(matches!(resolve_amount(&[], None), Err(AppError::InvoiceAmountRequired)));
        assert_eq!(resolve_amount(&[], Some(dec("750"))).unwrap(), dec("750"));
    }

    #[test]
    fn payload_defaults() {
        let mut payload = empty_payload();
        payload.amount = Some(dec("5000"));
        let today = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();

        let invoice = payload.into_new_invoice(today).unwrap();
        assert_eq!(invoice.invoice_type, InvoiceType::Advance);
        assert_eq!(invoice.invoice_date, today);
        assert_eq!(invoice.due_date, NaiveDate::from_ymd_opt(2024, 4, 16).unwrap());
        assert_eq!(invoice.payment_method, "UPI");
        assert_eq!(invoice.currency, Currency::Inr);
        assert_eq!(invoice.status, InvoiceStatus::Pending);
        assert_eq!(invoice.payment_terms.as_deref(), Some(DEFAULT_PAYMENT_TERMS));
        assert!(invoice.invoice_number.is_none());
    }

    #[test]
    fn due_date_follows_given_invoice_date() {
        let mut payload = empty_payload();
        payload.amount = Some(dec("1"));
        payload.invoice_date = NaiveDate::from_ymd_opt(2024, 12, 25);
        let invoice = payload
            .into_new_invoice(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .unwrap();
        assert_eq!(invoice.due_date, NaiveDate::from_ymd_opt(2025, 1, 9).unwrap());
    }
}
