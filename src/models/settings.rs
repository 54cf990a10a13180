// src/models/settings.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

pub const DEFAULT_SERVICES: &[&str] = &[
    "Website development",
    "SEO optimisation",
    "Domain registration",
    "Hosting setup",
    "UI/UX design",
    "UI Design (Figma)",
    "Video Editing",
    "Digital Marketing",
    "Social Media Handling",
    "Landing page",
    "Maintenance",
    "Other",
];

pub const DEFAULT_PAYMENT_MODES: &[&str] = &[
    "UPI",
    "Bank Transfer",
    "PayPal",
    "Stripe",
    "Razorpay",
    "Paytm",
    "PhonePe",
    "Google Pay",
    "Apple Pay",
    "Crypto (USDT)",
    "Crypto (Bitcoin)",
    "Crypto (Ethereum)",
    "Wire Transfer",
    "Western Union",
    "MoneyGram",
    "Wise (formerly TransferWise)",
    "Payoneer",
    "Skrill",
    "Neteller",
    "MPesa",
    "Bkash",
    "Cash",
    "Cheque",
    "Other",
];

// Linha única da tabela settings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[schema(example = json!(["Website development", "Landing page"]))]
    pub service_list: Vec<String>,

    #[schema(example = json!(["UPI", "Bank Transfer"]))]
    pub payment_modes: Vec<String>,

    #[schema(example = "Studio Nimbus")]
    pub business_name: Option<String>,

    #[schema(example = "Web design & development")]
    pub tagline: Option<String>,

    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,

    #[schema(example = "studio@okaxis")]
    pub upi_id: Option<String>,

    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            service_list: DEFAULT_SERVICES.iter().map(|s| s.to_string()).collect(),
            payment_modes: DEFAULT_PAYMENT_MODES.iter().map(|s| s.to_string()).collect(),
            business_name: None,
            tagline: None,
            email: None,
            phone: None,
            website: None,
            address: None,
            upi_id: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[validate(length(min = 1, message = "Informe ao menos um serviço."))]
    pub service_list: Vec<String>,

    #[validate(length(min = 1, message = "Informe ao menos uma forma de pagamento."))]
    pub payment_modes: Vec<String>,

    pub business_name: Option<String>,
    pub tagline: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub phone: Option<String>,

    #[validate(url(message = "Informe uma URL válida."))]
    pub website: Option<String>,

    pub address: Option<String>,
    pub upi_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_start_with_upi_and_end_with_other() {
        let settings = AppSettings::default();
        assert_eq!(settings.payment_modes.first().map(String::as_str), Some("UPI"));
        assert_eq!(settings.service_list.last().map(String::as_str), Some("Other"));
        assert_eq!(settings.service_list.len(), 12);
    }
}
