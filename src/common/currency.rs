// src/common/currency.rs

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Mapeia o CREATE TYPE currency_code do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "currency_code", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Inr,
    Usd,
    Eur,
    Gbp,
    Aed,
    Kes,
}

impl Currency {
    pub const ALL: [Currency; 6] = [
        Currency::Inr,
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Aed,
        Currency::Kes,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Aed => "AED",
            Currency::Kes => "KES",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Inr => "₹",
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Aed => "د.إ",
            Currency::Kes => "KSh",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Currency::Inr => "Indian Rupee",
            Currency::Usd => "US Dollar",
            Currency::Eur => "Euro",
            Currency::Gbp => "British Pound",
            Currency::Aed => "UAE Dirham",
            Currency::Kes => "Kenyan Shilling",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Inr
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("moeda desconhecida: {0}")]
pub struct UnknownCurrency(pub String);

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == wanted)
            .ok_or_else(|| UnknownCurrency(s.to_string()))
    }
}

/// Item da listagem GET /api/currencies
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrencyInfo {
    #[schema(example = "INR")]
    pub code: String,
    #[schema(example = "₹")]
    pub symbol: String,
    #[schema(example = "Indian Rupee")]
    pub name: String,
}

impl From<Currency> for CurrencyInfo {
    fn from(c: Currency) -> Self {
        Self {
            code: c.code().to_string(),
            symbol: c.symbol().to_string(),
            name: c.name().to_string(),
        }
    }
}

/// Agrupa a parte inteira no padrão indiano: 12,34,567
pub fn group_indian(integer_digits: &str) -> String {
    let len = integer_digits.len();
    if len <= 3 {
        return integer_digits.to_string();
    }

    let (head, tail) = integer_digits.split_at(len - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Número com agrupamento indiano. Valores inteiros saem sem casas decimais.
pub fn format_number(amount: Decimal, decimals: u32) -> String {
    let negative = amount.is_sign_negative() && !amount.is_zero();
    let abs = amount.abs();

    let places = if abs.fract().is_zero() { 0 } else { decimals };
    let rounded = abs.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);

    let text = format!("{:.*}", places as usize, rounded);
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_indian(&int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

/// Valor com o símbolo da moeda na frente, ex: ₹1,50,000 ou $99.50
pub fn format_amount(amount: Decimal, currency: Currency, decimals: u32) -> String {
    format!("{}{}", currency.symbol(), format_number(amount, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn indian_grouping() {
        assert_eq!(group_indian("999"), "999");
        assert_eq!(group_indian("1000"), "1,000");
        assert_eq!(group_indian("100000"), "1,00,000");
        assert_eq!(group_indian("1234567"), "12,34,567");
    }

    #[test]
    fn whole_amounts_have_no_decimals() {
        assert_eq!(format_amount(dec("150000"), Currency::Inr, 2), "₹1,50,000");
        assert_eq!(format_amount(dec("150000.00"), Currency::Inr, 2), "₹1,50,000");
    }

    #[test]
    fn fractional_amounts_keep_two_places() {
        assert_eq!(format_amount(dec("99.5"), Currency::Usd, 2), "$99.50");
        assert_eq!(format_amount(dec("1234.567"), Currency::Eur, 2), "€1,234.57");
    }

    #[test]
    fn negative_amounts_keep_sign() {
        assert_eq!(format_number(dec("-2500.25"), 2), "-2,500.25");
    }

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!(Currency::from_str("usd").unwrap(), Currency::Usd);
        assert_eq!(Currency::from_str(" KES ").unwrap(), Currency::Kes);
        assert!(Currency::from_str("JPY").is_err());
    }
}
