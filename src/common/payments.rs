// src/common/payments.rs

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use utoipa::ToSchema;

/// Valores derivados de pagamento de um projeto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    #[schema(value_type = f64, example = 1000.0)]
    pub total: Decimal,
    #[schema(value_type = f64, example = 250.0)]
    pub paid: Decimal,
    #[schema(value_type = f64, example = 750.0)]
    pub remaining: Decimal,
    #[schema(value_type = f64, example = 25.0)]
    pub paid_percent: Decimal,
}

impl PaymentSummary {
    pub fn new(total: Decimal, paid: Decimal) -> Self {
        Self {
            total,
            paid,
            remaining: remaining_amount(total, paid),
            paid_percent: paid_percent(total, paid),
        }
    }
}

/// max(0, total - paid)
pub fn remaining_amount(total: Decimal, paid: Decimal) -> Decimal {
    (total - paid).max(Decimal::ZERO)
}

/// Percentual pago com duas casas. Zero quando o total é zero.
pub fn paid_percent(total: Decimal, paid: Decimal) -> Decimal {
    if total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (paid / total * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
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
    fn quarter_paid() {
        let summary = PaymentSummary::new(dec("1000"), dec("250"));
        assert_eq!(summary.remaining, dec("750"));
        assert_eq!(summary.paid_percent, dec("25.00"));
    }

    #[test]
    fn zero_total_gives_zero_percent() {
        let summary = PaymentSummary::new(Decimal::ZERO, Decimal::ZERO);
        assert_eq!(summary.remaining, Decimal::ZERO);
        assert_eq!(summary.paid_percent, Decimal::ZERO);
    }

    #[test]
    fn overpayment_floors_remaining_at_zero() {
        assert_eq!(remaining_amount(dec("500"), dec("800")), Decimal::ZERO);
        assert_eq!(paid_percent(dec("500"), dec("800")), dec("160"));
    }

    #[test]
    fn percent_rounds_to_two_places() {
        assert_eq!(paid_percent(dec("3"), dec("1")), dec("33.33"));
        assert_eq!(paid_percent(dec("3"), dec("2")), dec("66.67"));
    }

    #[test]
    fn remaining_is_never_negative() {
        for total in [0, 1, 10, 999, 1000] {
            for paid in [0, 1, 10, 999, 1000, 5000] {
                let r = remaining_amount(Decimal::from(total), Decimal::from(paid));
                assert!(r >= Decimal::ZERO);
                assert_eq!(r, Decimal::from((total - paid).max(0)));
            }
        }
    }
}
