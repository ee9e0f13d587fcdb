//! KES money helpers
//!
//! Amounts are `rust_decimal::Decimal` in the domain and whole cents (`i64`)
//! in the database.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Security deposit is 113% of monthly rent.
pub const DEPOSIT_RATE_PERCENT: i64 = 113;

/// Security deposit owed for a unit renting at `rent`.
pub fn deposit_for_rent(rent: Decimal) -> Decimal {
    (rent * Decimal::new(DEPOSIT_RATE_PERCENT, 2))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn to_cents(amount: Decimal) -> i64 {
    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX)
}

pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// `KES 50,000.00`
pub fn format_kes(amount: Decimal) -> String {
    let cents = to_cents(amount);
    let negative = cents < 0;
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!(
        "KES {}{}.{:02}",
        if negative { "-" } else { "" },
        grouped,
        cents % 100
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn deposit_is_113_percent_of_rent() {
        assert_eq!(
            deposit_for_rent(Decimal::from(50_000)),
            Decimal::from_str("56500.00").unwrap()
        );
        assert_eq!(
            deposit_for_rent(Decimal::from_str("12345.67").unwrap()),
            Decimal::from_str("13950.61").unwrap()
        );
        assert_eq!(deposit_for_rent(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn cents_conversion() {
        assert_eq!(to_cents(Decimal::from_str("1234.5").unwrap()), 123_450);
        assert_eq!(from_cents(123_450), Decimal::from_str("1234.50").unwrap());
    }

    #[test]
    fn kes_formatting_groups_thousands() {
        assert_eq!(format_kes(Decimal::from(50_000)), "KES 50,000.00");
        assert_eq!(format_kes(Decimal::from_str("999.5").unwrap()), "KES 999.50");
        assert_eq!(
            format_kes(Decimal::from_str("1234567.891").unwrap()),
            "KES 1,234,567.89"
        );
        assert_eq!(format_kes(Decimal::ZERO), "KES 0.00");
    }
}
