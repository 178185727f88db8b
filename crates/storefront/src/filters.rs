//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use rust_decimal::{Decimal, RoundingStrategy};

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a decimal amount as rupees with two decimal places.
///
/// Values that already carry the rupee sign (a `Price`) pass through.
///
/// Usage in templates: `{{ revenue|inr }}`
#[askama::filter_fn]
pub fn inr(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_inr(&value.to_string()))
}

fn format_inr(raw: &str) -> String {
    if raw.starts_with('₹') {
        return raw.to_string();
    }
    raw.trim().parse::<Decimal>().map_or_else(
        |_| format!("₹{raw}"),
        |amount| {
            let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            format!("₹{rounded:.2}")
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr("1299"), "₹1299.00");
        assert_eq!(format_inr("49.955"), "₹49.96");
        assert_eq!(format_inr("₹10.00"), "₹10.00");
    }
}
