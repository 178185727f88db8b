//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use rust_decimal::Decimal;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Money in rupees. `Price` values already render with the sign.
///
/// Usage in templates: `{{ stats.revenue|inr }}`
#[askama::filter_fn]
pub fn inr(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(rupees(&value.to_string()))
}

fn rupees(raw: &str) -> String {
    if raw.starts_with('₹') {
        return raw.to_string();
    }
    match raw.trim().parse::<Decimal>() {
        Ok(amount) => format!("₹{:.2}", amount.round_dp(2)),
        Err(_) => format!("₹{raw}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rupees() {
        assert_eq!(rupees("2599.5"), "₹2599.50");
        assert_eq!(rupees("₹10.00"), "₹10.00");
        assert_eq!(rupees("0"), "₹0.00");
    }
}
