pub mod catalog;
pub mod checkout;
pub mod contact;

use crate::errors::ServiceError;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Parses a client-supplied price field. Accepts a JSON number or a numeric
/// string; anything else (or a negative value) is rejected as invalid input.
pub(crate) fn parse_price(value: &Value, field: &str) -> Result<Decimal, ServiceError> {
    let parsed = match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    };

    let price = parsed
        .ok_or_else(|| ServiceError::InvalidInput(format!("{} must be a number", field)))?;

    if price < Decimal::ZERO {
        return Err(ServiceError::InvalidInput(format!(
            "{} must be non-negative",
            field
        )));
    }

    Ok(price)
}

/// Presence check for required string fields; empty and whitespace-only
/// values count as missing.
pub(crate) fn required(value: Option<String>, field: &str) -> Result<String, ServiceError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(ServiceError::ValidationError(format!(
            "{} is required",
            field
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn parse_price_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_price(&json!(49), "precio").unwrap(), dec!(49));
        assert_eq!(parse_price(&json!(9.99), "precio").unwrap(), dec!(9.99));
        assert_eq!(parse_price(&json!("149.50"), "precio").unwrap(), dec!(149.50));
    }

    #[test]
    fn parse_price_rejects_non_numeric_input() {
        assert!(matches!(
            parse_price(&json!("gratis"), "precio"),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_price(&json!({"x": 1}), "precio"),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_price(&json!(null), "precio"),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn parse_price_rejects_negative_values() {
        assert!(matches!(
            parse_price(&json!(-1), "totalPrice"),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn required_rejects_missing_and_blank() {
        assert_eq!(required(Some("Ana".into()), "name").unwrap(), "Ana");
        assert!(matches!(
            required(None, "name"),
            Err(ServiceError::ValidationError(_))
        ));
        assert!(matches!(
            required(Some("   ".into()), "name"),
            Err(ServiceError::ValidationError(_))
        ));
    }
}
