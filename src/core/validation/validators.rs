//! Reusable field validators
//!
//! Validators run after the field's filters. A validator only judges values of
//! the type it understands and lets anything else through, so several can be
//! stacked on one field.

use crate::core::invoice::dollars_to_cents;
use serde_json::Value;

/// Validator: field is present and not an empty string
pub fn required(
    message: &'static str,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &Value| match value {
        Value::Null => Err(message.to_string()),
        Value::String(s) if s.is_empty() => Err(message.to_string()),
        _ => Ok(()),
    }
}

/// Validator: amount is worth at least one cent once rounded
///
/// Zero, negative amounts and amounts that round down to zero cents fail.
pub fn positive_cents(
    message: &'static str,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &Value| {
        let Some(num) = value.as_f64() else {
            return Ok(());
        };
        match dollars_to_cents(num) {
            Some(cents) if cents >= 1 => Ok(()),
            Some(_) => Err(message.to_string()),
            None if num <= 0.0 => Err(message.to_string()),
            // Out of range; max_value reports it
            None => Ok(()),
        }
    }
}

/// Validator: number must not exceed maximum
pub fn max_value(
    max: f64,
    message: &'static str,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &Value| match value.as_f64() {
        Some(num) if num > max => Err(message.to_string()),
        _ => Ok(()),
    }
}

/// Validator: value must be in allowed list
pub fn in_list(
    allowed: &'static [&'static str],
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &Value| {
        let Some(s) = value.as_str() else {
            return Ok(());
        };
        if allowed.contains(&s) {
            return Ok(());
        }
        let expected = allowed
            .iter()
            .map(|a| format!("'{}'", a))
            .collect::<Vec<_>>()
            .join(" | ");
        Err(format!(
            "Invalid enum value. Expected {}, received '{}'",
            expected, s
        ))
    }
}
