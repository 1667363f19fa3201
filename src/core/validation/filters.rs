//! Reusable field filters
//!
//! These filters transform form values before validation. A filter that
//! cannot transform its input fails with the message shown to the user.

use anyhow::{Result, anyhow};
use serde_json::{Value, json};

/// Reported when a value cannot be read as a number
pub const NAN_MESSAGE: &str = "Expected number, received nan";

/// Filter: trim whitespace from string
pub fn trim() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.trim().to_string()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: coerce a form string into a number
///
/// Missing and blank values coerce to `0`, the way browsers submit an
/// untouched number input. Infinite values fail with `overflow_message`.
pub fn coerce_number(
    overflow_message: &'static str,
) -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    move |_: &str, value: Value| match value {
        Value::Null => Ok(json!(0)),
        Value::Number(_) => Ok(value),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(json!(0));
            }
            let num: f64 = s.parse().map_err(|_| anyhow!(NAN_MESSAGE))?;
            if num.is_nan() {
                Err(anyhow!(NAN_MESSAGE))
            } else if num.is_infinite() {
                Err(anyhow!(overflow_message))
            } else {
                Ok(json!(num))
            }
        }
        _ => Err(anyhow!(NAN_MESSAGE)),
    }
}
