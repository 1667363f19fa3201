//! The invoice form schema
//!
//! Turns a free-form [`FormPayload`] into a [`ValidInvoice`], or into the
//! per-field messages shown next to the form inputs.

use super::filters::{coerce_number, trim};
use super::validators::{in_list, max_value, positive_cents, required};
use crate::core::invoice::{
    InvoiceChanges, InvoiceStatus, MAX_SAFE_CENTS, NewInvoice, dollars_to_cents,
};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub const CUSTOMER_MESSAGE: &str = "Please select a customer.";
pub const AMOUNT_MESSAGE: &str = "Please enter an amount greater than $0.";
pub const AMOUNT_RANGE_MESSAGE: &str = "Please enter a valid amount.";
pub const STATUS_MESSAGE: &str = "Please select an invoice status.";

const STATUS_VALUES: &[&str] = &["pending", "paid"];

type Filter = Box<dyn Fn(&str, Value) -> Result<Value> + Send + Sync>;
type Validator = Box<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

/// Form fields the invoice schema knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvoiceField {
    CustomerId,
    Amount,
    Status,
}

impl InvoiceField {
    /// Name of the field in submitted forms and in error maps
    pub fn key(&self) -> &'static str {
        match self {
            InvoiceField::CustomerId => "customerId",
            InvoiceField::Amount => "amount",
            InvoiceField::Status => "status",
        }
    }
}

/// Raw key/value pairs of a submitted form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    fields: HashMap<String, String>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Build a payload from a JSON object
    ///
    /// Numbers and booleans are stringified the way a form would submit them;
    /// `null` counts as absent. Nested arrays and objects are rejected, as is
    /// a non-string `customerId` or `status`.
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(anyhow!("expected a JSON object"));
        };

        let mut payload = Self::new();
        for (key, value) in map {
            match value {
                Value::Null => {}
                Value::String(s) => payload.insert(key, s),
                Value::Array(_) | Value::Object(_) => {
                    return Err(anyhow!("field '{}' must be a scalar", key));
                }
                _ if Self::is_text_field(&key) => {
                    return Err(anyhow!("field '{}' must be a string", key));
                }
                other => payload.insert(key, other.to_string()),
            }
        }
        Ok(payload)
    }

    fn is_text_field(key: &str) -> bool {
        key == InvoiceField::CustomerId.key() || key == InvoiceField::Status.key()
    }
}

impl From<HashMap<String, String>> for FormPayload {
    fn from(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormPayload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Per-field validation messages, in the order they were produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Vec<String>>,
}

impl FieldErrors {
    pub fn push(&mut self, field: InvoiceField, message: impl Into<String>) {
        self.slot(field)
            .get_or_insert_with(Vec::new)
            .push(message.into());
    }

    pub fn get(&self, field: InvoiceField) -> Option<&[String]> {
        match field {
            InvoiceField::CustomerId => self.customer_id.as_deref(),
            InvoiceField::Amount => self.amount.as_deref(),
            InvoiceField::Status => self.status.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none() && self.amount.is_none() && self.status.is_none()
    }

    fn slot(&mut self, field: InvoiceField) -> &mut Option<Vec<String>> {
        match field {
            InvoiceField::CustomerId => &mut self.customer_id,
            InvoiceField::Amount => &mut self.amount,
            InvoiceField::Status => &mut self.status,
        }
    }
}

/// Invoice fields that passed the schema, amount already in cents
#[derive(Debug, Clone, PartialEq)]
pub struct ValidInvoice {
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
}

impl ValidInvoice {
    pub fn into_new_invoice(self, date: NaiveDate) -> NewInvoice {
        NewInvoice {
            customer_id: self.customer_id,
            amount: self.amount,
            status: self.status,
            date,
        }
    }

    pub fn into_changes(self) -> InvoiceChanges {
        InvoiceChanges {
            customer_id: self.customer_id,
            amount: self.amount,
            status: self.status,
        }
    }
}

struct FieldRules {
    field: InvoiceField,
    filters: Vec<Filter>,
    validators: Vec<Validator>,
}

/// Schema shared by the create and update actions
pub struct InvoiceSchema {
    rules: Vec<FieldRules>,
}

impl InvoiceSchema {
    pub fn new() -> Self {
        Self {
            rules: vec![
                FieldRules {
                    field: InvoiceField::CustomerId,
                    filters: vec![Box::new(trim())],
                    validators: vec![Box::new(required(CUSTOMER_MESSAGE))],
                },
                FieldRules {
                    field: InvoiceField::Amount,
                    filters: vec![Box::new(coerce_number(AMOUNT_RANGE_MESSAGE))],
                    validators: vec![
                        Box::new(positive_cents(AMOUNT_MESSAGE)),
                        Box::new(max_value(MAX_SAFE_CENTS / 100.0, AMOUNT_RANGE_MESSAGE)),
                    ],
                },
                FieldRules {
                    field: InvoiceField::Status,
                    filters: vec![Box::new(trim())],
                    validators: vec![
                        Box::new(required(STATUS_MESSAGE)),
                        Box::new(in_list(STATUS_VALUES)),
                    ],
                },
            ],
        }
    }

    /// Validate and normalize a submitted form
    ///
    /// Every field is checked, so the returned errors cover all offending
    /// fields at once. Keys outside the schema are ignored.
    pub fn validate(&self, payload: &FormPayload) -> Result<ValidInvoice, FieldErrors> {
        let mut errors = FieldErrors::default();
        let mut values: HashMap<InvoiceField, Value> = HashMap::new();

        for rules in &self.rules {
            let key = rules.field.key();
            let raw = payload
                .get(key)
                .map(|s| Value::String(s.to_string()))
                .unwrap_or(Value::Null);

            let filtered = rules
                .filters
                .iter()
                .try_fold(raw, |value, filter| filter(key, value));
            let value = match filtered {
                Ok(value) => value,
                Err(e) => {
                    errors.push(rules.field, e.to_string());
                    continue;
                }
            };

            let mut valid = true;
            for validator in &rules.validators {
                if let Err(message) = validator(key, &value) {
                    errors.push(rules.field, message);
                    valid = false;
                }
            }
            if valid {
                values.insert(rules.field, value);
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let customer_id = values
            .get(&InvoiceField::CustomerId)
            .and_then(Value::as_str)
            .map(str::to_string);
        let amount = values
            .get(&InvoiceField::Amount)
            .and_then(Value::as_f64)
            .and_then(dollars_to_cents);
        let status = values
            .get(&InvoiceField::Status)
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<InvoiceStatus>().ok());

        match (customer_id, amount, status) {
            (Some(customer_id), Some(amount), Some(status)) => Ok(ValidInvoice {
                customer_id,
                amount,
                status,
            }),
            (customer_id, amount, status) => {
                if customer_id.is_none() {
                    errors.push(InvoiceField::CustomerId, CUSTOMER_MESSAGE);
                }
                if amount.is_none() {
                    errors.push(InvoiceField::Amount, AMOUNT_RANGE_MESSAGE);
                }
                if status.is_none() {
                    errors.push(InvoiceField::Status, STATUS_MESSAGE);
                }
                Err(errors)
            }
        }
    }
}

impl Default for InvoiceSchema {
    fn default() -> Self {
        Self::new()
    }
}
