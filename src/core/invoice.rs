//! Invoice and customer types
//!
//! Amounts are always held as integer cents. Conversions from the decimal
//! amounts typed into forms go through [`dollars_to_cents`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Largest cent value that an `f64` still represents exactly (2^53 - 1)
pub const MAX_SAFE_CENTS: f64 = 9_007_199_254_740_991.0;

/// Payment status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    /// Every accepted status, in the order they are offered to users
    pub const ALL: [InvoiceStatus; 2] = [InvoiceStatus::Pending, InvoiceStatus::Paid];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known invoice statuses
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown invoice status '{0}'")]
pub struct ParseStatusError(pub String);

impl FromStr for InvoiceStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// A persisted invoice row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub customer_id: String,
    /// Amount in cents
    pub amount: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Values for a single invoice insert; the store assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

impl NewInvoice {
    pub fn into_invoice(self, id: Uuid) -> Invoice {
        Invoice {
            id,
            customer_id: self.customer_id,
            amount: self.amount,
            status: self.status,
            date: self.date,
        }
    }
}

/// Fields an update may change; id and date are never touched
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceChanges {
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
}

impl InvoiceChanges {
    pub fn apply_to(self, invoice: &mut Invoice) {
        invoice.customer_id = self.customer_id;
        invoice.amount = self.amount;
        invoice.status = self.status;
    }
}

/// A customer invoices refer to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

impl Customer {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            image_url: image_url.into(),
        }
    }
}

/// An invoice joined with its customer, as shown in listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub id: Uuid,
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub amount: i64,
    pub date: NaiveDate,
    pub status: InvoiceStatus,
}

impl InvoiceSummary {
    pub fn from_parts(invoice: &Invoice, customer: &Customer) -> Self {
        Self {
            id: invoice.id,
            customer_id: invoice.customer_id.clone(),
            name: customer.name.clone(),
            email: customer.email.clone(),
            image_url: customer.image_url.clone(),
            amount: invoice.amount,
            date: invoice.date,
            status: invoice.status,
        }
    }

    /// Case-insensitive match used by the invoice search box
    ///
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
            || self.amount.to_string().contains(needle)
            || self.date.to_string().contains(needle)
            || self.status.as_str().contains(needle)
    }
}

/// Invoice values prefilled into the edit form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceForm {
    pub id: Uuid,
    pub customer_id: String,
    /// Amount in dollars
    pub amount: f64,
    pub status: InvoiceStatus,
}

impl From<&Invoice> for InvoiceForm {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id,
            customer_id: invoice.customer_id.clone(),
            amount: cents_to_dollars(invoice.amount),
            status: invoice.status,
        }
    }
}

/// Figures shown on the dashboard summary cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardData {
    pub number_of_invoices: u64,
    pub number_of_customers: u64,
    pub total_paid_invoices: String,
    pub total_pending_invoices: String,
}

impl CardData {
    pub fn new(invoices: u64, customers: u64, paid_cents: i64, pending_cents: i64) -> Self {
        Self {
            number_of_invoices: invoices,
            number_of_customers: customers,
            total_paid_invoices: format_currency(paid_cents),
            total_pending_invoices: format_currency(pending_cents),
        }
    }
}

/// Convert a decimal amount to cents, `round(amount * 100)`
///
/// Returns `None` for non-finite amounts and for amounts whose cent value
/// would fall outside the exactly representable integer range.
pub fn dollars_to_cents(amount: f64) -> Option<i64> {
    let cents = (amount * 100.0).round();
    if !cents.is_finite() || cents.abs() > MAX_SAFE_CENTS {
        return None;
    }
    Some(cents as i64)
}

pub fn cents_to_dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Format cents as US dollars, e.g. `123450` -> `$1,234.50`
pub fn format_currency(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let dollars = (abs / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{:02}", sign, grouped, abs % 100)
}
