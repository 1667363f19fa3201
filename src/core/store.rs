//! Storage trait for invoices and the customers they reference

use crate::core::invoice::{
    CardData, Customer, InvoiceChanges, InvoiceForm, InvoiceSummary, NewInvoice,
};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Rows per page of the invoice listing
pub const ITEMS_PER_PAGE: u32 = 6;

/// Persistence handle for the dashboard
///
/// Every write is a single statement; the store is the only owner of invoice
/// state. Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert an invoice and return the id the store assigned to it
    async fn insert_invoice(&self, invoice: NewInvoice) -> Result<Uuid>;

    /// Update customer, amount and status of one invoice
    ///
    /// Returns the number of affected rows.
    async fn update_invoice(&self, id: &Uuid, changes: InvoiceChanges) -> Result<u64>;

    /// Delete one invoice, returning the number of affected rows
    ///
    /// Deleting an id that does not exist affects zero rows and is not an error.
    async fn delete_invoice(&self, id: &Uuid) -> Result<u64>;

    /// Insert a customer (seeding and tests)
    async fn insert_customer(&self, customer: Customer) -> Result<Customer>;

    /// All customers, ordered by name
    async fn fetch_customers(&self) -> Result<Vec<Customer>>;

    /// One invoice with its amount in dollars, for the edit form
    async fn fetch_invoice_by_id(&self, id: &Uuid) -> Result<Option<InvoiceForm>>;

    /// The most recent invoices, newest first
    async fn fetch_latest_invoices(&self, limit: u32) -> Result<Vec<InvoiceSummary>>;

    /// One page (1-based) of invoices matching `query`, newest first
    async fn fetch_filtered_invoices(&self, query: &str, page: u32)
    -> Result<Vec<InvoiceSummary>>;

    /// Number of listing pages for `query`
    async fn fetch_invoice_pages(&self, query: &str) -> Result<u32>;

    /// Counts and totals for the summary cards
    async fn fetch_card_data(&self) -> Result<CardData>;
}

/// Row offset of a 1-based page; page 0 is treated as page 1
pub fn page_offset(page: u32) -> u32 {
    page.max(1).saturating_sub(1).saturating_mul(ITEMS_PER_PAGE)
}

/// Pages needed to show `matches` rows
pub fn total_pages(matches: u64) -> u32 {
    matches.div_ceil(u64::from(ITEMS_PER_PAGE)) as u32
}
