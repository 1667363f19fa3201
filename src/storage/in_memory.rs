//! In-memory implementation of InvoiceStore for testing and development

use crate::core::invoice::{
    CardData, Customer, Invoice, InvoiceChanges, InvoiceForm, InvoiceStatus, InvoiceSummary,
    NewInvoice,
};
use crate::core::store::{ITEMS_PER_PAGE, InvoiceStore, page_offset, total_pages};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

/// In-memory invoice store
///
/// Useful for testing and development. Uses RwLock for thread-safe access and
/// keeps invoices in insertion order so listings are stable.
///
/// Customer ids on invoices must parse as UUIDs, mirroring the column type of
/// the PostgreSQL store; anything else fails the write.
#[derive(Clone, Default)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<IndexMap<Uuid, Invoice>>>,
    customers: Arc<RwLock<HashMap<Uuid, Customer>>>,
}

impl InMemoryInvoiceStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored invoice, in insertion order
    pub fn invoices(&self) -> Vec<Invoice> {
        self.invoices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Invoices joined with their customers, newest first
    ///
    /// Invoices whose customer is unknown are left out, like an inner join.
    fn summaries(&self) -> Result<Vec<InvoiceSummary>> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        let customers = self
            .customers
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut summaries: Vec<InvoiceSummary> = invoices
            .values()
            .rev()
            .filter_map(|invoice| {
                let customer_id = Uuid::parse_str(&invoice.customer_id).ok()?;
                let customer = customers.get(&customer_id)?;
                Some(InvoiceSummary::from_parts(invoice, customer))
            })
            .collect();
        // Stable: same-day invoices stay newest-inserted first
        summaries.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(summaries)
    }

    fn filtered(&self, query: &str) -> Result<Vec<InvoiceSummary>> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .summaries()?
            .into_iter()
            .filter(|summary| summary.matches(&needle))
            .collect())
    }
}

fn parse_customer_id(customer_id: &str) -> Result<()> {
    Uuid::parse_str(customer_id)
        .map(|_| ())
        .map_err(|e| anyhow!("invalid customer id '{}': {}", customer_id, e))
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn insert_invoice(&self, invoice: NewInvoice) -> Result<Uuid> {
        parse_customer_id(&invoice.customer_id)?;

        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let id = Uuid::new_v4();
        invoices.insert(id, invoice.into_invoice(id));

        Ok(id)
    }

    async fn update_invoice(&self, id: &Uuid, changes: InvoiceChanges) -> Result<u64> {
        parse_customer_id(&changes.customer_id)?;

        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        match invoices.get_mut(id) {
            Some(invoice) => {
                changes.apply_to(invoice);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_invoice(&self, id: &Uuid) -> Result<u64> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(invoices.shift_remove(id).map_or(0, |_| 1))
    }

    async fn insert_customer(&self, customer: Customer) -> Result<Customer> {
        let mut customers = self
            .customers
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        customers.insert(customer.id, customer.clone());

        Ok(customer)
    }

    async fn fetch_customers(&self) -> Result<Vec<Customer>> {
        let customers = self
            .customers
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut list: Vec<Customer> = customers.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    async fn fetch_invoice_by_id(&self, id: &Uuid) -> Result<Option<InvoiceForm>> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(invoices.get(id).map(InvoiceForm::from))
    }

    async fn fetch_latest_invoices(&self, limit: u32) -> Result<Vec<InvoiceSummary>> {
        Ok(self
            .summaries()?
            .into_iter()
            .take(limit as usize)
            .collect())
    }

    async fn fetch_filtered_invoices(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Vec<InvoiceSummary>> {
        Ok(self
            .filtered(query)?
            .into_iter()
            .skip(page_offset(page) as usize)
            .take(ITEMS_PER_PAGE as usize)
            .collect())
    }

    async fn fetch_invoice_pages(&self, query: &str) -> Result<u32> {
        Ok(total_pages(self.filtered(query)?.len() as u64))
    }

    async fn fetch_card_data(&self) -> Result<CardData> {
        let invoices = self
            .invoices
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        let customers = self
            .customers
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let total_for = |status: InvoiceStatus| -> i64 {
            invoices
                .values()
                .filter(|invoice| invoice.status == status)
                .map(|invoice| invoice.amount)
                .sum()
        };

        Ok(CardData::new(
            invoices.len() as u64,
            customers.len() as u64,
            total_for(InvoiceStatus::Paid),
            total_for(InvoiceStatus::Pending),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn new_invoice(customer: &Customer, amount: i64, status: InvoiceStatus, date: NaiveDate) -> NewInvoice {
        NewInvoice {
            customer_id: customer.id.to_string(),
            amount,
            status,
            date,
        }
    }

    async fn store_with_customer() -> (InMemoryInvoiceStore, Customer) {
        let store = InMemoryInvoiceStore::new();
        let customer = store
            .insert_customer(Customer::new("Delba de Oliveira", "delba@oliveira.com", "/d.png"))
            .await
            .unwrap();
        (store, customer)
    }

    #[tokio::test]
    async fn test_invoices_snapshot_survives_poisoned_lock() {
        let (store, customer) = store_with_customer().await;
        store
            .insert_invoice(new_invoice(&customer, 500, InvoiceStatus::Paid, day(2)))
            .await
            .unwrap();

        let invoices = store.invoices.clone();
        let _ = std::thread::spawn(move || {
            let _guard = invoices.write().unwrap();
            panic!("writer panicked while holding the lock");
        })
        .join();
        assert!(store.invoices.is_poisoned());

        let snapshot = store.invoices();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].amount, 500);
    }

    #[tokio::test]
    async fn test_insert_assigns_id() {
        let (store, customer) = store_with_customer().await;

        let id = store
            .insert_invoice(new_invoice(&customer, 500, InvoiceStatus::Paid, day(1)))
            .await
            .unwrap();

        let invoices = store.invoices();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].id, id);
    }

    #[tokio::test]
    async fn test_insert_rejects_non_uuid_customer() {
        let store = InMemoryInvoiceStore::new();
        let result = store
            .insert_invoice(NewInvoice {
                customer_id: "not-a-uuid".into(),
                amount: 1,
                status: InvoiceStatus::Paid,
                date: day(1),
            })
            .await;

        assert!(result.is_err());
        assert!(store.invoices().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_row_affects_nothing() {
        let (store, customer) = store_with_customer().await;

        let rows = store
            .update_invoice(
                &Uuid::new_v4(),
                InvoiceChanges {
                    customer_id: customer.id.to_string(),
                    amount: 1,
                    status: InvoiceStatus::Paid,
                },
            )
            .await
            .unwrap();

        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let (store, customer) = store_with_customer().await;
        let id = store
            .insert_invoice(new_invoice(&customer, 500, InvoiceStatus::Paid, day(1)))
            .await
            .unwrap();

        assert_eq!(store.delete_invoice(&id).await.unwrap(), 1);
        assert_eq!(store.delete_invoice(&id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_latest_orders_by_date_then_insertion() {
        let (store, customer) = store_with_customer().await;
        let older = store
            .insert_invoice(new_invoice(&customer, 1, InvoiceStatus::Paid, day(1)))
            .await
            .unwrap();
        let first_today = store
            .insert_invoice(new_invoice(&customer, 2, InvoiceStatus::Paid, day(9)))
            .await
            .unwrap();
        let second_today = store
            .insert_invoice(new_invoice(&customer, 3, InvoiceStatus::Paid, day(9)))
            .await
            .unwrap();

        let ids: Vec<Uuid> = store
            .fetch_latest_invoices(5)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();

        assert_eq!(ids, vec![second_today, first_today, older]);
    }

    #[tokio::test]
    async fn test_filtered_pagination() {
        let (store, customer) = store_with_customer().await;
        for d in 1..=8 {
            store
                .insert_invoice(new_invoice(&customer, 100 * d as i64, InvoiceStatus::Pending, day(d)))
                .await
                .unwrap();
        }

        assert_eq!(store.fetch_filtered_invoices("", 1).await.unwrap().len(), 6);
        assert_eq!(store.fetch_filtered_invoices("", 2).await.unwrap().len(), 2);
        assert!(store.fetch_filtered_invoices("", 3).await.unwrap().is_empty());
        assert_eq!(store.fetch_invoice_pages("").await.unwrap(), 2);
        assert_eq!(store.fetch_invoice_pages("DELBA").await.unwrap(), 2);
        assert_eq!(store.fetch_invoice_pages("nobody").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_card_data_totals() {
        let (store, customer) = store_with_customer().await;
        store
            .insert_invoice(new_invoice(&customer, 12_345, InvoiceStatus::Paid, day(1)))
            .await
            .unwrap();
        store
            .insert_invoice(new_invoice(&customer, 55, InvoiceStatus::Pending, day(2)))
            .await
            .unwrap();

        let cards = store.fetch_card_data().await.unwrap();

        assert_eq!(cards.number_of_invoices, 2);
        assert_eq!(cards.number_of_customers, 1);
        assert_eq!(cards.total_paid_invoices, "$123.45");
        assert_eq!(cards.total_pending_invoices, "$0.55");
    }

    #[tokio::test]
    async fn test_fetch_invoice_by_id_in_dollars() {
        let (store, customer) = store_with_customer().await;
        let id = store
            .insert_invoice(new_invoice(&customer, 4999, InvoiceStatus::Pending, day(1)))
            .await
            .unwrap();

        let form = store.fetch_invoice_by_id(&id).await.unwrap().unwrap();

        assert_eq!(form.amount, 49.99);
        assert_eq!(form.customer_id, customer.id.to_string());
        assert!(store.fetch_invoice_by_id(&Uuid::new_v4()).await.unwrap().is_none());
    }
}
