//! Shared contract tests for `InvoiceStore` backends.
//!
//! `invoice_store_tests!` expands into a module of `#[tokio::test]` functions
//! run against whatever store the factory expression produces. Each backend's
//! test file invokes it once:
//!
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//!
//! invoice_store_tests!(InMemoryInvoiceStore::new());
//! ```

#![allow(dead_code)]

use chrono::NaiveDate;
use dashboard::core::invoice::{Customer, InvoiceStatus, NewInvoice};

/// Fixed calendar day `2024-01-<day>`
pub fn day(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

pub fn customer(name: &str) -> Customer {
    let slug = name.to_lowercase().replace(' ', "-");
    Customer::new(
        name,
        format!("{}@example.com", slug),
        format!("/customers/{}.png", slug),
    )
}

pub fn new_invoice(
    customer: &Customer,
    amount: i64,
    status: InvoiceStatus,
    date: NaiveDate,
) -> NewInvoice {
    NewInvoice {
        customer_id: customer.id.to_string(),
        amount,
        status,
        date,
    }
}

/// Generate the `InvoiceStore` contract suite.
///
/// `$factory` must produce an empty `impl InvoiceStore + 'static`.
///
/// # Generated Tests
///
/// ## Writes
/// - `test_insert_then_fetch_by_id`: amount comes back in dollars
/// - `test_insert_rejects_malformed_customer_id`
/// - `test_update_replaces_fields` / `test_update_missing_row_affects_nothing`
/// - `test_delete_is_idempotent`
///
/// ## Reads
/// - `test_fetch_customers_sorted_by_name`
/// - `test_latest_invoices_newest_first`
/// - `test_filtered_search_is_case_insensitive`
/// - `test_filtered_pagination`
/// - `test_card_data_totals`
#[macro_export]
macro_rules! invoice_store_tests {
    ($factory:expr) => {
        mod invoice_store_contract {
            use super::*;
            use dashboard::core::invoice::{InvoiceChanges, InvoiceStatus};
            use dashboard::core::store::{ITEMS_PER_PAGE, InvoiceStore};
            use uuid::Uuid;

            // ==============================================================
            // Writes
            // ==============================================================

            #[tokio::test]
            async fn test_insert_then_fetch_by_id() {
                let store = $factory;
                let amy = store.insert_customer(customer("Amy Burns")).await.unwrap();

                let id = store
                    .insert_invoice(new_invoice(&amy, 4999, InvoiceStatus::Pending, day(5)))
                    .await
                    .unwrap();

                let form = store.fetch_invoice_by_id(&id).await.unwrap().unwrap();
                assert_eq!(form.id, id);
                assert_eq!(form.customer_id, amy.id.to_string());
                assert_eq!(form.amount, 49.99);
                assert_eq!(form.status, InvoiceStatus::Pending);
            }

            #[tokio::test]
            async fn test_insert_rejects_malformed_customer_id() {
                let store = $factory;
                let mut invoice = new_invoice(&customer("Ghost"), 100, InvoiceStatus::Paid, day(1));
                invoice.customer_id = "not-a-uuid".to_string();

                assert!(store.insert_invoice(invoice).await.is_err());
            }

            #[tokio::test]
            async fn test_update_replaces_fields() {
                let store = $factory;
                let amy = store.insert_customer(customer("Amy Burns")).await.unwrap();
                let lee = store.insert_customer(customer("Lee Robinson")).await.unwrap();
                let id = store
                    .insert_invoice(new_invoice(&amy, 100, InvoiceStatus::Pending, day(3)))
                    .await
                    .unwrap();

                let rows = store
                    .update_invoice(
                        &id,
                        InvoiceChanges {
                            customer_id: lee.id.to_string(),
                            amount: 250,
                            status: InvoiceStatus::Paid,
                        },
                    )
                    .await
                    .unwrap();

                assert_eq!(rows, 1);
                let form = store.fetch_invoice_by_id(&id).await.unwrap().unwrap();
                assert_eq!(form.customer_id, lee.id.to_string());
                assert_eq!(form.amount, 2.5);
                assert_eq!(form.status, InvoiceStatus::Paid);

                let latest = store.fetch_latest_invoices(1).await.unwrap();
                assert_eq!(latest[0].date, day(3));
            }

            #[tokio::test]
            async fn test_update_missing_row_affects_nothing() {
                let store = $factory;
                let amy = store.insert_customer(customer("Amy Burns")).await.unwrap();

                let rows = store
                    .update_invoice(
                        &Uuid::new_v4(),
                        InvoiceChanges {
                            customer_id: amy.id.to_string(),
                            amount: 1,
                            status: InvoiceStatus::Paid,
                        },
                    )
                    .await
                    .unwrap();

                assert_eq!(rows, 0);
            }

            #[tokio::test]
            async fn test_delete_is_idempotent() {
                let store = $factory;
                let amy = store.insert_customer(customer("Amy Burns")).await.unwrap();
                let id = store
                    .insert_invoice(new_invoice(&amy, 100, InvoiceStatus::Paid, day(1)))
                    .await
                    .unwrap();

                assert_eq!(store.delete_invoice(&id).await.unwrap(), 1);
                assert_eq!(store.delete_invoice(&id).await.unwrap(), 0);
                assert!(store.fetch_invoice_by_id(&id).await.unwrap().is_none());
            }

            // ==============================================================
            // Reads
            // ==============================================================

            #[tokio::test]
            async fn test_fetch_customers_sorted_by_name() {
                let store = $factory;
                store.insert_customer(customer("Steph Dietz")).await.unwrap();
                store.insert_customer(customer("Amy Burns")).await.unwrap();
                store.insert_customer(customer("Lee Robinson")).await.unwrap();

                let names: Vec<String> = store
                    .fetch_customers()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|c| c.name)
                    .collect();

                assert_eq!(names, vec!["Amy Burns", "Lee Robinson", "Steph Dietz"]);
            }

            #[tokio::test]
            async fn test_latest_invoices_newest_first() {
                let store = $factory;
                let amy = store.insert_customer(customer("Amy Burns")).await.unwrap();
                for d in [3, 9, 1, 7] {
                    store
                        .insert_invoice(new_invoice(&amy, 100 * d as i64, InvoiceStatus::Paid, day(d)))
                        .await
                        .unwrap();
                }

                let latest = store.fetch_latest_invoices(3).await.unwrap();

                let dates: Vec<_> = latest.iter().map(|s| s.date).collect();
                assert_eq!(dates, vec![day(9), day(7), day(3)]);
                assert_eq!(latest[0].name, "Amy Burns");
                assert_eq!(latest[0].email, "amy-burns@example.com");
            }

            #[tokio::test]
            async fn test_filtered_search_is_case_insensitive() {
                let store = $factory;
                let amy = store.insert_customer(customer("Amy Burns")).await.unwrap();
                let lee = store.insert_customer(customer("Lee Robinson")).await.unwrap();
                store
                    .insert_invoice(new_invoice(&amy, 1500, InvoiceStatus::Pending, day(2)))
                    .await
                    .unwrap();
                store
                    .insert_invoice(new_invoice(&lee, 2000, InvoiceStatus::Paid, day(4)))
                    .await
                    .unwrap();

                let by_name = store.fetch_filtered_invoices("amy", 1).await.unwrap();
                assert_eq!(by_name.len(), 1);
                assert_eq!(by_name[0].customer_id, amy.id.to_string());

                let by_status = store.fetch_filtered_invoices("PAID", 1).await.unwrap();
                assert_eq!(by_status.len(), 1);
                assert_eq!(by_status[0].customer_id, lee.id.to_string());

                let everything = store.fetch_filtered_invoices("", 1).await.unwrap();
                assert_eq!(everything.len(), 2);

                assert!(store.fetch_filtered_invoices("zzz", 1).await.unwrap().is_empty());
                assert_eq!(store.fetch_invoice_pages("zzz").await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_filtered_pagination() {
                let store = $factory;
                let amy = store.insert_customer(customer("Amy Burns")).await.unwrap();
                for d in 1..=8 {
                    store
                        .insert_invoice(new_invoice(&amy, 100, InvoiceStatus::Pending, day(d)))
                        .await
                        .unwrap();
                }

                let first = store.fetch_filtered_invoices("", 1).await.unwrap();
                let second = store.fetch_filtered_invoices("", 2).await.unwrap();
                let third = store.fetch_filtered_invoices("", 3).await.unwrap();

                assert_eq!(first.len(), ITEMS_PER_PAGE as usize);
                assert_eq!(second.len(), 2);
                assert!(third.is_empty());
                assert_eq!(first[0].date, day(8));
                assert_eq!(second[1].date, day(1));
                assert_eq!(store.fetch_invoice_pages("").await.unwrap(), 2);
            }

            #[tokio::test]
            async fn test_card_data_totals() {
                let store = $factory;
                let amy = store.insert_customer(customer("Amy Burns")).await.unwrap();
                store.insert_customer(customer("Lee Robinson")).await.unwrap();
                store
                    .insert_invoice(new_invoice(&amy, 123450, InvoiceStatus::Paid, day(1)))
                    .await
                    .unwrap();
                store
                    .insert_invoice(new_invoice(&amy, 2500, InvoiceStatus::Pending, day(2)))
                    .await
                    .unwrap();

                let cards = store.fetch_card_data().await.unwrap();

                assert_eq!(cards.number_of_invoices, 2);
                assert_eq!(cards.number_of_customers, 2);
                assert_eq!(cards.total_paid_invoices, "$1,234.50");
                assert_eq!(cards.total_pending_invoices, "$25.00");
            }
        }
    };
}
