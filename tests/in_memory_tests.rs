//! Integration tests for InMemoryInvoiceStore using the store test harness.
//!
//! This file invokes `invoice_store_tests!` to validate that
//! InMemoryInvoiceStore fully conforms to the InvoiceStore contract.

#[macro_use]
mod store_harness;

use dashboard::storage::InMemoryInvoiceStore;
use store_harness::*;

invoice_store_tests!(InMemoryInvoiceStore::new());
