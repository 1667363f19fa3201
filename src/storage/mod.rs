//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryInvoiceStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresInvoiceStore;

use crate::config::{StorageBackend, StorageConfig};
use crate::core::invoice::Customer;
use crate::core::store::InvoiceStore;
use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

/// Customers used to populate an empty dashboard
///
/// Ids are fixed so seeding the same database twice does not duplicate them.
pub fn demo_customers() -> Vec<Customer> {
    [
        ("3958dc9e-712f-4377-85e9-fec4b6a6442a", "Delba de Oliveira", "delba@oliveira.com"),
        ("3958dc9e-742f-4377-85e9-fec4b6a6442a", "Lee Robinson", "lee@robinson.com"),
        ("3958dc9e-737f-4377-85e9-fec4b6a6442a", "Hector Simpson", "hector@simpson.com"),
        ("50ca3e18-62cd-11ee-8c99-0242ac120002", "Steven Tey", "steven@tey.com"),
        ("3958dc9e-787f-4377-85e9-fec4b6a6442a", "Steph Dietz", "steph@dietz.com"),
        ("76d65c26-f784-44a2-ac19-586678f7c2f2", "Michael Novotny", "michael@novotny.com"),
    ]
    .into_iter()
    .map(|(id, name, email)| {
        let slug = name.to_lowercase().replace(' ', "-");
        Customer {
            id: Uuid::parse_str(id).unwrap_or_else(|_| Uuid::new_v4()),
            name: name.to_string(),
            email: email.to_string(),
            image_url: format!("/customers/{}.png", slug),
        }
    })
    .collect()
}

/// Insert the demo customers into `store`
pub async fn seed_demo_customers(store: &dyn InvoiceStore) -> Result<usize> {
    let customers = demo_customers();
    let count = customers.len();
    for customer in customers {
        store.insert_customer(customer).await?;
    }
    tracing::info!(count, "Seeded demo customers");
    Ok(count)
}

/// Open the store selected by the configuration
pub async fn open(config: &StorageConfig) -> Result<Arc<dyn InvoiceStore>> {
    let store: Arc<dyn InvoiceStore> = match config.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory invoice store");
            Arc::new(InMemoryInvoiceStore::new())
        }
        StorageBackend::Postgres => open_postgres(config).await?,
    };

    if config.seed_demo_data {
        seed_demo_customers(store.as_ref()).await?;
    }

    Ok(store)
}

#[cfg(feature = "postgres")]
async fn open_postgres(config: &StorageConfig) -> Result<Arc<dyn InvoiceStore>> {
    use sqlx::postgres::PgPoolOptions;

    let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("storage.database_url is required for the postgres backend"))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(url)
        .await?;
    postgres::migrate(&pool).await?;

    tracing::info!(max_connections = config.max_connections, "Connected to PostgreSQL");
    Ok(Arc::new(PostgresInvoiceStore::new(pool)))
}

#[cfg(not(feature = "postgres"))]
async fn open_postgres(_config: &StorageConfig) -> Result<Arc<dyn InvoiceStore>> {
    anyhow::bail!("the postgres backend requires building with the `postgres` feature")
}
