//! Persistent customer store using PostgreSQL.

use super::{CustomerStore, StoreError, StoreResult};
use crate::domain::{Customer, NewCustomer};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

const COLUMNS: &str = "id, name, phone, email, address, tax_id, created_at, updated_at, status";

/// A customer store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url` and makes sure the `customers` table exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `customers` table if it is missing.
    ///
    /// The unique index on `tax_id` backs the uniqueness invariant for
    /// concurrent writers that both pass the service-level check.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS customers (
                id SERIAL PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                phone TEXT,
                email TEXT,
                address VARCHAR(500) NOT NULL,
                tax_id VARCHAR(11) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                status VARCHAR(20) NOT NULL DEFAULT 'Active',
                CONSTRAINT customers_tax_id_key UNIQUE (tax_id)
            )",
        )
        .execute(&self.pool)
        .await?;
        tracing::debug!("customers table ready");
        Ok(())
    }

    /// Returns `true` if the `customers` table is present in the `public` schema.
    pub async fn schema_present(&self) -> StoreResult<bool> {
        let present: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = 'customers'
            )",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(present)
    }
}

/// Maps a unique-constraint violation on `tax_id` to [`StoreError::TaxIdTaken`].
fn map_write_error(err: sqlx::Error, tax_id: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::TaxIdTaken(tax_id.to_string())
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn list(&self) -> StoreResult<Vec<Customer>> {
        let sql = format!("SELECT {} FROM customers ORDER BY name, id", COLUMNS);
        Ok(sqlx::query_as::<_, Customer>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get(&self, id: i32) -> StoreResult<Option<Customer>> {
        let sql = format!("SELECT {} FROM customers WHERE id = $1", COLUMNS);
        Ok(sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_tax_id(&self, tax_id: &str) -> StoreResult<Option<Customer>> {
        let sql = format!("SELECT {} FROM customers WHERE tax_id = $1", COLUMNS);
        Ok(sqlx::query_as::<_, Customer>(&sql)
            .bind(tax_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn tax_id_exists(&self, tax_id: &str) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM customers WHERE tax_id = $1)")
                .bind(tax_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn insert(&self, customer: NewCustomer) -> StoreResult<Customer> {
        let sql = format!(
            "INSERT INTO customers (name, phone, email, address, tax_id, created_at, updated_at, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {}",
            COLUMNS
        );
        sqlx::query_as::<_, Customer>(&sql)
            .bind(&customer.name)
            .bind(&customer.phone)
            .bind(&customer.email)
            .bind(&customer.address)
            .bind(&customer.tax_id)
            .bind(customer.created_at)
            .bind(customer.updated_at)
            .bind(&customer.status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &customer.tax_id))
    }

    async fn update(&self, customer: &Customer) -> StoreResult<Option<Customer>> {
        let sql = format!(
            "UPDATE customers
             SET name = $2, phone = $3, email = $4, address = $5, tax_id = $6, updated_at = $7
             WHERE id = $1
             RETURNING {}",
            COLUMNS
        );
        sqlx::query_as::<_, Customer>(&sql)
            .bind(customer.id)
            .bind(&customer.name)
            .bind(&customer.phone)
            .bind(&customer.email)
            .bind(&customer.address)
            .bind(&customer.tax_id)
            .bind(customer.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &customer.tax_id))
    }

    async fn delete(&self, id: i32) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
