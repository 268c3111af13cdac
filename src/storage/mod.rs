//! Customer record storage.
//!
//! The service only talks to the [`CustomerStore`] trait. Two implementations
//! are provided: Postgres for deployments and an in-memory map for demos and
//! tests.

use crate::domain::{Customer, NewCustomer};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCustomerStore;
pub use postgres::PgCustomerStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The write would give two customers the same tax id.
    #[error("tax id {0} is already held by another customer")]
    TaxIdTaken(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Single-row persistence for customers.
///
/// Implementations enforce tax id uniqueness on every write. Callers are
/// still expected to pre-check where the business flow requires it.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// All customers, ordered by name then id.
    async fn list(&self) -> StoreResult<Vec<Customer>>;

    async fn get(&self, id: i32) -> StoreResult<Option<Customer>>;

    async fn find_by_tax_id(&self, tax_id: &str) -> StoreResult<Option<Customer>>;

    async fn tax_id_exists(&self, tax_id: &str) -> StoreResult<bool>;

    /// Inserts the row and returns it with its assigned id.
    async fn insert(&self, customer: NewCustomer) -> StoreResult<Customer>;

    /// Overwrites the row with the same id. Returns `None` if it no longer exists.
    async fn update(&self, customer: &Customer) -> StoreResult<Option<Customer>>;

    /// Returns `true` if a row was removed.
    async fn delete(&self, id: i32) -> StoreResult<bool>;
}
