//! In-process customer store.

use super::{CustomerStore, StoreError, StoreResult};
use crate::domain::{Customer, NewCustomer, DEFAULT_STATUS};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// First id handed out by an empty store.
const FIRST_ID: i32 = 1;

struct Inner {
    rows: BTreeMap<i32, Customer>,
    next_id: i32,
}

/// A `BTreeMap` behind a tokio `RwLock`. Each operation holds the lock for
/// one map access, so the store itself never exposes torn rows.
pub struct InMemoryCustomerStore {
    inner: RwLock<Inner>,
}

impl Default for InMemoryCustomerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                rows: BTreeMap::new(),
                next_id: FIRST_ID,
            }),
        }
    }

    /// Builds a store pre-populated with `rows`; new ids continue after the highest one.
    pub fn with_customers(rows: Vec<Customer>) -> Self {
        let next_id = rows.iter().map(|c| c.id + 1).max().unwrap_or(FIRST_ID);
        Self {
            inner: RwLock::new(Inner {
                rows: rows.into_iter().map(|c| (c.id, c)).collect(),
                next_id,
            }),
        }
    }

    /// The three demo customers the front-end expects.
    pub fn with_demo_data() -> Self {
        Self::with_customers(demo_customers())
    }
}

fn holder_of<'a>(rows: &'a BTreeMap<i32, Customer>, tax_id: &str) -> Option<&'a Customer> {
    rows.values().find(|c| c.tax_id == tax_id)
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn list(&self) -> StoreResult<Vec<Customer>> {
        let inner = self.inner.read().await;
        let mut all: Vec<Customer> = inner.rows.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn get(&self, id: i32) -> StoreResult<Option<Customer>> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn find_by_tax_id(&self, tax_id: &str) -> StoreResult<Option<Customer>> {
        let inner = self.inner.read().await;
        Ok(holder_of(&inner.rows, tax_id).cloned())
    }

    async fn tax_id_exists(&self, tax_id: &str) -> StoreResult<bool> {
        let inner = self.inner.read().await;
        Ok(holder_of(&inner.rows, tax_id).is_some())
    }

    async fn insert(&self, customer: NewCustomer) -> StoreResult<Customer> {
        let mut inner = self.inner.write().await;
        if holder_of(&inner.rows, &customer.tax_id).is_some() {
            return Err(StoreError::TaxIdTaken(customer.tax_id));
        }
        let id = inner.next_id;
        inner.next_id += 1;
        let row = customer.into_customer(id);
        inner.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, customer: &Customer) -> StoreResult<Option<Customer>> {
        let mut inner = self.inner.write().await;
        if let Some(other) = holder_of(&inner.rows, &customer.tax_id) {
            if other.id != customer.id {
                return Err(StoreError::TaxIdTaken(customer.tax_id.clone()));
            }
        }
        match inner.rows.get_mut(&customer.id) {
            Some(slot) => {
                *slot = customer.clone();
                Ok(Some(customer.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i32) -> StoreResult<bool> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }
}

fn demo_customers() -> Vec<Customer> {
    let now = Utc::now();
    let demo = |id: i32,
                name: &str,
                phone: &str,
                email: Option<&str>,
                address: &str,
                tax_id: &str,
                created_days_ago: i64,
                updated_days_ago: i64| Customer {
        id,
        name: name.to_string(),
        phone: Some(phone.to_string()),
        email: email.map(str::to_string),
        address: address.to_string(),
        tax_id: tax_id.to_string(),
        created_at: now - Duration::days(created_days_ago),
        updated_at: now - Duration::days(updated_days_ago),
        status: DEFAULT_STATUS.to_string(),
    };

    vec![
        demo(
            1001,
            "John Doe",
            "555-123-4567",
            Some("john.doe@example.com"),
            "123 Main Street, Anytown, ST 12345",
            "12345678901",
            5,
            1,
        ),
        demo(
            1002,
            "Jane Smith",
            "555-234-5678",
            Some("jane.smith@example.com"),
            "456 Oak Avenue, Springfield, IL 62701",
            "23456789012",
            3,
            3,
        ),
        demo(
            1003,
            "Robert Johnson",
            "555-345-6789",
            None,
            "789 Pine Street, Metro City, NY 10001",
            "34567890123",
            7,
            2,
        ),
    ]
}
