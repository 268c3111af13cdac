//! PostgreSQL store round trip.
//!
//! Requires a reachable database:
//! DATABASE_URL=postgres://... cargo test --test test_postgres_store -- --ignored --nocapture

use chrono::Utc;
use customer_update_service::domain::{CustomerFields, NewCustomer};
use customer_update_service::storage::StoreError;
use customer_update_service::{CustomerStore, PgCustomerStore};

fn new_customer(name: &str, tax_id: &str) -> NewCustomer {
    NewCustomer::from_fields(
        CustomerFields {
            name: Some(name.to_string()),
            phone: Some("555-000-1111".to_string()),
            email: None,
            address: Some("1 Integration Avenue".to_string()),
            tax_id: Some(tax_id.to_string()),
        },
        Utc::now(),
    )
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at a scratch PostgreSQL database"]
async fn test_pg_store_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")?;
    let store = PgCustomerStore::connect(&database_url, 2).await?;
    sqlx::query("DELETE FROM customers WHERE tax_id IN ('90000000001', '90000000002')")
        .execute(store.pool())
        .await?;

    let a = store.insert(new_customer("Pg Alpha", "90000000001")).await?;
    assert_eq!(a.status, "Active");
    assert!(store.tax_id_exists("90000000001").await?);
    assert_eq!(store.get(a.id).await?.map(|c| c.tax_id), Some("90000000001".to_string()));

    // The unique index rejects a second holder of the same tax id.
    let dup = store.insert(new_customer("Pg Beta", "90000000001")).await;
    assert!(matches!(dup, Err(StoreError::TaxIdTaken(_))));

    let mut b = store.insert(new_customer("Pg Beta", "90000000002")).await?;
    b.tax_id = "90000000001".to_string();
    assert!(matches!(store.update(&b).await, Err(StoreError::TaxIdTaken(_))));

    b.tax_id = "90000000002".to_string();
    b.name = "Pg Beta Renamed".to_string();
    b.updated_at = Utc::now();
    let updated = store.update(&b).await?.expect("row exists");
    assert_eq!(updated.name, "Pg Beta Renamed");
    assert_eq!(updated.created_at, b.created_at);

    assert!(store.delete(a.id).await?);
    assert!(!store.delete(a.id).await?);
    assert!(store.delete(b.id).await?);
    assert!(store.find_by_tax_id("90000000002").await?.is_none());

    Ok(())
}
