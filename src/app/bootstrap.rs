//! Wires a [`CustomerService`] from an [`AppConfig`].

use crate::app::CustomerService;
use crate::infra::config::{AppConfig, ValidatorMode};
use crate::infra::legacy::{ExternalValidator, SimulatedLegacyValidator, StubLegacyValidator};
use crate::storage::{CustomerStore, InMemoryCustomerStore, PgCustomerStore};
use std::sync::Arc;

/// Opens the configured store and pairs it with the configured validator.
pub async fn build_customer_service(config: &AppConfig) -> anyhow::Result<CustomerService> {
    let store: Arc<dyn CustomerStore> = match config.database_url.as_deref() {
        Some(url) => {
            let store = PgCustomerStore::connect(url, config.db_max_connections).await?;
            tracing::info!("using PostgreSQL customer store");
            Arc::new(store)
        }
        None if config.seed_demo_data => {
            tracing::info!("DATABASE_URL not set; using in-memory store with demo customers");
            Arc::new(InMemoryCustomerStore::with_demo_data())
        }
        None => {
            tracing::info!("DATABASE_URL not set; using empty in-memory store");
            Arc::new(InMemoryCustomerStore::new())
        }
    };

    let validator: Arc<dyn ExternalValidator> = match config.validator_mode {
        ValidatorMode::Stub => Arc::new(StubLegacyValidator),
        ValidatorMode::Simulated => Arc::new(SimulatedLegacyValidator::default()),
    };
    tracing::info!(mode = ?config.validator_mode, timeout = ?config.validator_timeout, "legacy validator ready");

    Ok(CustomerService::new(store, validator, config.validator_timeout))
}
