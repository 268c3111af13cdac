pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{build_customer_service, CustomerService, ServiceError};
pub use domain::{Customer, CustomerDto, CustomerFields};
pub use infra::config::AppConfig;
pub use storage::{CustomerStore, InMemoryCustomerStore, PgCustomerStore};
