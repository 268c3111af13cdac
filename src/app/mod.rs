pub mod bootstrap;
pub mod customer_service;

pub use bootstrap::build_customer_service;
pub use customer_service::{CustomerService, ServiceError, ServiceResult};
