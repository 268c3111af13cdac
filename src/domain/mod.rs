//! Customer domain: the record shapes and the field rules they must satisfy.

pub mod customer;
pub mod validation;

pub use customer::{Customer, CustomerDto, CustomerFields, NewCustomer, DEFAULT_STATUS};
pub use validation::validate_fields;
