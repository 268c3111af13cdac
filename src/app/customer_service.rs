//! Customer orchestration.
//!
//! Each operation is a straight line: field validation, then the flow-specific
//! check (legacy validation on create, duplicate tax id on update), then one
//! store call. Create and update are deliberately asymmetric: create never
//! pre-checks the tax id and update never calls the legacy system.

use crate::domain::{validate_fields, Customer, CustomerFields, NewCustomer};
use crate::infra::legacy::{ExternalValidator, ValidationRequest, ValidatorError};
use crate::storage::{CustomerStore, StoreError};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    #[error("legacy validation failed: {message}")]
    ExternalValidationFailed { message: String, errors: Vec<String> },

    #[error("customer with ID {0} does not exist")]
    NotFound(i32),

    #[error("tax id {0} is already held by another customer")]
    DuplicateTaxId(String),

    #[error("legacy validator did not answer within {0:?}")]
    ValidatorTimeout(Duration),

    #[error(transparent)]
    Validator(#[from] ValidatorError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TaxIdTaken(tax_id) => ServiceError::DuplicateTaxId(tax_id),
            other => ServiceError::Store(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// The customer use cases, wired to a store and a legacy validator.
pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
    validator: Arc<dyn ExternalValidator>,
    validator_timeout: Option<Duration>,
}

impl CustomerService {
    pub fn new(
        store: Arc<dyn CustomerStore>,
        validator: Arc<dyn ExternalValidator>,
        validator_timeout: Option<Duration>,
    ) -> Self {
        Self {
            store,
            validator,
            validator_timeout,
        }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Customer>> {
        Ok(self.store.list().await?)
    }

    pub async fn get(&self, id: i32) -> ServiceResult<Customer> {
        self.store.get(id).await?.ok_or(ServiceError::NotFound(id))
    }

    pub async fn create(&self, fields: CustomerFields) -> ServiceResult<Customer> {
        let violations = validate_fields(&fields);
        if !violations.is_empty() {
            return Err(ServiceError::ValidationFailed(violations));
        }

        let verdict = self.call_validator(&fields).await?;
        if !verdict.valid {
            tracing::info!(
                tax_id = fields.tax_id.as_deref().unwrap_or_default(),
                message = %verdict.message,
                "legacy system rejected customer"
            );
            return Err(ServiceError::ExternalValidationFailed {
                message: verdict.message,
                errors: verdict.errors,
            });
        }

        let created = self
            .store
            .insert(NewCustomer::from_fields(fields, Utc::now()))
            .await?;
        tracing::info!(id = created.id, tax_id = %created.tax_id, "customer created");
        Ok(created)
    }

    pub async fn update(&self, id: i32, fields: CustomerFields) -> ServiceResult<Customer> {
        let violations = validate_fields(&fields);
        if !violations.is_empty() {
            return Err(ServiceError::ValidationFailed(violations));
        }

        let mut customer = self.get(id).await?;

        let tax_id = fields.tax_id.clone().unwrap_or_default();
        if let Some(holder) = self.store.find_by_tax_id(&tax_id).await? {
            if holder.id != id {
                return Err(ServiceError::DuplicateTaxId(tax_id));
            }
        }

        customer.apply(fields, Utc::now());
        let updated = self
            .store
            .update(&customer)
            .await?
            .ok_or(ServiceError::NotFound(id))?;
        tracing::info!(id, "customer updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> ServiceResult<()> {
        if !self.store.delete(id).await? {
            return Err(ServiceError::NotFound(id));
        }
        tracing::info!(id, "customer deleted");
        Ok(())
    }

    /// `true` when no customer holds `tax_id` yet.
    pub async fn check_tax_id_available(&self, tax_id: &str) -> ServiceResult<bool> {
        Ok(!self.store.tax_id_exists(tax_id).await?)
    }

    async fn call_validator(
        &self,
        fields: &CustomerFields,
    ) -> ServiceResult<crate::infra::legacy::LegacyVerdict> {
        let request = ValidationRequest {
            name: fields.name.as_deref().unwrap_or_default(),
            phone: fields.phone.as_deref(),
            email: fields.email.as_deref(),
            address: fields.address.as_deref().unwrap_or_default(),
            tax_id: fields.tax_id.as_deref().unwrap_or_default(),
        };

        let call = self.validator.validate(request);
        let verdict = match self.validator_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ServiceError::ValidatorTimeout(limit))??,
            None => call.await?,
        };
        Ok(verdict)
    }
}
