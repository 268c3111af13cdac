//! The customer record and the shapes it takes on the way in and out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status assigned to every newly created customer.
pub const DEFAULT_STATUS: &str = "Active";

/// A stored customer row.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub tax_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: String,
}

impl Customer {
    /// Overwrites the client-editable fields and refreshes `updated_at`.
    ///
    /// `id`, `created_at` and `status` are left untouched.
    pub fn apply(&mut self, fields: CustomerFields, now: DateTime<Utc>) {
        self.name = fields.name.unwrap_or_default();
        self.phone = normalize_optional(fields.phone);
        self.email = normalize_optional(fields.email);
        self.address = fields.address.unwrap_or_default();
        self.tax_id = fields.tax_id.unwrap_or_default();
        // Clock skew must never produce updated_at < created_at.
        self.updated_at = now.max(self.created_at);
    }
}

/// Candidate fields of a create or update request.
///
/// Every field is optional at the parsing layer so that missing values are
/// reported by field validation rather than rejected by the JSON decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerFields {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
}

/// A row about to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub tax_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: String,
}

impl NewCustomer {
    /// Builds an `Active` customer stamped with `now` for both timestamps.
    ///
    /// Expects fields that already passed validation; absent required
    /// fields become empty strings.
    pub fn from_fields(fields: CustomerFields, now: DateTime<Utc>) -> Self {
        Self {
            name: fields.name.unwrap_or_default(),
            phone: normalize_optional(fields.phone),
            email: normalize_optional(fields.email),
            address: fields.address.unwrap_or_default(),
            tax_id: fields.tax_id.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            status: DEFAULT_STATUS.to_string(),
        }
    }

    pub fn into_customer(self, id: i32) -> Customer {
        Customer {
            id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            address: self.address,
            tax_id: self.tax_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            status: self.status,
        }
    }
}

/// Public representation returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub tax_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: String,
}

impl From<Customer> for CustomerDto {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            name: c.name,
            phone: c.phone,
            email: c.email,
            address: c.address,
            tax_id: c.tax_id,
            created_at: c.created_at,
            updated_at: c.updated_at,
            status: c.status,
        }
    }
}

/// Blank optional values are stored as absent.
fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
