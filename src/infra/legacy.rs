//! External (legacy system) validation of new customer data.
//!
//! The legacy program is reached through the [`ExternalValidator`] trait.
//! Its replies are single strings in one of three shapes:
//!
//! - `SUCCESS: <message>`
//! - `VALIDATION_ERROR: <error>. <error>.`
//! - `ERROR: <message>`
//!
//! [`parse_legacy_reply`] turns such a reply into a [`LegacyVerdict`].

use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

const SUCCESS_PREFIX: &str = "SUCCESS:";
const VALIDATION_ERROR_PREFIX: &str = "VALIDATION_ERROR:";
const ERROR_PREFIX: &str = "ERROR:";

/// Candidate customer data sent to the legacy system.
#[derive(Debug, Clone, Copy)]
pub struct ValidationRequest<'a> {
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub address: &'a str,
    pub tax_id: &'a str,
}

/// The legacy system's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegacyVerdict {
    pub valid: bool,
    pub message: String,
    pub errors: Vec<String>,
}

impl LegacyVerdict {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn rejected(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
            errors,
        }
    }
}

/// The call itself failed; no verdict was produced.
#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("legacy validator unavailable: {0}")]
    Unavailable(String),
}

/// Capability interface to the legacy validation program.
///
/// One call is one round trip. Retry policy, if any, belongs to the implementation.
#[async_trait]
pub trait ExternalValidator: Send + Sync {
    async fn validate(&self, request: ValidationRequest<'_>) -> Result<LegacyVerdict, ValidatorError>;
}

/// Splits a raw legacy reply into a verdict.
pub fn parse_legacy_reply(reply: &str) -> LegacyVerdict {
    let reply = reply.trim();
    if reply.is_empty() {
        return LegacyVerdict::rejected(
            "No response from validation system",
            vec!["Empty response from legacy system".to_string()],
        );
    }

    if strip_prefix_ignore_case(reply, SUCCESS_PREFIX).is_some() {
        return LegacyVerdict::accepted(reply);
    }

    if let Some(rest) = strip_prefix_ignore_case(reply, VALIDATION_ERROR_PREFIX) {
        let message = rest.trim();
        let errors = message
            .split(". ")
            .map(|e| e.trim().trim_end_matches('.').trim())
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect();
        return LegacyVerdict::rejected(message, errors);
    }

    if let Some(rest) = strip_prefix_ignore_case(reply, ERROR_PREFIX) {
        let message = rest.trim().to_string();
        return LegacyVerdict::rejected(message.clone(), vec![message]);
    }

    LegacyVerdict::rejected("Unknown response format", vec![reply.to_string()])
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

/// Approves every request.
#[derive(Debug, Default, Clone)]
pub struct StubLegacyValidator;

#[async_trait]
impl ExternalValidator for StubLegacyValidator {
    async fn validate(&self, request: ValidationRequest<'_>) -> Result<LegacyVerdict, ValidatorError> {
        tracing::debug!(tax_id = request.tax_id, "stub legacy validation");
        Ok(LegacyVerdict::accepted("Stub: Validation passed"))
    }
}

static LEGACY_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").expect("name pattern compiles"));
static LEGACY_PHONE_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\-\(\)\+]").expect("phone strip pattern compiles"));
static LEGACY_PHONE_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10,}$").expect("phone digits pattern compiles"));
static LEGACY_PHONE_INVALID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9\s\-\(\)\+]").expect("phone charset pattern compiles"));
static LEGACY_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

/// Tax ids the simulated legacy system already knows about at startup.
pub const SIMULATED_KNOWN_TAX_IDS: &[&str] = &["12345678901", "98765432109", "11111111111"];

/// Rule-based stand-in for the legacy program, including its round-trip latency.
///
/// Every accepted tax id joins the simulated roster, so resubmitting it is rejected.
pub struct SimulatedLegacyValidator {
    latency: Duration,
    known_tax_ids: Mutex<HashSet<String>>,
}

impl Default for SimulatedLegacyValidator {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

impl SimulatedLegacyValidator {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            known_tax_ids: Mutex::new(
                SIMULATED_KNOWN_TAX_IDS.iter().map(|t| t.to_string()).collect(),
            ),
        }
    }

    fn check(request: &ValidationRequest<'_>, known: &HashSet<String>) -> Vec<String> {
        let mut errors = Vec::new();

        let name = request.name;
        if name.trim().is_empty() {
            errors.push("Customer name is required".to_string());
        } else if !(2..=100).contains(&name.chars().count()) {
            errors.push("Customer name must be 2-100 characters".to_string());
        } else if !LEGACY_NAME.is_match(name) {
            errors.push("Customer name contains invalid characters".to_string());
        }

        if let Some(phone) = request.phone.filter(|p| !p.trim().is_empty()) {
            let digits = LEGACY_PHONE_STRIP.replace_all(phone, "");
            if !LEGACY_PHONE_DIGITS.is_match(&digits) {
                errors.push("Phone number must contain at least 10 digits".to_string());
            }
            if LEGACY_PHONE_INVALID.is_match(phone) {
                errors.push("Phone number contains invalid characters".to_string());
            }
        }

        if let Some(email) = request.email.filter(|e| !e.trim().is_empty()) {
            if email.chars().count() > 100 {
                errors.push("Email address too long (max 100 characters)".to_string());
            } else if !email.contains('@') {
                errors.push("Email address must contain @ symbol".to_string());
            } else if !LEGACY_EMAIL.is_match(email) {
                errors.push("Invalid email address format".to_string());
            }
        }

        let address = request.address;
        let address_len = address.chars().count();
        if address.trim().is_empty() {
            errors.push("Address is required".to_string());
        } else if address_len < 5 {
            errors.push("Address must be at least 5 characters".to_string());
        } else if address_len > 255 {
            errors.push("Address too long (max 255 characters)".to_string());
        }

        let tax_id = request.tax_id;
        if tax_id.trim().is_empty() {
            errors.push("Tax ID is required".to_string());
        } else if tax_id.chars().count() != 11 {
            errors.push("Tax ID must be exactly 11 characters".to_string());
        } else if !tax_id.chars().all(|c| c.is_ascii_digit()) {
            errors.push("Tax ID must contain only digits".to_string());
        } else if known.contains(tax_id) {
            errors.push("Tax ID already exists in database".to_string());
        }

        errors
    }
}

#[async_trait]
impl ExternalValidator for SimulatedLegacyValidator {
    async fn validate(&self, request: ValidationRequest<'_>) -> Result<LegacyVerdict, ValidatorError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut known = self.known_tax_ids.lock().await;
        let errors = Self::check(&request, &known);

        let reply = if errors.is_empty() {
            known.insert(request.tax_id.to_string());
            format!(
                "{} Customer information validated successfully",
                SUCCESS_PREFIX
            )
        } else {
            format!("{} {}.", VALIDATION_ERROR_PREFIX, errors.join(". "))
        };
        drop(known);

        let verdict = parse_legacy_reply(&reply);
        if verdict.valid {
            tracing::info!(tax_id = request.tax_id, "simulated legacy validation passed");
        } else {
            tracing::warn!(tax_id = request.tax_id, errors = ?verdict.errors, "simulated legacy validation failed");
        }
        Ok(verdict)
    }
}
