//! Field-level constraints for create/update payloads.
//!
//! Every rule runs independently; the result is the full list of violations
//! in field order (name, phone, email, address, tax id). An empty list means
//! the payload is valid.

use crate::domain::customer::CustomerFields;
use regex::Regex;
use std::sync::LazyLock;

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
pub const ADDRESS_MIN: usize = 5;
pub const ADDRESS_MAX: usize = 500;
pub const TAX_ID_LEN: usize = 11;
pub const PHONE_MAX_LEN: usize = 20;

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 \-]{7,20}$").expect("phone pattern compiles"));

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s.][^@\s]*\.[^@\s]+$").expect("email pattern compiles"));

/// Validates the candidate fields and returns every violation found.
pub fn validate_fields(fields: &CustomerFields) -> Vec<String> {
    let mut errors = Vec::new();
    check_name(fields.name.as_deref(), &mut errors);
    check_phone(fields.phone.as_deref(), &mut errors);
    check_email(fields.email.as_deref(), &mut errors);
    check_address(fields.address.as_deref(), &mut errors);
    check_tax_id(fields.tax_id.as_deref(), &mut errors);
    errors
}

/// True when `tax_id` is exactly eleven ASCII digits.
pub fn is_well_formed_tax_id(tax_id: &str) -> bool {
    tax_id.len() == TAX_ID_LEN && tax_id.bytes().all(|b| b.is_ascii_digit())
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn check_name(name: Option<&str>, errors: &mut Vec<String>) {
    match present(name) {
        None => errors.push("Name is required".to_string()),
        Some(n) => {
            let len = n.chars().count();
            if !(NAME_MIN..=NAME_MAX).contains(&len) {
                errors.push(format!(
                    "Name must be between {} and {} characters",
                    NAME_MIN, NAME_MAX
                ));
            }
        }
    }
}

fn check_phone(phone: Option<&str>, errors: &mut Vec<String>) {
    if let Some(p) = present(phone) {
        if p.chars().count() > PHONE_MAX_LEN || !PHONE_PATTERN.is_match(p) {
            errors.push(
                "Phone must be 7-20 digits, spaces or hyphens with an optional leading +"
                    .to_string(),
            );
        }
    }
}

fn check_email(email: Option<&str>, errors: &mut Vec<String>) {
    if let Some(e) = present(email) {
        if !EMAIL_PATTERN.is_match(e) {
            errors.push("Email must be a valid email address".to_string());
        }
    }
}

fn check_address(address: Option<&str>, errors: &mut Vec<String>) {
    match present(address) {
        None => errors.push("Address is required".to_string()),
        Some(a) => {
            let len = a.chars().count();
            if !(ADDRESS_MIN..=ADDRESS_MAX).contains(&len) {
                errors.push(format!(
                    "Address must be between {} and {} characters",
                    ADDRESS_MIN, ADDRESS_MAX
                ));
            }
        }
    }
}

fn check_tax_id(tax_id: Option<&str>, errors: &mut Vec<String>) {
    match present(tax_id) {
        None => errors.push("Tax ID is required".to_string()),
        Some(t) if !is_well_formed_tax_id(t) => {
            errors.push("Tax ID must be exactly 11 digits".to_string());
        }
        Some(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CustomerFields {
        CustomerFields {
            name: Some("John Doe".to_string()),
            phone: Some("+1 555-123-4567".to_string()),
            email: Some("john.doe@example.com".to_string()),
            address: Some("123 Main Street, Anytown".to_string()),
            tax_id: Some("12345678901".to_string()),
        }
    }

    #[test]
    fn valid_fields_have_no_violations() {
        assert!(validate_fields(&valid()).is_empty());
    }

    #[test]
    fn optional_fields_may_be_absent_or_blank() {
        let mut f = valid();
        f.phone = None;
        f.email = Some("   ".to_string());
        assert!(validate_fields(&f).is_empty());
    }

    #[test]
    fn name_bounds() {
        let mut f = valid();
        f.name = Some("J".to_string());
        let errors = validate_fields(&f);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Name"));

        f.name = Some("x".repeat(101));
        assert!(validate_fields(&f)[0].starts_with("Name"));

        f.name = Some("Jo".to_string());
        assert!(validate_fields(&f).is_empty());

        f.name = None;
        assert_eq!(validate_fields(&f), vec!["Name is required".to_string()]);
    }

    #[test]
    fn phone_pattern() {
        let mut f = valid();
        let too_long = format!("+{}", "1".repeat(20));
        for bad in ["12345", "555-CALL-NOW", "++15551234567", "(555) 123-4567", too_long.as_str()] {
            f.phone = Some(bad.to_string());
            let errors = validate_fields(&f);
            assert_eq!(errors.len(), 1, "{bad}");
            assert!(errors[0].starts_with("Phone"), "{bad}");
        }
        for good in ["5551234", "+48 600 700 800", "555-123-4567", "+1234567890123456789"] {
            f.phone = Some(good.to_string());
            assert!(validate_fields(&f).is_empty(), "{good}");
        }
    }

    #[test]
    fn email_shape() {
        let mut f = valid();
        for bad in ["john", "john@example", "john doe@example.com", "@example.com", "a@.b.c"] {
            f.email = Some(bad.to_string());
            let errors = validate_fields(&f);
            assert_eq!(errors.len(), 1, "{bad}");
            assert!(errors[0].starts_with("Email"), "{bad}");
        }
    }

    #[test]
    fn address_bounds() {
        let mut f = valid();
        f.address = Some("1 A".to_string());
        assert!(validate_fields(&f)[0].starts_with("Address"));
        f.address = Some("a".repeat(501));
        assert!(validate_fields(&f)[0].starts_with("Address"));
        f.address = Some("a".repeat(500));
        assert!(validate_fields(&f).is_empty());
    }

    #[test]
    fn tax_id_must_be_eleven_digits() {
        let mut f = valid();
        for bad in ["1234567890", "123456789012", "1234567890a", "١٢٣٤٥٦٧٨٩٠١"] {
            f.tax_id = Some(bad.to_string());
            let errors = validate_fields(&f);
            assert_eq!(errors, vec!["Tax ID must be exactly 11 digits".to_string()], "{bad}");
        }
        f.tax_id = Some(String::new());
        assert_eq!(validate_fields(&f), vec!["Tax ID is required".to_string()]);
    }

    #[test]
    fn violations_are_collected_not_short_circuited() {
        let f = CustomerFields {
            name: Some("J".to_string()),
            phone: Some("abc".to_string()),
            email: Some("nope".to_string()),
            address: None,
            tax_id: Some("123".to_string()),
        };
        let errors = validate_fields(&f);
        assert_eq!(errors.len(), 5);
        assert!(errors[0].starts_with("Name"));
        assert!(errors[1].starts_with("Phone"));
        assert!(errors[2].starts_with("Email"));
        assert!(errors[3].starts_with("Address"));
        assert!(errors[4].starts_with("Tax ID"));
    }
}
