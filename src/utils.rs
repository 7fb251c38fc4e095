//! Utility functions for heidelpay operations.
//!
//! Formatting helpers for the gateway's wire conventions (two-decimal amounts,
//! `TRUE`/`FALSE` flags) and the SHA-512 secret hash used to authenticate
//! asynchronous gateway responses.

use crate::errors::{HeidelpayError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use secrecy::{ExposeSecret, SecretString};
use serde::Serializer;
use sha2::{Digest, Sha512};

/// Formats an amount the way the gateway expects it in `PRESENTATION.AMOUNT`.
///
/// # Examples
///
/// ```
/// use heidelpay_rs::utils::format_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(Decimal::new(2599, 2)), "25.99");
/// assert_eq!(format_amount(Decimal::new(10, 0)), "10.00");
/// ```
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Renders a boolean as the gateway's `TRUE` / `FALSE` literal.
pub fn format_flag(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}

/// Parses a gateway flag literal. Accepts `TRUE`/`FALSE` in any case.
///
/// # Examples
///
/// ```
/// use heidelpay_rs::utils::parse_flag;
///
/// assert_eq!(parse_flag("enabled", "TRUE").unwrap(), true);
/// assert_eq!(parse_flag("enabled", "false").unwrap(), false);
/// assert!(parse_flag("enabled", "yes").is_err());
/// ```
pub fn parse_flag(key: &str, value: &str) -> Result<bool> {
    if value.eq_ignore_ascii_case("TRUE") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("FALSE") {
        Ok(false)
    } else {
        Err(HeidelpayError::InvalidParameterValue {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Computes the hex encoded SHA-512 hash of `identifier` followed by `secret`.
///
/// The gateway echoes this value back in `CRITERION.SECRET`, which lets a shop
/// verify that a response really belongs to one of its transactions.
///
/// # Examples
///
/// ```
/// use heidelpay_rs::utils::secret_hash;
/// use secrecy::SecretString;
///
/// let hash = secret_hash("order-42", &SecretString::from("s3cret"));
/// assert_eq!(hash.len(), 128);
/// ```
pub fn secret_hash(identifier: &str, secret: &SecretString) -> String {
    let mut hasher = Sha512::new();
    hasher.update(identifier.as_bytes());
    hasher.update(secret.expose_secret().as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares two strings in constant time.
///
/// Both inputs are hashed to fixed-length digests first, so neither content
/// nor length leaks through timing.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;

    let digest_a = Sha512::digest(a.as_bytes());
    let digest_b = Sha512::digest(b.as_bytes());
    digest_a.ct_eq(&digest_b).into()
}

/// Checks that a payment code is two uppercase ASCII letters (e.g. `CC`).
pub fn is_valid_payment_code(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase())
}

pub(crate) fn serialize_flag<S: Serializer>(value: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(format_flag(*value))
}

pub(crate) fn serialize_amount<S: Serializer>(
    value: &Option<Decimal>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(amount) => serializer.serialize_str(&format_amount(*amount)),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn serialize_secret<S: Serializer>(
    value: &Option<SecretString>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(secret) => serializer.serialize_str(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::new(2599, 2)), "25.99");
        assert_eq!(format_amount(Decimal::new(5, 0)), "5.00");
        assert_eq!(format_amount(Decimal::new(12345, 3)), "12.35");
        assert_eq!(format_amount(Decimal::new(1, 1)), "0.10");
    }

    #[test]
    fn test_flags() {
        assert_eq!(format_flag(true), "TRUE");
        assert_eq!(format_flag(false), "FALSE");
        assert!(parse_flag("css_path", "TRUE").unwrap());
        assert!(!parse_flag("css_path", "False").unwrap());

        let err = parse_flag("prevent_async_redirect", "1").unwrap_err();
        assert!(matches!(err, HeidelpayError::InvalidParameterValue { .. }));
    }

    #[test]
    fn test_secret_hash() {
        let secret = SecretString::from("secret");
        let first = secret_hash("2843294932", &secret);
        let second = secret_hash("2843294932", &secret);
        let other = secret_hash("2843294933", &secret);

        assert_eq!(first.len(), 128);
        assert_eq!(first, second);
        assert_ne!(first, other);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("hello", "hello"));
        assert!(!constant_time_eq("hello", "world"));
        assert!(!constant_time_eq("hello", "hi"));
        assert!(!constant_time_eq("", "hello"));
    }

    #[test]
    fn test_payment_code_validation() {
        assert!(is_valid_payment_code("CC"));
        assert!(is_valid_payment_code("OT"));
        assert!(!is_valid_payment_code("cc"));
        assert!(!is_valid_payment_code("CCX"));
        assert!(!is_valid_payment_code(""));
        assert!(!is_valid_payment_code("C1"));
    }
}
