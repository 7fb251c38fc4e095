//! Error types for the heidelpay-rs library.
//!
//! This module defines all error types that can occur while preparing,
//! submitting and evaluating gateway transactions.

use thiserror::Error;

/// Main error type for heidelpay operations.
#[derive(Error, Debug)]
pub enum HeidelpayError {
    /// Error during HTTP request/response handling
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The gateway answered with a non-success HTTP status
    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),

    /// Error while turning the request model into form fields
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error while decoding a form-encoded gateway response
    #[error("Form decoding error: {0}")]
    FormDecodeError(#[from] serde_urlencoded::de::Error),

    /// Error parsing URL
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    /// The payment method does not offer the requested transaction
    #[error("{method} does not support {transaction}")]
    UnsupportedTransaction {
        /// Name of the payment method
        method: &'static str,
        /// Name of the rejected transaction
        transaction: &'static str,
    },

    /// Payment code is not two uppercase ASCII letters
    #[error("Invalid payment code: {0}")]
    InvalidPaymentCode(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A key/value setter was called with a key the group does not know
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// A custom parameter would replace one the SDK sets itself
    #[error("Reserved parameter: {0}")]
    ReservedParameter(String),

    /// A key/value setter received a value it cannot interpret
    #[error("Invalid value for {key}: {value}")]
    InvalidParameterValue {
        /// Parameter key
        key: String,
        /// Rejected value
        value: String,
    },

    /// The secret hash echoed by the gateway does not match
    #[error("Security hash verification failed: {0}")]
    SecurityHashMismatch(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

/// Result type alias for heidelpay operations.
pub type Result<T> = std::result::Result<T, HeidelpayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HeidelpayError::MissingField("IDENTIFICATION.REFERENCEID".to_string());
        assert_eq!(
            err.to_string(),
            "Missing required field: IDENTIFICATION.REFERENCEID"
        );

        let err = HeidelpayError::UnsupportedTransaction {
            method: "SofortPaymentMethod",
            transaction: "debit",
        };
        assert_eq!(err.to_string(), "SofortPaymentMethod does not support debit");
    }

    #[test]
    fn test_error_conversion() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: HeidelpayError = url_err.into();
        assert!(matches!(err, HeidelpayError::UrlParseError(_)));
    }

    #[test]
    fn test_form_decode_conversion() {
        let decode_err =
            serde_urlencoded::from_str::<Vec<(String, u32)>>("PROCESSING.STATUS_CODE=ACK")
                .unwrap_err();
        let err: HeidelpayError = decode_err.into();
        assert!(matches!(err, HeidelpayError::FormDecodeError(_)));
    }
}
