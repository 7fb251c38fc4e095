//! # heidelpay-rs
//!
//! A Rust client SDK for the heidelpay payment gateway.
//!
//! Payment methods (credit card, debit card, Sofort, PayPal, ...) are types that
//! stage a gateway request and submit it through one of the transaction
//! behaviours they support (authorize, debit, registration, capture, refund,
//! reversal, rebill). Which behaviours a payment method offers is fixed by its
//! type: `SofortPaymentMethod` simply has no `debit` method.
//!
//! ## Features
//!
//! - **Typed payment methods**: one type per payment method, with a static
//!   descriptor carrying payment code, brand and capability flags
//! - **Composable transactions**: every transaction type is a trait with a
//!   default implementation
//! - **Payment frame support**: card methods stage the PCI compliant payment
//!   frame before authorizing, debiting or registering
//! - **Response helpers**: status, error, redirect and payment frame URLs, and
//!   verification of the secret hash echoed by the gateway
//! - **Pluggable transport**: HTTP via `reqwest` by default
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use heidelpay_rs::client::{ClientConfig, Gateway};
//! use heidelpay_rs::payment_methods::{CreditCardPaymentMethod, PaymentMethod};
//! use heidelpay_rs::transactions::frame::{PaymentFrame, PaymentFrameTransactions};
//! use rust_decimal::Decimal;
//! use secrecy::SecretString;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = Gateway::new(ClientConfig::new(
//!     "31HA07BC8142C5A171745D00AD63D182",
//!     "31ha07bc8142c5a171744e5aef11ffd3",
//!     "93167DE7",
//!     "31HA07BC8142C5A171744F3D6D155865",
//! ));
//!
//! let mut credit_card = CreditCardPaymentMethod::new(gateway);
//! credit_card
//!     .request_mut()
//!     .basket_data("order-42", Decimal::new(2599, 2), "EUR", &SecretString::from("s3cret"))
//!     .async_response("EN", "https://shop.example/response");
//!
//! let response = credit_card
//!     .authorize_with_frame(PaymentFrame::new("https://shop.example"))
//!     .await?;
//! println!("Send the customer to {}", response.payment_form_url()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Transaction Flow
//!
//! 1. **Stage**: fill in basket, customer and frontend data on the request
//! 2. **Submit**: call a transaction; the payment code (`CC.PA`, `OT.PA`, ...),
//!    brand and criteria are added and the form is posted
//! 3. **Redirect**: send the customer to the payment frame or redirect URL
//! 4. **Follow up**: capture, refund, reverse or rebill using the returned
//!    payment reference id

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod errors;
pub mod payment_methods;
pub mod transactions;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use client::{ClientConfig, Environment, Gateway};
pub use errors::{HeidelpayError, Result};
pub use payment_methods::{PaymentMethod, PaymentMethodDescriptor};
pub use transactions::frame::{PaymentFrame, PaymentFrameTransactions};
pub use transactions::{
    Authorize, AuthorizeOnRegistration, Capture, Debit, DebitOnRegistration, Rebill, Refund,
    Registration, Reversal, TransactionType,
};
pub use types::{Request, Response};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_accessibility() {
        let gateway = Gateway::new(ClientConfig::new("sender", "login", "password", "channel"));
        let _ = payment_methods::SofortPaymentMethod::new(gateway.clone());
        let _ = payment_methods::CreditCardPaymentMethod::new(gateway);
        let _ = PaymentFrame::default();
        assert_eq!(payment_methods::ALL.len(), 11);
    }
}
