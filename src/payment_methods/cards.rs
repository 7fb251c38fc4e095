//! Card payment methods.
//!
//! Card data is collected in the gateway's payment frame. Plain authorize,
//! debit and registration stage the default frame settings; the decorations
//! from [`PaymentFrameTransactions`] stage explicit ones.

use crate::transactions::frame::PaymentFrameTransactions;

payment_method! {
    /// Credit card payments (Visa, Mastercard, Amex, ...).
    CreditCardPaymentMethod {
        code: "CC",
        brand: None,
        payment_frame: true,
        transactions: [
            Registration,
            Authorize,
            Debit,
            AuthorizeOnRegistration,
            DebitOnRegistration,
            Refund,
            Reversal,
            Capture,
            Rebill,
        ],
    }
}

payment_method! {
    /// Debit card payments (Maestro, V PAY, ...).
    DebitCardPaymentMethod {
        code: "DC",
        brand: None,
        payment_frame: true,
        transactions: [
            Registration,
            Authorize,
            Debit,
            AuthorizeOnRegistration,
            DebitOnRegistration,
            Refund,
            Reversal,
            Capture,
            Rebill,
        ],
    }
}

impl PaymentFrameTransactions for CreditCardPaymentMethod {}
impl PaymentFrameTransactions for DebitCardPaymentMethod {}
