//! Wallet payment methods.

payment_method! {
    /// PayPal. Authorize and debit redirect the customer to PayPal.
    PayPalPaymentMethod {
        code: "VA",
        brand: Some("PAYPAL"),
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
