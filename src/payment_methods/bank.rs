//! Direct debit, prepayment and invoice.

payment_method! {
    /// SEPA direct debit. The mandate is given up front, so there is no
    /// authorization step.
    DirectDebitPaymentMethod {
        code: "DD",
        brand: None,
        transactions: [
            Registration,
            Debit,
            DebitOnRegistration,
            Refund,
            Reversal,
            Rebill,
        ],
    }
}

payment_method! {
    /// Prepayment: the customer transfers the amount before delivery.
    PrepaymentPaymentMethod {
        code: "PP",
        brand: None,
        transactions: [Authorize, Reversal],
    }
}

payment_method! {
    /// Invoice: the customer pays after delivery.
    InvoicePaymentMethod {
        code: "IV",
        brand: None,
        transactions: [Authorize, Refund, Reversal],
    }
}
