//! Payment method descriptors and types.
//!
//! Each payment method is a type holding the shared [`Gateway`] and the request
//! being staged. Its static attributes live in a [`PaymentMethodDescriptor`];
//! the transaction behaviours it offers are the traits from
//! [`crate::transactions`] it implements. Both are generated from a single
//! transaction list by the `payment_method!` macro, so the capability flags, the
//! runtime check and the available trait methods cannot drift apart.

use crate::client::Gateway;
use crate::transactions::TransactionType;
use crate::types::Request;
use std::sync::Arc;

pub use bank::{DirectDebitPaymentMethod, InvoicePaymentMethod, PrepaymentPaymentMethod};
pub use cards::{CreditCardPaymentMethod, DebitCardPaymentMethod};
pub use online_transfer::{
    EpsPaymentMethod, GiropayPaymentMethod, IdealPaymentMethod, Przelewy24PaymentMethod,
    SofortPaymentMethod,
};
pub use wallet::PayPalPaymentMethod;

/// Static attributes of a payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentMethodDescriptor {
    name: &'static str,
    payment_code: &'static str,
    brand: Option<&'static str>,
    transactions: &'static [TransactionType],
    can_authorize: bool,
    can_refund: bool,
    can_reversal: bool,
    payment_frame: bool,
}

const fn contains(transactions: &[TransactionType], wanted: TransactionType) -> bool {
    let mut i = 0;
    while i < transactions.len() {
        if transactions[i] as u8 == wanted as u8 {
            return true;
        }
        i += 1;
    }
    false
}

impl PaymentMethodDescriptor {
    /// Creates a descriptor. Capability flags are derived from `transactions`.
    pub const fn new(
        name: &'static str,
        payment_code: &'static str,
        brand: Option<&'static str>,
        transactions: &'static [TransactionType],
    ) -> Self {
        Self {
            name,
            payment_code,
            brand,
            transactions,
            can_authorize: contains(transactions, TransactionType::Authorize),
            can_refund: contains(transactions, TransactionType::Refund),
            can_reversal: contains(transactions, TransactionType::Reversal),
            payment_frame: false,
        }
    }

    /// Marks the method as collecting account data in the payment frame.
    pub const fn with_payment_frame(self, payment_frame: bool) -> Self {
        Self {
            payment_frame,
            ..self
        }
    }

    /// Type name, also sent as `CRITERION.PAYMENT_METHOD`.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Two letter payment code, e.g. `CC`.
    pub const fn payment_code(&self) -> &'static str {
        self.payment_code
    }

    /// Brand sent as `ACCOUNT.BRAND`, if the method has one.
    pub const fn brand(&self) -> Option<&'static str> {
        self.brand
    }

    /// Transactions this method offers.
    pub const fn transactions(&self) -> &'static [TransactionType] {
        self.transactions
    }

    #[allow(missing_docs)]
    pub const fn can_authorize(&self) -> bool {
        self.can_authorize
    }

    #[allow(missing_docs)]
    pub const fn can_refund(&self) -> bool {
        self.can_refund
    }

    #[allow(missing_docs)]
    pub const fn can_reversal(&self) -> bool {
        self.can_reversal
    }

    /// Whether authorize, debit and registration run in the payment frame.
    pub const fn uses_payment_frame(&self) -> bool {
        self.payment_frame
    }

    /// Whether `transaction` is offered.
    pub fn supports(&self, transaction: TransactionType) -> bool {
        self.transactions.contains(&transaction)
    }
}

/// Common interface of all payment method types.
pub trait PaymentMethod: Send {
    /// Static attributes of this method.
    fn descriptor(&self) -> &'static PaymentMethodDescriptor;

    /// Gateway the method submits through.
    fn gateway(&self) -> &Arc<Gateway>;

    /// Request staged for the next transaction.
    fn request(&self) -> &Request;

    /// Mutable access to the staged request.
    fn request_mut(&mut self) -> &mut Request;

    /// Takes the staged request, leaving a fresh authenticated one behind.
    fn take_request(&mut self) -> Request {
        let fresh = self.gateway().new_request();
        std::mem::replace(self.request_mut(), fresh)
    }
}

/// Declares a payment method type, its descriptor and its transactions.
macro_rules! payment_method {
    (
        $(#[$meta:meta])*
        $ty:ident {
            code: $code:literal,
            brand: $brand:expr,
            $(payment_frame: $payment_frame:literal,)?
            transactions: [$($transaction:ident),* $(,)?] $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $ty {
            gateway: ::std::sync::Arc<$crate::client::Gateway>,
            request: $crate::types::Request,
        }

        impl $ty {
            /// Static attributes of this payment method.
            pub const DESCRIPTOR: $crate::payment_methods::PaymentMethodDescriptor =
                $crate::payment_methods::PaymentMethodDescriptor::new(
                    stringify!($ty),
                    $code,
                    $brand,
                    &[$($crate::transactions::TransactionType::$transaction),*],
                )$(.with_payment_frame($payment_frame))?;

            /// Creates the payment method with a fresh request.
            pub fn new(gateway: ::std::sync::Arc<$crate::client::Gateway>) -> Self {
                let request = gateway.new_request();
                Self { gateway, request }
            }
        }

        impl $crate::payment_methods::PaymentMethod for $ty {
            fn descriptor(&self) -> &'static $crate::payment_methods::PaymentMethodDescriptor {
                &Self::DESCRIPTOR
            }

            fn gateway(&self) -> &::std::sync::Arc<$crate::client::Gateway> {
                &self.gateway
            }

            fn request(&self) -> &$crate::types::Request {
                &self.request
            }

            fn request_mut(&mut self) -> &mut $crate::types::Request {
                &mut self.request
            }
        }

        $(impl $crate::transactions::$transaction for $ty {})*
    };
}

pub mod bank;
pub mod cards;
pub mod online_transfer;
pub mod wallet;

/// Descriptors of every payment method this crate ships.
pub const ALL: &[PaymentMethodDescriptor] = &[
    CreditCardPaymentMethod::DESCRIPTOR,
    DebitCardPaymentMethod::DESCRIPTOR,
    SofortPaymentMethod::DESCRIPTOR,
    GiropayPaymentMethod::DESCRIPTOR,
    IdealPaymentMethod::DESCRIPTOR,
    EpsPaymentMethod::DESCRIPTOR,
    Przelewy24PaymentMethod::DESCRIPTOR,
    DirectDebitPaymentMethod::DESCRIPTOR,
    PrepaymentPaymentMethod::DESCRIPTOR,
    InvoicePaymentMethod::DESCRIPTOR,
    PayPalPaymentMethod::DESCRIPTOR,
];

/// Looks up a descriptor by type name, e.g. `SofortPaymentMethod`.
pub fn find(name: &str) -> Option<&'static PaymentMethodDescriptor> {
    ALL.iter().find(|descriptor| descriptor.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::is_valid_payment_code;

    #[test]
    fn test_flags_follow_transactions() {
        for descriptor in ALL {
            assert_eq!(
                descriptor.can_authorize(),
                descriptor.supports(TransactionType::Authorize),
                "{}",
                descriptor.name()
            );
            assert_eq!(
                descriptor.can_refund(),
                descriptor.supports(TransactionType::Refund),
                "{}",
                descriptor.name()
            );
            assert_eq!(
                descriptor.can_reversal(),
                descriptor.supports(TransactionType::Reversal),
                "{}",
                descriptor.name()
            );
        }
    }

    #[test]
    fn test_descriptors_are_well_formed() {
        for descriptor in ALL {
            assert!(is_valid_payment_code(descriptor.payment_code()), "{}", descriptor.name());
            assert!(!descriptor.transactions().is_empty(), "{}", descriptor.name());
            assert!(descriptor.name().ends_with("PaymentMethod"));
        }

        let mut names: Vec<_> = ALL.iter().map(|d| d.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ALL.len());
    }

    #[test]
    fn test_find() {
        let sofort = find("SofortPaymentMethod").unwrap();
        assert_eq!(sofort.payment_code(), "OT");
        assert_eq!(sofort.brand(), Some("SOFORT"));
        assert!(find("CashPaymentMethod").is_none());
    }

    #[test]
    fn test_custom_descriptor_flags() {
        const ONLY_DEBIT: PaymentMethodDescriptor =
            PaymentMethodDescriptor::new("Test", "XX", None, &[TransactionType::Debit]);

        assert!(!ONLY_DEBIT.can_authorize());
        assert!(!ONLY_DEBIT.can_refund());
        assert!(!ONLY_DEBIT.can_reversal());
        assert!(ONLY_DEBIT.supports(TransactionType::Debit));
    }
}
