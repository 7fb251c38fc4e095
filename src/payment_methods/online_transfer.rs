//! Online bank transfers.
//!
//! All online transfers share the payment code `OT` and are told apart by
//! their brand. An authorization only returns the redirect to the bank or the
//! transfer provider; the customer completes the payment there.

payment_method! {
    /// Sofort, also known as Sofortüberweisung, by SOFORT GmbH.
    SofortPaymentMethod {
        code: "OT",
        brand: Some("SOFORT"),
        transactions: [Authorize, Refund, Reversal],
    }
}

payment_method! {
    /// Giropay, the German online banking transfer.
    GiropayPaymentMethod {
        code: "OT",
        brand: Some("GIROPAY"),
        transactions: [Authorize, Refund],
    }
}

payment_method! {
    /// iDEAL, the Dutch online banking transfer.
    IdealPaymentMethod {
        code: "OT",
        brand: Some("IDEAL"),
        transactions: [Authorize, Refund],
    }
}

payment_method! {
    /// EPS, the Austrian online banking transfer.
    EpsPaymentMethod {
        code: "OT",
        brand: Some("EPS"),
        transactions: [Authorize, Refund],
    }
}

payment_method! {
    /// Przelewy24, the Polish transfer service.
    Przelewy24PaymentMethod {
        code: "OT",
        brand: Some("PRZELEWY24"),
        transactions: [Authorize, Refund],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientConfig, Gateway};
    use crate::payment_methods::PaymentMethod;
    use crate::transactions::{prepare_request, Authorize, TransactionType};
    use crate::transport::RecordingTransport;
    use std::sync::Arc;

    #[test]
    fn test_sofort_descriptor() {
        let sofort = SofortPaymentMethod::DESCRIPTOR;
        assert_eq!(sofort.payment_code(), "OT");
        assert_eq!(sofort.brand(), Some("SOFORT"));
        assert!(sofort.can_authorize());
        assert!(sofort.can_refund());
        assert!(sofort.can_reversal());
        assert!(!sofort.supports(TransactionType::Debit));
    }

    #[test]
    fn test_brands_distinguish_transfers() {
        let brands = [
            SofortPaymentMethod::DESCRIPTOR.brand(),
            GiropayPaymentMethod::DESCRIPTOR.brand(),
            IdealPaymentMethod::DESCRIPTOR.brand(),
            EpsPaymentMethod::DESCRIPTOR.brand(),
            Przelewy24PaymentMethod::DESCRIPTOR.brand(),
        ];
        assert!(brands.iter().all(Option::is_some));
        assert!(!GiropayPaymentMethod::DESCRIPTOR.can_reversal());
    }

    #[tokio::test]
    async fn test_authorize_sends_brand() {
        let transport = Arc::new(RecordingTransport::default());
        let gateway = Gateway::with_transport(
            ClientConfig::new("sender", "login", "password", "channel"),
            transport.clone(),
        );
        let mut method = GiropayPaymentMethod::new(gateway);

        method.authorize().await.unwrap();

        let form = transport.last_form();
        assert_eq!(form["PAYMENT.CODE"], "OT.PA");
        assert_eq!(form["ACCOUNT.BRAND"], "GIROPAY");
        assert!(!form.contains_key("FRONTEND.PREVENT_ASYNC_REDIRECT"));
    }

    #[test]
    fn test_unsupported_transaction_rejected() {
        let gateway = Gateway::new(ClientConfig::new("sender", "login", "password", "channel"));
        let mut method = EpsPaymentMethod::new(gateway);
        method.request_mut().identification.reference_id = Some("31HA07BC81".to_string());

        let err = prepare_request(&mut method, TransactionType::Reversal).unwrap_err();
        assert_eq!(err.to_string(), "EpsPaymentMethod does not support reversal");
        // nothing was taken
        assert_eq!(
            method.request().identification.reference_id.as_deref(),
            Some("31HA07BC81")
        );
    }
}
