//! Transaction behaviours.
//!
//! Every transaction type the gateway offers is a trait with a default async
//! method that stages the transaction specific fields and submits the request.
//! Payment method types opt into the behaviours they support with empty `impl`
//! blocks; see [`crate::payment_methods`].

pub mod frame;

use crate::errors::{HeidelpayError, Result};
use crate::payment_methods::{PaymentMethod, PaymentMethodDescriptor};
use crate::types::{Request, Response, SDK_NAME, SDK_VERSION};
use crate::utils::is_valid_payment_code;
use async_trait::async_trait;
use std::sync::Arc;
use strum::{Display, EnumIter, IntoStaticStr};

/// Kind of operation against the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum TransactionType {
    /// Reserve an amount, or start an online transfer
    Authorize,
    /// Charge an amount directly
    Debit,
    /// Store account data for later transactions
    Registration,
    /// Capture a previous authorization
    Capture,
    /// Pay back a captured or debited amount
    Refund,
    /// Cancel an authorization
    Reversal,
    /// Charge again on a previous transaction
    Rebill,
    /// Authorize on a stored registration
    AuthorizeOnRegistration,
    /// Debit on a stored registration
    DebitOnRegistration,
}

impl TransactionType {
    /// Two letter code appended to the payment code, e.g. `PA`.
    pub const fn code(&self) -> &'static str {
        match self {
            TransactionType::Authorize | TransactionType::AuthorizeOnRegistration => "PA",
            TransactionType::Debit | TransactionType::DebitOnRegistration => "DB",
            TransactionType::Registration => "RG",
            TransactionType::Capture => "CP",
            TransactionType::Refund => "RF",
            TransactionType::Reversal => "RV",
            TransactionType::Rebill => "RB",
        }
    }

    /// Whether the transaction operates on an earlier one and therefore needs
    /// `IDENTIFICATION.REFERENCEID`.
    pub const fn requires_reference(&self) -> bool {
        !matches!(
            self,
            TransactionType::Authorize | TransactionType::Debit | TransactionType::Registration
        )
    }
}

fn ensure_reference(payment_reference_id: &str) -> Result<()> {
    if payment_reference_id.trim().is_empty() {
        return Err(HeidelpayError::MissingField(
            "IDENTIFICATION.REFERENCEID".to_string(),
        ));
    }
    Ok(())
}

fn ensure_supported(
    descriptor: &PaymentMethodDescriptor,
    transaction: TransactionType,
) -> Result<()> {
    if !descriptor.supports(transaction) {
        return Err(HeidelpayError::UnsupportedTransaction {
            method: descriptor.name(),
            transaction: transaction.into(),
        });
    }
    if !is_valid_payment_code(descriptor.payment_code()) {
        return Err(HeidelpayError::InvalidPaymentCode(
            descriptor.payment_code().to_string(),
        ));
    }
    Ok(())
}

/// Runs every step of `transaction` except sending.
///
/// The method's staged request is taken and replaced with a fresh one, so a
/// request is never sent twice. Nothing is taken when validation fails.
pub fn prepare_request<M: PaymentMethod + ?Sized>(
    method: &mut M,
    transaction: TransactionType,
) -> Result<Request> {
    let descriptor = method.descriptor();
    ensure_supported(descriptor, transaction)?;

    if transaction.requires_reference() {
        let reference_id = method.request().identification.reference_id.as_deref();
        ensure_reference(reference_id.unwrap_or_default())?;
    }

    let mut request = method.take_request();
    if descriptor.uses_payment_frame() {
        frame::stage_default_frame(&mut request.frontend, transaction);
    }
    request.payment.code = Some(format!(
        "{}.{}",
        descriptor.payment_code(),
        transaction.code()
    ));
    if let Some(brand) = descriptor.brand() {
        request.account.brand = Some(brand.to_string());
    }
    request.criterion.payment_method = Some(descriptor.name().to_string());
    request.criterion.sdk_name = Some(SDK_NAME.to_string());
    request.criterion.sdk_version = Some(SDK_VERSION.to_string());

    tracing::debug!(
        payment_method = descriptor.name(),
        payment_code = request.payment.code.as_deref(),
        %transaction,
        "prepared transaction"
    );

    Ok(request)
}

/// Prepares `transaction` and posts it through the gateway's transport.
pub async fn submit<M: PaymentMethod + ?Sized>(
    method: &mut M,
    transaction: TransactionType,
) -> Result<Response> {
    let request = prepare_request(method, transaction)?;
    let form = request.to_form()?;
    let gateway = Arc::clone(method.gateway());

    let response = gateway
        .transport()
        .submit(gateway.payment_url(), &form)
        .await?;

    let payment_method = method.descriptor().name();
    if response.is_success() {
        tracing::info!(
            payment_method,
            %transaction,
            unique_id = response.unique_id(),
            pending = response.is_pending(),
            "transaction acknowledged"
        );
    } else {
        let error = response.error();
        tracing::warn!(
            payment_method,
            %transaction,
            return_code = %error.code,
            message = %error.message,
            "transaction rejected"
        );
    }

    Ok(response)
}

async fn submit_referenced<M: PaymentMethod + ?Sized>(
    method: &mut M,
    transaction: TransactionType,
    payment_reference_id: &str,
) -> Result<Response> {
    ensure_supported(method.descriptor(), transaction)?;
    ensure_reference(payment_reference_id)?;

    let request = method.request_mut();
    request.identification.reference_id = Some(payment_reference_id.to_string());
    request.frontend.enabled = false;

    submit(method, transaction).await
}

/// Authorization.
///
/// Depending on the payment method this either reserves the amount on the
/// customer's account or, for online transfers like Sofort or Giropay, only
/// obtains the redirect to the third party's system.
#[async_trait]
pub trait Authorize: PaymentMethod {
    /// Submits an authorization (`PA`).
    async fn authorize(&mut self) -> Result<Response> {
        submit(self, TransactionType::Authorize).await
    }
}

/// Debit: charges the customer's account directly.
#[async_trait]
pub trait Debit: PaymentMethod {
    /// Submits a debit (`DB`).
    async fn debit(&mut self) -> Result<Response> {
        submit(self, TransactionType::Debit).await
    }
}

/// Registration.
///
/// Stores the customer's account data at the gateway. The returned reference
/// id can be charged later, also for recurring payments.
#[async_trait]
pub trait Registration: PaymentMethod {
    /// Submits a registration (`RG`).
    async fn registration(&mut self) -> Result<Response> {
        submit(self, TransactionType::Registration).await
    }
}

/// Authorization on an earlier registration.
#[async_trait]
pub trait AuthorizeOnRegistration: PaymentMethod {
    /// Authorizes against the registration identified by `payment_reference_id`.
    async fn authorize_on_registration(&mut self, payment_reference_id: &str) -> Result<Response> {
        submit_referenced(
            self,
            TransactionType::AuthorizeOnRegistration,
            payment_reference_id,
        )
        .await
    }
}

/// Debit on an earlier registration.
#[async_trait]
pub trait DebitOnRegistration: PaymentMethod {
    /// Debits the registration identified by `payment_reference_id`.
    async fn debit_on_registration(&mut self, payment_reference_id: &str) -> Result<Response> {
        submit_referenced(self, TransactionType::DebitOnRegistration, payment_reference_id).await
    }
}

/// Capture of an authorized amount.
#[async_trait]
pub trait Capture: PaymentMethod {
    /// Captures the authorization identified by `payment_reference_id`.
    async fn capture(&mut self, payment_reference_id: &str) -> Result<Response> {
        submit_referenced(self, TransactionType::Capture, payment_reference_id).await
    }
}

/// Refund.
#[async_trait]
pub trait Refund: PaymentMethod {
    /// Refunds the debit or capture identified by `payment_reference_id`.
    async fn refund(&mut self, payment_reference_id: &str) -> Result<Response> {
        submit_referenced(self, TransactionType::Refund, payment_reference_id).await
    }
}

/// Reversal.
#[async_trait]
pub trait Reversal: PaymentMethod {
    /// Reverses the authorization identified by `payment_reference_id`.
    async fn reversal(&mut self, payment_reference_id: &str) -> Result<Response> {
        submit_referenced(self, TransactionType::Reversal, payment_reference_id).await
    }
}

/// Rebill.
#[async_trait]
pub trait Rebill: PaymentMethod {
    /// Charges again on the transaction identified by `payment_reference_id`.
    async fn rebill(&mut self, payment_reference_id: &str) -> Result<Response> {
        submit_referenced(self, TransactionType::Rebill, payment_reference_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_transaction_codes() {
        assert_eq!(TransactionType::Authorize.code(), "PA");
        assert_eq!(TransactionType::AuthorizeOnRegistration.code(), "PA");
        assert_eq!(TransactionType::Debit.code(), "DB");
        assert_eq!(TransactionType::DebitOnRegistration.code(), "DB");
        assert_eq!(TransactionType::Registration.code(), "RG");
        assert_eq!(TransactionType::Capture.code(), "CP");
        assert_eq!(TransactionType::Refund.code(), "RF");
        assert_eq!(TransactionType::Reversal.code(), "RV");
        assert_eq!(TransactionType::Rebill.code(), "RB");
    }

    #[test]
    fn test_reference_requirement() {
        let referenced: Vec<_> = TransactionType::iter()
            .filter(TransactionType::requires_reference)
            .collect();

        assert_eq!(referenced.len(), 6);
        assert!(!TransactionType::Authorize.requires_reference());
        assert!(TransactionType::Capture.requires_reference());
        assert!(TransactionType::DebitOnRegistration.requires_reference());
    }

    #[test]
    fn test_blank_reference_is_missing() {
        assert!(ensure_reference("31HA07BC8108A9126F199F2784552637").is_ok());
        for blank in ["", "   "] {
            let err = ensure_reference(blank).unwrap_err();
            assert!(matches!(err, HeidelpayError::MissingField(field) if field == "IDENTIFICATION.REFERENCEID"));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(TransactionType::Authorize.to_string(), "authorize");
        assert_eq!(
            TransactionType::AuthorizeOnRegistration.to_string(),
            "authorize_on_registration"
        );
        let name: &'static str = TransactionType::Rebill.into();
        assert_eq!(name, "rebill");
    }
}
