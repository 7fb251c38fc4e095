//! Payment frame decorations for card payment methods.
//!
//! Card data must never pass through the shop (PCI DSS), so card payments run
//! inside a payment frame hosted by the gateway. The decorations here stage the
//! frame settings on the request and then delegate to the plain behaviour.

use crate::errors::Result;
use crate::transactions::{Authorize, Debit, Registration, TransactionType};
use crate::types::{Frontend, Response};
use async_trait::async_trait;

/// Payment frame settings.
///
/// # Examples
///
/// ```
/// use heidelpay_rs::transactions::frame::PaymentFrame;
///
/// let frame = PaymentFrame::new("https://shop.example")
///     .with_css_path("https://shop.example/frame.css")
///     .prevent_async_redirect(true);
/// assert!(frame.prevent_async_redirect);
///
/// let defaults = PaymentFrame::default();
/// assert_eq!(defaults.origin, None);
/// assert!(!defaults.prevent_async_redirect);
/// assert_eq!(defaults.css_path, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentFrame {
    /// Origin of the page embedding the frame, e.g. `https://shop.example`
    pub origin: Option<String>,

    /// Leave the redirect to the shop after payment to the embedding page
    pub prevent_async_redirect: bool,

    /// Stylesheet URL used to style the frame
    pub css_path: Option<String>,
}

impl PaymentFrame {
    /// Creates frame settings for a page served from `origin`.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: Some(origin.into()),
            ..Self::default()
        }
    }

    /// Sets the stylesheet URL.
    pub fn with_css_path(mut self, css_path: impl Into<String>) -> Self {
        self.css_path = Some(css_path.into());
        self
    }

    /// Sets the redirect prevention flag.
    pub fn prevent_async_redirect(mut self, prevent: bool) -> Self {
        self.prevent_async_redirect = prevent;
        self
    }

    /// Writes the frame settings into `frontend` and enables it.
    pub fn apply(&self, frontend: &mut Frontend) {
        frontend.enabled = true;
        frontend.payment_frame_origin = self.origin.clone();
        frontend.prevent_async_redirect = Some(self.prevent_async_redirect);
        frontend.css_path = self.css_path.clone();
    }
}

/// Fills in frame settings the caller left unset for a card transaction.
///
/// Authorize always enables the frontend. An explicitly staged frame (or a
/// redirect flag set through [`Frontend::set`]) is left untouched.
pub(crate) fn stage_default_frame(frontend: &mut Frontend, transaction: TransactionType) {
    match transaction {
        TransactionType::Authorize => frontend.enabled = true,
        TransactionType::Debit | TransactionType::Registration => {}
        _ => return,
    }
    frontend.prevent_async_redirect.get_or_insert(false);
}

/// Frame aware variants of authorize, debit and registration.
#[async_trait]
pub trait PaymentFrameTransactions: Authorize + Debit + Registration {
    /// Authorizes with the card entered in the payment frame.
    async fn authorize_with_frame(&mut self, frame: PaymentFrame) -> Result<Response> {
        frame.apply(&mut self.request_mut().frontend);
        self.authorize().await
    }

    /// Debits the card entered in the payment frame.
    async fn debit_with_frame(&mut self, frame: PaymentFrame) -> Result<Response> {
        frame.apply(&mut self.request_mut().frontend);
        self.debit().await
    }

    /// Registers the card entered in the payment frame.
    async fn registration_with_frame(&mut self, frame: PaymentFrame) -> Result<Response> {
        frame.apply(&mut self.request_mut().frontend);
        self.registration().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_frame() {
        let mut frontend = Frontend {
            enabled: false,
            ..Frontend::default()
        };

        PaymentFrame::new("https://shop.example")
            .with_css_path("https://shop.example/frame.css")
            .apply(&mut frontend);

        assert!(frontend.enabled);
        assert_eq!(frontend.payment_frame_origin.as_deref(), Some("https://shop.example"));
        assert_eq!(frontend.prevent_async_redirect, Some(false));
        assert_eq!(frontend.css_path.as_deref(), Some("https://shop.example/frame.css"));
    }

    #[test]
    fn test_apply_default_frame_clears_settings() {
        let mut frontend = Frontend::default();
        frontend.css_path = Some("stale.css".to_string());

        PaymentFrame::default().apply(&mut frontend);

        assert_eq!(frontend.payment_frame_origin, None);
        assert_eq!(frontend.css_path, None);
        assert_eq!(frontend.prevent_async_redirect, Some(false));
    }

    #[test]
    fn test_stage_default_frame() {
        let mut frontend = Frontend {
            enabled: false,
            ..Frontend::default()
        };
        stage_default_frame(&mut frontend, TransactionType::Authorize);
        assert!(frontend.enabled);
        assert_eq!(frontend.prevent_async_redirect, Some(false));

        let mut frontend = Frontend {
            enabled: false,
            ..Frontend::default()
        };
        stage_default_frame(&mut frontend, TransactionType::Debit);
        assert!(!frontend.enabled);
        assert_eq!(frontend.prevent_async_redirect, Some(false));

        let mut frontend = Frontend::default();
        PaymentFrame::new("https://shop.example")
            .prevent_async_redirect(true)
            .apply(&mut frontend);
        stage_default_frame(&mut frontend, TransactionType::Registration);
        assert_eq!(frontend.prevent_async_redirect, Some(true));
        assert_eq!(frontend.payment_frame_origin.as_deref(), Some("https://shop.example"));

        let mut frontend = Frontend::default();
        stage_default_frame(&mut frontend, TransactionType::Capture);
        assert_eq!(frontend.prevent_async_redirect, None);
    }
}
