//! Core type definitions for the heidelpay gateway protocol.
//!
//! A [`Request`] is a set of parameter groups that serialise to the gateway's
//! flat `GROUP.FIELD=value` form encoding. A [`Response`] is the parsed
//! form-encoded answer with typed accessors for the fields shops care about.

use crate::errors::{HeidelpayError, Result};
use crate::utils::{
    constant_time_eq, is_valid_payment_code, parse_flag, secret_hash, serialize_amount,
    serialize_flag, serialize_secret,
};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Version of the gateway request format.
pub const REQUEST_VERSION: &str = "1.0";

/// Value of `CRITERION.SDK_NAME` sent with every transaction.
pub const SDK_NAME: &str = "heidelpay-rs";

/// Value of `CRITERION.SDK_VERSION` sent with every transaction.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Transaction mode sent in `TRANSACTION.MODE`.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionMode {
    /// Real money transactions
    Live,
    /// Sandbox transactions routed to a simulated connector
    ConnectorTest,
    /// Sandbox transactions answered by the gateway itself
    IntegratorTest,
}

/// Sender identification (`SECURITY.*`).
#[derive(Serialize, Debug, Default)]
pub struct Security {
    /// Security sender id of the merchant
    #[serde(rename = "SECURITY.SENDER", skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

/// API user credentials (`USER.*`).
#[derive(Serialize, Debug, Default)]
pub struct User {
    /// API user login
    #[serde(rename = "USER.LOGIN", skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,

    /// API user password
    #[serde(
        rename = "USER.PWD",
        serialize_with = "serialize_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub password: Option<SecretString>,
}

/// Channel and mode of the transaction (`TRANSACTION.*`).
#[derive(Serialize, Debug, Default)]
pub struct Transaction {
    /// Channel id the transaction is booked on
    #[serde(rename = "TRANSACTION.CHANNEL", skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    /// Live or test mode
    #[serde(rename = "TRANSACTION.MODE", skip_serializing_if = "Option::is_none")]
    pub mode: Option<TransactionMode>,
}

/// Identifiers of the transaction and the shopper (`IDENTIFICATION.*`).
#[derive(Serialize, Debug, Default)]
pub struct Identification {
    /// Shop side identifier, e.g. the order or basket id
    #[serde(rename = "IDENTIFICATION.TRANSACTIONID", skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    /// Shop side customer id
    #[serde(rename = "IDENTIFICATION.SHOPPERID", skip_serializing_if = "Option::is_none")]
    pub shopper_id: Option<String>,

    /// Unique id of an earlier transaction this one refers to
    #[serde(rename = "IDENTIFICATION.REFERENCEID", skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,

    /// Invoice id printed on invoice payments
    #[serde(rename = "IDENTIFICATION.INVOICEID", skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
}

/// Payment code (`PAYMENT.CODE`), e.g. `CC.PA`.
#[derive(Serialize, Debug, Default)]
pub struct Payment {
    /// Combined payment method and transaction type code
    #[serde(rename = "PAYMENT.CODE", skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Amount, currency and usage text (`PRESENTATION.*`).
#[derive(Serialize, Debug, Default)]
pub struct Presentation {
    /// Amount, sent with two decimals
    #[serde(
        rename = "PRESENTATION.AMOUNT",
        serialize_with = "serialize_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Decimal>,

    /// ISO 4217 currency code
    #[serde(rename = "PRESENTATION.CURRENCY", skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Text shown on the customer's statement
    #[serde(rename = "PRESENTATION.USAGE", skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
}

/// Hosted payment page and payment frame settings (`FRONTEND.*`).
#[derive(Serialize, Debug)]
pub struct Frontend {
    /// Whether the gateway renders a customer facing frontend
    #[serde(rename = "FRONTEND.ENABLED", serialize_with = "serialize_flag")]
    pub enabled: bool,

    /// Frontend language (ISO 639-1)
    #[serde(rename = "FRONTEND.LANGUAGE", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// URL the gateway posts the asynchronous result to
    #[serde(rename = "FRONTEND.RESPONSE_URL", skip_serializing_if = "Option::is_none")]
    pub response_url: Option<String>,

    /// Origin of the page embedding the payment frame
    #[serde(
        rename = "FRONTEND.PAYMENT_FRAME_ORIGIN",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_frame_origin: Option<String>,

    /// Keeps the payment frame from redirecting the customer on its own
    #[serde(
        rename = "FRONTEND.PREVENT_ASYNC_REDIRECT",
        serialize_with = "serialize_optional_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub prevent_async_redirect: Option<bool>,

    /// Stylesheet applied to the payment frame
    #[serde(rename = "FRONTEND.CSS_PATH", skip_serializing_if = "Option::is_none")]
    pub css_path: Option<String>,

    /// Frontend mode
    #[serde(rename = "FRONTEND.MODE", skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

fn serialize_optional_flag<S: serde::Serializer>(
    value: &Option<bool>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(flag) => serialize_flag(flag, serializer),
        None => serializer.serialize_none(),
    }
}

impl Default for Frontend {
    fn default() -> Self {
        Self {
            enabled: true,
            language: None,
            response_url: None,
            payment_frame_origin: None,
            prevent_async_redirect: None,
            css_path: None,
            mode: Some("WHITELABEL".to_string()),
        }
    }
}

impl Frontend {
    /// Stages a frontend parameter by its lowercase key.
    ///
    /// Flags (`enabled`, `prevent_async_redirect`) accept `TRUE` / `FALSE`.
    /// Passing `None` clears an optional parameter.
    ///
    /// # Examples
    ///
    /// ```
    /// use heidelpay_rs::types::Frontend;
    ///
    /// let mut frontend = Frontend::default();
    /// frontend.set("payment_frame_origin", Some("https://shop.example")).unwrap();
    /// frontend.set("prevent_async_redirect", Some("TRUE")).unwrap();
    /// assert_eq!(frontend.payment_frame_origin.as_deref(), Some("https://shop.example"));
    /// assert_eq!(frontend.prevent_async_redirect, Some(true));
    /// assert!(frontend.set("colour", Some("red")).is_err());
    /// ```
    pub fn set(&mut self, key: &str, value: Option<&str>) -> Result<()> {
        let owned = value.map(str::to_string);
        match key {
            "enabled" => {
                let raw = value.ok_or_else(|| HeidelpayError::InvalidParameterValue {
                    key: key.to_string(),
                    value: String::new(),
                })?;
                self.enabled = parse_flag(key, raw)?;
            }
            "prevent_async_redirect" => {
                self.prevent_async_redirect = value.map(|raw| parse_flag(key, raw)).transpose()?;
            }
            "language" => self.language = owned,
            "response_url" => self.response_url = owned,
            "payment_frame_origin" => self.payment_frame_origin = owned,
            "css_path" => self.css_path = owned,
            "mode" => self.mode = owned,
            _ => return Err(HeidelpayError::UnknownParameter(format!("frontend.{key}"))),
        }
        Ok(())
    }
}

/// Account data (`ACCOUNT.*`). Card numbers never pass through here; cards are
/// captured by the payment frame.
#[derive(Serialize, Debug, Default)]
pub struct Account {
    /// Brand of the payment method, e.g. `SOFORT`
    #[serde(rename = "ACCOUNT.BRAND", skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    /// Account holder
    #[serde(rename = "ACCOUNT.HOLDER", skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,

    /// IBAN for direct debit
    #[serde(rename = "ACCOUNT.IBAN", skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,

    /// BIC for direct debit
    #[serde(rename = "ACCOUNT.BIC", skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,
}

/// Customer name (`NAME.*`).
#[derive(Serialize, Debug, Default)]
pub struct Name {
    /// First name
    #[serde(rename = "NAME.GIVEN", skip_serializing_if = "Option::is_none")]
    pub given: Option<String>,

    /// Last name
    #[serde(rename = "NAME.FAMILY", skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    /// Company name
    #[serde(rename = "NAME.COMPANY", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// `MR` or `MRS`
    #[serde(rename = "NAME.SALUTATION", skip_serializing_if = "Option::is_none")]
    pub salutation: Option<String>,

    /// Birth date as `YYYY-MM-DD`
    #[serde(rename = "NAME.BIRTHDATE", skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
}

/// Billing address (`ADDRESS.*`).
#[derive(Serialize, Debug, Default)]
pub struct Address {
    #[allow(missing_docs)]
    #[serde(rename = "ADDRESS.STREET", skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,

    #[allow(missing_docs)]
    #[serde(rename = "ADDRESS.ZIP", skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,

    #[allow(missing_docs)]
    #[serde(rename = "ADDRESS.CITY", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[allow(missing_docs)]
    #[serde(rename = "ADDRESS.STATE", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// ISO 3166-1 alpha-2 country code
    #[serde(rename = "ADDRESS.COUNTRY", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Customer contact data (`CONTACT.*`).
#[derive(Serialize, Debug, Default)]
pub struct Contact {
    #[allow(missing_docs)]
    #[serde(rename = "CONTACT.EMAIL", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Customer IP address
    #[serde(rename = "CONTACT.IP", skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

const RESERVED_CRITERIA: [&str; 4] = [
    "CRITERION.PAYMENT_METHOD",
    "CRITERION.SECRET",
    "CRITERION.SDK_NAME",
    "CRITERION.SDK_VERSION",
];

/// Free-form criteria echoed back by the gateway (`CRITERION.*`).
#[derive(Serialize, Debug, Default)]
pub struct Criterion {
    /// Name of the payment method type that built the request
    #[serde(rename = "CRITERION.PAYMENT_METHOD", skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,

    /// Secret hash, see [`Request::basket_data`]
    #[serde(rename = "CRITERION.SECRET", skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    #[allow(missing_docs)]
    #[serde(rename = "CRITERION.SDK_NAME", skip_serializing_if = "Option::is_none")]
    pub sdk_name: Option<String>,

    #[allow(missing_docs)]
    #[serde(rename = "CRITERION.SDK_VERSION", skip_serializing_if = "Option::is_none")]
    pub sdk_version: Option<String>,

    #[serde(flatten)]
    custom: BTreeMap<String, String>,
}

impl Criterion {
    /// Adds a custom criterion, sent as `CRITERION.<KEY>` with the key uppercased.
    ///
    /// Keys of the typed criteria (`payment_method`, `secret`, `sdk_name`,
    /// `sdk_version`) are rejected.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let key = format!("CRITERION.{}", key.to_ascii_uppercase());
        if RESERVED_CRITERIA.contains(&key.as_str()) {
            return Err(HeidelpayError::ReservedParameter(key));
        }
        self.custom.insert(key, value.into());
        Ok(())
    }

    /// Returns a custom criterion previously added with [`Criterion::set`].
    pub fn get(&self, key: &str) -> Option<&str> {
        self.custom
            .get(&format!("CRITERION.{}", key.to_ascii_uppercase()))
            .map(String::as_str)
    }
}

/// Customer data accepted by [`Request::customer_address`].
#[derive(Debug, Clone, Default)]
pub struct CustomerAddress {
    #[allow(missing_docs)]
    pub given_name: Option<String>,
    #[allow(missing_docs)]
    pub family_name: Option<String>,
    #[allow(missing_docs)]
    pub company: Option<String>,
    /// Shop side customer id
    pub shopper_id: Option<String>,
    #[allow(missing_docs)]
    pub street: Option<String>,
    #[allow(missing_docs)]
    pub state: Option<String>,
    #[allow(missing_docs)]
    pub zip: Option<String>,
    #[allow(missing_docs)]
    pub city: Option<String>,
    /// ISO 3166-1 alpha-2 country code
    pub country: Option<String>,
    #[allow(missing_docs)]
    pub email: Option<String>,
}

/// A gateway request under construction.
///
/// Groups are public so callers can fill in anything the convenience builders
/// do not cover. Serialising the request yields the flat form the gateway
/// expects, see [`Request::to_form`].
#[derive(Serialize, Debug)]
pub struct Request {
    #[serde(rename = "REQUEST.VERSION")]
    version: &'static str,

    #[allow(missing_docs)]
    #[serde(flatten)]
    pub security: Security,

    #[allow(missing_docs)]
    #[serde(flatten)]
    pub user: User,

    #[allow(missing_docs)]
    #[serde(flatten)]
    pub transaction: Transaction,

    #[allow(missing_docs)]
    #[serde(flatten)]
    pub identification: Identification,

    #[allow(missing_docs)]
    #[serde(flatten)]
    pub payment: Payment,

    #[allow(missing_docs)]
    #[serde(flatten)]
    pub presentation: Presentation,

    #[allow(missing_docs)]
    #[serde(flatten)]
    pub frontend: Frontend,

    #[allow(missing_docs)]
    #[serde(flatten)]
    pub account: Account,

    #[allow(missing_docs)]
    #[serde(flatten)]
    pub name: Name,

    #[allow(missing_docs)]
    #[serde(flatten)]
    pub address: Address,

    #[allow(missing_docs)]
    #[serde(flatten)]
    pub contact: Contact,

    #[allow(missing_docs)]
    #[serde(flatten)]
    pub criterion: Criterion,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            version: REQUEST_VERSION,
            security: Security::default(),
            user: User::default(),
            transaction: Transaction::default(),
            identification: Identification::default(),
            payment: Payment::default(),
            presentation: Presentation::default(),
            frontend: Frontend::default(),
            account: Account::default(),
            name: Name::default(),
            address: Address::default(),
            contact: Contact::default(),
            criterion: Criterion::default(),
        }
    }
}

impl Request {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the frontend group for key/value staging.
    pub fn frontend_mut(&mut self) -> &mut Frontend {
        &mut self.frontend
    }

    /// Sets the basket identification and amount.
    ///
    /// The secret hash (`CRITERION.SECRET`) is derived from the shop identifier
    /// and `secret` so the shop can later authenticate the gateway's response
    /// with [`Response::verify_security_hash`].
    ///
    /// # Examples
    ///
    /// ```
    /// use heidelpay_rs::types::Request;
    /// use rust_decimal::Decimal;
    /// use secrecy::SecretString;
    ///
    /// let mut request = Request::new();
    /// request.basket_data("order-42", Decimal::new(2599, 2), "EUR", &SecretString::from("s3cret"));
    ///
    /// let form = request.to_form().unwrap();
    /// assert_eq!(form["PRESENTATION.AMOUNT"], "25.99");
    /// assert_eq!(form["IDENTIFICATION.TRANSACTIONID"], "order-42");
    /// ```
    pub fn basket_data(
        &mut self,
        shop_identifier: impl Into<String>,
        amount: Decimal,
        currency: impl Into<String>,
        secret: &SecretString,
    ) -> &mut Self {
        let shop_identifier = shop_identifier.into();
        self.criterion.secret = Some(secret_hash(&shop_identifier, secret));
        self.identification.transaction_id = Some(shop_identifier);
        self.presentation.amount = Some(amount);
        self.presentation.currency = Some(currency.into());
        self
    }

    /// Sets the frontend language and the URL the gateway posts asynchronous
    /// results to.
    pub fn async_response(
        &mut self,
        language: impl Into<String>,
        response_url: impl Into<String>,
    ) -> &mut Self {
        self.frontend.language = Some(language.into());
        self.frontend.response_url = Some(response_url.into());
        self
    }

    /// Copies customer name, address and contact data into the request.
    pub fn customer_address(&mut self, customer: CustomerAddress) -> &mut Self {
        self.name.given = customer.given_name;
        self.name.family = customer.family_name;
        self.name.company = customer.company;
        self.identification.shopper_id = customer.shopper_id;
        self.address.street = customer.street;
        self.address.state = customer.state;
        self.address.zip = customer.zip;
        self.address.city = customer.city;
        self.address.country = customer.country;
        self.contact.email = customer.email;
        self
    }

    /// Returns the payment method part of `PAYMENT.CODE` (e.g. `CC`).
    pub fn payment_method_code(&self) -> Option<&str> {
        self.payment.code.as_deref().and_then(|code| code.split('.').next())
    }

    /// Flattens the request into the form fields posted to the gateway.
    ///
    /// Unset optional fields are omitted.
    pub fn to_form(&self) -> Result<BTreeMap<String, String>> {
        if let Some(code) = self.payment_method_code() {
            if !is_valid_payment_code(code) {
                return Err(HeidelpayError::InvalidPaymentCode(code.to_string()));
            }
        }

        let Value::Object(fields) = serde_json::to_value(self)? else {
            return Err(HeidelpayError::Other(
                "request did not serialise to a field map".to_string(),
            ));
        };

        Ok(fields
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((key, s)),
                other => Some((key, other.to_string())),
            })
            .collect())
    }
}

/// Error details reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingError {
    /// `PROCESSING.RETURN_CODE`, e.g. `800.100.152`
    pub code: String,

    /// `PROCESSING.RETURN`, a human readable message
    pub message: String,
}

/// Parsed gateway response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    fields: BTreeMap<String, String>,
}

impl Response {
    /// Parses a form-encoded gateway answer.
    ///
    /// # Examples
    ///
    /// ```
    /// use heidelpay_rs::types::Response;
    ///
    /// let response = Response::from_form_body(
    ///     "PROCESSING.RESULT=ACK&IDENTIFICATION.UNIQUEID=31HA07BC81",
    /// ).unwrap();
    /// assert!(response.is_success());
    /// assert_eq!(response.payment_reference_id(), Some("31HA07BC81"));
    /// ```
    pub fn from_form_body(body: &str) -> Result<Self> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(body)?;
        Ok(Self::from_fields(pairs))
    }

    /// Builds a response from already decoded fields.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Returns a raw response field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Returns all response fields.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// `true` if the gateway acknowledged the transaction.
    pub fn is_success(&self) -> bool {
        self.get("PROCESSING.RESULT") == Some("ACK")
    }

    /// `true` if the transaction waits for the customer or a third party.
    pub fn is_pending(&self) -> bool {
        self.get("PROCESSING.STATUS_CODE") == Some("80")
    }

    /// `true` unless the gateway acknowledged the transaction.
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Return code and message of the transaction.
    pub fn error(&self) -> ProcessingError {
        ProcessingError {
            code: self.get("PROCESSING.RETURN_CODE").unwrap_or_default().to_string(),
            message: self.get("PROCESSING.RETURN").unwrap_or_default().to_string(),
        }
    }

    /// Gateway side unique id (`IDENTIFICATION.UNIQUEID`).
    pub fn unique_id(&self) -> Option<&str> {
        self.get("IDENTIFICATION.UNIQUEID")
    }

    /// Reference id to pass to capture, refund, reversal, rebill or the
    /// on-registration transactions. Same as [`Response::unique_id`].
    pub fn payment_reference_id(&self) -> Option<&str> {
        self.unique_id()
    }

    /// Short id printed on the customer's statement.
    pub fn short_id(&self) -> Option<&str> {
        self.get("IDENTIFICATION.SHORTID")
    }

    /// Echo of the shop side transaction id.
    pub fn transaction_id(&self) -> Option<&str> {
        self.get("IDENTIFICATION.TRANSACTIONID")
    }

    /// Redirect URL for hosted payment pages and online transfers.
    pub fn redirect_url(&self) -> Option<&str> {
        self.get("FRONTEND.REDIRECT_URL")
    }

    /// URL of the card payment frame.
    pub fn payment_frame_url(&self) -> Option<&str> {
        self.get("FRONTEND.PAYMENT_FRAME_URL")
    }

    /// Returns the URL the customer has to be sent to.
    ///
    /// Card transactions that collect card data (registration, authorize and
    /// debit) use the payment frame URL when present. Everything else uses the
    /// redirect URL.
    pub fn payment_form_url(&self) -> Result<&str> {
        let mut code = self.get("PAYMENT.CODE").unwrap_or_default().split('.');
        let method = code.next().unwrap_or_default();
        let transaction = code.next().unwrap_or_default();

        let is_card = matches!(method, "CC" | "DC");
        let collects_card_data = matches!(transaction, "RG" | "PA" | "DB");
        if is_card && collects_card_data {
            if let Some(url) = self.payment_frame_url() {
                return Ok(url);
            }
        }

        self.redirect_url()
            .ok_or_else(|| HeidelpayError::MissingField("FRONTEND.REDIRECT_URL".to_string()))
    }

    /// Verifies the `CRITERION.SECRET` echoed by the gateway.
    ///
    /// `transaction_id` must be the shop identifier given to
    /// [`Request::basket_data`] and `secret` the same secret.
    pub fn verify_security_hash(&self, secret: &SecretString, transaction_id: &str) -> Result<()> {
        let received = self.get("CRITERION.SECRET").ok_or_else(|| {
            HeidelpayError::SecurityHashMismatch("response carries no secret hash".to_string())
        })?;

        if constant_time_eq(&secret_hash(transaction_id, secret), received) {
            Ok(())
        } else {
            Err(HeidelpayError::SecurityHashMismatch(format!(
                "hash does not match transaction {transaction_id}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request_form() {
        let form = Request::new().to_form().unwrap();

        assert_eq!(form["REQUEST.VERSION"], "1.0");
        assert_eq!(form["FRONTEND.ENABLED"], "TRUE");
        assert_eq!(form["FRONTEND.MODE"], "WHITELABEL");
        assert!(!form.contains_key("FRONTEND.PREVENT_ASYNC_REDIRECT"));
        assert!(!form.contains_key("PAYMENT.CODE"));
        assert!(!form.contains_key("USER.PWD"));
    }

    #[test]
    fn test_credentials_and_mode() {
        let mut request = Request::new();
        request.user.login = Some("login".to_string());
        request.user.password = Some(SecretString::from("93167DE7"));
        request.transaction.mode = Some(TransactionMode::ConnectorTest);

        let form = request.to_form().unwrap();
        assert_eq!(form["USER.PWD"], "93167DE7");
        assert_eq!(form["TRANSACTION.MODE"], "CONNECTOR_TEST");
        assert!(!format!("{:?}", request).contains("93167DE7"));
    }

    #[test]
    fn test_frontend_set() {
        let mut frontend = Frontend::default();
        frontend.set("enabled", Some("FALSE")).unwrap();
        frontend.set("css_path", Some("https://shop.example/frame.css")).unwrap();
        frontend.set("prevent_async_redirect", Some("TRUE")).unwrap();

        assert!(!frontend.enabled);
        assert_eq!(frontend.css_path.as_deref(), Some("https://shop.example/frame.css"));
        assert_eq!(frontend.prevent_async_redirect, Some(true));

        frontend.set("css_path", None).unwrap();
        assert_eq!(frontend.css_path, None);

        assert!(matches!(
            frontend.set("enabled", None),
            Err(HeidelpayError::InvalidParameterValue { .. })
        ));
        assert!(matches!(
            frontend.set("unknown", Some("x")),
            Err(HeidelpayError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_customer_address_and_criteria() {
        let mut request = Request::new();
        request
            .customer_address(CustomerAddress {
                given_name: Some("Heidel".to_string()),
                family_name: Some("Berger-Payment".to_string()),
                shopper_id: Some("12344".to_string()),
                street: Some("Vangerowstr. 18".to_string()),
                zip: Some("69115".to_string()),
                city: Some("Heidelberg".to_string()),
                country: Some("DE".to_string()),
                email: Some("support@heidelpay.de".to_string()),
                ..Default::default()
            })
            .async_response("EN", "https://shop.example/response");
        request.criterion.set("shop_type", "demo").unwrap();

        let form = request.to_form().unwrap();
        assert_eq!(form["NAME.GIVEN"], "Heidel");
        assert_eq!(form["IDENTIFICATION.SHOPPERID"], "12344");
        assert_eq!(form["ADDRESS.COUNTRY"], "DE");
        assert_eq!(form["CONTACT.EMAIL"], "support@heidelpay.de");
        assert_eq!(form["FRONTEND.LANGUAGE"], "EN");
        assert_eq!(form["FRONTEND.RESPONSE_URL"], "https://shop.example/response");
        assert_eq!(form["CRITERION.SHOP_TYPE"], "demo");
        assert_eq!(request.criterion.get("shop_type"), Some("demo"));
        assert!(!form.contains_key("NAME.COMPANY"));
    }

    #[test]
    fn test_reserved_criteria_rejected() {
        let mut criterion = Criterion::default();

        let err = criterion.set("secret", "forged").unwrap_err();
        assert!(matches!(err, HeidelpayError::ReservedParameter(key) if key == "CRITERION.SECRET"));
        assert!(criterion.set("Payment_Method", "Other").is_err());
        assert_eq!(criterion.get("secret"), None);
    }

    #[test]
    fn test_malformed_payment_code_rejected() {
        let mut request = Request::new();
        request.payment.code = Some("cc.PA".to_string());

        let err = request.to_form().unwrap_err();
        assert!(matches!(err, HeidelpayError::InvalidPaymentCode(code) if code == "cc"));
    }

    #[test]
    fn test_response_status() {
        let response = Response::from_form_body(
            "PROCESSING.RESULT=NOK&PROCESSING.STATUS_CODE=70\
             &PROCESSING.RETURN_CODE=800.100.152\
             &PROCESSING.RETURN=transaction+declined",
        )
        .unwrap();

        assert!(response.is_error());
        assert!(!response.is_pending());
        assert_eq!(
            response.error(),
            ProcessingError {
                code: "800.100.152".to_string(),
                message: "transaction declined".to_string(),
            }
        );

        let pending = Response::from_fields([
            ("PROCESSING.RESULT", "ACK"),
            ("PROCESSING.STATUS_CODE", "80"),
        ]);
        assert!(pending.is_success());
        assert!(pending.is_pending());
    }

    #[test]
    fn test_payment_form_url() {
        let card = Response::from_fields([
            ("PAYMENT.CODE", "CC.RG"),
            ("FRONTEND.PAYMENT_FRAME_URL", "https://frame.example"),
            ("FRONTEND.REDIRECT_URL", "https://redirect.example"),
        ]);
        assert_eq!(card.payment_form_url().unwrap(), "https://frame.example");

        let card_capture = Response::from_fields([
            ("PAYMENT.CODE", "CC.CP"),
            ("FRONTEND.PAYMENT_FRAME_URL", "https://frame.example"),
            ("FRONTEND.REDIRECT_URL", "https://redirect.example"),
        ]);
        assert_eq!(card_capture.payment_form_url().unwrap(), "https://redirect.example");

        let sofort = Response::from_fields([
            ("PAYMENT.CODE", "OT.PA"),
            ("FRONTEND.REDIRECT_URL", "https://sofort.example"),
        ]);
        assert_eq!(sofort.payment_form_url().unwrap(), "https://sofort.example");

        let empty = Response::from_fields([("PAYMENT.CODE", "OT.PA")]);
        assert!(matches!(
            empty.payment_form_url(),
            Err(HeidelpayError::MissingField(_))
        ));
    }

    #[test]
    fn test_verify_security_hash() {
        let secret = SecretString::from("39542395d");
        let response = Response::from_fields([(
            "CRITERION.SECRET".to_string(),
            secret_hash("2843294932", &secret),
        )]);

        assert!(response.verify_security_hash(&secret, "2843294932").is_ok());
        assert!(response.verify_security_hash(&secret, "2843294933").is_err());
        assert!(Response::default()
            .verify_security_hash(&secret, "2843294932")
            .is_err());
    }
}
