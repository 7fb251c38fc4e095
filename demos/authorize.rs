//! Example sandbox authorization.
//!
//! This example authorizes a credit card payment against the heidelpay sandbox
//! and prints the payment frame URL the customer has to be sent to.
//!
//! Run with:
//! ```bash
//! cargo run --example authorize
//! ```
//!
//! Environment variables (a `.env` file is honoured):
//! - HEIDELPAY_SECURITY_SENDER, HEIDELPAY_USER_LOGIN, HEIDELPAY_USER_PASSWORD,
//!   HEIDELPAY_TRANSACTION_CHANNEL: merchant credentials
//! - HEIDELPAY_SANDBOX: `true` (default) or `false`
//! - SHOP_URL: origin of the page embedding the payment frame

use heidelpay_rs::client::{ClientConfig, Gateway};
use heidelpay_rs::payment_methods::{CreditCardPaymentMethod, PaymentMethod};
use heidelpay_rs::transactions::frame::{PaymentFrame, PaymentFrameTransactions};
use heidelpay_rs::types::CustomerAddress;
use rust_decimal::Decimal;
use secrecy::SecretString;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = ClientConfig::from_env().unwrap_or_else(|_| {
        println!("No credentials set, using the public sandbox account");
        ClientConfig::new(
            "31HA07BC8142C5A171745D00AD63D182",
            "31ha07bc8142c5a171744e5aef11ffd3",
            "93167DE7",
            "31HA07BC8142C5A171744F3D6D155865",
        )
    });
    let shop_url = std::env::var("SHOP_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());

    println!("heidelpay example: credit card authorization");
    println!("   Gateway: {}", config.payment_url());
    println!();

    let gateway = Gateway::new(config);
    let mut credit_card = CreditCardPaymentMethod::new(gateway);
    credit_card
        .request_mut()
        .basket_data(
            "2843294932",
            Decimal::new(2312, 2),
            "EUR",
            &SecretString::from("39542395d"),
        )
        .async_response("EN", format!("{shop_url}/response"))
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
        });

    let frame = PaymentFrame::new(shop_url.as_str()).with_css_path(format!("{shop_url}/frame.css"));
    let response = credit_card.authorize_with_frame(frame).await?;

    if response.is_error() {
        let error = response.error();
        eprintln!("Authorization failed: {} ({})", error.message, error.code);
        return Ok(());
    }

    println!("Payment reference: {}", response.payment_reference_id().unwrap_or("-"));
    println!("Payment frame:     {}", response.payment_form_url()?);
    Ok(())
}
