//! Client configuration and the shared gateway handle.
//!
//! A [`Gateway`] bundles the merchant credentials, the target environment and
//! the [`Transport`] used to reach the gateway. Payment methods hold it behind
//! an `Arc`, so one gateway serves any number of payment method instances.

use crate::errors::{HeidelpayError, Result};
use crate::transport::{HttpTransport, Transport};
use crate::types::{Request, TransactionMode};
use reqwest::Client;
use secrecy::SecretString;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Sandbox endpoint of the gateway.
pub const SANDBOX_URL: &str = "https://test-heidelpay.hpcgw.net/ngw/post";

/// Live endpoint of the gateway.
pub const LIVE_URL: &str = "https://heidelpay.hpcgw.net/ngw/post";

/// Gateway environment a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Test system, no money is moved
    #[default]
    Sandbox,
    /// Production system
    Live,
}

impl Environment {
    /// Default endpoint of this environment.
    pub fn url(&self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_URL,
            Environment::Live => LIVE_URL,
        }
    }

    /// Transaction mode sent with requests in this environment.
    pub fn transaction_mode(&self) -> TransactionMode {
        match self {
            Environment::Sandbox => TransactionMode::ConnectorTest,
            Environment::Live => TransactionMode::Live,
        }
    }
}

/// Merchant credentials and connection settings.
pub struct ClientConfig {
    /// Security sender id (`SECURITY.SENDER`)
    pub security_sender: String,

    /// API user login (`USER.LOGIN`)
    pub user_login: String,

    /// API user password (`USER.PWD`)
    pub user_password: SecretString,

    /// Channel id of the payment method (`TRANSACTION.CHANNEL`)
    pub transaction_channel: String,

    /// Target environment
    pub environment: Environment,

    /// Endpoint override, e.g. for a local gateway mock
    pub endpoint: Option<Url>,

    /// HTTP client to use for requests
    pub http_client: Client,
}

impl ClientConfig {
    /// Creates a sandbox configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use heidelpay_rs::client::{ClientConfig, Environment};
    ///
    /// let config = ClientConfig::new(
    ///     "31HA07BC8142C5A171745D00AD63D182",
    ///     "31ha07bc8142c5a171744e5aef11ffd3",
    ///     "93167DE7",
    ///     "31HA07BC8142C5A171744F3D6D155865",
    /// );
    /// assert_eq!(config.environment, Environment::Sandbox);
    /// ```
    pub fn new(
        security_sender: impl Into<String>,
        user_login: impl Into<String>,
        user_password: impl Into<String>,
        transaction_channel: impl Into<String>,
    ) -> Self {
        Self {
            security_sender: security_sender.into(),
            user_login: user_login.into(),
            user_password: SecretString::from(user_password.into()),
            transaction_channel: transaction_channel.into(),
            environment: Environment::Sandbox,
            endpoint: None,
            http_client: Client::new(),
        }
    }

    /// Reads the configuration from `HEIDELPAY_*` environment variables.
    ///
    /// `HEIDELPAY_SECURITY_SENDER`, `HEIDELPAY_USER_LOGIN`,
    /// `HEIDELPAY_USER_PASSWORD` and `HEIDELPAY_TRANSACTION_CHANNEL` are
    /// required. `HEIDELPAY_SANDBOX` defaults to `true`, and
    /// `HEIDELPAY_ENDPOINT` optionally overrides the endpoint.
    pub fn from_env() -> Result<Self> {
        fn required(name: &str) -> Result<String> {
            std::env::var(name).map_err(|_| HeidelpayError::ConfigError(format!("{name} is not set")))
        }

        let mut config = Self::new(
            required("HEIDELPAY_SECURITY_SENDER")?,
            required("HEIDELPAY_USER_LOGIN")?,
            required("HEIDELPAY_USER_PASSWORD")?,
            required("HEIDELPAY_TRANSACTION_CHANNEL")?,
        );

        if let Ok(sandbox) = std::env::var("HEIDELPAY_SANDBOX") {
            let sandbox = crate::utils::parse_flag("HEIDELPAY_SANDBOX", &sandbox)
                .map_err(|e| HeidelpayError::ConfigError(e.to_string()))?;
            config = config.with_sandbox(sandbox);
        }

        if let Ok(endpoint) = std::env::var("HEIDELPAY_ENDPOINT") {
            config = config.with_endpoint(&endpoint)?;
        }

        Ok(config)
    }

    /// Switches between sandbox and live.
    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.environment = if sandbox {
            Environment::Sandbox
        } else {
            Environment::Live
        };
        self
    }

    /// Sends requests to `endpoint` instead of the environment's default URL.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        self.endpoint = Some(Url::parse(endpoint)?);
        Ok(self)
    }

    /// Sets a custom HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    /// The URL transactions are posted to.
    pub fn payment_url(&self) -> &str {
        match &self.endpoint {
            Some(url) => url.as_str(),
            None => self.environment.url(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("security_sender", &self.security_sender)
            .field("user_login", &self.user_login)
            .field("user_password", &self.user_password)
            .field("transaction_channel", &self.transaction_channel)
            .field("environment", &self.environment)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Configuration plus transport, shared by payment methods.
pub struct Gateway {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl Gateway {
    /// Creates a gateway that posts over HTTP with the config's client.
    pub fn new(config: ClientConfig) -> Arc<Self> {
        let transport = Arc::new(HttpTransport::new(config.http_client.clone()));
        Self::with_transport(config, transport)
    }

    /// Creates a gateway with a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Arc<Self> {
        Arc::new(Self { config, transport })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the transport.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// The URL transactions are posted to.
    pub fn payment_url(&self) -> &str {
        self.config.payment_url()
    }

    /// Creates a request carrying the merchant credentials and mode.
    pub fn new_request(&self) -> Request {
        let mut request = Request::new();
        request.security.sender = Some(self.config.security_sender.clone());
        request.user.login = Some(self.config.user_login.clone());
        request.user.password = Some(self.config.user_password.clone());
        request.transaction.channel = Some(self.config.transaction_channel.clone());
        request.transaction.mode = Some(self.config.environment.transaction_mode());
        request
    }
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
