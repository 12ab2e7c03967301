#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::transport::DEFAULT_TIMEOUT_SECONDS;
use crate::core::ConfigProvider;
use crate::domain::model::{MerchantAccount, DEFAULT_CURRENCY};

/// Order fields applied when the caller leaves them empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDefaults {
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl Default for OrderDefaults {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            success_url: String::new(),
            cancel_url: String::new(),
        }
    }
}

/// Resolved gateway settings.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    account: MerchantAccount,
    sandbox: bool,
    endpoint: Option<String>,
    timeout_seconds: u64,
    order_defaults: OrderDefaults,
}

impl GatewayConfig {
    pub fn new(account: MerchantAccount) -> Self {
        Self {
            account,
            sandbox: false,
            endpoint: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            order_defaults: OrderDefaults::default(),
        }
    }

    pub fn with_sandbox_mode(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Replaces the payment base URL, used verbatim (for testing).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_order_defaults(mut self, order_defaults: OrderDefaults) -> Self {
        self.order_defaults = order_defaults;
        self
    }

    pub fn order_defaults(&self) -> &OrderDefaults {
        &self.order_defaults
    }
}

impl ConfigProvider for GatewayConfig {
    fn merchant_account(&self) -> &MerchantAccount {
        &self.account
    }

    fn sandbox_mode(&self) -> bool {
        self.sandbox
    }

    fn endpoint_override(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}
