pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::config::{toml_config::TomlConfig, GatewayConfig, OrderDefaults};
pub use crate::core::{transport::HttpTransport, truemoney::TrueMoneyApi};
pub use crate::domain::model::{
    CallbackData, GatewayResult, MerchantAccount, PaymentForm, PaymentOrder, PaymentStatus,
    RenderedPayment,
};
pub use crate::domain::ports::{ConfigProvider, PaymentGateway};
pub use crate::utils::error::{GatewayError, Result};
