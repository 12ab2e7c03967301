use crate::config::toml_config::TomlConfig;
use crate::config::GatewayConfig;
use crate::domain::model::PaymentOrder;
use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::Validate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::{Map, Value};
use std::path::Path;

#[derive(Parser)]
#[command(name = "truemoney-gateway")]
#[command(about = "Create and check TrueMoney payments")]
pub struct CliConfig {
    #[arg(long, default_value = "gateway.toml", help = "Path to the TOML configuration")]
    pub config: String,

    #[arg(long, help = "Credentials as appId:shopCode:secret:bearer")]
    pub merchant_account: Option<String>,

    #[arg(long, help = "Use the TrueMoney test environment")]
    pub sandbox: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Write logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the signed creation payload without sending it
    Payload(OrderArgs),
    /// Create a payment and print the redirect form
    Create(OrderArgs),
    /// Look up a payment by its gateway id
    Enquiry {
        #[arg(long)]
        payment_id: String,
    },
    /// Sign a message with the merchant secret
    Sign {
        #[arg(long)]
        message: String,
    },
}

#[derive(Debug, Args)]
pub struct OrderArgs {
    #[arg(long)]
    pub invoice: String,

    #[arg(long)]
    pub amount: Decimal,

    #[arg(long)]
    pub currency: Option<String>,

    #[arg(long)]
    pub success_url: Option<String>,

    #[arg(long)]
    pub cancel_url: Option<String>,

    #[arg(long = "set", value_name = "KEY=JSON", help = "Override a top-level payload field")]
    pub overrides: Vec<String>,
}

impl OrderArgs {
    pub fn to_order(&self, config: &GatewayConfig) -> PaymentOrder {
        let defaults = config.order_defaults();
        PaymentOrder::new(self.invoice.clone(), self.amount)
            .with_currency(self.currency.clone().unwrap_or_else(|| defaults.currency.clone()))
            .with_redirect_urls(
                self.success_url
                    .clone()
                    .unwrap_or_else(|| defaults.success_url.clone()),
                self.cancel_url
                    .clone()
                    .unwrap_or_else(|| defaults.cancel_url.clone()),
            )
    }

    /// `key=value` pairs; values that are not valid JSON are taken as strings.
    pub fn override_map(&self) -> Result<Map<String, Value>> {
        let mut overrides = Map::new();
        for entry in &self.overrides {
            let (key, raw) = entry.split_once('=').ok_or_else(|| {
                GatewayError::InvalidConfigValueError {
                    field: "--set".to_string(),
                    value: entry.clone(),
                    reason: "Expected KEY=JSON".to_string(),
                }
            })?;
            let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
            overrides.insert(key.trim().to_string(), value);
        }
        Ok(overrides)
    }
}

impl CliConfig {
    /// File settings with command-line flags applied on top.
    pub fn load_gateway_config(&self) -> Result<GatewayConfig> {
        let mut file_config = if Path::new(&self.config).exists() {
            TomlConfig::from_file(&self.config)?
        } else if self.merchant_account.is_some() {
            TomlConfig::default()
        } else {
            return Err(GatewayError::MissingConfigError {
                field: format!("{} (or --merchant-account)", self.config),
            });
        };

        if let Some(account) = &self.merchant_account {
            file_config.merchant.account = Some(SecretString::new(account.clone()));
        }
        if self.sandbox {
            file_config.gateway.sandbox = Some(true);
        }

        file_config.validate()?;
        file_config.to_gateway_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ConfigProvider;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_create_command() {
        let cli = parse(&[
            "truemoney-gateway",
            "--merchant-account",
            "app:shop:key:tok",
            "create",
            "--invoice",
            "INV-1",
            "--amount",
            "99.5",
            "--set",
            "locale=\"th_TH\"",
        ]);

        match &cli.command {
            Command::Create(args) => {
                assert_eq!(args.invoice, "INV-1");
                assert_eq!(args.amount, dec!(99.5));
                let overrides = args.override_map().unwrap();
                assert_eq!(overrides["locale"], json!("th_TH"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_override_map_falls_back_to_string() {
        let args = OrderArgs {
            invoice: "INV".to_string(),
            amount: dec!(1),
            currency: None,
            success_url: None,
            cancel_url: None,
            overrides: vec!["intent=authorize".to_string(), "payer={\"a\":1}".to_string()],
        };

        let overrides = args.override_map().unwrap();
        assert_eq!(overrides["intent"], json!("authorize"));
        assert_eq!(overrides["payer"], json!({"a": 1}));

        let bad = OrderArgs {
            overrides: vec!["no-equals-sign".to_string()],
            ..args
        };
        assert!(bad.override_map().is_err());
    }

    #[test]
    fn test_merchant_account_flag_without_file() {
        let cli = parse(&[
            "truemoney-gateway",
            "--config",
            "/nonexistent/gateway.toml",
            "--merchant-account",
            "app:shop:key:tok",
            "--sandbox",
            "sign",
            "--message",
            "hello",
        ]);

        let config = cli.load_gateway_config().unwrap();
        assert_eq!(config.merchant_account().app_id, "app");
        assert!(config.sandbox_mode());
    }

    #[test]
    fn test_missing_file_and_account_is_error() {
        let cli = parse(&[
            "truemoney-gateway",
            "--config",
            "/nonexistent/gateway.toml",
            "enquiry",
            "--payment-id",
            "P1",
        ]);

        assert!(matches!(
            cli.load_gateway_config(),
            Err(GatewayError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_order_uses_config_defaults() {
        let cli = parse(&[
            "truemoney-gateway",
            "--config",
            "/nonexistent/gateway.toml",
            "--merchant-account",
            "app:shop:key:tok",
            "payload",
            "--invoice",
            "INV-2",
            "--amount",
            "10",
            "--success-url",
            "https://shop.example/ok",
        ]);
        let config = cli.load_gateway_config().unwrap();

        let Command::Payload(args) = &cli.command else {
            panic!("expected payload command");
        };
        let order = args.to_order(&config);
        assert_eq!(order.currency, "THB");
        assert_eq!(order.success_url, "https://shop.example/ok");
        assert_eq!(order.cancel_url, "");
    }
}
