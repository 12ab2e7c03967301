use crate::config::{GatewayConfig, OrderDefaults};
use crate::core::transport::DEFAULT_TIMEOUT_SECONDS;
use crate::domain::model::{MerchantAccount, DEFAULT_CURRENCY};
use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub merchant: MerchantSection,
    pub gateway: GatewaySection,
    pub order: OrderSection,
}

/// Either `account` in colon form or the four separate fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MerchantSection {
    pub account: Option<SecretString>,
    pub app_id: Option<String>,
    pub shop_code: Option<String>,
    pub secret: Option<SecretString>,
    pub bearer: Option<SecretString>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GatewaySection {
    pub sandbox: Option<bool>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderSection {
    pub currency: Option<String>,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GatewayError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GatewayError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown names are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GatewayError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn merchant_account(&self) -> Result<MerchantAccount> {
        if let Some(account) = &self.merchant.account {
            return account.expose_secret().parse();
        }

        let app_id = validation::validate_required_field("merchant.app_id", &self.merchant.app_id)?;
        let shop_code =
            validation::validate_required_field("merchant.shop_code", &self.merchant.shop_code)?;
        let secret = validation::validate_required_field("merchant.secret", &self.merchant.secret)?;
        let bearer = validation::validate_required_field("merchant.bearer", &self.merchant.bearer)?;

        Ok(MerchantAccount::new(
            app_id.as_str(),
            shop_code.as_str(),
            secret.expose_secret().as_str(),
            bearer.expose_secret().as_str(),
        ))
    }

    pub fn sandbox(&self) -> bool {
        self.gateway.sandbox.unwrap_or(false)
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.gateway.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn validate_config(&self) -> Result<()> {
        let account = self.merchant_account()?;
        validation::validate_non_empty_string("merchant.app_id", &account.app_id)?;
        validation::validate_non_empty_string("merchant.shop_code", &account.shop_code)?;
        validation::validate_non_empty_string("merchant.secret", account.secret())?;
        validation::validate_non_empty_string("merchant.bearer", account.bearer())?;

        if let Some(endpoint) = &self.gateway.endpoint {
            validation::validate_url("gateway.endpoint", endpoint)?;
        }

        validation::validate_range("gateway.timeout_seconds", self.timeout_seconds(), 1, 300)?;

        if let Some(currency) = &self.order.currency {
            validation::validate_non_empty_string("order.currency", currency)?;
        }
        for (field, url) in [
            ("order.success_url", &self.order.success_url),
            ("order.cancel_url", &self.order.cancel_url),
        ] {
            if let Some(url) = url {
                validation::validate_url(field, url)?;
            }
        }

        Ok(())
    }

    pub fn to_gateway_config(&self) -> Result<GatewayConfig> {
        let mut config = GatewayConfig::new(self.merchant_account()?)
            .with_sandbox_mode(self.sandbox())
            .with_timeout_seconds(self.timeout_seconds())
            .with_order_defaults(OrderDefaults {
                currency: self
                    .order
                    .currency
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                success_url: self.order.success_url.clone().unwrap_or_default(),
                cancel_url: self.order.cancel_url.clone().unwrap_or_default(),
            });

        if let Some(endpoint) = &self.gateway.endpoint {
            config = config.with_endpoint(endpoint.clone());
        }

        Ok(config)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ConfigProvider;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[merchant]
app_id = "app-1"
shop_code = "SHOP01"
secret = "s3cret"
bearer = "tok"

[gateway]
sandbox = true
timeout_seconds = 10

[order]
currency = "USD"
success_url = "https://shop.example/ok"
cancel_url = "https://shop.example/cancel"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());

        let gateway = config.to_gateway_config().unwrap();
        assert_eq!(gateway.merchant_account().app_id, "app-1");
        assert_eq!(gateway.merchant_account().secret(), "s3cret");
        assert!(gateway.sandbox_mode());
        assert_eq!(gateway.timeout_seconds(), 10);
        assert_eq!(gateway.order_defaults().currency, "USD");
        assert_eq!(gateway.order_defaults().success_url, "https://shop.example/ok");
    }

    #[test]
    fn test_account_string_form() {
        let config = TomlConfig::from_toml_str(
            r#"
[merchant]
account = "app-2:SHOP02:key:bearer"
"#,
        )
        .unwrap();

        let account = config.merchant_account().unwrap();
        assert_eq!(account.app_id, "app-2");
        assert_eq!(account.shop_code, "SHOP02");
        assert_eq!(account.bearer(), "bearer");
        assert!(!config.sandbox());
        assert_eq!(config.timeout_seconds(), DEFAULT_TIMEOUT_SECONDS);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TMN_TEST_CONFIG_SECRET", "from-env");

        let config = TomlConfig::from_toml_str(
            r#"
[merchant]
app_id = "app"
shop_code = "shop"
secret = "${TMN_TEST_CONFIG_SECRET}"
bearer = "${TMN_TEST_CONFIG_UNSET_BEARER}"
"#,
        )
        .unwrap();

        let account = config.merchant_account().unwrap();
        assert_eq!(account.secret(), "from-env");
        assert_eq!(account.bearer(), "${TMN_TEST_CONFIG_UNSET_BEARER}");

        std::env::remove_var("TMN_TEST_CONFIG_SECRET");
    }

    #[test]
    fn test_missing_credentials_fail_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[merchant]
app_id = "app"
shop_code = "shop"
"#,
        )
        .unwrap();

        assert!(matches!(
            config.validate(),
            Err(GatewayError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let bad_endpoint = TomlConfig::from_toml_str(
            r#"
[merchant]
account = "a:b:c:d"
[gateway]
endpoint = "not-a-url"
"#,
        )
        .unwrap();
        assert!(bad_endpoint.validate().is_err());

        let bad_timeout = TomlConfig::from_toml_str(
            r#"
[merchant]
account = "a:b:c:d"
[gateway]
timeout_seconds = 0
"#,
        )
        .unwrap();
        assert!(bad_timeout.validate().is_err());
    }

    #[test]
    fn test_debug_output_hides_secrets() {
        let config = TomlConfig::from_toml_str(
            r#"
[merchant]
account = "app:shop:hidden-secret:hidden-bearer"
"#,
        )
        .unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hidden-secret"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[merchant]\naccount = \"file-app:shop:key:tok\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.merchant_account().unwrap().app_id, "file-app");
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        assert!(matches!(
            TomlConfig::from_toml_str("[merchant\napp_id = "),
            Err(GatewayError::ConfigError { .. })
        ));
    }
}
