use crate::utils::error::{GatewayError, Result};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

pub const DEFAULT_CURRENCY: &str = "THB";

/// Merchant credentials issued by TrueMoney.
#[derive(Debug, Clone)]
pub struct MerchantAccount {
    pub app_id: String,
    pub shop_code: String,
    secret: SecretString,
    bearer: SecretString,
}

impl MerchantAccount {
    pub fn new(
        app_id: impl Into<String>,
        shop_code: impl Into<String>,
        secret: impl Into<String>,
        bearer: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            shop_code: shop_code.into(),
            secret: SecretString::new(secret.into()),
            bearer: SecretString::new(bearer.into()),
        }
    }

    pub fn secret(&self) -> &str {
        self.secret.expose_secret()
    }

    pub fn bearer(&self) -> &str {
        self.bearer.expose_secret()
    }
}

/// Parses the `appId:shopCode:secret:bearer` form.
impl FromStr for MerchantAccount {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 4 || parts.iter().any(|p| p.trim().is_empty()) {
            return Err(GatewayError::InvalidConfigValueError {
                field: "merchant.account".to_string(),
                value: String::new(),
                reason: "Expected four non-empty parts: appId:shopCode:secret:bearer".to_string(),
            });
        }

        Ok(Self::new(parts[0], parts[1], parts[2], parts[3]))
    }
}

/// One charge to create.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentOrder {
    pub invoice: String,
    pub amount: Decimal,
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl PaymentOrder {
    pub fn new(invoice: impl Into<String>, amount: Decimal) -> Self {
        Self {
            invoice: invoice.into(),
            amount,
            currency: DEFAULT_CURRENCY.to_string(),
            success_url: String::new(),
            cancel_url: String::new(),
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_redirect_urls(
        mut self,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        self.success_url = success_url.into();
        self.cancel_url = cancel_url.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failure,
}

/// Form fields POSTed back by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackData {
    fields: HashMap<String, String>,
}

impl CallbackData {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Decodes an `application/x-www-form-urlencoded` body.
    pub fn from_form_body(body: &str) -> Self {
        let fields = url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn is_backend_posted(&self) -> bool {
        !self.fields.is_empty()
    }

    pub fn payment_id(&self) -> Option<&str> {
        self.get("payment_id").filter(|id| !id.trim().is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CallbackData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayResult {
    pub status: bool,
    pub data: ResultData,
    pub custom: ResultCustom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultData {
    pub gateway: String,
    pub status: PaymentStatus,
    pub invoice: String,
    pub currency: String,
    pub amount: Decimal,
    pub dump: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCustom {
    pub recheck: String,
}

/// Auto-submitting form that sends the payer to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentForm {
    pub action: String,
    pub method: String,
    pub fields: Vec<(String, String)>,
}

impl PaymentForm {
    pub fn post(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            method: "post".to_string(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<form method=\"{}\" action=\"{}\" id=\"payment-gateway-form\">\n",
            html_escape(&self.method),
            html_escape(&self.action)
        );
        for (name, value) in &self.fields {
            html.push_str(&format!(
                "  <input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
                html_escape(name),
                html_escape(value)
            ));
        }
        html.push_str("</form>\n");
        html.push_str(
            "<script>document.getElementById('payment-gateway-form').submit();</script>\n",
        );
        html
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPayment {
    pub payment_id: String,
    pub request_id: String,
    pub form: PaymentForm,
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_merchant_account_from_colon_string() {
        let account: MerchantAccount = "app-1:shop-9:s3cret:tok".parse().unwrap();
        assert_eq!(account.app_id, "app-1");
        assert_eq!(account.shop_code, "shop-9");
        assert_eq!(account.secret(), "s3cret");
        assert_eq!(account.bearer(), "tok");
    }

    #[test]
    fn test_merchant_account_rejects_short_string() {
        assert!("app:shop:secret".parse::<MerchantAccount>().is_err());
        assert!("app::secret:bearer".parse::<MerchantAccount>().is_err());
        assert!("a:b:c:d:e".parse::<MerchantAccount>().is_err());
    }

    #[test]
    fn test_merchant_account_debug_redacts_secrets() {
        let account = MerchantAccount::new("app", "shop", "very-secret", "bearer-token");
        let debug = format!("{:?}", account);
        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("bearer-token"));
    }

    #[test]
    fn test_payment_order_defaults_to_thb() {
        let order = PaymentOrder::new("INV-1", dec!(10));
        assert_eq!(order.currency, "THB");
        assert!(order.success_url.is_empty());
    }

    #[test]
    fn test_callback_from_form_body() {
        let callback = CallbackData::from_form_body("payment_id=PAY%2F1&status=ok");
        assert!(callback.is_backend_posted());
        assert_eq!(callback.payment_id(), Some("PAY/1"));
        assert_eq!(callback.get("status"), Some("ok"));
    }

    #[test]
    fn test_empty_callback_is_not_backend_posted() {
        let callback = CallbackData::default();
        assert!(!callback.is_backend_posted());
        assert_eq!(callback.payment_id(), None);

        let blank: CallbackData = [("payment_id", " ")].into_iter().collect();
        assert_eq!(blank.payment_id(), None);
    }

    #[test]
    fn test_payment_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&PaymentStatus::Success).unwrap(), "\"success\"");
        assert_eq!(serde_json::to_string(&PaymentStatus::Failure).unwrap(), "\"failure\"");
    }

    #[test]
    fn test_payment_form_escapes_values() {
        let form = PaymentForm::post("https://gw.example/p?a=1&b=2").with_field("signature", "a\"<b>");
        let html = form.to_html();
        assert!(html.contains("action=\"https://gw.example/p?a=1&amp;b=2\""));
        assert!(html.contains("value=\"a&quot;&lt;b&gt;\""));
        assert!(html.contains(".submit()"));
    }
}
