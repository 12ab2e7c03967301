//! Request and response shapes of the TrueMoney payments API.

use crate::core::signature;
use crate::domain::model::{MerchantAccount, PaymentOrder};
use crate::utils::error::{GatewayError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize)]
pub struct CreatePaymentRequest {
    pub app_id: String,
    pub intent: String,
    pub request_id: String,
    pub locale: Option<String>,
    pub payer: Payer,
    pub payment_type: String,
    pub redirect_urls: RedirectUrls,
    pub billing_address: BillingAddress,
    pub payment_info: PaymentInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct Payer {
    pub funding_instrument: Option<String>,
    pub installment: Option<String>,
    pub payer_info: PayerInfo,
    pub payment_method: String,
    pub payment_processor: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayerInfo {
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub payer_id: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RedirectUrls {
    pub return_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BillingAddress {
    pub city_district: String,
    pub company_name: Option<String>,
    pub company_tax_id: Option<String>,
    pub country: String,
    pub email: String,
    pub forename: String,
    pub line1: String,
    pub line2: Option<String>,
    pub phone: Option<String>,
    pub postal_code: String,
    pub state_province: String,
    pub surname: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentInfo {
    pub amount: Option<String>,
    pub currency: String,
    pub item_list: ItemList,
    pub ref1: String,
    pub ref2: String,
    pub ref3: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemList {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub item_id: u32,
    pub shop_code: String,
    pub service: String,
    pub product_id: String,
    pub detail: String,
    pub price: String,
    pub ref1: String,
    pub ref2: String,
    pub ref3: String,
}

impl CreatePaymentRequest {
    /// The fixed template for a single-item redirect sale.
    pub fn from_order(account: &MerchantAccount, order: &PaymentOrder) -> Self {
        Self {
            app_id: account.app_id.clone(),
            intent: "sale".to_string(),
            request_id: order.invoice.clone(),
            locale: None,
            payer: Payer {
                funding_instrument: None,
                installment: None,
                payer_info: PayerInfo {
                    email: "user@email.com".to_string(),
                    firstname: "FirstName".to_string(),
                    lastname: "LastName".to_string(),
                    payer_id: "userlogin".to_string(),
                    phone: "payer_phone".to_string(),
                },
                payment_method: "creditcard".to_string(),
                payment_processor: "CYBS-BAY".to_string(),
            },
            payment_type: "redirect".to_string(),
            redirect_urls: RedirectUrls {
                return_url: order.success_url.clone(),
                cancel_url: order.cancel_url.clone(),
            },
            billing_address: BillingAddress {
                city_district: "Tumbon".to_string(),
                company_name: None,
                company_tax_id: None,
                country: "TH".to_string(),
                email: "user@email.com".to_string(),
                forename: "FirstName".to_string(),
                line1: "Ratchadapisak Rd.".to_string(),
                line2: None,
                phone: None,
                postal_code: "10310".to_string(),
                state_province: "Bangkok".to_string(),
                surname: "LastName".to_string(),
            },
            payment_info: PaymentInfo {
                amount: None,
                currency: order.currency.clone(),
                item_list: ItemList {
                    items: vec![Item {
                        item_id: 1,
                        shop_code: account.shop_code.clone(),
                        service: "bill".to_string(),
                        product_id: "p1".to_string(),
                        detail: "d1".to_string(),
                        price: format_amount(order.amount),
                        ref1: String::new(),
                        ref2: String::new(),
                        ref3: String::new(),
                    }],
                },
                ref1: String::new(),
                ref2: String::new(),
                ref3: String::new(),
            },
        }
    }
}

/// Two decimals, `.` separator, no grouping.
pub fn format_amount(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Template merged with `overrides` (top-level keys replace the template's
/// wholesale), then signed.
pub fn build_signed_payload(
    account: &MerchantAccount,
    order: &PaymentOrder,
    overrides: Map<String, Value>,
) -> Result<Value> {
    let template = serde_json::to_value(CreatePaymentRequest::from_order(account, order))?;
    let Value::Object(mut request) = template else {
        return Err(GatewayError::ConfigError {
            message: "payment template did not serialize to an object".to_string(),
        });
    };

    for (key, value) in overrides {
        request.insert(key, value);
    }

    let mut request = Value::Object(request);
    let signature = signature::payment_signature(
        account.secret(),
        &account.app_id,
        &order.invoice,
        &request,
    )?;

    if let Value::Object(fields) = &mut request {
        fields.insert("signature".to_string(), Value::String(signature));
    }

    Ok(request)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultInfo {
    pub response_code: Option<Value>,
    pub response_message: Option<String>,
}

impl ResultInfo {
    /// Zero in either numeric or string form.
    pub fn is_success(&self) -> bool {
        match &self.response_code {
            Some(Value::Number(n)) => n.as_f64() == Some(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok() == Some(0.0),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentResponse {
    pub payment_id: Option<Value>,
    pub request_id: Option<Value>,
    pub result: Option<ResultInfo>,
}

impl CreatePaymentResponse {
    pub fn payment_id(&self) -> Option<String> {
        identifier_text(self.payment_id.as_ref())
    }

    pub fn request_id(&self) -> Option<String> {
        identifier_text(self.request_id.as_ref())
    }
}

/// Identifiers may arrive as JSON strings or numbers.
fn identifier_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnquiryResponse {
    pub payment_info: EnquiryPaymentInfo,
    pub payment_result: EnquiryPaymentResult,
    pub result: Option<ResultInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnquiryPaymentInfo {
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnquiryPaymentResult {
    pub paid_amount: Value,
    pub request_id: String,
    pub payment_result_status: String,
}

impl EnquiryPaymentResult {
    pub fn paid_amount(&self) -> Result<Decimal> {
        let text = match &self.paid_amount {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.trim().to_string(),
            other => {
                return Err(GatewayError::upstream(format!(
                    "paid_amount is not a number: {}",
                    other
                )))
            }
        };

        text.parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(|e| GatewayError::upstream(format!("Invalid paid_amount {}: {}", text, e)))
    }
}
