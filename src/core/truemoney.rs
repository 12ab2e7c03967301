use crate::core::payload::{self, CreatePaymentResponse, EnquiryResponse};
use crate::core::signature;
use crate::core::transport::{HttpTransport, TransportResponse};
use crate::core::{ConfigProvider, PaymentGateway};
use crate::domain::model::{
    CallbackData, GatewayResult, PaymentForm, PaymentOrder, PaymentStatus, RenderedPayment,
    ResultCustom, ResultData,
};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Map, Value};
use url::Url;

pub const GATEWAY: &str = "TrueMoney";

pub const PAYMENT_URL: &str = "https://api.truemoney.com/payments/v1/payment";

const CREATE_FAILED: &str = "[TrueMoneyApi] There is something wrong!";

/// Upstream status codes, lowercased.
const SUCCESS_STATUSES: &[&str] = &[
    "success",
    "succeeded",
    "successful",
    "approved",
    "paid",
    "completed",
    "settled",
    "captured",
];

const PENDING_STATUSES: &[&str] = &[
    "pending",
    "processing",
    "created",
    "initiated",
    "waiting",
    "in_progress",
    "authorized",
];

pub fn map_status_returned(code: &str) -> PaymentStatus {
    let code = code.trim().to_lowercase();
    if SUCCESS_STATUSES.contains(&code.as_str()) {
        PaymentStatus::Success
    } else if PENDING_STATUSES.contains(&code.as_str()) {
        PaymentStatus::Pending
    } else {
        PaymentStatus::Failure
    }
}

/// Points a production URL at the vendor's test environment.
pub fn sandbox_url(url: &str) -> String {
    url.replace("api.", "dev.").replace(".com", ".co.th")
}

pub struct TrueMoneyApi<C: ConfigProvider> {
    config: C,
    transport: HttpTransport,
}

impl<C: ConfigProvider> TrueMoneyApi<C> {
    pub fn new(config: C) -> Self {
        let transport = HttpTransport::new(config.timeout_seconds());
        Self { config, transport }
    }

    pub fn with_transport(config: C, transport: HttpTransport) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    fn base_url(&self) -> String {
        match self.config.endpoint_override() {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None if self.config.sandbox_mode() => sandbox_url(PAYMENT_URL),
            None => PAYMENT_URL.to_string(),
        }
    }

    pub fn create_payment_url(&self) -> String {
        self.base_url()
    }

    pub fn enquiry_url(&self, payment_id: &str) -> Result<String> {
        self.payment_url(&[payment_id])
    }

    pub fn process_url(&self, payment_id: &str) -> Result<String> {
        self.payment_url(&[payment_id, "process"])
    }

    /// Base URL plus `segments`, each percent-encoded as a single path segment.
    fn payment_url(&self, segments: &[&str]) -> Result<String> {
        if segments.iter().any(|s| matches!(s.trim(), "" | "." | "..")) {
            return Err(GatewayError::callback(format!(
                "Invalid payment id path segment: {:?}",
                segments
            )));
        }

        let base = self.base_url();
        let mut url = Url::parse(&base).map_err(|e| GatewayError::InvalidConfigValueError {
            field: "gateway.endpoint".to_string(),
            value: base.clone(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidConfigValueError {
                field: "gateway.endpoint".to_string(),
                value: base.clone(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url.into())
    }

    /// The signed creation payload, without sending it.
    pub fn signed_payload(&self, order: &PaymentOrder, overrides: Map<String, Value>) -> Result<Value> {
        payload::build_signed_payload(self.config.merchant_account(), order, overrides)
    }

    async fn enquire(&self, callback: &CallbackData) -> Result<GatewayResult> {
        if !callback.is_backend_posted() {
            return Err(GatewayError::callback("No data was posted by the gateway"));
        }
        let payment_id = callback
            .payment_id()
            .ok_or_else(|| GatewayError::callback("Posted data has no payment_id"))?;

        let url = self.enquiry_url(payment_id)?;
        let data = self
            .transport
            .make_request(Method::GET, &url, None, self.config.merchant_account().bearer())
            .await?;

        if !data.is_success() {
            tracing::warn!("Enquiry for {} returned HTTP {}", payment_id, data.status);
            return Err(GatewayError::upstream(format!(
                "[TrueMoneyApi] Enquiry failed with HTTP status {}",
                data.status
            )));
        }

        let response: EnquiryResponse = serde_json::from_str(&data.response).map_err(|e| {
            GatewayError::upstream(format!("[TrueMoneyApi] Unexpected enquiry response: {}", e))
        })?;

        if let Some(result) = &response.result {
            if result.response_code.is_some() && !result.is_success() {
                return Err(GatewayError::upstream(format!(
                    "[TrueMoneyApi] Enquiry rejected: {}",
                    result.response_message.as_deref().unwrap_or("unknown reason")
                )));
            }
        }

        let payment_result = &response.payment_result;
        let status = map_status_returned(&payment_result.payment_result_status);
        tracing::info!(
            "Payment {} for invoice {} is {:?} ({})",
            payment_id,
            payment_result.request_id,
            status,
            payment_result.payment_result_status
        );

        Ok(GatewayResult {
            status: true,
            data: ResultData {
                gateway: GATEWAY.to_string(),
                status,
                invoice: payment_result.request_id.clone(),
                currency: response.payment_info.currency.clone(),
                amount: payment_result.paid_amount()?,
                dump: serde_json::to_string(&data)?,
            },
            custom: ResultCustom {
                recheck: "yes".to_string(),
            },
        })
    }
}

#[async_trait]
impl<C: ConfigProvider> PaymentGateway for TrueMoneyApi<C> {
    fn gateway_name(&self) -> &'static str {
        GATEWAY
    }

    async fn build(&self, order: &PaymentOrder, overrides: Map<String, Value>) -> Result<TransportResponse> {
        let request = self.signed_payload(order, overrides)?;
        let body = serde_json::to_string(&request)?;

        tracing::debug!("Creating payment for invoice {}", order.invoice);
        self.transport
            .make_request(
                Method::POST,
                &self.create_payment_url(),
                Some(body),
                self.config.merchant_account().bearer(),
            )
            .await
    }

    async fn render(&self, order: &PaymentOrder, overrides: Map<String, Value>) -> Result<RenderedPayment> {
        let data = self.build(order, overrides).await?;

        let response: CreatePaymentResponse = serde_json::from_str(&data.response).map_err(|e| {
            tracing::error!("Unreadable create-payment response: {}", e);
            GatewayError::upstream(CREATE_FAILED)
        })?;

        let accepted = response.result.as_ref().map(|r| r.is_success()).unwrap_or(false);
        if !accepted {
            tracing::error!(
                "Create payment for {} rejected (HTTP {}): {}",
                order.invoice,
                data.status,
                data.response
            );
            return Err(GatewayError::upstream(CREATE_FAILED));
        }

        let (payment_id, request_id) = match (response.payment_id(), response.request_id()) {
            (Some(payment_id), Some(request_id)) => (payment_id, request_id),
            _ => return Err(GatewayError::upstream(CREATE_FAILED)),
        };

        let secret = self.config.merchant_account().secret();
        let form = PaymentForm::post(self.process_url(&payment_id)?).with_field(
            "signature",
            signature::redirect_signature(secret, &payment_id, &request_id),
        );

        tracing::info!("Payment {} created for invoice {}", payment_id, order.invoice);

        Ok(RenderedPayment {
            payment_id,
            request_id,
            form,
        })
    }

    fn gateway_invoice(&self, _callback: &CallbackData) -> Option<String> {
        // TrueMoney doesn't return invoice
        None
    }

    fn gateway_payment_id(&self, callback: &CallbackData) -> Result<String> {
        if !callback.is_backend_posted() {
            return Err(GatewayError::callback(
                "Gateway payment id is returned from backend posted only",
            ));
        }

        callback
            .payment_id()
            .map(str::to_string)
            .ok_or_else(|| GatewayError::callback("Posted data has no payment_id"))
    }

    async fn backend_result(&self, callback: &CallbackData) -> Result<GatewayResult> {
        self.enquire(callback).await
    }

    async fn frontend_result(&self, callback: &CallbackData) -> Result<GatewayResult> {
        let mut result = self.enquire(callback).await?;
        // Browser return is not stamped as a re-check
        result.custom.recheck = "no".to_string();
        Ok(result)
    }
}
