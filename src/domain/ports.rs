use crate::core::transport::TransportResponse;
use crate::domain::model::{CallbackData, GatewayResult, MerchantAccount, PaymentOrder, RenderedPayment};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

pub trait ConfigProvider: Send + Sync {
    fn merchant_account(&self) -> &MerchantAccount;
    fn sandbox_mode(&self) -> bool;
    fn endpoint_override(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> u64;
}

/// One payment provider's redirect flow.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn gateway_name(&self) -> &'static str;

    /// Signs and submits the creation request.
    async fn build(&self, order: &PaymentOrder, overrides: Map<String, Value>) -> Result<TransportResponse>;

    /// Creates the payment and returns the form that redirects the payer.
    async fn render(&self, order: &PaymentOrder, overrides: Map<String, Value>) -> Result<RenderedPayment>;

    fn gateway_invoice(&self, callback: &CallbackData) -> Option<String>;

    fn gateway_payment_id(&self, callback: &CallbackData) -> Result<String>;

    /// Result of a server-to-server notification.
    async fn backend_result(&self, callback: &CallbackData) -> Result<GatewayResult>;

    /// Result of the payer returning through the browser.
    async fn frontend_result(&self, callback: &CallbackData) -> Result<GatewayResult>;
}
