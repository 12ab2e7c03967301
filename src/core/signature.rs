//! HMAC-SHA256 signatures carried in TrueMoney payloads.
//!
//! Every signature is the standard base64 encoding of the raw HMAC digest,
//! keyed with the merchant's shared secret.

use crate::utils::error::{GatewayError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub fn sign(secret: &str, message: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(message.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Signature over `app_id ++ invoice ++ shop_code ++ price ...` for the items
/// of an already merged request.
pub fn payment_signature(secret: &str, app_id: &str, invoice: &str, request: &Value) -> Result<String> {
    let items = request
        .pointer("/payment_info/item_list/items")
        .and_then(Value::as_array)
        .ok_or_else(|| GatewayError::ConfigError {
            message: "payment_info.item_list.items must be an array".to_string(),
        })?;

    let mut compact = format!("{}{}", app_id, invoice);
    for item in items {
        compact.push_str(&signature_text(item.get("shop_code")));
        compact.push_str(&signature_text(item.get("price")));
    }

    Ok(sign(secret, &compact))
}

pub fn redirect_signature(secret: &str, payment_id: &str, request_id: &str) -> String {
    sign(secret, &format!("{}{}", payment_id, request_id))
}

/// Text form of a scalar as it appears in the signed string.
fn signature_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "1".to_string(),
        Some(Value::Bool(false)) => String::new(),
        Some(other) => other.to_string(),
    }
}
