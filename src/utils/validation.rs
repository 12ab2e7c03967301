use crate::utils::error::{GatewayError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(GatewayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(GatewayError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(GatewayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| GatewayError::MissingConfigError {
        field: field_name.to_string(),
    })
}

/// Secrets are checked without echoing the value back into the error.
pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GatewayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(GatewayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("gateway.endpoint", "https://api.truemoney.com").is_ok());
        assert!(validate_url("gateway.endpoint", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("gateway.endpoint", "").is_err());
        assert!(validate_url("gateway.endpoint", "invalid-url").is_err());
        assert!(validate_url("gateway.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_non_empty_string_hides_value() {
        let err = validate_non_empty_string("merchant.secret", "   ").unwrap_err();
        match err {
            GatewayError::InvalidConfigValueError { field, value, .. } => {
                assert_eq!(field, "merchant.secret");
                assert!(value.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("gateway.timeout_seconds", 30u64, 1, 300).is_ok());
        assert!(validate_range("gateway.timeout_seconds", 0u64, 1, 300).is_err());
        assert!(validate_range("gateway.timeout_seconds", 301u64, 1, 300).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("app".to_string());
        let missing: Option<String> = None;
        assert_eq!(validate_required_field("merchant.app_id", &present).unwrap(), "app");
        assert!(matches!(
            validate_required_field("merchant.app_id", &missing),
            Err(GatewayError::MissingConfigError { .. })
        ));
    }
}
