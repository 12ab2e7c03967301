use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Gateway error: {message}")]
    UpstreamError { message: String },

    #[error("Callback error: {message}")]
    CallbackError { message: String },
}

impl GatewayError {
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamError {
            message: message.into(),
        }
    }

    pub fn callback(message: impl Into<String>) -> Self {
        Self::CallbackError {
            message: message.into(),
        }
    }

    /// Short message for the terminal, without transport internals.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::HttpError(e) if e.is_timeout() => {
                "The payment gateway did not answer in time".to_string()
            }
            Self::HttpError(_) => "Could not reach the payment gateway".to_string(),
            Self::IoError(e) => format!("File access failed: {}", e),
            Self::SerializationError(_) => "The gateway returned data that could not be read".to_string(),
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => format!("Check your configuration: {}", self),
            Self::UpstreamError { message } | Self::CallbackError { message } => message.clone(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => 2,
            Self::HttpError(_) | Self::IoError(_) => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_is_passed_through() {
        let err = GatewayError::upstream("[TrueMoneyApi] There is something wrong!");
        assert_eq!(err.user_friendly_message(), "[TrueMoneyApi] There is something wrong!");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_config_errors_use_config_exit_code() {
        let err = GatewayError::MissingConfigError {
            field: "merchant.secret".to_string(),
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.user_friendly_message().contains("merchant.secret"));
    }
}
