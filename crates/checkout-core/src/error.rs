//! Checkout Error Types

use thiserror::Error;

/// Result type alias for checkout operations
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Errors raised by the checkout flows
///
/// The `Display` form of each variant is the text shown to the shopper, so
/// remote and processor messages are passed through untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// A required field was left empty
    #[error("{0}")]
    Validation(String),

    /// Request could not be sent or no response arrived
    #[error("{0}")]
    Transport(String),

    /// Response body was not the JSON we expected
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Backend reported a business error in its `error` field
    #[error("{0}")]
    Remote(String),

    /// Payment processor rejected the operation (card declined, ...)
    #[error("{0}")]
    Processor(String),

    /// Identity provider rejected the credentials or failed
    #[error("{0}")]
    Identity(String),

    /// A browser SDK is not loaded on the page
    #[error("{0} not loaded.")]
    SdkUnavailable(String),

    /// A page element the flow binds to does not exist
    #[error("Missing page element: #{0}")]
    MissingElement(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A submission is already in flight
    #[error("A payment is already being processed")]
    Busy,
}

impl CheckoutError {
    /// Whether the message should also appear in the inline card error area
    pub const fn is_processor(&self) -> bool {
        matches!(self, Self::Processor(_))
    }

    /// Message shown in banners and alerts
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for CheckoutError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CheckoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_message_passes_through() {
        let err = CheckoutError::Remote("Order not found".into());
        assert_eq!(err.user_message(), "Order not found");
        assert!(!err.is_processor());
    }

    #[test]
    fn test_sdk_unavailable_message() {
        let err = CheckoutError::SdkUnavailable("Stripe.js".into());
        assert_eq!(err.to_string(), "Stripe.js not loaded.");
    }

    #[test]
    fn test_json_error_is_malformed() {
        let err: CheckoutError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, CheckoutError::Malformed(_)));
    }
}
