//! Client Configuration
//!
//! Values the flows need from the hosting page. Native callers read them from
//! the environment; the browser frontend resolves the same keys from page data
//! attributes through [`ClientConfig::from_lookup`].

use std::time::Duration;

use crate::error::{CheckoutError, Result};
use crate::record::OrderId;

pub const PUBLISHABLE_KEY: &str = "STRIPE_PUBLIC_KEY";
pub const API_BASE: &str = "CHECKOUT_API_BASE";
pub const ORDER_ID: &str = "CHECKOUT_ORDER_ID";
pub const LOG_LEVEL: &str = "CHECKOUT_LOG";

/// Client configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Payment processor publishable key
    pub publishable_key: Option<String>,

    /// Origin the backend endpoints are served from
    pub api_base: String,

    /// Order being paid, if the page carries one
    pub order_id: Option<OrderId>,

    /// Page shown after a verified payment
    pub confirmation_path: String,

    /// Delay between the success banner and the confirmation redirect
    pub redirect_delay: Duration,

    /// Delay between opening the payment modal and mounting the card input
    pub card_init_delay: Duration,

    /// `tracing` filter directive
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            publishable_key: None,
            api_base: "http://localhost:3000".into(),
            order_id: None,
            confirmation_path: "/order_confirmation".into(),
            redirect_delay: Duration::from_millis(1500),
            card_init_delay: Duration::from_millis(100),
            log_level: "info".into(),
        }
    }
}

impl ClientConfig {
    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self {
            publishable_key: get(PUBLISHABLE_KEY),
            order_id: get(ORDER_ID).map(OrderId::from_string),
            ..Default::default()
        };

        if let Some(base) = get(API_BASE) {
            config.api_base = base;
        }
        if let Some(level) = get(LOG_LEVEL) {
            config.log_level = level;
        }

        config
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Publishable key, required before the payment processor can be created
    pub fn require_publishable_key(&self) -> Result<&str> {
        self.publishable_key
            .as_deref()
            .ok_or_else(|| CheckoutError::Config(format!("{PUBLISHABLE_KEY} not set")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[(PUBLISHABLE_KEY, "pk_test_1")]));
        assert_eq!(config.require_publishable_key().unwrap(), "pk_test_1");
        assert_eq!(config.redirect_delay, Duration::from_millis(1500));
        assert_eq!(config.card_init_delay, Duration::from_millis(100));
        assert_eq!(config.confirmation_path, "/order_confirmation");
        assert!(config.order_id.is_none());
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let config = ClientConfig::from_lookup(lookup(&[(PUBLISHABLE_KEY, "  ")]));
        assert!(config.publishable_key.is_none());
        let err = config.require_publishable_key().unwrap_err();
        assert!(matches!(err, CheckoutError::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (PUBLISHABLE_KEY, "pk_test_1"),
            (API_BASE, "https://shop.example.com/"),
            (ORDER_ID, "64f1"),
            (LOG_LEVEL, "debug"),
        ]));
        assert_eq!(config.order_id, Some(OrderId::from_string("64f1")));
        assert_eq!(config.api_base, "https://shop.example.com/");
        assert_eq!(config.log_level, "debug");
    }
}
