//! Backend Endpoints
//!
//! Wire types for the storefront backend and the trait the flows talk to.
//! Responses are returned as decoded, uninterpreted bodies; deciding what
//! counts as success belongs to each flow.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::record::{
    CheckoutRecord, CheckoutSessionId, ClientSecret, GuestContact, IdToken, OrderId,
    PaymentIntentId,
};

/// Backend routes consumed by the client
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    CheckoutProcess,
    GuestCheckout,
    Login,
    Signup,
    CreatePaymentIntent,
    ConfirmPayment,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Self::CheckoutProcess => "/checkout_process",
            Self::GuestCheckout => "/guest_checkout",
            Self::Login => "/auth/login",
            Self::Signup => "/auth/signup",
            Self::CreatePaymentIntent => "/create-payment-intent",
            Self::ConfirmPayment => "/confirm-payment",
        }
    }
}

/// Which identity action produced the token being relayed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

impl AuthMode {
    pub const fn endpoint(self) -> Endpoint {
        match self {
            Self::Login => Endpoint::Login,
            Self::Signup => Endpoint::Signup,
        }
    }

    /// Modal that hosts the form for this mode
    pub const fn modal_id(self) -> &'static str {
        match self {
            Self::Login => "loginModal",
            Self::Signup => "signupModal",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Signup => "Signup",
        }
    }
}

/// `POST /checkout_process` response
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResponse {
    #[serde(default)]
    pub session_id: Option<CheckoutSessionId>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SessionResponse {
    pub fn error_message(&self) -> Option<&str> {
        filled(self.error.as_deref())
    }

    pub fn session(&self) -> Option<&CheckoutSessionId> {
        self.session_id.as_ref().filter(|id| !id.as_str().is_empty())
    }
}

/// `POST /guest_checkout` response
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestResponse {
    #[serde(default)]
    pub error: Option<String>,
}

impl GuestResponse {
    pub fn error_message(&self) -> Option<&str> {
        filled(self.error.as_deref())
    }
}

/// `POST /auth/{login,signup}` request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthRequest {
    pub id_token: IdToken,
}

/// `POST /auth/{login,signup}` response
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default, deserialize_with = "truthy")]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl AuthResponse {
    pub fn error_message(&self) -> Option<&str> {
        filled(self.error.as_deref())
    }
}

/// `POST /create-payment-intent` request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntentRequest {
    pub order_id: Option<OrderId>,
}

/// `POST /create-payment-intent` response
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentResponse {
    #[serde(default, rename = "clientSecret")]
    pub client_secret: Option<ClientSecret>,
    #[serde(default)]
    pub error: Option<String>,
}

impl IntentResponse {
    pub fn error_message(&self) -> Option<&str> {
        filled(self.error.as_deref())
    }

    /// Client secret, if the backend returned a usable one
    pub fn secret(&self) -> Option<&ClientSecret> {
        self.client_secret.as_ref().filter(|s| !s.expose().is_empty())
    }
}

/// `POST /confirm-payment` request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfirmRequest {
    pub payment_intent_id: PaymentIntentId,
    pub order_id: Option<OrderId>,
}

/// `POST /confirm-payment` response
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ConfirmResponse {
    /// Backend verified the intent server-side
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }

    pub fn error_message(&self) -> Option<&str> {
        filled(self.error.as_deref())
    }
}

/// Empty strings count as absent
fn filled(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Any JSON value, read with JavaScript truthiness
fn truthy<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// Storefront backend as seen by the browser
///
/// Runs on the page's single thread, so futures are not required to be `Send`.
#[async_trait(?Send)]
pub trait Backend {
    /// Save guest details and open a hosted checkout session
    async fn create_checkout_session(&self, record: &CheckoutRecord) -> Result<SessionResponse>;

    /// Attach guest contact details to the current order
    async fn register_guest(&self, contact: &GuestContact) -> Result<GuestResponse>;

    /// Exchange an identity token for a server session
    async fn establish_session(&self, mode: AuthMode, request: &AuthRequest)
    -> Result<AuthResponse>;

    /// Create a fresh payment intent for the order
    async fn create_payment_intent(&self, request: &IntentRequest) -> Result<IntentResponse>;

    /// Ask the backend to verify a confirmed intent and mark the order paid
    async fn confirm_payment(&self, request: &ConfirmRequest) -> Result<ConfirmResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_response_reads_camel_case_secret() {
        let resp: IntentResponse =
            serde_json::from_str(r#"{"clientSecret":"pi_1_secret_2"}"#).unwrap();
        assert_eq!(resp.client_secret.unwrap().expose(), "pi_1_secret_2");
        assert!(resp.error.is_none());
    }

    #[test]
    fn test_intent_response_error_only() {
        let resp: IntentResponse = serde_json::from_str(r#"{"error":"Order not found"}"#).unwrap();
        assert!(resp.client_secret.is_none());
        assert_eq!(resp.error.as_deref(), Some("Order not found"));
    }

    #[test]
    fn test_confirm_response_success_is_exact() {
        let ok: ConfirmResponse = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert!(ok.is_success());

        let pending: ConfirmResponse =
            serde_json::from_str(r#"{"status":"requires_action"}"#).unwrap();
        assert!(!pending.is_success());

        let empty: ConfirmResponse = serde_json::from_str("{}").unwrap();
        assert!(!empty.is_success());
    }

    #[test]
    fn test_auth_response_tolerates_extra_fields() {
        let resp: AuthResponse =
            serde_json::from_str(r#"{"message":"Login successful","uid":"u1"}"#).unwrap();
        assert!(!resp.success);
    }

    #[test]
    fn test_empty_strings_count_as_absent() {
        let intent: IntentResponse =
            serde_json::from_str(r#"{"clientSecret":"","error":""}"#).unwrap();
        assert!(intent.secret().is_none());
        assert!(intent.error_message().is_none());

        let session: SessionResponse =
            serde_json::from_str(r#"{"session_id":"cs_1","error":""}"#).unwrap();
        assert!(session.error_message().is_none());
        assert_eq!(session.session().map(CheckoutSessionId::as_str), Some("cs_1"));

        let confirm: ConfirmResponse = serde_json::from_str(r#"{"error":""}"#).unwrap();
        assert!(confirm.error_message().is_none());
    }

    #[test]
    fn test_auth_success_is_truthy() {
        let parse = |body: &str| serde_json::from_str::<AuthResponse>(body).unwrap();

        assert!(!parse(r#"{"success":null,"error":"Token expired"}"#).success);
        assert_eq!(
            parse(r#"{"success":null,"error":"Token expired"}"#).error_message(),
            Some("Token expired")
        );
        assert!(!parse(r#"{"success":0}"#).success);
        assert!(!parse(r#"{"success":""}"#).success);
        assert!(parse(r#"{"success":1}"#).success);
        assert!(parse(r#"{"success":"yes"}"#).success);
        assert!(parse(r#"{"success":true}"#).success);
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(Endpoint::CreatePaymentIntent.path(), "/create-payment-intent");
        assert_eq!(AuthMode::Signup.endpoint().path(), "/auth/signup");
    }
}
