//! HTTP Backend
//!
//! `Backend` over `reqwest`. Works on native targets and on wasm32, where
//! reqwest drives the browser's `fetch`.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::{
    AuthMode, AuthRequest, AuthResponse, Backend, ConfirmRequest, ConfirmResponse, Endpoint,
    GuestResponse, IntentRequest, IntentResponse, SessionResponse,
};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::record::{CheckoutRecord, GuestContact};

/// JSON-over-HTTP storefront backend
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend rooted at `base_url` (e.g. `https://shop.example.com`)
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_base.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// POST a JSON body and decode the JSON reply
    ///
    /// The backend reports business errors in the body, often with a 4xx/5xx
    /// status, so the body is decoded whatever the status code.
    async fn post<B, R>(&self, endpoint: Endpoint, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        tracing::debug!(endpoint = endpoint.path(), "POST");

        let response = self
            .client
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let decoded = serde_json::from_str(&text)?;

        if !status.is_success() {
            tracing::debug!(endpoint = endpoint.path(), status = status.as_u16(), "Non-success status");
        }

        Ok(decoded)
    }
}

#[async_trait(?Send)]
impl Backend for HttpBackend {
    async fn create_checkout_session(&self, record: &CheckoutRecord) -> Result<SessionResponse> {
        self.post(Endpoint::CheckoutProcess, record).await
    }

    async fn register_guest(&self, contact: &GuestContact) -> Result<GuestResponse> {
        self.post(Endpoint::GuestCheckout, contact).await
    }

    async fn establish_session(
        &self,
        mode: AuthMode,
        request: &AuthRequest,
    ) -> Result<AuthResponse> {
        self.post(mode.endpoint(), request).await
    }

    async fn create_payment_intent(&self, request: &IntentRequest) -> Result<IntentResponse> {
        self.post(Endpoint::CreatePaymentIntent, request).await
    }

    async fn confirm_payment(&self, request: &ConfirmRequest) -> Result<ConfirmResponse> {
        self.post(Endpoint::ConfirmPayment, request).await
    }
}
