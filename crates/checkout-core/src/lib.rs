//! # checkout-core
//!
//! Browser-side checkout flows for the storefront, independent of any page
//! framework.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Page (frontend)                      │
//! │  PaymentView · CheckoutFormView · Navigator · ElementClasses │
//! └───────────────┬──────────────────────────────┬───────────────┘
//!                 │                              │
//!       ┌─────────▼─────────┐          ┌─────────▼─────────┐
//!       │   PaymentForm     │          │  IdentityRelay    │
//!       │ submit_guest_*    │          │                   │
//!       └───┬───────────┬───┘          └───┬───────────┬───┘
//!           │           │                  │           │
//!   ┌───────▼──┐  ┌─────▼────────────┐ ┌───▼──────┐ ┌──▼───────────────┐
//!   │ Backend  │  │ PaymentProcessor │ │ Backend  │ │ IdentityProvider │
//!   └──────────┘  └──────────────────┘ └──────────┘ └──────────────────┘
//! ```
//!
//! Everything runs on the page's single thread: the async traits are
//! `?Send` and shared state uses `Cell`/`RefCell`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_core::{ClientConfig, HttpBackend, PaymentForm};
//!
//! let config = ClientConfig::from_env();
//! let form = PaymentForm::new(HttpBackend::from_config(&config), stripe, view, navigator, &config);
//! form.initialize()?;
//!
//! // On submit
//! let outcome = form.submit().await;
//! ```

pub mod backend;
pub mod checkout;
pub mod config;
pub mod error;
pub mod handshake;
pub mod http;
pub mod identity;
pub mod mock;
pub mod modal;
pub mod processor;
pub mod record;
pub mod view;

pub use backend::{AuthMode, Backend, Endpoint};
pub use checkout::{submit_guest_checkout, submit_guest_contact};
pub use config::ClientConfig;
pub use error::{CheckoutError, Result};
pub use handshake::{HandshakeOutcome, HandshakeState, PaymentForm, report_setup_error};
pub use http::HttpBackend;
pub use identity::{IdentityProvider, IdentityRelay};
pub use modal::{ElementClasses, Modals};
pub use processor::{CardElement, CardMount, PaymentProcessor};
pub use record::{
    BillingDetails, CheckoutRecord, CheckoutSessionId, ClientSecret, Credentials, GuestContact,
    IdToken, OrderId, PaymentIntentId,
};
pub use view::{CheckoutFormView, Navigator, PaymentView};
