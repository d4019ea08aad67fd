//! Payment Confirmation Handshake
//!
//! Embedded card payment, strictly sequential:
//!
//! ```text
//! idle ─▶ awaiting_intent ─▶ collecting_card ─▶ confirming_with_processor
//!                                  ▲                      │
//!                                  └──── declined ◀───────┤
//!                                                         ▼
//!                          failed ◀── verifying_with_backend ─▶ succeeded
//! ```
//!
//! Every submission asks the backend for a new payment intent; a client
//! secret is never reused across attempts. The processor's "success" only
//! triggers server-side verification, it never completes the order by itself.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use crate::backend::{Backend, ConfirmRequest, IntentRequest};
use crate::config::ClientConfig;
use crate::error::{CheckoutError, Result};
use crate::processor::{CardMount, PaymentProcessor};
use crate::record::{OrderId, PaymentIntentId};
use crate::view::{Navigator, PAY_LABEL, PROCESSING_LABEL, PaymentView};

pub const SUCCESS_MESSAGE: &str = "Payment successful! Redirecting...";
pub const DEFAULT_INTENT_ERROR: &str = "Unable to start payment.";
pub const DEFAULT_PAYMENT_ERROR: &str = "Payment failed.";
pub const STRIPE_KEY_MISSING: &str = "Stripe public key missing.";

/// Handshake state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HandshakeState {
    #[default]
    Idle,
    AwaitingIntent,
    CollectingCard,
    ConfirmingWithProcessor,
    VerifyingWithBackend,
    Succeeded,
    Failed,
}

/// Result of one submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandshakeOutcome {
    /// Backend verified the payment; redirect scheduled
    Succeeded(PaymentIntentId),

    /// Processor rejected the card; the form stays ready for another attempt
    Declined(String),

    /// Any other failure; the form is back to its idle equivalent
    Failed(CheckoutError),

    /// Ignored because a submission is in flight or already succeeded
    Rejected,
}

/// Embedded card payment form
///
/// Owns the card mount state; intended to live behind an `Rc` on the page.
pub struct PaymentForm<B, P: PaymentProcessor, V, N> {
    backend: B,
    processor: P,
    view: V,
    navigator: N,
    order_id: RefCell<Option<OrderId>>,
    confirmation_path: String,
    redirect_delay: Duration,
    state: Cell<HandshakeState>,
    in_flight: Cell<bool>,
    card: RefCell<CardMount<P::Card>>,
}

impl<B, P, V, N> PaymentForm<B, P, V, N>
where
    B: Backend,
    P: PaymentProcessor,
    V: PaymentView,
    N: Navigator,
{
    pub fn new(backend: B, processor: P, view: V, navigator: N, config: &ClientConfig) -> Self {
        Self {
            backend,
            processor,
            view,
            navigator,
            order_id: RefCell::new(config.order_id.clone()),
            confirmation_path: config.confirmation_path.clone(),
            redirect_delay: config.redirect_delay,
            state: Cell::new(HandshakeState::Idle),
            in_flight: Cell::new(false),
            card: RefCell::new(CardMount::new()),
        }
    }

    pub fn state(&self) -> HandshakeState {
        self.state.get()
    }

    pub fn is_card_mounted(&self) -> bool {
        self.card.borrow().is_mounted()
    }

    pub const fn view(&self) -> &V {
        &self.view
    }

    /// Override the order being paid (e.g. set by a page script after load)
    pub fn set_order_id(&self, order_id: Option<OrderId>) {
        *self.order_id.borrow_mut() = order_id;
    }

    /// Currently mounted card input
    pub fn card(&self) -> Option<P::Card> {
        self.card.borrow().card()
    }

    /// (Re)initialise the card input: destroy any existing card, clear its
    /// container, and mount a fresh one.
    pub fn initialize(&self) -> Result<()> {
        if self.in_flight.get() {
            return Err(CheckoutError::Busy);
        }

        self.destroy_card();
        self.mount_card()?;
        self.state.set(HandshakeState::Idle);
        Ok(())
    }

    /// Mount the card input unless it is already mounted
    pub fn mount_card(&self) -> Result<bool> {
        let mounted = self
            .card
            .borrow_mut()
            .mount(|| self.processor.create_card())?;
        if mounted {
            tracing::debug!("Card input mounted");
        }
        Ok(mounted)
    }

    /// Destroy the card input and clear its container
    pub fn destroy_card(&self) {
        if self.card.borrow_mut().destroy() {
            self.view.clear_card_container();
            tracing::debug!("Card input destroyed");
        }
    }

    /// Card input change event
    pub fn card_changed(&self, error: Option<&str>) {
        self.view.set_card_error(error.unwrap_or_default());
    }

    /// Run one payment attempt
    pub async fn submit(&self) -> HandshakeOutcome {
        if self.in_flight.get() || self.state.get() == HandshakeState::Succeeded {
            tracing::warn!(state = ?self.state.get(), "Payment submission ignored");
            return HandshakeOutcome::Rejected;
        }

        self.in_flight.set(true);
        self.view.set_submit(false, PROCESSING_LABEL);
        self.view.hide_banners();

        tracing::info!(order_id = ?self.order_id.borrow(), "Payment submitted");

        let outcome = match self.run().await {
            Ok(intent) => {
                tracing::info!(payment_intent_id = %intent, "Payment verified");
                HandshakeOutcome::Succeeded(intent)
            }
            Err(err) if err.is_processor() => {
                let message = err.user_message();
                tracing::warn!(error = %message, "Card payment declined");
                self.view.set_card_error(&message);
                self.view.show_failure(&message);
                self.view.set_submit(true, PAY_LABEL);
                self.state.set(HandshakeState::CollectingCard);
                HandshakeOutcome::Declined(message)
            }
            Err(err) => {
                tracing::warn!(error = %err, state = ?self.state.get(), "Payment failed");
                self.view.show_failure(&err.user_message());
                self.view.set_submit(true, PAY_LABEL);
                self.state.set(HandshakeState::Failed);
                HandshakeOutcome::Failed(err)
            }
        };

        self.in_flight.set(false);
        outcome
    }

    async fn run(&self) -> Result<PaymentIntentId> {
        let order_id = self.order_id.borrow().clone();

        self.transition(HandshakeState::AwaitingIntent);
        let intent = self
            .backend
            .create_payment_intent(&IntentRequest {
                order_id: order_id.clone(),
            })
            .await?;

        let secret = intent.secret().cloned().ok_or_else(|| {
            CheckoutError::Remote(intent.error_message().unwrap_or(DEFAULT_INTENT_ERROR).into())
        })?;

        self.transition(HandshakeState::CollectingCard);
        let card = self
            .card
            .borrow()
            .card()
            .ok_or_else(|| CheckoutError::MissingElement("card-element".into()))?;
        let billing = self.view.billing_details();

        self.transition(HandshakeState::ConfirmingWithProcessor);
        let payment_intent_id = self
            .processor
            .confirm_card_payment(&secret, &card, &billing)
            .await?;

        self.transition(HandshakeState::VerifyingWithBackend);
        let confirmation = self
            .backend
            .confirm_payment(&ConfirmRequest {
                payment_intent_id: payment_intent_id.clone(),
                order_id,
            })
            .await?;

        if !confirmation.is_success() {
            return Err(CheckoutError::Remote(
                confirmation
                    .error_message()
                    .unwrap_or(DEFAULT_PAYMENT_ERROR)
                    .into(),
            ));
        }

        self.transition(HandshakeState::Succeeded);
        self.view.show_success(SUCCESS_MESSAGE);
        self.navigator
            .redirect_after(&self.confirmation_path, self.redirect_delay);

        Ok(payment_intent_id)
    }

    fn transition(&self, next: HandshakeState) {
        tracing::debug!(from = ?self.state.get(), to = ?next, "Handshake transition");
        self.state.set(next);
    }
}

/// Surface a failure to set up the processor on the payment page
///
/// A missing SDK blocks with an alert; a missing key is shown next to the
/// card input.
pub fn report_setup_error<V: PaymentView, N: Navigator>(err: &CheckoutError, view: &V, navigator: &N) {
    tracing::warn!(error = %err, "Payment form unavailable");
    match err {
        CheckoutError::SdkUnavailable(_) => navigator.alert(&err.user_message()),
        CheckoutError::Config(_) => view.set_card_error(STRIPE_KEY_MISSING),
        _ => view.set_card_error(&err.user_message()),
    }
}
