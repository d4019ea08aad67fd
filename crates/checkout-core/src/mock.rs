//! Mock Implementations
//!
//! In-memory backend, SDKs and page bindings for tests and demos. Each mock
//! records what the flows asked of it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::{
    AuthMode, AuthRequest, AuthResponse, Backend, ConfirmRequest, ConfirmResponse, Endpoint,
    GuestResponse, IntentRequest, IntentResponse, SessionResponse,
};
use crate::error::{CheckoutError, Result};
use crate::identity::IdentityProvider;
use crate::modal::{ElementClasses, HIDDEN_CLASS};
use crate::processor::{CardElement, PaymentProcessor};
use crate::record::{
    BillingDetails, CheckoutRecord, CheckoutSessionId, ClientSecret, Credentials, GuestContact,
    IdToken, PaymentIntentId,
};
use crate::view::{CheckoutFormView, Navigator, PaymentView};

/// Scripted backend
///
/// Unscripted endpoints succeed. Payment intents are generated fresh for
/// every call (`pi_<n>_secret_<n>`) unless a fixed response is scripted.
pub struct MockBackend {
    session: Result<SessionResponse>,
    guest: Result<GuestResponse>,
    auth: Result<AuthResponse>,
    intent: RefCell<Option<Result<IntentResponse>>>,
    confirm: Result<ConfirmResponse>,
    calls: RefCell<Vec<Endpoint>>,
    checkout_records: RefCell<Vec<CheckoutRecord>>,
    guest_contacts: RefCell<Vec<GuestContact>>,
    auth_tokens: RefCell<Vec<IdToken>>,
    confirm_requests: RefCell<Vec<ConfirmRequest>>,
    intents_issued: Cell<usize>,
    yielding: bool,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            session: Ok(SessionResponse {
                session_id: Some(CheckoutSessionId::from_string("cs_test_1")),
                error: None,
            }),
            guest: Ok(GuestResponse::default()),
            auth: Ok(AuthResponse {
                success: true,
                error: None,
            }),
            intent: RefCell::new(None),
            confirm: Ok(ConfirmResponse {
                status: Some("success".into()),
                error: None,
            }),
            calls: RefCell::new(Vec::new()),
            checkout_records: RefCell::new(Vec::new()),
            guest_contacts: RefCell::new(Vec::new()),
            auth_tokens: RefCell::new(Vec::new()),
            confirm_requests: RefCell::new(Vec::new()),
            intents_issued: Cell::new(0),
            yielding: false,
        }
    }
}

impl MockBackend {
    #[must_use]
    pub fn with_session(mut self, response: Result<SessionResponse>) -> Self {
        self.session = response;
        self
    }

    #[must_use]
    pub fn with_guest(mut self, response: Result<GuestResponse>) -> Self {
        self.guest = response;
        self
    }

    #[must_use]
    pub fn with_auth(mut self, response: Result<AuthResponse>) -> Self {
        self.auth = response;
        self
    }

    #[must_use]
    pub fn with_intent(self, response: Result<IntentResponse>) -> Self {
        *self.intent.borrow_mut() = Some(response);
        self
    }

    #[must_use]
    pub fn with_confirm(mut self, response: Result<ConfirmResponse>) -> Self {
        self.confirm = response;
        self
    }

    /// Suspend once inside `create_payment_intent`, like a real request
    #[must_use]
    pub fn yielding(mut self) -> Self {
        self.yielding = true;
        self
    }

    /// Go back to generating fresh intents
    pub fn clear_intent(&self) {
        self.intent.borrow_mut().take();
    }

    /// Number of requests made to `endpoint`
    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.calls.borrow().iter().filter(|e| **e == endpoint).count()
    }

    pub fn checkout_records(&self) -> Vec<CheckoutRecord> {
        self.checkout_records.borrow().clone()
    }

    pub fn guest_contacts(&self) -> Vec<GuestContact> {
        self.guest_contacts.borrow().clone()
    }

    pub fn auth_tokens(&self) -> Vec<IdToken> {
        self.auth_tokens.borrow().clone()
    }

    pub fn confirm_requests(&self) -> Vec<ConfirmRequest> {
        self.confirm_requests.borrow().clone()
    }

    fn record(&self, endpoint: Endpoint) {
        self.calls.borrow_mut().push(endpoint);
    }
}

#[async_trait(?Send)]
impl Backend for MockBackend {
    async fn create_checkout_session(&self, record: &CheckoutRecord) -> Result<SessionResponse> {
        self.record(Endpoint::CheckoutProcess);
        self.checkout_records.borrow_mut().push(record.clone());
        self.session.clone()
    }

    async fn register_guest(&self, contact: &GuestContact) -> Result<GuestResponse> {
        self.record(Endpoint::GuestCheckout);
        self.guest_contacts.borrow_mut().push(contact.clone());
        self.guest.clone()
    }

    async fn establish_session(
        &self,
        mode: AuthMode,
        request: &AuthRequest,
    ) -> Result<AuthResponse> {
        self.record(mode.endpoint());
        self.auth_tokens.borrow_mut().push(request.id_token.clone());
        self.auth.clone()
    }

    async fn create_payment_intent(&self, _request: &IntentRequest) -> Result<IntentResponse> {
        self.record(Endpoint::CreatePaymentIntent);
        if self.yielding {
            YieldOnce(false).await;
        }
        if let Some(scripted) = self.intent.borrow().as_ref() {
            return scripted.clone();
        }

        let n = self.intents_issued.get() + 1;
        self.intents_issued.set(n);
        Ok(IntentResponse {
            client_secret: Some(ClientSecret::from_string(format!("pi_{n}_secret_{n}"))),
            error: None,
        })
    }

    async fn confirm_payment(&self, request: &ConfirmRequest) -> Result<ConfirmResponse> {
        self.record(Endpoint::ConfirmPayment);
        self.confirm_requests.borrow_mut().push(request.clone());
        self.confirm.clone()
    }
}

/// Pending on the first poll, ready on the second
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            return Poll::Ready(());
        }
        self.0 = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

#[derive(Debug, Default)]
struct CardCounters {
    mounts: Cell<usize>,
    destroys: Cell<usize>,
    fail_destroy: bool,
}

/// Card input whose clones share mount/destroy counters
#[derive(Clone, Debug, Default)]
pub struct MockCard {
    counters: Rc<CardCounters>,
}

impl MockCard {
    /// Card whose `destroy` always errors
    pub fn failing_destroy() -> Self {
        Self {
            counters: Rc::new(CardCounters {
                fail_destroy: true,
                ..Default::default()
            }),
        }
    }

    pub fn mounts(&self) -> usize {
        self.counters.mounts.get()
    }

    pub fn destroys(&self) -> usize {
        self.counters.destroys.get()
    }
}

impl CardElement for MockCard {
    fn mount(&self, _selector: &str) -> Result<()> {
        self.counters.mounts.set(self.counters.mounts.get() + 1);
        Ok(())
    }

    fn destroy(&self) -> Result<()> {
        self.counters.destroys.set(self.counters.destroys.get() + 1);
        if self.counters.fail_destroy {
            return Err(CheckoutError::Processor("card already destroyed".into()));
        }
        Ok(())
    }
}

/// Scripted payment processor
///
/// Confirming `pi_<n>_secret_<n>` yields intent `pi_<n>`.
#[derive(Default)]
pub struct MockProcessor {
    card: MockCard,
    decline: RefCell<Option<String>>,
    redirect_error: Option<String>,
    secrets: RefCell<Vec<ClientSecret>>,
    billing: RefCell<Vec<BillingDetails>>,
    redirects: RefCell<Vec<CheckoutSessionId>>,
}

impl MockProcessor {
    /// Decline the next confirmation with `message`
    #[must_use]
    pub fn decline_next(self, message: &str) -> Self {
        *self.decline.borrow_mut() = Some(message.to_string());
        self
    }

    #[must_use]
    pub fn with_redirect_error(mut self, message: &str) -> Self {
        self.redirect_error = Some(message.to_string());
        self
    }

    pub fn card(&self) -> MockCard {
        self.card.clone()
    }

    pub fn secrets(&self) -> Vec<ClientSecret> {
        self.secrets.borrow().clone()
    }

    pub fn billing(&self) -> Vec<BillingDetails> {
        self.billing.borrow().clone()
    }

    pub fn redirects(&self) -> Vec<CheckoutSessionId> {
        self.redirects.borrow().clone()
    }
}

#[async_trait(?Send)]
impl PaymentProcessor for MockProcessor {
    type Card = MockCard;

    fn create_card(&self) -> Result<MockCard> {
        Ok(self.card.clone())
    }

    async fn confirm_card_payment(
        &self,
        secret: &ClientSecret,
        _card: &MockCard,
        billing: &BillingDetails,
    ) -> Result<PaymentIntentId> {
        self.secrets.borrow_mut().push(secret.clone());
        self.billing.borrow_mut().push(billing.clone());

        if let Some(message) = self.decline.borrow_mut().take() {
            return Err(CheckoutError::Processor(message));
        }

        let id = secret
            .expose()
            .split("_secret")
            .next()
            .unwrap_or_default();
        Ok(PaymentIntentId::from_string(id))
    }

    async fn redirect_to_checkout(&self, session: &CheckoutSessionId) -> Result<()> {
        if let Some(message) = &self.redirect_error {
            return Err(CheckoutError::Processor(message.clone()));
        }
        self.redirects.borrow_mut().push(session.clone());
        Ok(())
    }
}

/// Scripted identity provider; tokens are `token-<email>`
pub struct MockIdentity {
    loaded: bool,
    failure: Option<String>,
    sign_in_calls: Cell<usize>,
    sign_up_calls: Cell<usize>,
}

impl Default for MockIdentity {
    fn default() -> Self {
        Self {
            loaded: true,
            failure: None,
            sign_in_calls: Cell::new(0),
            sign_up_calls: Cell::new(0),
        }
    }
}

impl MockIdentity {
    /// Provider whose SDK calls fail with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    /// Provider whose SDK is missing from the page
    pub fn unloaded() -> Self {
        Self {
            loaded: false,
            ..Default::default()
        }
    }

    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.get()
    }

    pub fn sign_up_calls(&self) -> usize {
        self.sign_up_calls.get()
    }

    fn token(&self, credentials: &Credentials) -> Result<IdToken> {
        match &self.failure {
            Some(message) => Err(CheckoutError::Identity(message.clone())),
            None => Ok(IdToken::from_string(format!("token-{}", credentials.email))),
        }
    }
}

#[async_trait(?Send)]
impl IdentityProvider for MockIdentity {
    fn name(&self) -> &str {
        "Mock"
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<IdToken> {
        self.sign_in_calls.set(self.sign_in_calls.get() + 1);
        self.token(credentials)
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<IdToken> {
        self.sign_up_calls.set(self.sign_up_calls.get() + 1);
        self.token(credentials)
    }
}

/// Payment form that records what was displayed
pub struct RecordingView {
    billing: BillingDetails,
    submit: RefCell<(bool, String)>,
    success: RefCell<Option<String>>,
    failure: RefCell<Option<String>>,
    card_error: RefCell<String>,
    banner_resets: Cell<usize>,
    container_clears: Cell<usize>,
}

impl Default for RecordingView {
    fn default() -> Self {
        Self {
            billing: BillingDetails::default(),
            submit: RefCell::new((true, crate::view::PAY_LABEL.to_string())),
            success: RefCell::new(None),
            failure: RefCell::new(None),
            card_error: RefCell::new(String::new()),
            banner_resets: Cell::new(0),
            container_clears: Cell::new(0),
        }
    }
}

impl RecordingView {
    pub fn with_billing(first_name: &str, last_name: &str, email: &str) -> Self {
        Self {
            billing: BillingDetails::new(first_name, last_name, email),
            ..Default::default()
        }
    }

    /// Submit control `(enabled, label)`
    pub fn submit(&self) -> (bool, String) {
        self.submit.borrow().clone()
    }

    pub fn success(&self) -> Option<String> {
        self.success.borrow().clone()
    }

    pub fn failure(&self) -> Option<String> {
        self.failure.borrow().clone()
    }

    pub fn card_error(&self) -> String {
        self.card_error.borrow().clone()
    }

    pub fn banner_resets(&self) -> usize {
        self.banner_resets.get()
    }

    pub fn container_clears(&self) -> usize {
        self.container_clears.get()
    }
}

impl PaymentView for RecordingView {
    fn set_submit(&self, enabled: bool, label: &str) {
        *self.submit.borrow_mut() = (enabled, label.to_string());
    }

    fn hide_banners(&self) {
        self.success.borrow_mut().take();
        self.failure.borrow_mut().take();
        self.banner_resets.set(self.banner_resets.get() + 1);
    }

    fn show_success(&self, message: &str) {
        *self.success.borrow_mut() = Some(message.to_string());
    }

    fn show_failure(&self, message: &str) {
        *self.failure.borrow_mut() = Some(message.to_string());
    }

    fn set_card_error(&self, message: &str) {
        *self.card_error.borrow_mut() = message.to_string();
    }

    fn clear_card_container(&self) {
        self.container_clears.set(self.container_clears.get() + 1);
    }

    fn billing_details(&self) -> BillingDetails {
        self.billing.clone()
    }
}

/// Guest checkout form that tracks visibility
pub struct RecordingCheckoutForm {
    record: CheckoutRecord,
    form_visible: Cell<bool>,
    processing_visible: Cell<bool>,
    overlapped: Cell<bool>,
    message: RefCell<String>,
}

impl RecordingCheckoutForm {
    pub fn new(record: CheckoutRecord) -> Self {
        Self {
            record,
            form_visible: Cell::new(true),
            processing_visible: Cell::new(false),
            overlapped: Cell::new(false),
            message: RefCell::new(String::new()),
        }
    }

    pub fn form_visible(&self) -> bool {
        self.form_visible.get()
    }

    pub fn processing_visible(&self) -> bool {
        self.processing_visible.get()
    }

    /// Whether form and processing indicator were ever visible together
    pub fn form_and_processing_overlapped(&self) -> bool {
        self.overlapped.get()
    }

    pub fn message(&self) -> String {
        self.message.borrow().clone()
    }

    fn check_overlap(&self) {
        if self.form_visible.get() && self.processing_visible.get() {
            self.overlapped.set(true);
        }
    }
}

impl CheckoutFormView for RecordingCheckoutForm {
    fn read_record(&self) -> CheckoutRecord {
        self.record.clone()
    }

    fn show_processing(&self) {
        self.form_visible.set(false);
        self.processing_visible.set(true);
        self.check_overlap();
    }

    fn show_form(&self) {
        self.processing_visible.set(false);
        self.form_visible.set(true);
        self.check_overlap();
    }

    fn set_message(&self, message: &str) {
        *self.message.borrow_mut() = message.to_string();
    }
}

/// Navigator that records instead of navigating
#[derive(Default)]
pub struct RecordingNavigator {
    redirects: RefCell<Vec<(String, Option<Duration>)>>,
    alerts: RefCell<Vec<String>>,
    reloads: Cell<usize>,
}

impl RecordingNavigator {
    /// `(url, delay)` pairs; immediate redirects have no delay
    pub fn redirects(&self) -> Vec<(String, Option<Duration>)> {
        self.redirects.borrow().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    pub fn reloads(&self) -> usize {
        self.reloads.get()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, url: &str) -> Result<()> {
        self.redirects.borrow_mut().push((url.to_string(), None));
        Ok(())
    }

    fn redirect_after(&self, url: &str, delay: Duration) {
        self.redirects
            .borrow_mut()
            .push((url.to_string(), Some(delay)));
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

/// Element class lists keyed by id
#[derive(Clone, Debug, Default)]
pub struct MemoryClasses {
    elements: Rc<RefCell<HashMap<String, Vec<String>>>>,
}

impl MemoryClasses {
    /// Elements that start hidden
    pub fn with_hidden(ids: &[&str]) -> Self {
        Self::default().and_hidden(ids)
    }

    /// Elements that start visible
    pub fn with_visible(ids: &[&str]) -> Self {
        Self::default().and_visible(ids)
    }

    #[must_use]
    pub fn and_hidden(self, ids: &[&str]) -> Self {
        for id in ids {
            self.elements
                .borrow_mut()
                .insert((*id).to_string(), vec![HIDDEN_CLASS.to_string()]);
        }
        self
    }

    #[must_use]
    pub fn and_visible(self, ids: &[&str]) -> Self {
        for id in ids {
            self.elements
                .borrow_mut()
                .insert((*id).to_string(), Vec::new());
        }
        self
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.class_count(id, HIDDEN_CLASS) > 0
    }

    pub fn class_count(&self, id: &str, class: &str) -> usize {
        self.elements
            .borrow()
            .get(id)
            .map_or(0, |classes| classes.iter().filter(|c| *c == class).count())
    }
}

impl ElementClasses for MemoryClasses {
    fn set_class(&self, id: &str, class: &str, present: bool) -> bool {
        let mut elements = self.elements.borrow_mut();
        let Some(classes) = elements.get_mut(id) else {
            return false;
        };

        if present {
            if !classes.iter().any(|c| c == class) {
                classes.push(class.to_string());
            }
        } else {
            classes.retain(|c| c != class);
        }
        true
    }
}
