//! Guest Checkout
//!
//! Two entry points:
//!
//! - [`submit_guest_checkout`]: full guest form, hands off to the processor's
//!   hosted checkout page.
//! - [`submit_guest_contact`]: contact modal, attaches the guest to the
//!   current order and opens the embedded payment modal.
//!
//! One attempt per submission; no retries.

use crate::backend::Backend;
use crate::error::{CheckoutError, Result};
use crate::modal::{ElementClasses, GUEST_CHECKOUT_MODAL, Modals, PAYMENT_MODAL};
use crate::processor::PaymentProcessor;
use crate::record::{CheckoutSessionId, GuestContact};
use crate::view::{CheckoutFormView, Navigator};

/// Submit the guest checkout form and redirect to hosted checkout
///
/// On any failure the form is shown again with `Error: <message>`.
pub async fn submit_guest_checkout<B, P, V>(
    backend: &B,
    processor: &P,
    view: &V,
) -> Result<CheckoutSessionId>
where
    B: Backend,
    P: PaymentProcessor,
    V: CheckoutFormView,
{
    view.show_processing();
    let record = view.read_record();

    tracing::info!(email = %record.email, "Guest checkout submitted");

    let result: Result<CheckoutSessionId> = async {
        let response = backend.create_checkout_session(&record).await?;
        if let Some(error) = response.error_message() {
            return Err(CheckoutError::Remote(error.into()));
        }
        let session_id = response
            .session()
            .cloned()
            .ok_or_else(|| CheckoutError::Malformed("missing session_id".into()))?;

        tracing::info!(session_id = %session_id, "Redirecting to hosted checkout");
        processor.redirect_to_checkout(&session_id).await?;
        Ok(session_id)
    }
    .await;

    if let Err(err) = &result {
        tracing::warn!(error = %err, "Guest checkout failed");
        view.show_form();
        view.set_message(&format!("Error: {}", err.user_message()));
    }

    result
}

/// Submit the guest contact modal
///
/// On success the guest modal closes and the payment modal opens; the caller
/// initialises the payment form after `ClientConfig::card_init_delay`.
pub async fn submit_guest_contact<B, E, N>(
    backend: &B,
    modals: &Modals<E>,
    navigator: &N,
    contact: &GuestContact,
) -> Result<()>
where
    B: Backend,
    E: ElementClasses,
    N: Navigator,
{
    tracing::info!(email = %contact.email, order_id = ?contact.order_id, "Guest contact submitted");

    let result = match backend.register_guest(contact).await {
        Ok(response) => response
            .error_message()
            .map_or(Ok(()), |e| Err(CheckoutError::Remote(e.into()))),
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => {
            modals.hide(GUEST_CHECKOUT_MODAL);
            modals.show(PAYMENT_MODAL);
            Ok(())
        }
        Err(err) => {
            tracing::warn!(error = %err, "Guest contact rejected");
            navigator.alert(&format!("Guest checkout failed: {}", err.user_message()));
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Endpoint, GuestResponse, SessionResponse};
    use crate::mock::{MemoryClasses, MockBackend, MockProcessor, RecordingCheckoutForm, RecordingNavigator};
    use crate::record::{CheckoutRecord, CheckoutSessionId, OrderId};

    fn filled_form() -> RecordingCheckoutForm {
        RecordingCheckoutForm::new(CheckoutRecord {
            company_name: "Acme".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "555-0100".into(),
        })
    }

    #[tokio::test]
    async fn test_success_posts_once_and_redirects() {
        let backend = MockBackend::default();
        let processor = MockProcessor::default();
        let view = filled_form();

        let session = submit_guest_checkout(&backend, &processor, &view).await.unwrap();

        assert_eq!(session.as_str(), "cs_test_1");
        assert_eq!(backend.calls(Endpoint::CheckoutProcess), 1);
        assert_eq!(backend.checkout_records()[0].company_name, "Acme");
        assert_eq!(processor.redirects(), vec![session]);
        assert!(!view.form_and_processing_overlapped());
        assert!(view.processing_visible());
    }

    #[tokio::test]
    async fn test_remote_error_restores_form() {
        let backend = MockBackend::default().with_session(Ok(SessionResponse {
            session_id: None,
            error: Some("X".into()),
        }));
        let processor = MockProcessor::default();
        let view = filled_form();

        submit_guest_checkout(&backend, &processor, &view).await.unwrap_err();

        assert!(view.form_visible());
        assert!(!view.processing_visible());
        assert_eq!(view.message(), "Error: X");
        assert!(processor.redirects().is_empty());
        assert!(!view.form_and_processing_overlapped());
    }

    #[tokio::test]
    async fn test_empty_error_with_session_redirects() {
        let backend = MockBackend::default().with_session(Ok(SessionResponse {
            session_id: Some(CheckoutSessionId::from_string("cs_live_2")),
            error: Some(String::new()),
        }));
        let processor = MockProcessor::default();
        let view = filled_form();

        let session = submit_guest_checkout(&backend, &processor, &view).await.unwrap();

        assert_eq!(session.as_str(), "cs_live_2");
        assert_eq!(processor.redirects(), vec![session]);
        assert_eq!(view.message(), "");
    }

    #[tokio::test]
    async fn test_empty_session_id_is_malformed() {
        let backend = MockBackend::default().with_session(Ok(SessionResponse {
            session_id: Some(CheckoutSessionId::from_string("")),
            error: None,
        }));
        let processor = MockProcessor::default();
        let view = filled_form();

        let err = submit_guest_checkout(&backend, &processor, &view).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Malformed(_)));
        assert!(processor.redirects().is_empty());
        assert!(view.form_visible());
    }

    #[tokio::test]
    async fn test_redirect_error_restores_form() {
        let backend = MockBackend::default();
        let processor = MockProcessor::default().with_redirect_error("Invalid session");
        let view = filled_form();

        submit_guest_checkout(&backend, &processor, &view).await.unwrap_err();

        assert!(view.form_visible());
        assert_eq!(view.message(), "Error: Invalid session");
    }

    #[tokio::test]
    async fn test_transport_error_restores_form() {
        let backend = MockBackend::default()
            .with_session(Err(CheckoutError::Transport("Failed to fetch".into())));
        let view = filled_form();

        submit_guest_checkout(&backend, &MockProcessor::default(), &view)
            .await
            .unwrap_err();

        assert_eq!(view.message(), "Error: Failed to fetch");
        assert_eq!(backend.calls(Endpoint::CheckoutProcess), 1);
    }

    #[tokio::test]
    async fn test_guest_contact_swaps_modals() {
        let backend = MockBackend::default();
        let modals = Modals::new(MemoryClasses::with_hidden(&[PAYMENT_MODAL]).and_visible(&[GUEST_CHECKOUT_MODAL]));
        let navigator = RecordingNavigator::default();
        let contact = GuestContact {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: "555".into(),
            order_id: Some(OrderId::from_string("order-1")),
        };

        submit_guest_contact(&backend, &modals, &navigator, &contact)
            .await
            .unwrap();

        assert!(modals.elements().is_hidden(GUEST_CHECKOUT_MODAL));
        assert!(!modals.elements().is_hidden(PAYMENT_MODAL));
        assert_eq!(backend.guest_contacts(), vec![contact]);
        assert!(navigator.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_guest_contact_error_alerts() {
        let backend = MockBackend::default().with_guest(Ok(GuestResponse {
            error: Some("Invalid email".into()),
        }));
        let modals = Modals::new(MemoryClasses::with_hidden(&[PAYMENT_MODAL]).and_visible(&[GUEST_CHECKOUT_MODAL]));
        let navigator = RecordingNavigator::default();

        submit_guest_contact(&backend, &modals, &navigator, &GuestContact::default())
            .await
            .unwrap_err();

        assert_eq!(
            navigator.alerts(),
            vec!["Guest checkout failed: Invalid email".to_string()]
        );
        assert!(modals.elements().is_hidden(PAYMENT_MODAL));
        assert!(!modals.elements().is_hidden(GUEST_CHECKOUT_MODAL));
    }

    #[tokio::test]
    async fn test_guest_contact_empty_error_succeeds() {
        let backend = MockBackend::default().with_guest(Ok(GuestResponse {
            error: Some(String::new()),
        }));
        let modals = Modals::new(MemoryClasses::with_hidden(&[PAYMENT_MODAL]).and_visible(&[GUEST_CHECKOUT_MODAL]));
        let navigator = RecordingNavigator::default();

        submit_guest_contact(&backend, &modals, &navigator, &GuestContact::default())
            .await
            .unwrap();

        assert!(!modals.elements().is_hidden(PAYMENT_MODAL));
        assert!(navigator.alerts().is_empty());
    }
}
