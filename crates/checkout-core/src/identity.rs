//! Identity Relay
//!
//! Login and signup are verified entirely by the identity provider's SDK.
//! The resulting id token is forwarded to the backend, which establishes the
//! server session; the page then reloads. No client-side session state.

use async_trait::async_trait;

use crate::backend::{AuthMode, AuthRequest, Backend};
use crate::error::{CheckoutError, Result};
use crate::modal::{ElementClasses, Modals};
use crate::record::{Credentials, IdToken};
use crate::view::Navigator;

pub const MISSING_CREDENTIALS: &str = "Please enter email and password.";

/// Identity provider browser SDK
#[async_trait(?Send)]
pub trait IdentityProvider {
    /// Provider name used in messages (e.g. "Firebase")
    fn name(&self) -> &str;

    /// Whether the SDK is present on the page
    fn is_loaded(&self) -> bool;

    /// Sign in an existing user and return a fresh id token
    async fn sign_in(&self, credentials: &Credentials) -> Result<IdToken>;

    /// Create a user and return a fresh id token
    async fn sign_up(&self, credentials: &Credentials) -> Result<IdToken>;
}

/// Login/signup relay between the identity SDK and the backend
pub struct IdentityRelay<B, I, E, N> {
    backend: B,
    identity: I,
    modals: Modals<E>,
    navigator: N,
}

impl<B, I, E, N> IdentityRelay<B, I, E, N>
where
    B: Backend,
    I: IdentityProvider,
    E: ElementClasses,
    N: Navigator,
{
    pub const fn new(backend: B, identity: I, modals: Modals<E>, navigator: N) -> Self {
        Self {
            backend,
            identity,
            modals,
            navigator,
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        self.relay(AuthMode::Login, credentials).await
    }

    pub async fn signup(&self, credentials: &Credentials) -> Result<()> {
        self.relay(AuthMode::Signup, credentials).await
    }

    /// Validate, obtain a token from the SDK, and hand it to the backend
    ///
    /// Every failure is reported with a blocking alert and also returned.
    pub async fn relay(&self, mode: AuthMode, credentials: &Credentials) -> Result<()> {
        if !credentials.is_complete() {
            self.navigator.alert(MISSING_CREDENTIALS);
            return Err(CheckoutError::Validation(MISSING_CREDENTIALS.into()));
        }

        if !self.identity.is_loaded() {
            let err = CheckoutError::SdkUnavailable(format!("{} SDK", self.identity.name()));
            self.navigator.alert(&err.user_message());
            return Err(err);
        }

        tracing::info!(mode = mode.label(), email = %credentials.email, "Identity relay started");

        match self.exchange(mode, credentials).await {
            Ok(()) => {
                tracing::info!(mode = mode.label(), "Session established");
                self.modals.hide(mode.modal_id());
                self.navigator.reload();
                Ok(())
            }
            Err(CheckoutError::Remote(message)) => {
                tracing::warn!(mode = mode.label(), error = %message, "Session rejected");
                self.navigator.alert(&message);
                Err(CheckoutError::Remote(message))
            }
            Err(err) => {
                tracing::warn!(mode = mode.label(), error = %err, "Identity relay failed");
                self.navigator
                    .alert(&format!("{} failed: {}", mode.label(), err.user_message()));
                Err(err)
            }
        }
    }

    async fn exchange(&self, mode: AuthMode, credentials: &Credentials) -> Result<()> {
        let id_token = match mode {
            AuthMode::Login => self.identity.sign_in(credentials).await?,
            AuthMode::Signup => self.identity.sign_up(credentials).await?,
        };

        let response = self
            .backend
            .establish_session(mode, &AuthRequest { id_token })
            .await?;

        if response.success {
            Ok(())
        } else {
            Err(CheckoutError::Remote(
                response
                    .error_message()
                    .map_or_else(|| format!("{} failed.", mode.label()), str::to_string),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{AuthResponse, Endpoint};
    use crate::mock::{MemoryClasses, MockBackend, MockIdentity, RecordingNavigator};

    type Relay = IdentityRelay<MockBackend, MockIdentity, MemoryClasses, RecordingNavigator>;

    fn relay(backend: MockBackend, identity: MockIdentity) -> Relay {
        let modals = Modals::new(MemoryClasses::with_visible(&["loginModal", "signupModal"]));
        IdentityRelay::new(backend, identity, modals, RecordingNavigator::default())
    }

    #[tokio::test]
    async fn test_empty_password_never_reaches_sdk() {
        let relay = relay(MockBackend::default(), MockIdentity::default());

        let err = relay
            .login(&Credentials::new("ada@example.com", ""))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Validation(_)));
        assert_eq!(relay.identity.sign_in_calls(), 0);
        assert_eq!(relay.backend.calls(Endpoint::Login), 0);
        assert_eq!(relay.navigator.alerts(), vec![MISSING_CREDENTIALS.to_string()]);
    }

    #[tokio::test]
    async fn test_login_success_hides_modal_and_reloads() {
        let relay = relay(MockBackend::default(), MockIdentity::default());

        relay
            .login(&Credentials::new("ada@example.com", "pw"))
            .await
            .unwrap();

        assert_eq!(relay.identity.sign_in_calls(), 1);
        assert_eq!(relay.backend.calls(Endpoint::Login), 1);
        assert_eq!(relay.backend.auth_tokens()[0].expose(), "token-ada@example.com");
        assert!(relay.modals.elements().is_hidden("loginModal"));
        assert_eq!(relay.navigator.reloads(), 1);
        assert!(relay.navigator.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_signup_uses_signup_endpoint() {
        let relay = relay(MockBackend::default(), MockIdentity::default());

        relay
            .signup(&Credentials::new("ada@example.com", "pw"))
            .await
            .unwrap();

        assert_eq!(relay.identity.sign_up_calls(), 1);
        assert_eq!(relay.backend.calls(Endpoint::Signup), 1);
        assert!(relay.modals.elements().is_hidden("signupModal"));
        assert!(!relay.modals.elements().is_hidden("loginModal"));
    }

    #[tokio::test]
    async fn test_server_rejection_alerts_server_message() {
        let backend = MockBackend::default().with_auth(Ok(AuthResponse {
            success: false,
            error: Some("Token expired".into()),
        }));
        let relay = relay(backend, MockIdentity::default());

        relay
            .login(&Credentials::new("ada@example.com", "pw"))
            .await
            .unwrap_err();

        assert_eq!(relay.navigator.alerts(), vec!["Token expired".to_string()]);
        assert_eq!(relay.navigator.reloads(), 0);
    }

    #[tokio::test]
    async fn test_server_rejection_default_message() {
        let backend = MockBackend::default().with_auth(Ok(AuthResponse::default()));
        let relay = relay(backend, MockIdentity::default());

        relay
            .signup(&Credentials::new("ada@example.com", "pw"))
            .await
            .unwrap_err();

        assert_eq!(relay.navigator.alerts(), vec!["Signup failed.".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_server_error_uses_default() {
        let backend = MockBackend::default().with_auth(Ok(AuthResponse {
            success: false,
            error: Some(String::new()),
        }));
        let relay = relay(backend, MockIdentity::default());

        relay
            .login(&Credentials::new("ada@example.com", "pw"))
            .await
            .unwrap_err();

        assert_eq!(relay.navigator.alerts(), vec!["Login failed.".to_string()]);
    }

    #[tokio::test]
    async fn test_sdk_error_is_prefixed() {
        let identity = MockIdentity::failing("auth/wrong-password");
        let relay = relay(MockBackend::default(), identity);

        relay
            .login(&Credentials::new("ada@example.com", "pw"))
            .await
            .unwrap_err();

        assert_eq!(
            relay.navigator.alerts(),
            vec!["Login failed: auth/wrong-password".to_string()]
        );
        assert_eq!(relay.backend.calls(Endpoint::Login), 0);
    }

    #[tokio::test]
    async fn test_unloaded_sdk() {
        let relay = relay(MockBackend::default(), MockIdentity::unloaded());

        let err = relay
            .login(&Credentials::new("ada@example.com", "pw"))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::SdkUnavailable(_)));
        assert_eq!(relay.navigator.alerts(), vec!["Mock SDK not loaded.".to_string()]);
    }
}
