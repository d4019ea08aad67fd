//! Payment Processor Delegate
//!
//! Seam to the processor's browser SDK: hosted checkout redirect and
//! embedded card confirmation. [`CardMount`] owns the mounted card input so
//! it is never mounted twice.

use async_trait::async_trait;

use crate::error::Result;
use crate::record::{BillingDetails, CheckoutSessionId, ClientSecret, PaymentIntentId};

/// Selector of the element the card input is mounted into
pub const CARD_CONTAINER: &str = "#card-element";

/// Handle to a card input created by the processor SDK
pub trait CardElement: Clone {
    fn mount(&self, selector: &str) -> Result<()>;

    fn destroy(&self) -> Result<()>;
}

/// Processor SDK client created from a publishable key
#[async_trait(?Send)]
pub trait PaymentProcessor {
    type Card: CardElement;

    /// Create an unmounted card input
    fn create_card(&self) -> Result<Self::Card>;

    /// Confirm a card payment for the intent unlocked by `secret`
    ///
    /// A processor-reported failure (declined card, ...) must come back as
    /// `CheckoutError::Processor` so it can be shown next to the card input.
    async fn confirm_card_payment(
        &self,
        secret: &ClientSecret,
        card: &Self::Card,
        billing: &BillingDetails,
    ) -> Result<PaymentIntentId>;

    /// Navigate to the processor-hosted checkout page
    async fn redirect_to_checkout(&self, session: &CheckoutSessionId) -> Result<()>;
}

/// Mounted card input and its mount flag
#[derive(Debug)]
pub struct CardMount<C> {
    card: Option<C>,
    mounted: bool,
}

impl<C> Default for CardMount<C> {
    fn default() -> Self {
        Self {
            card: None,
            mounted: false,
        }
    }
}

impl<C: CardElement> CardMount<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Handle to the mounted card, if any
    pub fn card(&self) -> Option<C> {
        self.card.clone()
    }

    /// Create and mount a card unless one is already mounted
    ///
    /// Returns `Ok(false)` without calling `create` when already mounted.
    pub fn mount<F>(&mut self, create: F) -> Result<bool>
    where
        F: FnOnce() -> Result<C>,
    {
        if self.mounted {
            return Ok(false);
        }

        let card = create()?;
        card.mount(CARD_CONTAINER)?;
        self.card = Some(card);
        self.mounted = true;
        Ok(true)
    }

    /// Destroy the current card, if any. Destroy errors are ignored.
    ///
    /// Returns whether a card was present.
    pub fn destroy(&mut self) -> bool {
        self.mounted = false;
        match self.card.take() {
            Some(card) => {
                if let Err(e) = card.destroy() {
                    tracing::debug!(error = %e, "Card destroy failed");
                }
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckoutError;
    use crate::mock::MockCard;

    #[test]
    fn test_second_mount_is_noop() {
        let card = MockCard::default();
        let mut mount = CardMount::new();

        assert!(mount.mount(|| Ok(card.clone())).unwrap());
        assert!(!mount.mount(|| panic!("must not create a second card")).unwrap());
        assert_eq!(card.mounts(), 1);
        assert!(mount.is_mounted());
    }

    #[test]
    fn test_destroy_then_remount() {
        let card = MockCard::default();
        let mut mount = CardMount::new();

        mount.mount(|| Ok(card.clone())).unwrap();
        assert!(mount.destroy());
        assert!(!mount.is_mounted());
        assert!(mount.card().is_none());

        mount.mount(|| Ok(card.clone())).unwrap();
        assert_eq!(card.mounts(), 2);
        assert_eq!(card.destroys(), 1);
    }

    #[test]
    fn test_destroy_errors_are_swallowed() {
        let card = MockCard::failing_destroy();
        let mut mount = CardMount::new();
        mount.mount(|| Ok(card.clone())).unwrap();

        assert!(mount.destroy());
        assert!(!mount.is_mounted());
    }

    #[test]
    fn test_failed_mount_leaves_unmounted() {
        let mut mount: CardMount<MockCard> = CardMount::new();
        let err = mount
            .mount(|| Err(CheckoutError::SdkUnavailable("Stripe.js".into())))
            .unwrap_err();
        assert!(matches!(err, CheckoutError::SdkUnavailable(_)));
        assert!(!mount.is_mounted());
    }
}
