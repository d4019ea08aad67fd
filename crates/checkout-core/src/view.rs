//! Page Bindings
//!
//! The flows never look elements up themselves. Each form is reached through
//! a typed view whose elements are resolved once by the frontend.

use std::time::Duration;

use crate::error::Result;
use crate::record::{BillingDetails, CheckoutRecord};

/// Submit label while idle
pub const PAY_LABEL: &str = "Pay Now";

/// Submit label while a payment is in flight
pub const PROCESSING_LABEL: &str = "Processing...";

/// Embedded card payment form
pub trait PaymentView {
    /// Enable or disable the submit control and set its label
    fn set_submit(&self, enabled: bool, label: &str);

    /// Hide both result banners
    fn hide_banners(&self);

    fn show_success(&self, message: &str);

    fn show_failure(&self, message: &str);

    /// Inline card error text; an empty string clears it
    fn set_card_error(&self, message: &str);

    /// Empty the container the card input is mounted into
    fn clear_card_container(&self);

    /// Billing details from the name and email fields
    fn billing_details(&self) -> BillingDetails;
}

/// Guest checkout form that hands off to hosted checkout
pub trait CheckoutFormView {
    fn read_record(&self) -> CheckoutRecord;

    /// Hide the form and show the processing indicator
    fn show_processing(&self);

    /// Show the form and hide the processing indicator
    fn show_form(&self);

    fn set_message(&self, message: &str);
}

/// Page-level navigation and dialogs
pub trait Navigator {
    /// Navigate immediately
    fn redirect(&self, url: &str) -> Result<()>;

    /// Navigate after `delay`
    fn redirect_after(&self, url: &str, delay: Duration);

    fn reload(&self);

    /// Blocking alert dialog
    fn alert(&self, message: &str);
}
