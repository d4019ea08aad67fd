//! Reactive View Bindings
//!
//! The core view traits implemented over Leptos signals. Components render
//! from these signals; the flows write to them.

use leptos::prelude::*;

use checkout_core::view::PAY_LABEL;
use checkout_core::{BillingDetails, CheckoutFormView, CheckoutRecord, PaymentView};

use crate::browser;

/// Id of the element the card input is mounted into
pub const CARD_ELEMENT_ID: &str = "card-element";

/// Embedded payment form state
#[derive(Clone, Copy, Debug)]
pub struct PaymentSignals {
    pub submit_enabled: RwSignal<bool>,
    pub submit_label: RwSignal<String>,
    pub success: RwSignal<Option<String>>,
    pub failure: RwSignal<Option<String>>,
    pub card_error: RwSignal<String>,
    pub first_name: RwSignal<String>,
    pub last_name: RwSignal<String>,
    pub email: RwSignal<String>,
}

impl PaymentSignals {
    pub fn new() -> Self {
        Self {
            submit_enabled: RwSignal::new(true),
            submit_label: RwSignal::new(PAY_LABEL.to_string()),
            success: RwSignal::new(None),
            failure: RwSignal::new(None),
            card_error: RwSignal::new(String::new()),
            first_name: RwSignal::new(String::new()),
            last_name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
        }
    }
}

impl PaymentView for PaymentSignals {
    fn set_submit(&self, enabled: bool, label: &str) {
        self.submit_enabled.set(enabled);
        self.submit_label.set(label.to_string());
    }

    fn hide_banners(&self) {
        self.success.set(None);
        self.failure.set(None);
    }

    fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));
    }

    fn show_failure(&self, message: &str) {
        self.failure.set(Some(message.to_string()));
    }

    fn set_card_error(&self, message: &str) {
        self.card_error.set(message.to_string());
    }

    fn clear_card_container(&self) {
        // Stripe owns this subtree, so it is cleared outside the reactive graph
        if let Err(e) = browser::clear_element(CARD_ELEMENT_ID) {
            tracing::warn!(error = %e, "Card container not cleared");
        }
    }

    fn billing_details(&self) -> BillingDetails {
        BillingDetails::new(
            &self.first_name.get_untracked(),
            &self.last_name.get_untracked(),
            &self.email.get_untracked(),
        )
    }
}

/// Guest checkout form state
///
/// A single `processing` flag drives both the form and the indicator, so the
/// two can never be visible together.
#[derive(Clone, Copy, Debug)]
pub struct CheckoutSignals {
    pub company_name: RwSignal<String>,
    pub first_name: RwSignal<String>,
    pub last_name: RwSignal<String>,
    pub email: RwSignal<String>,
    pub phone: RwSignal<String>,
    pub processing: RwSignal<bool>,
    pub message: RwSignal<String>,
}

impl CheckoutSignals {
    pub fn new() -> Self {
        Self {
            company_name: RwSignal::new(String::new()),
            first_name: RwSignal::new(String::new()),
            last_name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            processing: RwSignal::new(false),
            message: RwSignal::new(String::new()),
        }
    }
}

impl CheckoutFormView for CheckoutSignals {
    fn read_record(&self) -> CheckoutRecord {
        CheckoutRecord {
            company_name: self.company_name.get_untracked(),
            first_name: self.first_name.get_untracked(),
            last_name: self.last_name.get_untracked(),
            email: self.email.get_untracked(),
            phone: self.phone.get_untracked(),
        }
    }

    fn show_processing(&self) {
        self.processing.set(true);
    }

    fn show_form(&self) {
        self.processing.set(false);
    }

    fn set_message(&self, message: &str) {
        self.message.set(message.to_string());
    }
}
