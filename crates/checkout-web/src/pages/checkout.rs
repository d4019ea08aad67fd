//! Guest Checkout Page
//!
//! Full guest form handed off to the processor's hosted checkout.

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use checkout_core::handshake::STRIPE_KEY_MISSING;
use checkout_core::{
    CheckoutError, CheckoutFormView, ClientConfig, HttpBackend, submit_guest_checkout,
};

use crate::components::TextField;
use crate::sdk::StripeJs;
use crate::view::CheckoutSignals;

#[component]
pub fn CheckoutPage() -> impl IntoView {
    let config = expect_context::<ClientConfig>();
    let form = CheckoutSignals::new();

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let backend = HttpBackend::from_config(&config);
        let stripe = match StripeJs::new(&config) {
            Ok(stripe) => stripe,
            Err(err) => {
                tracing::warn!(error = %err, "Hosted checkout unavailable");
                let message = match err {
                    CheckoutError::Config(_) => STRIPE_KEY_MISSING.into(),
                    other => other.user_message(),
                };
                form.set_message(&format!("Error: {message}"));
                return;
            }
        };
        spawn_local(async move {
            let _ = submit_guest_checkout(&backend, &stripe, &form).await;
        });
    };

    view! {
        <div class="checkout">
            <h1>"Checkout"</h1>

            <form id="checkout-form" class:hidden=move || form.processing.get() on:submit=on_submit>
                <TextField id="company_name" label="Company" value=form.company_name />
                <TextField id="first_name" label="First name" value=form.first_name />
                <TextField id="last_name" label="Last name" value=form.last_name />
                <TextField id="email" label="Email" value=form.email kind="email" />
                <TextField id="phone" label="Phone" value=form.phone kind="tel" />
                <button type="submit" class="btn btn-primary">"Proceed to payment"</button>
            </form>

            <div id="processing" class:hidden=move || !form.processing.get()>
                "Processing..."
            </div>

            <div id="message" class="message">{move || form.message.get()}</div>
        </div>
    }
}
