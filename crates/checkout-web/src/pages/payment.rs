//! Payment Page
//!
//! Embedded card form. [`PaymentPanel`] mounts the card input whenever its
//! `init` counter is positive and changes; the payment modal bumps it after
//! the modal opens, the standalone page starts it at 1.

use std::rc::Rc;

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use checkout_core::{ClientConfig, HttpBackend, PaymentForm, Result, report_setup_error};

use crate::browser::{self, BrowserNavigator};
use crate::components::{Banner, TextField};
use crate::sdk::StripeJs;
use crate::view::{CARD_ELEMENT_ID, PaymentSignals};

type WebPaymentForm = PaymentForm<HttpBackend, StripeJs, PaymentSignals, BrowserNavigator>;

fn build_form(config: &ClientConfig, signals: PaymentSignals) -> Result<WebPaymentForm> {
    let stripe = StripeJs::new(config)?;
    Ok(PaymentForm::new(
        HttpBackend::from_config(config),
        stripe,
        signals,
        BrowserNavigator,
        config,
    ))
}

fn initialize(form: &Rc<WebPaymentForm>) -> Result<()> {
    form.initialize()?;

    if let Some(card) = form.card() {
        let weak = Rc::downgrade(form);
        card.on_change(move |error| {
            if let Some(form) = weak.upgrade() {
                form.card_changed(error.as_deref());
            }
        })?;
    }
    Ok(())
}

#[component]
pub fn PaymentPanel(init: RwSignal<u32>) -> impl IntoView {
    let config = expect_context::<ClientConfig>();
    let signals = PaymentSignals::new();
    let form = StoredValue::new_local(None::<Rc<WebPaymentForm>>);

    Effect::new(move |_| {
        if init.get() == 0 {
            return;
        }

        let current = match form.get_value() {
            Some(current) => current,
            None => match build_form(&config, signals) {
                Ok(built) => {
                    let built = Rc::new(built);
                    form.set_value(Some(Rc::clone(&built)));
                    built
                }
                Err(err) => {
                    report_setup_error(&err, &signals, &BrowserNavigator);
                    return;
                }
            },
        };

        if let Err(err) = initialize(&current) {
            report_setup_error(&err, &signals, &BrowserNavigator);
        }
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(current) = form.get_value() else {
            tracing::warn!("Payment form not initialised");
            return;
        };
        current.set_order_id(browser::current_order_id());
        spawn_local(async move {
            let _ = current.submit().await;
        });
    };

    view! {
        <form id="payment-form" class="payment" on:submit=on_submit>
            <TextField id="billing-first-name" label="First name" value=signals.first_name />
            <TextField id="billing-last-name" label="Last name" value=signals.last_name />
            <TextField id="billing-email" label="Email" value=signals.email kind="email" />

            <div id=CARD_ELEMENT_ID class="card-input"></div>
            <div id="card-errors" role="alert">{move || signals.card_error.get()}</div>

            <button
                id="payNowBtn"
                type="submit"
                class="btn btn-primary"
                disabled=move || !signals.submit_enabled.get()
            >
                {move || signals.submit_label.get()}
            </button>

            <Banner id="payment-success" class="banner success" text=signals.success />
            <Banner id="payment-failure" class="banner failure" text=signals.failure />
        </form>
    }
}

#[component]
pub fn PaymentPage() -> impl IntoView {
    let init = RwSignal::new(1_u32);

    view! {
        <div class="pay">
            <h1>"Payment"</h1>
            <PaymentPanel init=init />
        </div>
    }
}
