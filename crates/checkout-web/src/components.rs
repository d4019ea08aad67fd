//! UI Components

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use checkout_core::modal::{GUEST_CHECKOUT_MODAL, PAYMENT_MODAL};
use checkout_core::{
    AuthMode, ClientConfig, Credentials, GuestContact, HttpBackend, IdentityRelay, Modals,
    submit_guest_contact,
};

use crate::browser::{self, BrowserNavigator, DomClasses, close_modal};
use crate::pages::PaymentPanel;
use crate::sdk::FirebaseAuth;

/// Labelled input bound to a signal
#[component]
pub fn TextField(
    id: &'static str,
    label: &'static str,
    value: RwSignal<String>,
    #[prop(default = "text")] kind: &'static str,
) -> impl IntoView {
    view! {
        <div class="field">
            <label for=id>{label}</label>
            <input
                id=id
                name=id
                type=kind
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </div>
    }
}

/// Optional banner; hidden while empty
#[component]
pub fn Banner(id: &'static str, class: &'static str, text: RwSignal<Option<String>>) -> impl IntoView {
    view! {
        <div id=id class=class class:hidden=move || text.with(Option::is_none)>
            {move || text.get().unwrap_or_default()}
        </div>
    }
}

/// Login or signup modal
#[component]
pub fn AuthModal(mode: AuthMode) -> impl IntoView {
    let config = expect_context::<ClientConfig>();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let credentials = Credentials::new(email.get_untracked(), password.get_untracked());
        let relay = IdentityRelay::new(
            HttpBackend::from_config(&config),
            FirebaseAuth::new(),
            Modals::new(DomClasses),
            BrowserNavigator,
        );
        spawn_local(async move {
            let _ = relay.relay(mode, &credentials).await;
        });
    };

    let (form_id, email_id, password_id) = match mode {
        AuthMode::Login => ("loginForm", "login-email", "login-password"),
        AuthMode::Signup => ("signupForm", "signup-email", "signup-password"),
    };

    view! {
        <div id=mode.modal_id() class="modal hidden">
            <form id=form_id class="modal-content" on:submit=on_submit>
                <h2>{mode.label()}</h2>
                <TextField id=email_id label="Email" value=email kind="email" />
                <TextField id=password_id label="Password" value=password kind="password" />
                <div class="actions">
                    <button type="submit" class="btn btn-primary">{mode.label()}</button>
                    <button type="button" class="btn" on:click=move |_| close_modal(mode.modal_id())>
                        "Cancel"
                    </button>
                </div>
            </form>
        </div>
    }
}

/// Guest contact modal; opens the payment modal on success
#[component]
pub fn GuestContactModal() -> impl IntoView {
    let config = expect_context::<ClientConfig>();
    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let card_init = RwSignal::new(0_u32);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let contact = GuestContact {
            name: name.get_untracked(),
            email: email.get_untracked(),
            phone: phone.get_untracked(),
            order_id: browser::current_order_id(),
        };
        let backend = HttpBackend::from_config(&config);
        let delay = config.card_init_delay;
        spawn_local(async move {
            let modals = Modals::new(DomClasses);
            if submit_guest_contact(&backend, &modals, &BrowserNavigator, &contact)
                .await
                .is_ok()
            {
                browser::after(delay, move || card_init.update(|n| *n += 1));
            }
        });
    };

    view! {
        <div id=GUEST_CHECKOUT_MODAL class="modal hidden">
            <form id="guestCheckoutForm" class="modal-content" on:submit=on_submit>
                <h2>"Checkout as guest"</h2>
                <TextField id="guest-name" label="Name" value=name />
                <TextField id="guest-email" label="Email" value=email kind="email" />
                <TextField id="guest-phone" label="Phone" value=phone kind="tel" />
                <div class="actions">
                    <button type="submit" class="btn btn-primary">"Continue"</button>
                    <button type="button" class="btn" on:click=move |_| close_modal(GUEST_CHECKOUT_MODAL)>
                        "Cancel"
                    </button>
                </div>
            </form>
        </div>

        <div id=PAYMENT_MODAL class="modal hidden">
            <div class="modal-content">
                <PaymentPanel init=card_init />
            </div>
        </div>
    }
}
