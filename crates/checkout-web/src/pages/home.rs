//! Home Page
//!
//! Storefront landing with the login, signup and guest checkout modals.

use leptos::prelude::*;

use checkout_core::AuthMode;
use checkout_core::modal::GUEST_CHECKOUT_MODAL;

use crate::browser::open_modal;
use crate::components::{AuthModal, GuestContactModal};

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home">
            <header class="hero">
                <h1>"Storefront"</h1>
                <div class="cta">
                    <button class="btn" on:click=move |_| open_modal(AuthMode::Login.modal_id())>
                        "Log in"
                    </button>
                    <button class="btn" on:click=move |_| open_modal(AuthMode::Signup.modal_id())>
                        "Sign up"
                    </button>
                    <button class="btn btn-primary" on:click=move |_| open_modal(GUEST_CHECKOUT_MODAL)>
                        "Checkout as guest"
                    </button>
                    <a href="/checkout" class="btn">"Company checkout"</a>
                </div>
            </header>

            <AuthModal mode=AuthMode::Login />
            <AuthModal mode=AuthMode::Signup />
            <GuestContactModal />
        </div>
    }
}
