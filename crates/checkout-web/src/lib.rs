//! storefront-checkout Web Frontend
//!
//! Leptos CSR bundle for the storefront's checkout pages. Flow logic lives
//! in `checkout-core`; this crate binds it to signals, the DOM, Stripe.js
//! and Firebase Auth.

mod app;
mod browser;
mod components;
mod logging;
mod pages;
mod sdk;
mod view;

pub use app::App;
pub use browser::{close_modal, open_modal};

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    let config = browser::page_config();
    logging::init(&config.log_level);
    tracing::info!(
        api_base = %config.api_base,
        order_id = ?config.order_id,
        stripe_key = config.publishable_key.is_some(),
        "Checkout frontend starting"
    );

    leptos::mount::mount_to_body(move || view! { <App config=config /> });
}
