//! Main App Component

use leptos::prelude::*;
use leptos_router::{components::*, path};

use checkout_core::ClientConfig;

use crate::pages::{CheckoutPage, HomePage, PaymentPage};

/// Root application component
#[component]
pub fn App(config: ClientConfig) -> impl IntoView {
    provide_context(config);

    view! {
        <Router>
            <main class="app">
                <Routes fallback=|| view! { <p>"Page not found"</p> }>
                    <Route path=path!("/") view=HomePage />
                    <Route path=path!("/checkout") view=CheckoutPage />
                    <Route path=path!("/pay") view=PaymentPage />
                </Routes>
            </main>
        </Router>
    }
}
