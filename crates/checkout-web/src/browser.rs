//! Browser Page Services
//!
//! Navigation, dialogs, class toggling and page configuration on top of
//! `web-sys`.

use std::time::Duration;

use js_sys::Reflect;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use checkout_core::config::{API_BASE, LOG_LEVEL, ORDER_ID, PUBLISHABLE_KEY};
use checkout_core::{
    CheckoutError, ClientConfig, ElementClasses, Modals, Navigator, OrderId, Result,
};

use crate::sdk::js_message;

/// Run `f` once after `delay`
pub fn after(delay: Duration, f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(f);
    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        millis,
    ) {
        tracing::warn!(error = %js_message(&e), "setTimeout failed");
    }
}

/// `window.location` and `window.alert`
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn redirect(&self, url: &str) -> Result<()> {
        let window = web_sys::window().ok_or_else(|| CheckoutError::MissingElement("window".into()))?;
        window
            .location()
            .set_href(url)
            .map_err(|e| CheckoutError::Transport(js_message(&e)))
    }

    fn redirect_after(&self, url: &str, delay: Duration) {
        let url = url.to_string();
        after(delay, move || {
            if let Err(e) = Self.redirect(&url) {
                tracing::warn!(error = %e, "Redirect failed");
            }
        });
    }

    fn reload(&self) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().reload() {
                tracing::warn!(error = %js_message(&e), "Reload failed");
            }
        }
    }

    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}

/// Class lists of document elements
#[derive(Clone, Copy, Debug, Default)]
pub struct DomClasses;

impl ElementClasses for DomClasses {
    fn set_class(&self, id: &str, class: &str, present: bool) -> bool {
        let Some(element) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        else {
            return false;
        };

        let classes = element.class_list();
        let result = if present {
            classes.add_1(class)
        } else {
            classes.remove_1(class)
        };
        if let Err(e) = result {
            tracing::warn!(id, error = %js_message(&e), "Class update failed");
        }
        true
    }
}

/// Replace the contents of an element
pub fn clear_element(id: &str) -> Result<()> {
    let element = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .ok_or_else(|| CheckoutError::MissingElement(id.into()))?;
    element.set_inner_html("");
    Ok(())
}

/// Show a modal by id; exported for page scripts
#[wasm_bindgen(js_name = openModal)]
pub fn open_modal(id: &str) {
    Modals::new(DomClasses).show(id);
}

/// Hide a modal by id; exported for page scripts
#[wasm_bindgen(js_name = closeModal)]
pub fn close_modal(id: &str) {
    Modals::new(DomClasses).hide(id);
}

fn window_string(name: &str) -> Option<String> {
    let window = web_sys::window()?;
    let value = Reflect::get(&window, &JsValue::from_str(name)).ok()?;
    value
        .as_string()
        .or_else(|| value.as_f64().map(|n| n.to_string()))
}

fn body_data(attribute: &str) -> Option<String> {
    web_sys::window()?
        .document()?
        .body()?
        .get_attribute(attribute)
}

fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

fn page_order_id() -> Option<String> {
    window_string("currentOrderId")
        .or_else(|| body_data("data-order-id"))
        .filter(|id| !id.trim().is_empty())
}

/// Order id as currently set on the page
pub fn current_order_id() -> Option<OrderId> {
    page_order_id().map(OrderId::from_string)
}

/// Resolve configuration from window globals and `<body data-*>` attributes
pub fn page_config() -> ClientConfig {
    ClientConfig::from_lookup(|key| match key {
        PUBLISHABLE_KEY => {
            window_string(PUBLISHABLE_KEY).or_else(|| body_data("data-stripe-public-key"))
        }
        ORDER_ID => page_order_id(),
        API_BASE => body_data("data-api-base").or_else(page_origin),
        LOG_LEVEL => body_data("data-log-level"),
        _ => None,
    })
}
