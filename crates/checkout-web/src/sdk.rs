//! Browser SDK Bindings
//!
//! Stripe.js and the Firebase Auth SDK are loaded by the page as globals.
//! They are reached through `Reflect` so a missing SDK is an error value,
//! not a load-time failure of the whole bundle.

use async_trait::async_trait;
use js_sys::{Array, Function, JSON, Promise, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use checkout_core::config::PUBLISHABLE_KEY;
use checkout_core::{
    BillingDetails, CardElement, CheckoutError, CheckoutSessionId, ClientConfig, ClientSecret,
    Credentials,
    IdToken, IdentityProvider, PaymentIntentId, PaymentProcessor, Result,
};

/// Look up a non-null global
fn global(name: &str) -> Option<JsValue> {
    Reflect::get(&js_sys::global(), &JsValue::from_str(name))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn property(target: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

/// `message` of a JS error object, or its string form
pub fn js_message(value: &JsValue) -> String {
    property(value, "message")
        .and_then(|m| m.as_string())
        .or_else(|| value.as_string())
        .unwrap_or_else(|| "Unknown error".into())
}

fn call(target: &JsValue, method: &str, args: &[&JsValue]) -> std::result::Result<JsValue, JsValue> {
    let function: Function = property(target, method)
        .and_then(|f| f.dyn_into().ok())
        .ok_or_else(|| JsValue::from_str(&format!("{method} is not a function")))?;

    let array = Array::new();
    for arg in args {
        array.push(arg);
    }
    function.apply(target, &array)
}

async fn call_async(
    target: &JsValue,
    method: &str,
    args: &[&JsValue],
) -> std::result::Result<JsValue, JsValue> {
    let value = call(target, method, args)?;
    JsFuture::from(Promise::resolve(&value)).await
}

fn json_object(value: &serde_json::Value) -> Result<JsValue> {
    JSON::parse(&value.to_string()).map_err(|e| CheckoutError::Malformed(js_message(&e)))
}

/// Stripe.js client created from the publishable key
#[derive(Clone, Debug)]
pub struct StripeJs {
    stripe: JsValue,
}

impl StripeJs {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let constructor: Function = global("Stripe")
            .and_then(|f| f.dyn_into().ok())
            .ok_or_else(|| CheckoutError::SdkUnavailable("Stripe.js".into()))?;

        let key = config.require_publishable_key()?;

        let stripe = constructor
            .call1(&JsValue::NULL, &JsValue::from_str(key))
            .map_err(|e| CheckoutError::Config(js_message(&e)))?;

        if stripe.is_undefined() || stripe.is_null() {
            return Err(CheckoutError::Config(format!("{PUBLISHABLE_KEY} rejected")));
        }

        Ok(Self { stripe })
    }
}

#[async_trait(?Send)]
impl PaymentProcessor for StripeJs {
    type Card = StripeCard;

    fn create_card(&self) -> Result<StripeCard> {
        let processor = |e: JsValue| CheckoutError::Processor(js_message(&e));

        let elements = call(&self.stripe, "elements", &[]).map_err(processor)?;
        let style = json_object(&serde_json::json!({
            "style": {
                "base": {
                    "fontSize": "18px",
                    "color": "#fff",
                    "::placeholder": { "color": "#bdbdbd" }
                }
            }
        }))?;
        let card = call(&elements, "create", &[&JsValue::from_str("card"), &style]).map_err(processor)?;

        Ok(StripeCard { card })
    }

    async fn confirm_card_payment(
        &self,
        secret: &ClientSecret,
        card: &StripeCard,
        billing: &BillingDetails,
    ) -> Result<PaymentIntentId> {
        let data = json_object(&serde_json::json!({
            "payment_method": {
                "billing_details": { "name": billing.name, "email": billing.email }
            }
        }))?;
        let payment_method = property(&data, "payment_method")
            .ok_or_else(|| CheckoutError::Malformed("payment_method".into()))?;
        Reflect::set(&payment_method, &JsValue::from_str("card"), &card.card)
            .map_err(|e| CheckoutError::Malformed(js_message(&e)))?;

        let result = call_async(
            &self.stripe,
            "confirmCardPayment",
            &[&JsValue::from_str(secret.expose()), &data],
        )
        .await
        .map_err(|e| CheckoutError::Transport(js_message(&e)))?;

        if let Some(error) = property(&result, "error") {
            return Err(CheckoutError::Processor(js_message(&error)));
        }

        property(&result, "paymentIntent")
            .and_then(|intent| property(&intent, "id"))
            .and_then(|id| id.as_string())
            .map(PaymentIntentId::from_string)
            .ok_or_else(|| CheckoutError::Malformed("paymentIntent.id missing".into()))
    }

    async fn redirect_to_checkout(&self, session: &CheckoutSessionId) -> Result<()> {
        let options = json_object(&serde_json::json!({ "sessionId": session.as_str() }))?;
        let result = call_async(&self.stripe, "redirectToCheckout", &[&options])
            .await
            .map_err(|e| CheckoutError::Transport(js_message(&e)))?;

        match property(&result, "error") {
            Some(error) => Err(CheckoutError::Processor(js_message(&error))),
            None => Ok(()),
        }
    }
}

/// Stripe card Element
#[derive(Clone, Debug)]
pub struct StripeCard {
    card: JsValue,
}

impl StripeCard {
    /// Forward `change` events as the event's error message, if any
    pub fn on_change(&self, handler: impl Fn(Option<String>) + 'static) -> Result<()> {
        let listener = Closure::<dyn Fn(JsValue)>::new(move |event: JsValue| {
            handler(property(&event, "error").map(|e| js_message(&e)));
        });
        call(
            &self.card,
            "on",
            &[&JsValue::from_str("change"), listener.as_ref()],
        )
        .map_err(|e| CheckoutError::Processor(js_message(&e)))?;
        // Lives as long as the card; Stripe drops its reference on destroy
        listener.forget();
        Ok(())
    }
}

impl CardElement for StripeCard {
    fn mount(&self, selector: &str) -> Result<()> {
        call(&self.card, "mount", &[&JsValue::from_str(selector)])
            .map(|_| ())
            .map_err(|e| CheckoutError::Processor(js_message(&e)))
    }

    fn destroy(&self) -> Result<()> {
        call(&self.card, "destroy", &[])
            .map(|_| ())
            .map_err(|e| CheckoutError::Processor(js_message(&e)))
    }
}

/// Firebase Auth (namespaced SDK) identity provider
#[derive(Clone, Debug, Default)]
pub struct FirebaseAuth {
    firebase: Option<JsValue>,
}

impl FirebaseAuth {
    pub fn new() -> Self {
        Self {
            firebase: global("firebase"),
        }
    }

    fn auth(&self) -> Result<JsValue> {
        let firebase = self
            .firebase
            .as_ref()
            .ok_or_else(|| CheckoutError::SdkUnavailable("Firebase SDK".into()))?;
        call(firebase, "auth", &[]).map_err(|e| CheckoutError::Identity(js_message(&e)))
    }

    async fn token(&self, method: &str, credentials: &Credentials) -> Result<IdToken> {
        let identity = |e: JsValue| CheckoutError::Identity(js_message(&e));

        let auth = self.auth()?;
        let user_credential = call_async(
            &auth,
            method,
            &[
                &JsValue::from_str(&credentials.email),
                &JsValue::from_str(&credentials.password),
            ],
        )
        .await
        .map_err(identity)?;

        let user = property(&user_credential, "user")
            .ok_or_else(|| CheckoutError::Identity("No user returned".into()))?;
        let token = call_async(&user, "getIdToken", &[]).await.map_err(identity)?;

        token
            .as_string()
            .map(IdToken::from_string)
            .ok_or_else(|| CheckoutError::Identity("No id token returned".into()))
    }
}

#[async_trait(?Send)]
impl IdentityProvider for FirebaseAuth {
    fn name(&self) -> &str {
        "Firebase"
    }

    fn is_loaded(&self) -> bool {
        self.firebase
            .as_ref()
            .and_then(|f| property(f, "auth"))
            .is_some_and(|auth| auth.is_function())
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<IdToken> {
        self.token("signInWithEmailAndPassword", credentials).await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<IdToken> {
        self.token("createUserWithEmailAndPassword", credentials).await
    }
}
