//! `HttpBackend` against a local axum server speaking the storefront's JSON.

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use checkout_core::backend::{AuthRequest, ConfirmRequest, IntentRequest};
use checkout_core::{
    AuthMode, Backend, CheckoutError, ClientConfig, CheckoutRecord, GuestContact, HttpBackend, IdToken, OrderId,
    PaymentIntentId,
};

async fn create_payment_intent(Json(body): Json<Value>) -> Json<Value> {
    match body["order_id"].as_str() {
        Some(order_id) => Json(json!({ "clientSecret": format!("pi_{order_id}_secret_x") })),
        None => Json(json!({ "error": "No active order" })),
    }
}

async fn confirm_payment(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["payment_intent_id"] == "pi_ok" && body["order_id"] == "order-1" {
        (StatusCode::OK, Json(json!({ "status": "success" })))
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Payment not verified" })),
        )
    }
}

async fn checkout_process(Json(body): Json<Value>) -> Json<Value> {
    let email = body["email"].as_str().unwrap_or_default();
    Json(json!({ "session_id": format!("cs_{email}") }))
}

async fn guest_checkout(Json(body): Json<Value>) -> Json<Value> {
    if body["order_id"].is_null() {
        Json(json!({ "message": "Guest checkout successful" }))
    } else {
        Json(json!({ "error": "Order not found" }))
    }
}

async fn login(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "success": body["id_token"] == "good-token" }))
}

async fn signup() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

async fn spawn_backend() -> HttpBackend {
    let app = Router::new()
        .route("/create-payment-intent", post(create_payment_intent))
        .route("/confirm-payment", post(confirm_payment))
        .route("/checkout_process", post(checkout_process))
        .route("/guest_checkout", post(guest_checkout))
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ClientConfig {
        api_base: format!("http://{addr}/"),
        ..ClientConfig::from_env()
    };
    HttpBackend::from_config(&config)
}

#[tokio::test]
async fn test_payment_intent_round_trip() {
    let backend = spawn_backend().await;

    let resp = backend
        .create_payment_intent(&IntentRequest {
            order_id: Some(OrderId::from_string("order-1")),
        })
        .await
        .unwrap();
    assert_eq!(resp.client_secret.unwrap().expose(), "pi_order-1_secret_x");

    let resp = backend
        .create_payment_intent(&IntentRequest { order_id: None })
        .await
        .unwrap();
    assert!(resp.client_secret.is_none());
    assert_eq!(resp.error.as_deref(), Some("No active order"));
}

#[tokio::test]
async fn test_confirm_payment_reads_error_body_on_4xx() {
    let backend = spawn_backend().await;

    let ok = backend
        .confirm_payment(&ConfirmRequest {
            payment_intent_id: PaymentIntentId::from_string("pi_ok"),
            order_id: Some(OrderId::from_string("order-1")),
        })
        .await
        .unwrap();
    assert!(ok.is_success());

    let rejected = backend
        .confirm_payment(&ConfirmRequest {
            payment_intent_id: PaymentIntentId::from_string("pi_forged"),
            order_id: Some(OrderId::from_string("order-1")),
        })
        .await
        .unwrap();
    assert!(!rejected.is_success());
    assert_eq!(rejected.error.as_deref(), Some("Payment not verified"));
}

#[tokio::test]
async fn test_checkout_session_and_guest() {
    let backend = spawn_backend().await;

    let session = backend
        .create_checkout_session(&CheckoutRecord {
            email: "ada@example.com".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(session.session_id.unwrap().as_str(), "cs_ada@example.com");

    let guest = backend
        .register_guest(&GuestContact::default())
        .await
        .unwrap();
    assert!(guest.error.is_none());

    let guest = backend
        .register_guest(&GuestContact {
            order_id: Some(OrderId::from_string("missing")),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(guest.error.as_deref(), Some("Order not found"));
}

#[tokio::test]
async fn test_auth_relay_endpoints() {
    let backend = spawn_backend().await;

    let resp = backend
        .establish_session(
            AuthMode::Login,
            &AuthRequest {
                id_token: IdToken::from_string("good-token"),
            },
        )
        .await
        .unwrap();
    assert!(resp.success);

    let err = backend
        .establish_session(
            AuthMode::Signup,
            &AuthRequest {
                id_token: IdToken::from_string("good-token"),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::Malformed(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpBackend::new(format!("http://{addr}"));
    let err = backend
        .create_payment_intent(&IntentRequest { order_id: None })
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::Transport(_)));
}
