//! Page Components

mod checkout;
mod home;
mod payment;

pub use checkout::CheckoutPage;
pub use home::HomePage;
pub use payment::{PaymentPage, PaymentPanel};
