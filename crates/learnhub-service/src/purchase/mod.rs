//! Purchase recording and payment webhook handling.

pub mod service;
pub mod webhook;

pub use service::{PurchaseOutcome, PurchaseService, WebhookOutcome};
pub use webhook::{PaymentEvent, WebhookVerifier};
