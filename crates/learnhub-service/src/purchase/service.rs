//! Purchase service.
//!
//! Purchases arrive over two racing paths: the payment provider's webhook and
//! the client's post-checkout confirmation call. Both funnel into the same
//! idempotent recorder, so whichever lands second still observes a success
//! with `already_purchased` set.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use learnhub_core::config::PaymentConfig;
use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;
use learnhub_database::repositories::{CourseRepository, PurchaseRepository};
use learnhub_entity::purchase::model::{Purchase, PurchaseSource, RecordPurchase};

use crate::context::RequestContext;
use crate::purchase::webhook::{PaymentEvent, WebhookVerifier};

/// Result of recording a purchase through either path.
#[derive(Debug, Clone)]
pub struct PurchaseOutcome {
    pub purchase: Purchase,
    /// True when the purchase already existed and this call changed nothing.
    pub already_purchased: bool,
}

/// Result of processing a verified webhook delivery.
#[derive(Debug, Clone)]
pub enum WebhookOutcome {
    /// A completed checkout was recorded (or found already recorded).
    Recorded(PurchaseOutcome),
    /// The event type is not one we act on. Acknowledged so the provider
    /// stops retrying.
    Ignored { event_type: String },
}

/// Service for purchase recording and entitlement checks.
#[derive(Debug, Clone)]
pub struct PurchaseService {
    purchase_repo: Arc<PurchaseRepository>,
    course_repo: Arc<CourseRepository>,
    verifier: WebhookVerifier,
    completed_event_type: String,
}

impl PurchaseService {
    pub fn new(
        purchase_repo: Arc<PurchaseRepository>,
        course_repo: Arc<CourseRepository>,
        payment: &PaymentConfig,
    ) -> Self {
        Self {
            purchase_repo,
            course_repo,
            verifier: WebhookVerifier::new(
                payment.webhook_secret.clone(),
                payment.timestamp_tolerance_seconds,
            ),
            completed_event_type: payment.completed_event_type.clone(),
        }
    }

    /// Record a purchase on behalf of the authenticated caller, after the
    /// client observed a successful checkout.
    pub async fn confirm_purchase(
        &self,
        ctx: &RequestContext,
        course_id: Uuid,
    ) -> AppResult<PurchaseOutcome> {
        let course = self
            .course_repo
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))?;

        let outcome = self
            .record(RecordPurchase {
                user_id: ctx.user_id,
                course_id,
                amount_cents: course.price_cents,
                source: PurchaseSource::Client,
                provider_ref: None,
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            course_id = %course_id,
            already_purchased = outcome.already_purchased,
            "Client purchase confirmation"
        );

        Ok(outcome)
    }

    /// The caller's purchase of a course, if any.
    pub async fn get_my_purchase(
        &self,
        ctx: &RequestContext,
        course_id: Uuid,
    ) -> AppResult<Option<Purchase>> {
        self.purchase_repo
            .find_by_user_and_course(ctx.user_id, course_id)
            .await
    }

    /// Verify and process a raw webhook delivery.
    ///
    /// Returns an error for bad signatures and malformed payloads so the
    /// endpoint responds 400 and the provider surfaces the delivery as
    /// failed. Unknown event types are acknowledged, not errored, so the
    /// provider does not retry them forever.
    pub async fn process_webhook(
        &self,
        signature_header: Option<&str>,
        body: &[u8],
    ) -> AppResult<WebhookOutcome> {
        let header = signature_header
            .ok_or_else(|| AppError::validation("Missing webhook signature header"))?;
        self.verifier.verify(header, body, Utc::now().timestamp())?;

        let event = PaymentEvent::parse(body)?;
        if event.event_type != self.completed_event_type {
            info!(event_type = %event.event_type, "Ignoring webhook event type");
            return Ok(WebhookOutcome::Ignored {
                event_type: event.event_type,
            });
        }

        let user_id = event.metadata_uuid("user_id")?;
        let course_id = event.metadata_uuid("course_id")?;
        let provider_ref = event.data.object.id.clone();

        let outcome = self
            .record_webhook_purchase(user_id, course_id, provider_ref)
            .await?;
        Ok(WebhookOutcome::Recorded(outcome))
    }

    /// Record a purchase reported by the payment provider.
    pub async fn record_webhook_purchase(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        provider_ref: Option<String>,
    ) -> AppResult<PurchaseOutcome> {
        let course = self
            .course_repo
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::validation("Webhook references an unknown course"))?;

        let outcome = self
            .record(RecordPurchase {
                user_id,
                course_id,
                amount_cents: course.price_cents,
                source: PurchaseSource::Webhook,
                provider_ref,
            })
            .await?;

        info!(
            user_id = %user_id,
            course_id = %course_id,
            already_purchased = outcome.already_purchased,
            "Webhook purchase recorded"
        );

        Ok(outcome)
    }

    async fn record(&self, data: RecordPurchase) -> AppResult<PurchaseOutcome> {
        let (purchase, created) = self.purchase_repo.record(&data).await?;
        Ok(PurchaseOutcome {
            purchase,
            already_purchased: !created,
        })
    }
}
