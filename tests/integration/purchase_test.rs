//! Integration tests for purchase recording: client confirmation, the
//! payment webhook, and the idempotency between the two.

mod helpers;

use http::StatusCode;
use learnhub_service::WebhookVerifier;
use uuid::Uuid;

fn sign_body(app: &helpers::TestApp, body: &str) -> String {
    let verifier = WebhookVerifier::new(
        app.config.payment.webhook_secret.clone(),
        app.config.payment.timestamp_tolerance_seconds,
    );
    verifier
        .sign(body.as_bytes(), chrono::Utc::now().timestamp())
        .expect("Failed to sign webhook body")
}

fn checkout_event(event_type: &str, user_id: Uuid, course_id: Uuid) -> String {
    serde_json::json!({
        "type": event_type,
        "data": {
            "object": {
                "id": "cs_test_123",
                "metadata": {
                    "user_id": user_id.to_string(),
                    "course_id": course_id.to_string(),
                },
            },
        },
    })
    .to_string()
}

#[tokio::test]
async fn test_confirm_purchase_is_idempotent() {
    let Some(app) = helpers::TestApp::try_new().await else {
        return;
    };

    let owner = Uuid::new_v4();
    let buyer = Uuid::new_v4();
    let owner_token = app.mint_token(owner, "user");
    let buyer_token = app.mint_token(buyer, "user");

    let course_id = app
        .create_course(&owner_token, "Rust Basics", "rust-basics", 4999)
        .await;

    let first = app
        .request(
            "POST",
            &format!("/api/courses/{}/purchases/confirm", course_id),
            None,
            Some(&buyer_token),
        )
        .await;
    assert_eq!(first.status, StatusCode::OK, "body: {:?}", first.body);
    assert_eq!(first.body["already_purchased"], false);
    assert_eq!(first.body["purchase"]["amount_cents"], 4999);
    assert_eq!(first.body["purchase"]["source"], "client");

    let second = app
        .request(
            "POST",
            &format!("/api/courses/{}/purchases/confirm", course_id),
            None,
            Some(&buyer_token),
        )
        .await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["already_purchased"], true);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases WHERE user_id = $1")
        .bind(buyer)
        .fetch_one(&app.db_pool)
        .await
        .expect("count query");
    assert_eq!(count, 1);

    let status = app
        .request(
            "GET",
            &format!("/api/courses/{}/purchases/me", course_id),
            None,
            Some(&buyer_token),
        )
        .await;
    assert_eq!(status.status, StatusCode::OK);
    assert_eq!(status.body["purchased"], true);
}

#[tokio::test]
async fn test_purchase_status_when_not_purchased() {
    let Some(app) = helpers::TestApp::try_new().await else {
        return;
    };

    let owner = Uuid::new_v4();
    let owner_token = app.mint_token(owner, "user");
    let course_id = app
        .create_course(&owner_token, "Unpurchased", "unpurchased", 1000)
        .await;

    let stranger_token = app.mint_token(Uuid::new_v4(), "user");
    let status = app
        .request(
            "GET",
            &format!("/api/courses/{}/purchases/me", course_id),
            None,
            Some(&stranger_token),
        )
        .await;

    assert_eq!(status.status, StatusCode::OK);
    assert_eq!(status.body["purchased"], false);
    assert!(status.body["purchase"].is_null());
}

#[tokio::test]
async fn test_confirm_purchase_requires_auth() {
    let Some(app) = helpers::TestApp::try_new().await else {
        return;
    };

    let response = app
        .request(
            "POST",
            &format!("/api/courses/{}/purchases/confirm", Uuid::new_v4()),
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["status"], 401);
}

#[tokio::test]
async fn test_webhook_records_purchase() {
    let Some(app) = helpers::TestApp::try_new().await else {
        return;
    };

    let owner = Uuid::new_v4();
    let buyer = Uuid::new_v4();
    let owner_token = app.mint_token(owner, "user");
    let course_id = app
        .create_course(&owner_token, "Webhook Course", "webhook-course", 2500)
        .await;

    let body = checkout_event("checkout.session.completed", buyer, course_id);
    let signature = sign_body(&app, &body);

    let response = app.post_webhook(&body, Some(&signature)).await;
    assert_eq!(response.status, StatusCode::OK, "body: {:?}", response.body);
    assert_eq!(response.body["received"], true);
    assert_eq!(response.body["recorded"], true);

    let buyer_token = app.mint_token(buyer, "user");
    let status = app
        .request(
            "GET",
            &format!("/api/courses/{}/purchases/me", course_id),
            None,
            Some(&buyer_token),
        )
        .await;
    assert_eq!(status.body["purchased"], true);
    assert_eq!(status.body["purchase"]["source"], "webhook");
    assert_eq!(status.body["purchase"]["provider_ref"], "cs_test_123");
}

#[tokio::test]
async fn test_webhook_rejects_bad_signature() {
    let Some(app) = helpers::TestApp::try_new().await else {
        return;
    };

    let owner_token = app.mint_token(Uuid::new_v4(), "user");
    let course_id = app
        .create_course(&owner_token, "Tamper Course", "tamper-course", 2500)
        .await;

    let buyer = Uuid::new_v4();
    let body = checkout_event("checkout.session.completed", buyer, course_id);
    let signature = sign_body(&app, &body);

    // Body altered after signing.
    let tampered = body.replace("cs_test_123", "cs_test_999");
    let response = app.post_webhook(&tampered, Some(&signature)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases WHERE user_id = $1")
        .bind(buyer)
        .fetch_one(&app.db_pool)
        .await
        .expect("count query");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_webhook_rejects_missing_header() {
    let Some(app) = helpers::TestApp::try_new().await else {
        return;
    };

    let body = checkout_event("checkout.session.completed", Uuid::new_v4(), Uuid::new_v4());
    let response = app.post_webhook(&body, None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["status"], 400);
}

#[tokio::test]
async fn test_webhook_acknowledges_other_event_types() {
    let Some(app) = helpers::TestApp::try_new().await else {
        return;
    };

    let body = checkout_event("payment_intent.created", Uuid::new_v4(), Uuid::new_v4());
    let signature = sign_body(&app, &body);

    let response = app.post_webhook(&body, Some(&signature)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["received"], true);
    assert_eq!(response.body["recorded"], false);
}

#[tokio::test]
async fn test_webhook_then_client_confirm_records_once() {
    let Some(app) = helpers::TestApp::try_new().await else {
        return;
    };

    let owner = Uuid::new_v4();
    let buyer = Uuid::new_v4();
    let owner_token = app.mint_token(owner, "user");
    let course_id = app
        .create_course(&owner_token, "Race Course", "race-course", 2500)
        .await;

    let body = checkout_event("checkout.session.completed", buyer, course_id);
    let signature = sign_body(&app, &body);
    let webhook = app.post_webhook(&body, Some(&signature)).await;
    assert_eq!(webhook.body["recorded"], true);

    // The client fallback arrives after the webhook already won.
    let buyer_token = app.mint_token(buyer, "user");
    let confirm = app
        .request(
            "POST",
            &format!("/api/courses/{}/purchases/confirm", course_id),
            None,
            Some(&buyer_token),
        )
        .await;
    assert_eq!(confirm.status, StatusCode::OK);
    assert_eq!(confirm.body["already_purchased"], true);
    assert_eq!(confirm.body["purchase"]["source"], "webhook");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases WHERE user_id = $1")
        .bind(buyer)
        .fetch_one(&app.db_pool)
        .await
        .expect("count query");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_webhook_with_unknown_course_fails() {
    let Some(app) = helpers::TestApp::try_new().await else {
        return;
    };

    let body = checkout_event("checkout.session.completed", Uuid::new_v4(), Uuid::new_v4());
    let signature = sign_body(&app, &body);

    let response = app.post_webhook(&body, Some(&signature)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
