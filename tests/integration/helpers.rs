//! Shared test helpers for integration tests.
//!
//! These tests need a PostgreSQL instance. Point `TEST_DATABASE_URL` at a
//! scratch database to run them; when the variable is unset every test
//! returns early so the suite passes without one.

use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tower::ServiceExt;
use uuid::Uuid;

use learnhub_core::config::{
    AppConfig, AuthConfig, DatabaseConfig, GamificationConfig, LoggingConfig, PaymentConfig,
    RealtimeConfig, ServerConfig,
};
use learnhub_database::DatabasePool;
use learnhub_realtime::RealtimeEngine;

static CLEANED: OnceCell<()> = OnceCell::const_new();

/// Test application context.
pub struct TestApp {
    /// Router for in-process requests.
    pub router: Router,
    /// Pool for direct assertions against the database.
    pub db_pool: PgPool,
    /// The configuration the app was built with.
    pub config: AppConfig,
    /// Realtime engine handle shared with the router.
    pub realtime: Arc<RealtimeEngine>,
}

impl TestApp {
    /// Build the app against the database named by `TEST_DATABASE_URL`.
    ///
    /// Returns `None` when the variable is unset.
    pub async fn try_new() -> Option<Self> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let config = test_config(url);

        let db = DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");
        let db_pool = db.into_pool();

        learnhub_database::migration::run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        // Tests in one binary run in parallel and share the database, so
        // the wipe happens once per binary and every test uses fresh ids.
        CLEANED
            .get_or_init(|| async {
                clean_database(&db_pool).await;
            })
            .await;

        let state = learnhub_api::build_state(config.clone(), db_pool.clone());
        let realtime = Arc::clone(&state.realtime);
        let router = learnhub_api::build_app(state);

        Some(Self {
            router,
            db_pool,
            config,
            realtime,
        })
    }

    /// Mint an HS256 access token the way the external auth provider would.
    pub fn mint_token(&self, user_id: Uuid, role: &str) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = serde_json::json!({
            "sub": user_id,
            "role": role,
            "iat": now,
            "exp": now + 3600,
        });

        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(self.config.auth.jwt_secret.as_bytes()),
        )
        .expect("Failed to mint token")
    }

    /// Make a JSON request to the test app.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// POST a raw body with an optional webhook signature header.
    pub async fn post_webhook(&self, body: &str, signature: Option<&str>) -> TestResponse {
        let mut req = Request::builder()
            .method("POST")
            .uri("/api/webhooks/payment")
            .header("Content-Type", "application/json");

        if let Some(sig) = signature {
            req = req.header("X-Webhook-Signature", sig);
        }

        let req = req
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Create a course through the API and return its id.
    pub async fn create_course(
        &self,
        token: &str,
        title: &str,
        slug: &str,
        price_cents: i64,
    ) -> Uuid {
        let response = self
            .request(
                "POST",
                "/api/courses",
                Some(serde_json::json!({
                    "title": title,
                    "slug": slug,
                    "price_cents": price_cents,
                })),
                Some(token),
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Course create failed: {:?}",
            response.body
        );
        parse_id(&response.body)
    }

    /// Create a chapter through the API and return its id.
    pub async fn create_chapter(
        &self,
        token: &str,
        course_id: Uuid,
        title: &str,
        position: i32,
    ) -> Uuid {
        let response = self
            .request(
                "POST",
                &format!("/api/courses/{}/chapters", course_id),
                Some(serde_json::json!({
                    "title": title,
                    "position": position,
                })),
                Some(token),
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Chapter create failed: {:?}",
            response.body
        );
        parse_id(&response.body)
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Parsed JSON body.
    pub body: Value,
}

/// Extract the `id` field from a response body.
pub fn parse_id(body: &Value) -> Uuid {
    body.get("id")
        .and_then(|v| v.as_str())
        .and_then(|s| Uuid::parse_str(s).ok())
        .expect("No id in response body")
}

fn test_config(database_url: String) -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: database_url,
            max_connections: 5,
            min_connections: 1,
            connect_timeout_seconds: 5,
            idle_timeout_seconds: 60,
        },
        auth: AuthConfig {
            jwt_secret: "test-jwt-secret".to_string(),
            issuer: String::new(),
            leeway_seconds: 30,
        },
        payment: PaymentConfig {
            webhook_secret: "whsec_test".to_string(),
            timestamp_tolerance_seconds: 300,
            completed_event_type: "checkout.session.completed".to_string(),
        },
        realtime: RealtimeConfig::default(),
        gamification: GamificationConfig::default(),
        logging: LoggingConfig::default(),
    }
}

/// Remove all rows written by previous runs. The badge catalog is seeded
/// by migrations and left alone.
async fn clean_database(pool: &PgPool) {
    let tables = [
        "user_badges",
        "point_activities",
        "user_profiles",
        "comments",
        "purchases",
        "chapters",
        "courses",
    ];

    for table in &tables {
        let query = format!("DELETE FROM {}", table);
        let _ = sqlx::query(&query).execute(pool).await;
    }
}
