#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use ideaforge_api::auth::jwt::{generate_access_token, JwtConfig};
use ideaforge_api::config::ServerConfig;
use ideaforge_api::router::build_app_router;
use ideaforge_api::state::AppState;
use ideaforge_core::generator::GeneratorConfig;
use ideaforge_core::providers::{
    CheckoutSession, GenerationBackend, PaymentProvider, ProviderError,
};
use ideaforge_core::quota::{QuotaPolicy, SubscriptionTier};
use ideaforge_core::types::DbId;
use ideaforge_db::models::user::CreateUser;
use ideaforge_db::repositories::UserRepo;
use sqlx::PgPool;
use tower::ServiceExt;

pub const SAUTE_MASTER: &str = "```json {\"name\":\"Saute Master\",\"description\":\"...\",\"category\":\"Video Game\",\"genre\":\"Simulation\",\"viability\":70,\"viabilityBreakdown\":{\"originality\":60,\"marketAppeal\":75,\"scope\":50}} ```";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        max_body_bytes: 16 * 1024,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Generation backend with a fixed reply that counts calls.
pub struct FakeBackend {
    reply: Result<String, ProviderError>,
    calls: AtomicUsize,
}

impl FakeBackend {
    pub fn replying(reply: Result<String, ProviderError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationBackend for FakeBackend {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

/// Payment provider that echoes the price id into the session id.
pub struct FakePayments;

#[async_trait]
impl PaymentProvider for FakePayments {
    async fn create_checkout_session(
        &self,
        price_id: &str,
        user_id: DbId,
    ) -> Result<CheckoutSession, ProviderError> {
        Ok(CheckoutSession {
            session_id: format!("cs_test_{price_id}_{user_id}"),
        })
    }
}

/// Build the full application router over `pool` with the given backend.
pub fn build_test_app_with(pool: PgPool, backend: Arc<FakeBackend>) -> Router {
    let state = AppState::new(
        pool,
        test_config(),
        backend,
        Arc::new(FakePayments),
        QuotaPolicy::default(),
        GeneratorConfig::default(),
    );
    build_app_router(state)
}

/// Build the full application router with a backend that always replies
/// with the "Saute Master" idea.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, FakeBackend::replying(Ok(SAUTE_MASTER.to_string())))
}

/// Insert a user and return its id.
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    tier: SubscriptionTier,
    remaining: i32,
) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            subscription_tier: Some(tier),
            generations_remaining: Some(remaining),
            ..Default::default()
        },
    )
    .await
    .expect("user creation should succeed")
    .id
}

/// Mint an access token signed with the test secret.
pub fn token(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, false, &test_config().jwt).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

/// POST `body` verbatim, with an optional `Content-Type`.
pub async fn post_raw_auth(
    app: Router,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
    token: &str,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"));
    if let Some(content_type) = content_type {
        builder = builder.header("Content-Type", content_type);
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}
