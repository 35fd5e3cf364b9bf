//! HTTP-level tests for quota status, checkout and the public catalog.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_user, get, get_auth, post_json_auth, token};
use ideaforge_core::idea::{Category, IdeaRecord, ViabilityBreakdown};
use ideaforge_core::quota::SubscriptionTier;
use ideaforge_db::repositories::IdeaRepo;
use serde_json::json;
use sqlx::PgPool;

fn idea(name: &str, category: Category) -> IdeaRecord {
    IdeaRecord {
        name: name.to_string(),
        description: "Harvest stars to power your farm.".to_string(),
        category,
        genre: "Strategy".to_string(),
        viability: 58,
        viability_breakdown: ViabilityBreakdown {
            originality: 62,
            market_appeal: 50,
            scope: 45,
        },
        source: "reddit".to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn quota_status_reports_own_allowance(pool: PgPool) {
    let id = create_user(&pool, "me@example.com", SubscriptionTier::Free, 1).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/me/quota", &token(id, "user")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"],
        json!({ "userId": id, "subscriptionTier": "free", "generationsRemaining": 1 })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn quota_status_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/me/quota").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn checkout_returns_session_id(pool: PgPool) {
    let id = create_user(&pool, "buyer@example.com", SubscriptionTier::Free, 0).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/billing/checkout-session",
        json!({ "priceId": "price_pro" }),
        &token(id, "user"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "sessionId": format!("cs_test_price_pro_{id}") })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn checkout_without_price_is_invalid(pool: PgPool) {
    let id = create_user(&pool, "buyer@example.com", SubscriptionTier::Free, 0).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/billing/checkout-session",
        json!({}),
        &token(id, "user"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "invalid-argument");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn catalog_is_public_and_filterable(pool: PgPool) {
    IdeaRepo::upsert(&pool, &idea("Star Farm", Category::BoardGame)).await.unwrap();
    IdeaRepo::upsert(&pool, &idea("Deck of Doom", Category::CardGame)).await.unwrap();

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/catalog").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/catalog?category=Card%20Game&limit=5").await;
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Deck of Doom");
    assert_eq!(items[0]["viabilityBreakdown"]["marketAppeal"], 50);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/catalog?category=Pinball").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn catalog_entry_is_looked_up_by_name(pool: PgPool) {
    IdeaRepo::upsert(&pool, &idea("Deck of Doom", Category::CardGame)).await.unwrap();

    let response = get(common::build_test_app(pool.clone()), "/api/v1/catalog/Deck%20of%20Doom").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Deck of Doom");
    assert_eq!(json["data"]["category"], "Card Game");

    let response = get(common::build_test_app(pool), "/api/v1/catalog/Nothing%20Here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "not-found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_paging_is_invalid_argument(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/catalog?limit=lots").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "invalid-argument");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn claims_start_empty(pool: PgPool) {
    let id = create_user(&pool, "plain@example.com", SubscriptionTier::Free, 1).await;

    let response = get_auth(common::build_test_app(pool), "/api/v1/me/claims", &token(id, "user")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], json!({}));
}
