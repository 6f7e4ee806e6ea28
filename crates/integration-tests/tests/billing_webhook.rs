//! Integration tests for the billing confirmation webhook.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (proofy-cli migrate)
//! - The web server running with `PROOFY_BILLING_WEBHOOK_SECRET` set
//! - `PROOFY_BILLING_WEBHOOK_SECRET` and `PROOFY_DATABASE_URL` in the test
//!   environment, matching the server's
//!
//! Run with: cargo test -p proofy-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use proofy_integration_tests::{base_url, db_pool, now_unix, sign_webhook, signed_in_client};

fn webhook_secret() -> String {
    std::env::var("PROOFY_BILLING_WEBHOOK_SECRET")
        .expect("PROOFY_BILLING_WEBHOOK_SECRET must be set for webhook tests")
}

async fn user_id_by_email(pool: &PgPool, email: &str) -> i32 {
    sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .expect("user not found")
}

async fn is_premium(pool: &PgPool, user_id: i32) -> bool {
    sqlx::query_scalar("SELECT COALESCE((SELECT is_premium FROM profiles WHERE user_id = $1), FALSE)")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("premium lookup failed")
}

// ============================================================================
// Signed Delivery Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_signed_upgrade_flips_premium() {
    let (client, email) = signed_in_client("webhook-upgrade").await;
    let base = base_url();
    let pool = db_pool().await;

    let user_id = user_id_by_email(&pool, &email).await;
    assert!(!is_premium(&pool, user_id).await);

    let body = json!({"event": "upgrade.completed", "user_id": user_id}).to_string();
    let timestamp = now_unix();
    let signature = sign_webhook(&webhook_secret(), timestamp, &body);

    let resp = client
        .post(format!("{base}/api/billing/webhook"))
        .header("X-Proofy-Timestamp", timestamp.to_string())
        .header("X-Proofy-Signature", signature)
        .header("Content-Type", "application/json")
        .body(body)
        .send()
        .await
        .expect("Failed to deliver webhook");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(is_premium(&pool, user_id).await);

    // Premium user is no longer subject to the free-tier limit.
    for i in 1..=4 {
        let resp = client
            .post(format!("{base}/dashboard/projects"))
            .form(&[("title", format!("Premium {i}").as_str()), ("client_name", "Acme")])
            .send()
            .await
            .expect("Failed to create project");
        assert!(resp.status().is_redirection());
        let location = resp
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .expect("redirect without Location header");
        assert!(location.contains("success=project_created"), "{location}");
    }
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_bad_signature_is_rejected_without_side_effects() {
    let (client, email) = signed_in_client("webhook-forged").await;
    let base = base_url();
    let pool = db_pool().await;

    let user_id = user_id_by_email(&pool, &email).await;

    let body = json!({"event": "upgrade.completed", "user_id": user_id}).to_string();
    let timestamp = now_unix();

    let resp = client
        .post(format!("{base}/api/billing/webhook"))
        .header("X-Proofy-Timestamp", timestamp.to_string())
        .header("X-Proofy-Signature", "v0=deadbeef")
        .header("Content-Type", "application/json")
        .body(body)
        .send()
        .await
        .expect("Failed to deliver webhook");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(!is_premium(&pool, user_id).await);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_stale_timestamp_is_rejected() {
    let (client, email) = signed_in_client("webhook-stale").await;
    let base = base_url();
    let pool = db_pool().await;

    let user_id = user_id_by_email(&pool, &email).await;

    let body = json!({"event": "upgrade.completed", "user_id": user_id}).to_string();
    let timestamp = now_unix() - 3600;
    let signature = sign_webhook(&webhook_secret(), timestamp, &body);

    let resp = client
        .post(format!("{base}/api/billing/webhook"))
        .header("X-Proofy-Timestamp", timestamp.to_string())
        .header("X-Proofy-Signature", signature)
        .header("Content-Type", "application/json")
        .body(body)
        .send()
        .await
        .expect("Failed to deliver webhook");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(!is_premium(&pool, user_id).await);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_missing_headers_are_a_bad_request() {
    let (client, email) = signed_in_client("webhook-headless").await;
    let base = base_url();
    let pool = db_pool().await;

    let user_id = user_id_by_email(&pool, &email).await;
    let body = json!({"event": "upgrade.completed", "user_id": user_id}).to_string();

    let resp = client
        .post(format!("{base}/api/billing/webhook"))
        .header("Content-Type", "application/json")
        .body(body)
        .send()
        .await
        .expect("Failed to deliver webhook");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_unknown_event_is_acknowledged_and_ignored() {
    let (client, email) = signed_in_client("webhook-unknown").await;
    let base = base_url();
    let pool = db_pool().await;

    let user_id = user_id_by_email(&pool, &email).await;

    let body = json!({"event": "invoice.paid", "user_id": user_id}).to_string();
    let timestamp = now_unix();
    let signature = sign_webhook(&webhook_secret(), timestamp, &body);

    let resp = client
        .post(format!("{base}/api/billing/webhook"))
        .header("X-Proofy-Timestamp", timestamp.to_string())
        .header("X-Proofy-Signature", signature)
        .header("Content-Type", "application/json")
        .body(body)
        .send()
        .await
        .expect("Failed to deliver webhook");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!is_premium(&pool, user_id).await);
}
