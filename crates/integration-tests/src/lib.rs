//! Integration tests for Proofy.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! proofy-cli migrate
//!
//! # Start the web server
//! cargo run -p proofy-web
//!
//! # Run integration tests
//! cargo test -p proofy-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `PROOFY_BASE_URL` - Base URL of the running server (default:
//!   `http://localhost:3000`)
//! - `PROOFY_DATABASE_URL` - `PostgreSQL` connection string, used by tests
//!   that inspect store state directly
//! - `PROOFY_BILLING_WEBHOOK_SECRET` - Shared secret for signing test
//!   webhook deliveries (must match the server's)

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;
use sqlx::PgPool;

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("PROOFY_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Connect to the database under test for direct store assertions.
///
/// # Panics
///
/// Panics if no database URL is configured or the connection fails.
pub async fn db_pool() -> PgPool {
    let url = std::env::var("PROOFY_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("PROOFY_DATABASE_URL must be set for store-inspecting tests");
    PgPool::connect(&url).await.expect("Failed to connect")
}

/// Build a cookie-carrying HTTP client that does not follow redirects.
///
/// Redirects are assertions in these tests, so the client must surface
/// them rather than chase them.
#[must_use]
pub fn http_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Generate a unique test email for this process.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{nanos}-{n}@test.proofy.dev")
}

/// Sign up and log in a fresh user, returning the client and its email.
///
/// # Panics
///
/// Panics if the server rejects the signup or login.
pub async fn signed_in_client(prefix: &str) -> (Client, String) {
    let client = http_client();
    let base = base_url();
    let email = unique_email(prefix);
    let password = "integration-test-password";

    let resp = client
        .post(format!("{base}/auth/signup"))
        .form(&[
            ("email", email.as_str()),
            ("password", password),
            ("password_confirm", password),
        ])
        .send()
        .await
        .expect("Failed to sign up");
    assert!(
        resp.status().is_redirection(),
        "signup did not redirect: {}",
        resp.status()
    );

    let resp = client
        .post(format!("{base}/auth/login"))
        .form(&[("email", email.as_str()), ("password", password)])
        .send()
        .await
        .expect("Failed to log in");
    assert!(
        resp.status().is_redirection(),
        "login did not redirect: {}",
        resp.status()
    );

    (client, email)
}

/// Compute a `v0` webhook signature over `{timestamp}:{body}`.
///
/// # Panics
///
/// Panics if the secret is empty (HMAC accepts any key length otherwise).
#[must_use]
pub fn sign_webhook(secret: &str, timestamp: i64, body: &str) -> String {
    let basestring = format!("v0:{timestamp}:{body}");
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(basestring.as_bytes());
    format!("v0={}", hex::encode(mac.finalize().into_bytes()))
}

/// Current unix timestamp in seconds.
#[must_use]
pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}
