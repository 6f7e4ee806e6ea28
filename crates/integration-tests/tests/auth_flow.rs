//! Integration tests for signup, login, logout, and the session gate.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (proofy-cli migrate)
//! - The web server running (cargo run -p proofy-web)
//!
//! Run with: cargo test -p proofy-integration-tests -- --ignored

use reqwest::StatusCode;

use proofy_integration_tests::{base_url, http_client, signed_in_client, unique_email};

// ============================================================================
// Session Gate Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_dashboard_redirects_anonymous_to_login() {
    let client = http_client();
    let base = base_url();

    let resp = client
        .get(format!("{base}/dashboard"))
        .send()
        .await
        .expect("Failed to request dashboard");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("redirect without Location header");
    assert!(location.starts_with("/auth/login"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_health_is_public() {
    let client = http_client();
    let base = base_url();

    let resp = client
        .get(format!("{base}/health"))
        .send()
        .await
        .expect("Failed to request health");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_landing_page_is_public() {
    let client = http_client();
    let base = base_url();

    let resp = client
        .get(format!("{base}/"))
        .send()
        .await
        .expect("Failed to request landing page");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Proofy"));
}

// ============================================================================
// Signup & Login Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_signup_then_login_reaches_dashboard() {
    let (client, email) = signed_in_client("auth-flow").await;
    let base = base_url();

    let resp = client
        .get(format!("{base}/dashboard"))
        .send()
        .await
        .expect("Failed to request dashboard");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains(&email));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_duplicate_signup_redirects_with_error() {
    let client = http_client();
    let base = base_url();
    let email = unique_email("dup-signup");
    let password = "integration-test-password";

    for attempt in 0..2 {
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

        assert!(resp.status().is_redirection());
        let location = resp
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .expect("redirect without Location header");

        if attempt == 0 {
            assert!(location.contains("success=registered"), "{location}");
        } else {
            assert!(location.contains("error=email_taken"), "{location}");
        }
    }
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_login_with_wrong_password_redirects_with_error() {
    let (_, email) = signed_in_client("wrong-pass").await;
    let client = http_client();
    let base = base_url();

    let resp = client
        .post(format!("{base}/auth/login"))
        .form(&[("email", email.as_str()), ("password", "not the password")])
        .send()
        .await
        .expect("Failed to log in");

    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("redirect without Location header");
    assert!(location.contains("error=credentials"), "{location}");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_logout_clears_session() {
    let (client, _) = signed_in_client("logout").await;
    let base = base_url();

    let resp = client
        .post(format!("{base}/auth/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert!(resp.status().is_redirection());

    let resp = client
        .get(format!("{base}/dashboard"))
        .send()
        .await
        .expect("Failed to request dashboard");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}
